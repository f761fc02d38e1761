//! Periodic background refresh of everything the cache currently tracks.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::cache::DataManager;

/// Seconds between refresh cycles.
const REFRESH_INTERVAL_SECS: u64 = 300;

/// Cancellable repeating timer driving `DataManager::refresh_all`.
///
/// Overlap between a slow cycle and the next tick is safe: the manager's
/// per-key locks serialize writes to the same key, so cycles queue per key
/// rather than interleave.
pub struct RefreshScheduler {
    manager: DataManager,
    period: Duration,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl RefreshScheduler {
    pub fn new(manager: DataManager) -> Self {
        Self::with_period(manager, Duration::from_secs(REFRESH_INTERVAL_SECS))
    }

    /// Mainly for tests; production uses the fixed five-minute period.
    pub fn with_period(manager: DataManager, period: Duration) -> Self {
        Self {
            manager,
            period,
            handle: Mutex::new(None),
        }
    }

    /// Arm the timer. Any previously running timer is cancelled first, so
    /// starting twice never leaves two timers ticking.
    pub async fn start(&self) {
        let mut handle = self.handle.lock().await;
        if let Some(existing) = handle.take() {
            existing.abort();
            debug!("Cancelled previous refresh timer");
        }

        let manager = self.manager.clone();
        let period = self.period;
        *handle = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; consume it so the first
            // cycle runs a full period after start.
            interval.tick().await;
            loop {
                interval.tick().await;
                manager.refresh_all().await;
            }
        }));
        info!(period_secs = period.as_secs(), "Periodic refresh started");
    }

    /// Cancel the timer; safe to call when not running.
    pub async fn stop(&self) {
        if let Some(handle) = self.handle.lock().await.take() {
            handle.abort();
            info!("Periodic refresh stopped");
        }
    }

    pub async fn is_running(&self) -> bool {
        self.handle.lock().await.is_some()
    }
}

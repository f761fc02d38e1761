//! Debounced club search for autocomplete collaborators.
//!
//! Typing schedules a lookup after a quiet period; every keystroke cancels
//! the lookup still pending, and a cancelled lookup never delivers its
//! result.

use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::api::{ApiClient, ApiError};
use crate::models::ClubSearchItem;

/// Quiet period before a typed term is sent to the search endpoint.
const DEBOUNCE_MS: u64 = 300;

/// Buffer size for delivered search results.
const RESULT_CHANNEL_CAPACITY: usize = 8;

/// A completed lookup: the term it was for and the matching clubs.
pub type SearchUpdate = (String, Result<Vec<ClubSearchItem>, ApiError>);

pub struct ClubSearch {
    client: ApiClient,
    delay: Duration,
    tx: mpsc::Sender<SearchUpdate>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl ClubSearch {
    pub fn new(client: ApiClient) -> (Self, mpsc::Receiver<SearchUpdate>) {
        Self::with_delay(client, Duration::from_millis(DEBOUNCE_MS))
    }

    /// Mainly for tests; production uses the fixed 300ms quiet period.
    pub fn with_delay(client: ApiClient, delay: Duration) -> (Self, mpsc::Receiver<SearchUpdate>) {
        let (tx, rx) = mpsc::channel(RESULT_CHANNEL_CAPACITY);
        (
            Self {
                client,
                delay,
                tx,
                pending: Mutex::new(None),
            },
            rx,
        )
    }

    /// Schedule a lookup for `term`, cancelling any lookup still pending.
    pub async fn query(&self, term: &str) {
        let mut pending = self.pending.lock().await;
        if let Some(previous) = pending.take() {
            previous.abort();
            debug!("Cancelled pending club search");
        }

        let client = self.client.clone();
        let delay = self.delay;
        let tx = self.tx.clone();
        let term = term.to_string();
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let result = client.search_clubs(&term).await.map(|r| r.into_items());
            let _ = tx.send((term, result)).await;
        }));
    }
}

//! Local-first cache and background sync for grassroots cricket ladders.
//!
//! The crate tracks a set of clubs, resolves each to its active season and
//! teams, and keeps league ladders for the grades those teams compete in
//! fresh against the remote API. Reads are always served from the in-memory
//! cache (hydrated from disk at startup); the network is only touched by
//! explicit loads and the periodic refresh cycle, and one club's failure
//! never blocks or corrupts another's data.
//!
//! Presentation layers are expected to:
//! - call [`DataManager`] operations (`load_all_clubs`, `load_ladder`, ...)
//! - read its derived views (`grades_for_club`, `team_ids`, `ladder`, ...)
//! - subscribe to [`CacheEvent`]s to learn when cached data changed

pub mod api;
pub mod cache;
pub mod config;
pub mod models;
pub mod scheduler;
pub mod search;

pub use api::{ApiClient, ApiError};
pub use cache::{CacheEvent, CacheStore, CachedLadderRecord, DataManager, FileCacheStore, LoadOutcome};
pub use config::Config;
pub use scheduler::RefreshScheduler;
pub use search::{ClubSearch, SearchUpdate};

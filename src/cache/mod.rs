//! In-memory cache of teams, seasons and ladders, backed by a persistent
//! store so standings are available immediately on startup.
//!
//! - `store`: durable key/value persistence (one record per fetched grade)
//! - `manager`: the coordinating `DataManager` that owns the maps, fans
//!   fetches out per club and serializes writes per key

pub mod manager;
pub mod store;

pub use manager::{CacheEvent, DataManager, LoadOutcome};
pub use store::{CacheStore, CachedLadderRecord, FileCacheStore};

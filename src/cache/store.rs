//! Durable backing store for ladder snapshots and the tracked club list.
//!
//! The contract is key/value: replace-or-insert one record per grade id and
//! read everything back at startup. The file-per-record layout here is an
//! implementation choice; any engine with the same semantics would do.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::Club;

/// One persisted ladder snapshot. Exactly one record exists per grade ever
/// fetched; club removal does not delete these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedLadderRecord {
    pub grade_id: String,
    pub grade_name: String,
    /// Serialized `LaddersResponse` JSON.
    pub payload: String,
    pub fetched_at: DateTime<Utc>,
}

/// Persistence interface for the cache. The storage engine is outside the
/// core's contract; only upsert and read-all semantics matter.
pub trait CacheStore: Send + Sync {
    /// Atomic replace-or-insert keyed by `grade_id`.
    fn upsert_ladder(&self, record: CachedLadderRecord) -> Result<()>;

    /// Every record ever stored, in no particular order.
    fn read_ladders(&self) -> Result<Vec<CachedLadderRecord>>;

    fn save_clubs(&self, clubs: &[Club]) -> Result<()>;

    fn load_clubs(&self) -> Result<Vec<Club>>;
}

const LADDER_FILE_PREFIX: &str = "ladder_";
const CLUBS_FILE: &str = "clubs.json";

/// File-backed store: one JSON file per grade plus a club list file.
pub struct FileCacheStore {
    cache_dir: PathBuf,
}

impl FileCacheStore {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)
            .with_context(|| format!("Failed to create cache directory {}", cache_dir.display()))?;
        Ok(Self { cache_dir })
    }

    fn ladder_path(&self, grade_id: &str) -> PathBuf {
        // Grade ids are GUIDs; strip anything path-hostile regardless.
        let safe: String = grade_id
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
            .collect();
        // Stripping can collapse distinct ids onto the same name; a hash of
        // the raw id keeps every grade on its own file.
        let name = if safe == grade_id {
            format!("{}{}.json", LADDER_FILE_PREFIX, safe)
        } else {
            let mut hasher = DefaultHasher::new();
            grade_id.hash(&mut hasher);
            format!("{}{}-{:016x}.json", LADDER_FILE_PREFIX, safe, hasher.finish())
        };
        self.cache_dir.join(name)
    }

    /// Write-then-rename so a crash mid-write never leaves a torn record.
    fn write_atomic(&self, path: &Path, contents: &str) -> Result<()> {
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, contents)
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;
        Ok(())
    }
}

impl CacheStore for FileCacheStore {
    fn upsert_ladder(&self, record: CachedLadderRecord) -> Result<()> {
        let path = self.ladder_path(&record.grade_id);
        let contents = serde_json::to_string_pretty(&record)?;
        self.write_atomic(&path, &contents)
    }

    fn read_ladders(&self) -> Result<Vec<CachedLadderRecord>> {
        let mut records = Vec::new();
        for entry in std::fs::read_dir(&self.cache_dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if !name.starts_with(LADDER_FILE_PREFIX) || !name.ends_with(".json") {
                continue;
            }
            let contents = std::fs::read_to_string(entry.path())
                .with_context(|| format!("Failed to read cache file {}", name))?;
            match serde_json::from_str(&contents) {
                Ok(record) => records.push(record),
                Err(e) => debug!(file = name, error = %e, "Skipping unreadable ladder record"),
            }
        }
        Ok(records)
    }

    fn save_clubs(&self, clubs: &[Club]) -> Result<()> {
        let path = self.cache_dir.join(CLUBS_FILE);
        let contents = serde_json::to_string_pretty(clubs)?;
        self.write_atomic(&path, &contents)
    }

    fn load_clubs(&self) -> Result<Vec<Club>> {
        let path = self.cache_dir.join(CLUBS_FILE);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", CLUBS_FILE))?;
        serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", CLUBS_FILE))
    }
}

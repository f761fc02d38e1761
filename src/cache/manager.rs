//! Cache coordination for tracked clubs and their ladders.
//!
//! `DataManager` owns the in-memory maps (club -> teams, club -> selected
//! season, grade -> ladder), fans fetches out one task per club, serializes
//! writes per key, and bridges successful ladder fetches to the persistent
//! store. Failures are recorded per key and never disturb cached data or
//! sibling keys.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tokio::sync::{broadcast, Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError};
use crate::cache::store::{CacheStore, CachedLadderRecord, FileCacheStore};
use crate::config::Config;
use crate::models::{Club, LaddersResponse, Season, Team, TeamGrade};

/// Buffer size for the change-notification channel.
/// 64 comfortably covers a full refresh cycle's worth of events.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Emitted after each successful mutation of the cached maps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
    SeasonSelected { org_id: String },
    TeamsUpdated { org_id: String },
    LadderUpdated { grade_id: String },
    ClubsChanged,
}

/// Outcome of a team load that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Teams for the club's selected season are now cached.
    Loaded,
    /// The club has no published seasons yet; nothing was fetched or
    /// overwritten. A valid transient state, not an error.
    NotYetAvailable,
}

struct Inner {
    client: ApiClient,
    store: Arc<dyn CacheStore>,
    clubs: RwLock<Vec<Club>>,
    teams: RwLock<HashMap<String, Vec<Team>>>,
    seasons: RwLock<HashMap<String, Season>>,
    ladders: RwLock<HashMap<String, LaddersResponse>>,
    last_error: RwLock<Option<String>>,
    last_updated: RwLock<Option<DateTime<Utc>>>,
    /// One mutex per org/grade id: a fetch-then-write for a key never
    /// interleaves with another for the same key, while different keys
    /// proceed in parallel.
    key_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    events: broadcast::Sender<CacheEvent>,
}

/// Coordinating cache handle.
/// Clone is cheap - all state is shared behind an Arc.
#[derive(Clone)]
pub struct DataManager {
    inner: Arc<Inner>,
}

impl DataManager {
    pub fn new(client: ApiClient, store: Arc<dyn CacheStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                client,
                store,
                clubs: RwLock::new(Vec::new()),
                teams: RwLock::new(HashMap::new()),
                seasons: RwLock::new(HashMap::new()),
                ladders: RwLock::new(HashMap::new()),
                last_error: RwLock::new(None),
                last_updated: RwLock::new(None),
                key_locks: Mutex::new(HashMap::new()),
                events,
            }),
        }
    }

    /// Assemble a manager from configuration: a real API client plus a
    /// file-backed store under the configured cache directory.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = ApiClient::with_base_urls(&config.api_base_url, &config.search_base_url)?;
        let store = Arc::new(FileCacheStore::new(config.cache_dir()?)?);
        Ok(Self::new(client, store))
    }

    /// Subscribe to change notifications. Slow subscribers may observe
    /// `Lagged` and should re-read the maps they care about.
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.inner.events.subscribe()
    }

    fn emit(&self, event: CacheEvent) {
        // Nobody listening is fine.
        let _ = self.inner.events.send(event);
    }

    async fn key_lock(&self, key: &str) -> Arc<Mutex<()>> {
        let mut locks = self.inner.key_locks.lock().await;
        locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn record_error(&self, message: String) {
        warn!(error = %message, "Fetch failed; keeping cached data");
        *self.inner.last_error.write().await = Some(message);
    }

    // =========================================================================
    // Club tracking
    // =========================================================================

    /// Track a club. Duplicate org ids are ignored.
    pub async fn add_club(&self, club: Club) {
        {
            let mut clubs = self.inner.clubs.write().await;
            if clubs
                .iter()
                .any(|c| c.organisation_guid == club.organisation_guid)
            {
                return;
            }
            clubs.push(club);
        }
        self.persist_clubs().await;
        self.emit(CacheEvent::ClubsChanged);
    }

    /// Stop tracking a club, dropping its team and season entries. Ladder
    /// entries stay addressable by grade id: a grade may be shared with
    /// other clubs.
    pub async fn remove_club(&self, org_id: &str) {
        {
            let mut clubs = self.inner.clubs.write().await;
            clubs.retain(|c| c.organisation_guid != org_id);
        }
        self.inner.teams.write().await.remove(org_id);
        self.inner.seasons.write().await.remove(org_id);
        // The org's lock entry has no further use; grade-key locks stay
        // alongside the retained ladder entries.
        self.inner.key_locks.lock().await.remove(org_id);
        self.persist_clubs().await;
        self.emit(CacheEvent::ClubsChanged);
    }

    pub async fn clubs(&self) -> Vec<Club> {
        self.inner.clubs.read().await.clone()
    }

    async fn persist_clubs(&self) {
        let clubs = self.inner.clubs.read().await.clone();
        if let Err(e) = self.inner.store.save_clubs(&clubs) {
            warn!(error = %e, "Failed to persist club list");
        }
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Resolve the club's season (current -> first -> unset) if it is not
    /// cached yet, then fetch and overwrite its team list. Any failure is
    /// recorded and leaves the prior cached state untouched.
    pub async fn load_teams_for_club(&self, org_id: &str) -> Result<LoadOutcome, ApiError> {
        let lock = self.key_lock(org_id).await;
        let _guard = lock.lock().await;

        let season = match self.selected_season(org_id).await {
            Some(season) => season,
            None => {
                let response = match self.inner.client.fetch_seasons(org_id).await {
                    Ok(r) => r,
                    Err(e) => {
                        self.record_error(format!("seasons for {}: {}", org_id, e)).await;
                        return Err(e);
                    }
                };
                match response.preferred().cloned() {
                    Some(season) => {
                        self.inner
                            .seasons
                            .write()
                            .await
                            .insert(org_id.to_string(), season.clone());
                        self.emit(CacheEvent::SeasonSelected {
                            org_id: org_id.to_string(),
                        });
                        season
                    }
                    None => {
                        debug!(org_id, "No seasons published yet");
                        return Ok(LoadOutcome::NotYetAvailable);
                    }
                }
            }
        };

        match self.inner.client.fetch_teams(org_id, &season.id).await {
            Ok(response) => {
                self.inner
                    .teams
                    .write()
                    .await
                    .insert(org_id.to_string(), response.teams);
                self.emit(CacheEvent::TeamsUpdated {
                    org_id: org_id.to_string(),
                });
                Ok(LoadOutcome::Loaded)
            }
            Err(e) => {
                self.record_error(format!("teams for {}: {}", org_id, e)).await;
                Err(e)
            }
        }
    }

    /// Refresh every tracked club concurrently. One club's failure never
    /// cancels or delays the others; returns once every task has finished.
    pub async fn load_all_clubs(&self) {
        let org_ids: Vec<String> = {
            let clubs = self.inner.clubs.read().await;
            clubs.iter().map(|c| c.organisation_guid.clone()).collect()
        };

        join_all(org_ids.iter().map(|org_id| async move {
            let _ = self.load_teams_for_club(org_id).await;
        }))
        .await;

        *self.inner.last_updated.write().await = Some(Utc::now());
    }

    /// Fetch the ladder for a grade, overwrite the in-memory entry and
    /// upsert the persistent snapshot. On failure both entries are left
    /// as they were.
    pub async fn load_ladder(&self, grade_id: &str) -> Result<(), ApiError> {
        let lock = self.key_lock(grade_id).await;
        let _guard = lock.lock().await;

        let response = match self.inner.client.fetch_ladders(grade_id).await {
            Ok(r) => r,
            Err(e) => {
                self.record_error(format!("ladder for {}: {}", grade_id, e)).await;
                return Err(e);
            }
        };

        match serde_json::to_string(&response) {
            Ok(payload) => {
                let record = CachedLadderRecord {
                    grade_id: grade_id.to_string(),
                    grade_name: response.grade.name.clone(),
                    payload,
                    fetched_at: Utc::now(),
                };
                if let Err(e) = self.inner.store.upsert_ladder(record) {
                    warn!(grade_id, error = %e, "Failed to persist ladder snapshot");
                }
            }
            Err(e) => warn!(grade_id, error = %e, "Failed to serialize ladder snapshot"),
        }

        self.inner
            .ladders
            .write()
            .await
            .insert(grade_id.to_string(), response);
        self.emit(CacheEvent::LadderUpdated {
            grade_id: grade_id.to_string(),
        });
        Ok(())
    }

    /// One refresh cycle: every tracked club, then every grade currently in
    /// the in-memory ladder map (the working set, not a fixed list).
    pub async fn refresh_all(&self) {
        info!("Refresh cycle starting");
        self.load_all_clubs().await;

        let grade_ids: Vec<String> = {
            let ladders = self.inner.ladders.read().await;
            ladders.keys().cloned().collect()
        };
        join_all(grade_ids.iter().map(|grade_id| async move {
            let _ = self.load_ladder(grade_id).await;
        }))
        .await;

        *self.inner.last_updated.write().await = Some(Utc::now());
        info!("Refresh cycle complete");
    }

    // =========================================================================
    // Hydration
    // =========================================================================

    /// Load persisted state into memory at startup. Records whose payload no
    /// longer deserializes are skipped; the next successful fetch replaces
    /// them.
    pub async fn hydrate_from_store(&self) {
        match self.inner.store.load_clubs() {
            Ok(clubs) if !clubs.is_empty() => {
                *self.inner.clubs.write().await = clubs;
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Failed to load persisted club list"),
        }

        let records = match self.inner.store.read_ladders() {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "Failed to read persisted ladders");
                return;
            }
        };

        let mut ladders = self.inner.ladders.write().await;
        for record in records {
            match serde_json::from_str::<LaddersResponse>(&record.payload) {
                Ok(response) => {
                    ladders.insert(record.grade_id, response);
                }
                Err(e) => {
                    debug!(grade_id = %record.grade_id, error = %e, "Skipping stale ladder record")
                }
            }
        }
        info!(count = ladders.len(), "Hydrated ladder cache");
    }

    // =========================================================================
    // Derived queries (no I/O)
    // =========================================================================

    pub async fn team_ids(&self, org_id: &str) -> HashSet<String> {
        self.inner
            .teams
            .read()
            .await
            .get(org_id)
            .map(|teams| teams.iter().map(|t| t.id.clone()).collect())
            .unwrap_or_default()
    }

    pub async fn all_tracked_team_ids(&self) -> HashSet<String> {
        self.inner
            .teams
            .read()
            .await
            .values()
            .flatten()
            .map(|t| t.id.clone())
            .collect()
    }

    pub async fn all_tracked_org_ids(&self) -> HashSet<String> {
        self.inner
            .clubs
            .read()
            .await
            .iter()
            .map(|c| c.organisation_guid.clone())
            .collect()
    }

    /// The grades a club's teams compete in, deduplicated by grade id
    /// (first team wins) and sorted by name; equal names keep encounter
    /// order.
    pub async fn grades_for_club(&self, org_id: &str) -> Vec<TeamGrade> {
        let teams = self.inner.teams.read().await;
        let Some(teams) = teams.get(org_id) else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        let mut grades: Vec<TeamGrade> = Vec::new();
        for team in teams {
            if let Some(grade) = team.active_grade() {
                if seen.insert(grade.id.clone()) {
                    grades.push(grade.clone());
                }
            }
        }
        grades.sort_by(|a, b| a.name.cmp(&b.name));
        grades
    }

    pub async fn ladder(&self, grade_id: &str) -> Option<LaddersResponse> {
        self.inner.ladders.read().await.get(grade_id).cloned()
    }

    pub async fn selected_season(&self, org_id: &str) -> Option<Season> {
        self.inner.seasons.read().await.get(org_id).cloned()
    }

    /// The most recent fetch failure, for operator awareness. Cached data
    /// keeps being served regardless.
    pub async fn last_error(&self) -> Option<String> {
        self.inner.last_error.read().await.clone()
    }

    pub async fn last_updated(&self) -> Option<DateTime<Utc>> {
        *self.inner.last_updated.read().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manager(dir: &TempDir) -> DataManager {
        let client = ApiClient::with_base_urls("http://127.0.0.1:9", "http://127.0.0.1:9").unwrap();
        let store = Arc::new(FileCacheStore::new(dir.path().to_path_buf()).unwrap());
        DataManager::new(client, store)
    }

    fn grade(id: &str, name: &str) -> TeamGrade {
        TeamGrade {
            id: id.to_string(),
            name: name.to_string(),
            is_current: None,
            owning_organisation: None,
        }
    }

    fn team(id: &str, grade: TeamGrade) -> Team {
        Team {
            id: id.to_string(),
            name: id.to_string(),
            grade: Some(grade),
            grades: None,
        }
    }

    #[tokio::test]
    async fn test_grades_for_club_dedupes_and_sorts() {
        let dir = TempDir::new().unwrap();
        let m = manager(&dir);

        m.inner.teams.write().await.insert(
            "org-1".to_string(),
            vec![
                team("t1", grade("g2", "B Grade")),
                team("t2", grade("g1", "A Grade")),
                team("t3", grade("g2", "B Grade")),
                team("t4", grade("g3", "A Grade")),
            ],
        );

        let grades = m.grades_for_club("org-1").await;
        let ids: Vec<&str> = grades.iter().map(|g| g.id.as_str()).collect();
        // Deduplicated by id, sorted by name, equal names keep encounter order.
        assert_eq!(ids, vec!["g1", "g3", "g2"]);
    }

    #[tokio::test]
    async fn test_grades_for_unknown_club_is_empty() {
        let dir = TempDir::new().unwrap();
        let m = manager(&dir);
        assert!(m.grades_for_club("nobody").await.is_empty());
    }

    #[tokio::test]
    async fn test_team_id_projections() {
        let dir = TempDir::new().unwrap();
        let m = manager(&dir);

        m.inner.teams.write().await.insert(
            "org-1".to_string(),
            vec![team("t1", grade("g1", "A")), team("t2", grade("g1", "A"))],
        );
        m.inner
            .teams
            .write()
            .await
            .insert("org-2".to_string(), vec![team("t3", grade("g2", "B"))]);

        assert_eq!(m.team_ids("org-1").await.len(), 2);
        assert!(m.team_ids("org-3").await.is_empty());
        assert_eq!(m.all_tracked_team_ids().await.len(), 3);
    }

    #[tokio::test]
    async fn test_add_and_remove_club() {
        let dir = TempDir::new().unwrap();
        let m = manager(&dir);
        let mut events = m.subscribe();

        m.add_club(Club::new("org-1", "Northcote CC", "NCC", None)).await;
        m.add_club(Club::new("org-1", "Duplicate", "DUP", None)).await;
        assert_eq!(m.clubs().await.len(), 1);
        assert_eq!(m.all_tracked_org_ids().await.len(), 1);
        assert_eq!(events.recv().await.unwrap(), CacheEvent::ClubsChanged);

        // Seed derived state, then remove the club.
        m.inner
            .teams
            .write()
            .await
            .insert("org-1".to_string(), vec![team("t1", grade("g1", "A"))]);
        m.inner.ladders.write().await.insert(
            "g1".to_string(),
            serde_json::from_str(
                r#"{"grade":{"id":"g1","name":"A","organisation":null},"ladders":[]}"#,
            )
            .unwrap(),
        );

        m.remove_club("org-1").await;
        assert!(m.clubs().await.is_empty());
        assert!(m.team_ids("org-1").await.is_empty());
        // Ladder cache entries are intentionally retained.
        assert!(m.ladder("g1").await.is_some());
    }

    #[tokio::test]
    async fn test_remove_club_prunes_its_lock_entry() {
        let dir = TempDir::new().unwrap();
        let m = manager(&dir);

        m.add_club(Club::new("org-1", "Northcote CC", "NCC", None)).await;
        m.key_lock("org-1").await;
        m.key_lock("g1").await;

        m.remove_club("org-1").await;

        let locks = m.inner.key_locks.lock().await;
        assert!(!locks.contains_key("org-1"));
        // Grade-key locks survive with their ladder entries.
        assert!(locks.contains_key("g1"));
    }

    #[tokio::test]
    async fn test_from_config_persists_under_configured_dir() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            cache_dir: Some(dir.path().to_path_buf()),
            ..Config::default()
        };
        let m = DataManager::from_config(&config).unwrap();
        m.add_club(Club::new("org-1", "Northcote CC", "NCC", None)).await;
        assert!(dir.path().join("clubs.json").exists());
    }

    #[tokio::test]
    async fn test_clubs_survive_hydration() {
        let dir = TempDir::new().unwrap();
        {
            let m = manager(&dir);
            m.add_club(Club::new("org-1", "Northcote CC", "NCC", None)).await;
        }
        let m = manager(&dir);
        m.hydrate_from_store().await;
        assert_eq!(m.clubs().await.len(), 1);
    }
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonsResponse {
    pub seasons: Vec<Season>,
}

impl SeasonsResponse {
    /// The season a club should be pinned to: the one marked current, else
    /// the first in the returned order. None when no seasons are published.
    pub fn preferred(&self) -> Option<&Season> {
        self.seasons
            .iter()
            .find(|s| s.is_current_season)
            .or_else(|| self.seasons.first())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    pub id: String,
    pub name: String,
    pub start_date: Option<String>,
    pub is_current_season: bool,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Organisation detail as returned by the orgs/products endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganisationResponse {
    pub organisation_guid: String,
    pub name: String,
    pub short_name: Option<String>,
    #[serde(rename = "logoURL")]
    pub logo_url: Option<String>,
    pub description: Option<String>,
}

/// A club the user tracks, as stored locally. Created when a club is added,
/// never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Club {
    pub organisation_guid: String,
    pub name: String,
    pub short_name: String,
    pub logo_url: Option<String>,
    pub added_at: DateTime<Utc>,
}

impl Club {
    pub fn new(
        organisation_guid: impl Into<String>,
        name: impl Into<String>,
        short_name: impl Into<String>,
        logo_url: Option<String>,
    ) -> Self {
        Self {
            organisation_guid: organisation_guid.into(),
            name: name.into(),
            short_name: short_name.into(),
            logo_url,
            added_at: Utc::now(),
        }
    }

    /// Build a club record from an organisation lookup
    pub fn from_organisation(org: &OrganisationResponse) -> Self {
        Self::new(
            org.organisation_guid.clone(),
            org.name.clone(),
            org.short_name.clone().unwrap_or_default(),
            org.logo_url.clone(),
        )
    }
}

// Club search response shapes (paged; only the first page is requested)

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClubSearchResponse {
    pub clubs: Option<ClubSearchResults>,
}

impl ClubSearchResponse {
    /// The matched clubs, empty when the search section is absent
    pub fn into_items(self) -> Vec<ClubSearchItem> {
        self.clubs.map(|c| c.items).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubSearchResults {
    pub page_info: ClubSearchPageInfo,
    pub items: Vec<ClubSearchItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubSearchPageInfo {
    pub page: i64,
    pub num_pages: i64,
    pub page_size: i64,
    pub num_entries: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubSearchItem {
    pub organisation_guid: String,
    pub name: String,
    pub short_name: Option<String>,
    pub state_name: Option<String>,
    #[serde(rename = "logoURL")]
    pub logo_url: Option<String>,
}

//! API client for the grassroots cricket endpoints.
//!
//! Five idempotent read operations, each an independent GET with a bounded
//! timeout. Safe to call from any number of concurrent tasks.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::{API_BASE_URL, SEARCH_BASE_URL};
use crate::models::{
    ClubSearchResponse, LaddersResponse, OrganisationResponse, SeasonsResponse, TeamsResponse,
};

use super::ApiError;

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Page size for club search; only the first page is ever requested.
const SEARCH_PAGE_SIZE: u32 = 20;

/// API client for the grassroots cricket proxy and play-community search.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    search_base_url: String,
}

impl ApiClient {
    /// Create a client against the production endpoints
    pub fn new() -> Result<Self, ApiError> {
        Self::with_base_urls(API_BASE_URL, SEARCH_BASE_URL)
    }

    /// Create a client against explicit base URLs (used by tests to point
    /// at a mock server)
    pub fn with_base_urls(base_url: &str, search_base_url: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            search_base_url: search_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch a single organisation by id (used when adding a club)
    pub async fn fetch_organisation(&self, org_id: &str) -> Result<OrganisationResponse, ApiError> {
        let url = format!(
            "{}/orgsproducts/organisation/{}?responseModifier=includePrograms&jsconfig=eccn:true",
            self.base_url, org_id
        );
        self.get(&url).await
    }

    /// Fetch all seasons published for an organisation
    pub async fn fetch_seasons(&self, org_id: &str) -> Result<SeasonsResponse, ApiError> {
        let url = format!(
            "{}/fixturesladders/organisations/{}/seasons?jsconfig=eccn:true",
            self.base_url, org_id
        );
        self.get(&url).await
    }

    /// Fetch the teams an organisation fields in a given season
    pub async fn fetch_teams(
        &self,
        org_id: &str,
        season_id: &str,
    ) -> Result<TeamsResponse, ApiError> {
        let url = format!(
            "{}/fixturesladders/organisations/{}/teams?seasonId={}&jsconfig=eccn:true",
            self.base_url, org_id, season_id
        );
        self.get(&url).await
    }

    /// Search play-community clubs by free text. First page only, fixed
    /// page size; the term is percent-encoded by the query builder.
    pub async fn search_clubs(&self, term: &str) -> Result<ClubSearchResponse, ApiError> {
        let url = format!("{}/ca-search/v1/playCommunity", self.search_base_url);
        let request = self.client.get(&url).query(&[
            ("types", "PLAYCOMM_CLUB"),
            ("term", term),
            ("size", &SEARCH_PAGE_SIZE.to_string()),
            ("page", "0"),
            ("sorting", "ASC"),
            ("tags", "search"),
        ]);
        self.execute(request, &url).await
    }

    /// Fetch the ladders document for a grade
    pub async fn fetch_ladders(&self, grade_id: &str) -> Result<LaddersResponse, ApiError> {
        let url = format!(
            "{}/fixturesladders/grades/{}/ladders?jsconfig=eccn:true",
            self.base_url, grade_id
        );
        self.get(&url).await
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        self.execute(self.client.get(url), url).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<T, ApiError> {
        let response = request.send().await.map_err(ApiError::from)?;

        let status = response.status();
        if !status.is_success() {
            debug!(url, status = status.as_u16(), "Request failed");
            return Err(ApiError::HttpStatus(status.as_u16()));
        }

        let text = response.text().await.map_err(ApiError::from)?;
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(format!("{}: {}", url, e)))
    }
}

//! HTTP client for the grassroots cricket REST API.
//!
//! This module provides the `ApiClient` struct for fetching organisation,
//! season, team, ladder and club-search data. The client is stateless:
//! it never caches and never retries; those policies live with the caller.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;

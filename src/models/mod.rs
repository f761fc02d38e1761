//! Data models for the grassroots cricket API and local state.
//!
//! This module contains the typed response shapes and derived local types:
//!
//! - `OrganisationResponse`, `Club`, club search types: tracked clubs
//! - `Season`: a club's competition periods and selection rule
//! - `Team`, `TeamGrade`: teams and the grades they compete in
//! - `LaddersResponse`, `LadderValue`: standings documents and cell values

pub mod ladder;
pub mod organisation;
pub mod season;
pub mod team;

pub use ladder::{
    Ladder, LadderColumn, LadderDatum, LadderGrade, LadderOrganisation, LadderPool, LadderValue,
    LaddersResponse, TeamStanding, TeamStandingOrganisation,
};
pub use organisation::{
    Club, ClubSearchItem, ClubSearchPageInfo, ClubSearchResponse, ClubSearchResults,
    OrganisationResponse,
};
pub use season::{Season, SeasonsResponse};
pub use team::{GradeOrganisation, Team, TeamGrade, TeamsResponse};

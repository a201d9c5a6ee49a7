//! People search abstraction.
//!
//! This module provides a `PeopleSearcher` trait for fetching candidate
//! pages, the People Discovery API backend, and the size bounds applied to
//! profiles and tool output.

mod people_api;
mod shaping;
mod types;

pub use people_api::{PeopleDiscoveryClient, SEARCH_PATH};
pub use shaping::{
    estimate_credits, truncate_profile, PeopleSearchOutput, LARGE_PAGE_PREVIEW,
    LARGE_PAGE_THRESHOLD, MAX_INDUSTRIES, MAX_SKILLS,
};
pub use types::*;

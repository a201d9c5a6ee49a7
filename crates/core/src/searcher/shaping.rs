//! Profile truncation, credit estimation and tool-output shaping.

use serde::{Deserialize, Serialize};

use super::types::{CandidateProfile, EmploymentRecord, SearchPage};

/// Skills kept per profile.
pub const MAX_SKILLS: usize = 10;
/// Industries kept per employment record.
pub const MAX_INDUSTRIES: usize = 3;
/// Pages with more profiles than this are cut down in tool output.
pub const LARGE_PAGE_THRESHOLD: usize = 50;
/// Profiles emitted for a large page.
pub const LARGE_PAGE_PREVIEW: usize = 20;

/// Credits charged per 100 results.
const CREDITS_PER_HUNDRED: f64 = 3.0;

/// Reduce a profile to the fields the pipeline uses.
pub fn truncate_profile(mut profile: CandidateProfile) -> CandidateProfile {
    profile.skills.truncate(MAX_SKILLS);
    profile.current_employers.truncate(1);
    for employer in &mut profile.current_employers {
        truncate_employer(employer);
    }
    profile
}

fn truncate_employer(employer: &mut EmploymentRecord) {
    employer.company_industries.truncate(MAX_INDUSTRIES);
}

/// Estimated credits for `result_count` returned profiles.
pub fn estimate_credits(result_count: usize) -> f64 {
    (result_count as f64 / 100.0) * CREDITS_PER_HUNDRED
}

/// Search page as emitted to tool callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeopleSearchOutput {
    pub profiles: Vec<CandidateProfile>,
    pub next_cursor: Option<String>,
    pub total_results: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profiles_in_response: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profiles_truncated: Option<usize>,
    pub api_credits_used: f64,
    pub note: String,
}

impl PeopleSearchOutput {
    /// Bound the output size: large pages keep only their first profiles.
    pub fn from_page(page: &SearchPage) -> Self {
        let returned = page.profiles.len();
        if returned > LARGE_PAGE_THRESHOLD {
            Self {
                profiles: page.profiles[..LARGE_PAGE_PREVIEW].to_vec(),
                next_cursor: page.next_cursor.clone(),
                total_results: page.total_results,
                profiles_in_response: Some(LARGE_PAGE_PREVIEW),
                profiles_truncated: Some(returned - LARGE_PAGE_PREVIEW),
                api_credits_used: page.credits_used,
                note: format!(
                    "Showing first {} of {} profiles; paginate or rank server-side for the rest",
                    LARGE_PAGE_PREVIEW, returned
                ),
            }
        } else {
            Self {
                profiles: page.profiles.clone(),
                next_cursor: page.next_cursor.clone(),
                total_results: page.total_results,
                profiles_in_response: None,
                profiles_truncated: None,
                api_credits_used: page.credits_used,
                note: "Profile fields have been truncated to the essentials".to_string(),
            }
        }
    }
}

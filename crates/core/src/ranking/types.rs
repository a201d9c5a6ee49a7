//! Types for candidate scoring and ranking.

use serde::{Deserialize, Serialize};

use crate::searcher::{CandidateProfile, PostProcessing};

/// Target profile of a search run. Immutable for the duration of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Requirements {
    /// Target titles, substring-matched against the current title.
    #[serde(default)]
    pub titles: Vec<String>,
    #[serde(default)]
    pub must_have_skills: Vec<String>,
    #[serde(default)]
    pub nice_to_have_skills: Vec<String>,
    /// Lower experience bound in years (default 0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_experience: Option<f64>,
    /// Upper experience bound in years (default 100).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_experience: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_size_min: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_size_max: Option<u64>,
    #[serde(default)]
    pub target_industries: Vec<String>,
    #[serde(default)]
    pub target_regions: Vec<String>,
    /// Current employers that disqualify a candidate.
    #[serde(default)]
    pub exclude_companies: Vec<String>,
    #[serde(default)]
    pub exclude_names: Vec<String>,
    /// Profile URLs (or person ids) to drop.
    #[serde(default)]
    pub exclude_profiles: Vec<String>,
    /// Unique candidates wanted; overrides the configured budget target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_count: Option<usize>,
    /// Credit ceiling; overrides the configured budget cap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits_cap: Option<f64>,
}

impl Requirements {
    pub const DEFAULT_MIN_EXPERIENCE: f64 = 0.0;
    pub const DEFAULT_MAX_EXPERIENCE: f64 = 100.0;

    pub fn experience_band(&self) -> (f64, f64) {
        (
            self.min_experience.unwrap_or(Self::DEFAULT_MIN_EXPERIENCE),
            self.max_experience.unwrap_or(Self::DEFAULT_MAX_EXPERIENCE),
        )
    }

    pub fn company_size_band(&self) -> (u64, u64) {
        (
            self.company_size_min.unwrap_or(0),
            self.company_size_max.unwrap_or(u64::MAX),
        )
    }

    /// Exclusions forwarded to the search API and applied again locally.
    pub fn exclusions(&self) -> PostProcessing {
        PostProcessing {
            exclude_profiles: self.exclude_profiles.clone(),
            exclude_names: self.exclude_names.clone(),
        }
    }
}

/// Score and explanation for one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub score: u32,
    /// At most three short reasons, in a fixed order.
    pub rationale: Vec<String>,
}

/// A profile annotated with its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    #[serde(flatten)]
    pub profile: CandidateProfile,
    pub score: u32,
    pub rationale: Vec<String>,
}

/// Result of ranking a candidate pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingOutcome {
    /// Top candidates, best first.
    pub ranked_candidates: Vec<RankedCandidate>,
    /// Candidates left after deduplication and exclusions.
    pub total_candidates: usize,
    pub candidates_returned: usize,
    pub top_score: u32,
    /// Mean score over all `total_candidates`.
    pub average_score: f64,
    pub duplicates_removed: usize,
    pub excluded: usize,
    pub note: String,
}

impl RankingOutcome {
    pub fn empty() -> Self {
        Self {
            ranked_candidates: Vec::new(),
            total_candidates: 0,
            candidates_returned: 0,
            top_score: 0,
            average_score: 0.0,
            duplicates_removed: 0,
            excluded: 0,
            note: "No candidates to rank".to_string(),
        }
    }
}

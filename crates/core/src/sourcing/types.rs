//! Types for sourcing runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::budget::{BudgetError, RunBudget, StopReason};
use crate::filter::{FilterError, FilterNode};
use crate::ranking::{RankingOutcome, Requirements};
use crate::searcher::SearchError;

/// One filter formulation tried during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterVariant {
    pub name: String,
    pub filters: FilterNode,
}

impl FilterVariant {
    pub fn new(name: impl Into<String>, filters: FilterNode) -> Self {
        Self {
            name: name.into(),
            filters,
        }
    }
}

/// Input of a sourcing run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRequest {
    pub requirements: Requirements,
    /// Explicit variants; derived from the requirements when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<FilterVariant>,
}

impl RunRequest {
    pub fn new(requirements: Requirements) -> Self {
        Self {
            requirements,
            variants: Vec::new(),
        }
    }

    pub fn with_variants(mut self, variants: Vec<FilterVariant>) -> Self {
        self.variants = variants;
        self
    }
}

/// Per-variant counters and selection data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariantReport {
    pub name: String,
    pub pages: u32,
    pub profiles: usize,
    /// Average share of must-have criteria met by the exploration page.
    pub presence: f64,
    /// Share of the exploration page not returned by any other variant.
    pub uniqueness: f64,
    pub selection_score: f64,
    pub selected: bool,
    /// No further cursor.
    pub exhausted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome of a sourcing run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub ranking: RankingOutcome,
    pub variants: Vec<VariantReport>,
    pub budget: RunBudget,
    /// Unique identities seen across all pages.
    pub unique_candidates: usize,
    pub stop_reason: StopReason,
    /// True when the run was cut short by a search failure.
    pub partial: bool,
    pub notes: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Errors that end a run without results.
#[derive(Debug, Error)]
pub enum SourcingError {
    #[error("Invalid run request: {0}")]
    Validation(String),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Budget(#[from] BudgetError),
}

impl From<FilterError> for SourcingError {
    fn from(err: FilterError) -> Self {
        SourcingError::Validation(err.to_string())
    }
}

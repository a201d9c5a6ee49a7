//! Budget limits, counters and stop reasons.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::ranking::Requirements;

/// Caps and policy constants of a search run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetLimits {
    /// Profiles requested per call (default: 200).
    #[serde(default = "default_per_call_limit")]
    pub per_call_limit: u32,
    /// Exploration variants tried (default: 3).
    #[serde(default = "default_max_variants")]
    pub max_variants: usize,
    /// Variants kept for exploitation (default: 2).
    #[serde(default = "default_exploitation_variants")]
    pub exploitation_variants: usize,
    /// Extra pages per exploited variant (default: 2).
    #[serde(default = "default_exploitation_pages")]
    pub exploitation_pages_per_variant: u32,
    /// Total pages per run (default: 6).
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    /// Total profiles per run (default: 600).
    #[serde(default = "default_max_profiles")]
    pub max_profiles: usize,
    /// Estimated credit ceiling per run (default: 18).
    #[serde(default = "default_credits_cap")]
    pub credits_cap: f64,
    /// Unique candidates after which exploitation stops (default: 100).
    #[serde(default = "default_target_count")]
    pub target_count: usize,
    /// Share of new unique candidates below which a page counts as
    /// low-yield (default: 0.10). Two low-yield pages in a row stop the run.
    #[serde(default = "default_decline_threshold")]
    pub decline_threshold: f64,
}

fn default_per_call_limit() -> u32 {
    200
}

fn default_max_variants() -> usize {
    3
}

fn default_exploitation_variants() -> usize {
    2
}

fn default_exploitation_pages() -> u32 {
    2
}

fn default_max_pages() -> u32 {
    6
}

fn default_max_profiles() -> usize {
    600
}

fn default_credits_cap() -> f64 {
    18.0
}

fn default_target_count() -> usize {
    100
}

fn default_decline_threshold() -> f64 {
    0.10
}

impl Default for BudgetLimits {
    fn default() -> Self {
        Self {
            per_call_limit: default_per_call_limit(),
            max_variants: default_max_variants(),
            exploitation_variants: default_exploitation_variants(),
            exploitation_pages_per_variant: default_exploitation_pages(),
            max_pages: default_max_pages(),
            max_profiles: default_max_profiles(),
            credits_cap: default_credits_cap(),
            target_count: default_target_count(),
            decline_threshold: default_decline_threshold(),
        }
    }
}

impl BudgetLimits {
    /// Validate the limits.
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=1000).contains(&self.per_call_limit) {
            return Err(format!(
                "per_call_limit must be between 1 and 1000, got {}",
                self.per_call_limit
            ));
        }
        if self.max_variants == 0 {
            return Err("max_variants must be at least 1".to_string());
        }
        if self.exploitation_variants > self.max_variants {
            return Err(format!(
                "exploitation_variants ({}) cannot exceed max_variants ({})",
                self.exploitation_variants, self.max_variants
            ));
        }
        if self.max_pages == 0 || self.max_profiles == 0 {
            return Err("max_pages and max_profiles must be at least 1".to_string());
        }
        if !(self.credits_cap.is_finite() && self.credits_cap > 0.0) {
            return Err(format!("credits_cap must be positive, got {}", self.credits_cap));
        }
        if self.target_count == 0 {
            return Err("target_count must be at least 1".to_string());
        }
        if !(0.0..=1.0).contains(&self.decline_threshold) {
            return Err(format!(
                "decline_threshold must be between 0.0 and 1.0, got {}",
                self.decline_threshold
            ));
        }
        Ok(())
    }

    /// Apply the per-run target and credit cap carried by requirements.
    pub fn with_requirements(mut self, requirements: &Requirements) -> Self {
        if let Some(target) = requirements.target_count {
            self.target_count = target;
        }
        if let Some(cap) = requirements.credits_cap {
            self.credits_cap = cap;
        }
        self
    }
}

/// Counters of one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunBudget {
    pub pages_fetched: u32,
    pub profiles_retrieved: usize,
    pub credits_consumed: f64,
}

/// Phase of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    Exploring,
    Selecting,
    Exploiting,
    Done,
}

impl RunPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunPhase::Exploring => "exploring",
            RunPhase::Selecting => "selecting",
            RunPhase::Exploiting => "exploiting",
            RunPhase::Done => "done",
        }
    }

    /// Whether search calls may be issued in this phase.
    pub fn allows_network(&self) -> bool {
        matches!(self, RunPhase::Exploring | RunPhase::Exploiting)
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a run stopped. These are planned outcomes, not failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Enough unique candidates were collected.
    TargetReached,
    PageCap,
    ProfileCap,
    CreditCap,
    /// Two consecutive pages brought too few new candidates.
    DecliningYield,
    /// No selected variant has pages left.
    VariantsExhausted,
    /// A search call failed after its retry.
    TransportFailure,
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopReason::TargetReached => "target_reached",
            StopReason::PageCap => "page_cap",
            StopReason::ProfileCap => "profile_cap",
            StopReason::CreditCap => "credit_cap",
            StopReason::DecliningYield => "declining_yield",
            StopReason::VariantsExhausted => "variants_exhausted",
            StopReason::TransportFailure => "transport_failure",
        }
    }

    /// Plain-language explanation for run summaries.
    pub fn describe(&self) -> &'static str {
        match self {
            StopReason::TargetReached => "target number of unique candidates reached",
            StopReason::PageCap => "page limit for this run reached",
            StopReason::ProfileCap => "profile limit for this run reached",
            StopReason::CreditCap => "credit cap for this run reached",
            StopReason::DecliningYield => {
                "two consecutive pages returned few new candidates"
            }
            StopReason::VariantsExhausted => "no further pages available for the selected filters",
            StopReason::TransportFailure => "search API unavailable after retry",
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Permission to fetch one page of at most `limit` profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct PageGrant {
    pub limit: u32,
}

/// Yield of a recorded page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageYield {
    pub profiles: usize,
    pub new_unique: usize,
    /// `new_unique / profiles`, 0 for an empty page.
    pub ratio: f64,
}

#[derive(Debug, Error)]
pub enum BudgetError {
    #[error("Run budget exhausted: {0}")]
    Exhausted(StopReason),

    #[error("Search calls are not permitted while {0}")]
    NetworkForbidden(RunPhase),

    #[error("Invalid phase transition from {from} to {to}")]
    InvalidTransition { from: RunPhase, to: RunPhase },
}

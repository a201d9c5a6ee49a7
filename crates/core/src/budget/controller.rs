//! Budget and stop-rule state machine of a search run.

use std::collections::HashSet;
use tracing::{debug, info};

use crate::ranking::count_new_identities;
use crate::searcher::{estimate_credits, CandidateProfile};

use super::types::{
    BudgetError, BudgetLimits, PageGrant, PageYield, RunBudget, RunPhase, StopReason,
};

/// Consecutive low-yield pages that end exploitation.
const LOW_YIELD_PAGES_TO_STOP: u32 = 2;

/// Owns the counters of one run and decides whether the next call may go out.
///
/// Caps are enforced at grant time: every granted page reserves its full
/// limit until it is recorded or released, so concurrent grants can never
/// overshoot a cap.
#[derive(Debug)]
pub struct BudgetController {
    limits: BudgetLimits,
    budget: RunBudget,
    phase: RunPhase,
    stop_reason: Option<StopReason>,
    reserved_pages: u32,
    reserved_profiles: usize,
    seen: HashSet<String>,
    low_yield_streak: u32,
}

impl BudgetController {
    pub fn new(limits: BudgetLimits) -> Self {
        Self {
            limits,
            budget: RunBudget::default(),
            phase: RunPhase::Exploring,
            stop_reason: None,
            reserved_pages: 0,
            reserved_profiles: 0,
            seen: HashSet::new(),
            low_yield_streak: 0,
        }
    }

    pub fn limits(&self) -> &BudgetLimits {
        &self.limits
    }

    pub fn budget(&self) -> &RunBudget {
        &self.budget
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
    }

    /// Unique candidate identities seen so far.
    pub fn unique_count(&self) -> usize {
        self.seen.len()
    }

    /// Profiles still affordable under the credit cap.
    fn profiles_within_credits(&self) -> usize {
        let reserved_credits = estimate_credits(self.reserved_profiles);
        let remaining = self.limits.credits_cap - self.budget.credits_consumed - reserved_credits;
        if remaining <= 0.0 {
            return 0;
        }
        // one credit-rounding epsilon so an exact cap is reachable
        ((remaining / estimate_credits(1)) + 1e-9).floor() as usize
    }

    /// Check the caps and grant the next page, shrunk to what remains.
    ///
    /// When nothing remains the run moves to `Done` and the cap is returned
    /// as [`BudgetError::Exhausted`].
    pub fn authorize(&mut self) -> Result<PageGrant, BudgetError> {
        if !self.phase.allows_network() {
            return Err(match self.stop_reason {
                Some(reason) if self.phase == RunPhase::Done => BudgetError::Exhausted(reason),
                _ => BudgetError::NetworkForbidden(self.phase),
            });
        }

        if self.budget.pages_fetched + self.reserved_pages >= self.limits.max_pages {
            return Err(self.exhausted(StopReason::PageCap));
        }

        let remaining_profiles = self
            .limits
            .max_profiles
            .saturating_sub(self.budget.profiles_retrieved + self.reserved_profiles);
        if remaining_profiles == 0 {
            return Err(self.exhausted(StopReason::ProfileCap));
        }

        let affordable = self.profiles_within_credits();
        if affordable == 0 {
            return Err(self.exhausted(StopReason::CreditCap));
        }

        if self.phase == RunPhase::Exploiting && self.unique_count() >= self.limits.target_count {
            return Err(self.exhausted(StopReason::TargetReached));
        }

        let limit = (self.limits.per_call_limit as usize)
            .min(remaining_profiles)
            .min(affordable) as u32;

        self.reserved_pages += 1;
        self.reserved_profiles += limit as usize;
        debug!(phase = %self.phase, limit, "Page granted");
        Ok(PageGrant { limit })
    }

    fn unreserve(&mut self, grant: PageGrant) {
        self.reserved_pages = self.reserved_pages.saturating_sub(1);
        self.reserved_profiles = self.reserved_profiles.saturating_sub(grant.limit as usize);
    }

    /// Return a grant whose call failed; nothing is charged.
    pub fn release(&mut self, grant: PageGrant) {
        self.unreserve(grant);
    }

    /// Charge a fetched page and apply the exploitation stop rules.
    pub fn record_page(
        &mut self,
        grant: PageGrant,
        profiles: &[CandidateProfile],
        credits_used: f64,
    ) -> PageYield {
        self.unreserve(grant);
        self.budget.pages_fetched += 1;
        self.budget.profiles_retrieved += profiles.len();
        self.budget.credits_consumed += credits_used;

        let new_unique = count_new_identities(profiles, &mut self.seen);
        let ratio = if profiles.is_empty() {
            0.0
        } else {
            new_unique as f64 / profiles.len() as f64
        };

        debug!(
            phase = %self.phase,
            profiles = profiles.len(),
            new_unique,
            pages = self.budget.pages_fetched,
            credits = self.budget.credits_consumed,
            "Page recorded"
        );

        if self.phase == RunPhase::Exploiting {
            if ratio < self.limits.decline_threshold {
                self.low_yield_streak += 1;
            } else {
                self.low_yield_streak = 0;
            }

            if self.unique_count() >= self.limits.target_count {
                self.finish(StopReason::TargetReached);
            } else if self.low_yield_streak >= LOW_YIELD_PAGES_TO_STOP {
                self.finish(StopReason::DecliningYield);
            }
        }

        PageYield {
            profiles: profiles.len(),
            new_unique,
            ratio,
        }
    }

    /// Exploration is over; no calls until exploitation starts.
    pub fn begin_selection(&mut self) -> Result<(), BudgetError> {
        self.transition(RunPhase::Exploring, RunPhase::Selecting)
    }

    pub fn begin_exploitation(&mut self) -> Result<(), BudgetError> {
        self.transition(RunPhase::Selecting, RunPhase::Exploiting)
    }

    fn transition(&mut self, from: RunPhase, to: RunPhase) -> Result<(), BudgetError> {
        if self.phase != from {
            return Err(BudgetError::InvalidTransition {
                from: self.phase,
                to,
            });
        }
        info!(from = %from, to = %to, "Run phase transition");
        self.phase = to;
        Ok(())
    }

    /// Move to `Done`. The first recorded reason is kept.
    pub fn finish(&mut self, reason: StopReason) -> StopReason {
        if self.phase != RunPhase::Done {
            info!(
                from = %self.phase,
                reason = %reason,
                pages = self.budget.pages_fetched,
                profiles = self.budget.profiles_retrieved,
                "Run done"
            );
            self.phase = RunPhase::Done;
        }
        *self.stop_reason.get_or_insert(reason)
    }

    fn exhausted(&mut self, reason: StopReason) -> BudgetError {
        BudgetError::Exhausted(self.finish(reason))
    }
}

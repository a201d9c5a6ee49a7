//! Drives one sourcing run from variants to ranked candidates.

use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::budget::{
    BudgetController, BudgetError, BudgetLimits, PageGrant, RunPhase, StopReason,
};
use crate::metrics;
use crate::ranking::{rank, Requirements};
use crate::searcher::{
    CandidateProfile, PeopleSearcher, PostProcessing, SearchError, SearchRequest,
};

use super::selection::{presence, select_variants, uniqueness, VariantQuality};
use super::types::{FilterVariant, RunReport, RunRequest, SourcingError, VariantReport};
use super::variants::{derive_variants, prepare_variants};

/// Runs exploration, selection and exploitation against a searcher.
pub struct SourcingRun {
    searcher: Arc<dyn PeopleSearcher>,
    limits: BudgetLimits,
}

/// Mutable state of a run in progress.
struct RunState {
    controller: BudgetController,
    variants: Vec<FilterVariant>,
    reports: Vec<VariantReport>,
    cursors: Vec<Option<String>>,
    pool: Vec<CandidateProfile>,
    failure: Option<SearchError>,
    notes: Vec<String>,
}

impl RunState {
    /// Charge a fetched page to the budget and the variant's counters.
    fn record(
        &mut self,
        index: usize,
        grant: PageGrant,
        profiles: Vec<CandidateProfile>,
        credits: f64,
        cursor: Option<String>,
    ) {
        let page_yield = self.controller.record_page(grant, &profiles, credits);
        let report = &mut self.reports[index];
        report.pages += 1;
        report.profiles += profiles.len();
        report.exhausted = cursor.is_none();
        debug!(
            variant = %report.name,
            profiles = page_yield.profiles,
            new_unique = page_yield.new_unique,
            "Variant page recorded"
        );
        self.cursors[index] = cursor;
        self.pool.extend(profiles);
    }

    /// Record a failed call and end the run.
    fn fail(&mut self, index: usize, grant: PageGrant, error: SearchError) {
        self.controller.release(grant);
        warn!(variant = %self.reports[index].name, error = %error, "Variant search failed");
        self.reports[index].error = Some(error.to_string());
        self.controller.finish(StopReason::TransportFailure);
        self.failure.get_or_insert(error);
    }
}

impl SourcingRun {
    pub fn new(searcher: Arc<dyn PeopleSearcher>, limits: BudgetLimits) -> Self {
        Self { searcher, limits }
    }

    pub fn limits(&self) -> &BudgetLimits {
        &self.limits
    }

    fn search_request(
        variant: &FilterVariant,
        limit: u32,
        cursor: Option<&str>,
        exclusions: &PostProcessing,
    ) -> SearchRequest {
        let request = SearchRequest::new(variant.filters.clone())
            .with_limit(limit)
            .with_post_processing(exclusions.clone());
        match cursor {
            Some(cursor) => request.with_cursor(cursor),
            None => request,
        }
    }

    /// Execute a full run and rank everything it retrieved.
    ///
    /// Fails only when the request is invalid or no page could be fetched.
    /// A search failure after some pages succeeded ends the run early with
    /// a partial report.
    pub async fn run(&self, request: RunRequest) -> Result<RunReport, SourcingError> {
        let started_at = Utc::now();
        let run_id = Uuid::new_v4();

        let limits = self.limits.clone().with_requirements(&request.requirements);
        limits.validate().map_err(SourcingError::Validation)?;

        let variants = if request.variants.is_empty() {
            derive_variants(&request.requirements, limits.max_variants)?
        } else {
            prepare_variants(request.variants, limits.max_variants)?
        };
        let exclusions = request.requirements.exclusions();

        info!(
            run_id = %run_id,
            searcher = self.searcher.name(),
            variants = variants.len(),
            "Starting sourcing run"
        );

        let mut state = RunState {
            controller: BudgetController::new(limits),
            reports: variants
                .iter()
                .map(|v| VariantReport {
                    name: v.name.clone(),
                    ..Default::default()
                })
                .collect(),
            cursors: vec![None; variants.len()],
            variants,
            pool: Vec::new(),
            failure: None,
            notes: Vec::new(),
        };

        let exploration = self.explore(&mut state, &exclusions).await?;

        if state.controller.phase() == RunPhase::Exploring {
            state.controller.begin_selection()?;
            let selected = self.select(&mut state, &request.requirements, &exploration);
            state.controller.begin_exploitation()?;
            self.exploit(&mut state, &selected, &exclusions).await?;
        }

        let stop_reason = match state.controller.stop_reason() {
            Some(reason) => reason,
            None => state.controller.finish(StopReason::VariantsExhausted),
        };

        let partial = state.failure.is_some();
        if let Some(error) = &state.failure {
            state.notes.push(format!("Run stopped early after a search failure: {}", error));
        }
        state.notes.push(format!("Stopped: {}", stop_reason.describe()));

        let budget = state.controller.budget().clone();
        let unique_candidates = state.controller.unique_count();
        let ranking = rank(state.pool, &request.requirements, &exclusions, Utc::now());

        metrics::RUNS_FINISHED
            .with_label_values(&[stop_reason.as_str()])
            .inc();
        metrics::RUN_PAGES
            .with_label_values(&[])
            .observe(budget.pages_fetched as f64);

        info!(
            run_id = %run_id,
            stop_reason = %stop_reason,
            pages = budget.pages_fetched,
            profiles = budget.profiles_retrieved,
            unique_candidates,
            credits = budget.credits_consumed,
            partial,
            "Sourcing run finished"
        );

        Ok(RunReport {
            run_id,
            ranking,
            variants: state.reports,
            budget,
            unique_candidates,
            stop_reason,
            partial,
            notes: state.notes,
            started_at,
            finished_at: Utc::now(),
        })
    }

    /// Fetch the first page of every variant concurrently.
    ///
    /// Returns each variant's exploration page (empty when it failed or was
    /// not granted), merged in variant order.
    async fn explore(
        &self,
        state: &mut RunState,
        exclusions: &PostProcessing,
    ) -> Result<Vec<Vec<CandidateProfile>>, SourcingError> {
        let mut grants = Vec::new();
        for index in 0..state.variants.len() {
            match state.controller.authorize() {
                Ok(grant) => grants.push((index, grant)),
                Err(BudgetError::Exhausted(reason)) => {
                    state.notes.push(format!(
                        "Explored {} of {} variants: {}",
                        grants.len(),
                        state.variants.len(),
                        reason.describe()
                    ));
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        }

        let searches = grants.iter().map(|(index, grant)| {
            let request =
                Self::search_request(&state.variants[*index], grant.limit, None, exclusions);
            let searcher = Arc::clone(&self.searcher);
            async move { searcher.search(&request).await }
        });
        let results = join_all(searches).await;

        let mut pages = vec![Vec::new(); state.variants.len()];
        let mut succeeded = 0usize;
        for ((index, grant), result) in grants.into_iter().zip(results) {
            match result {
                Ok(page) => {
                    succeeded += 1;
                    pages[index] = page.profiles.clone();
                    state.record(index, grant, page.profiles, page.credits_used, page.next_cursor);
                }
                Err(e) if e.is_validation() => return Err(e.into()),
                Err(e) => state.fail(index, grant, e),
            }
        }

        if succeeded == 0 {
            if let Some(error) = state.failure.take() {
                return Err(error.into());
            }
        }
        Ok(pages)
    }

    /// Score the exploration pages and mark the variants to exploit.
    fn select(
        &self,
        state: &mut RunState,
        requirements: &Requirements,
        pages: &[Vec<CandidateProfile>],
    ) -> Vec<usize> {
        let page_refs: Vec<&[CandidateProfile]> = pages.iter().map(Vec::as_slice).collect();
        let uniqueness = uniqueness(&page_refs);

        let qualities: Vec<VariantQuality> = pages
            .iter()
            .zip(uniqueness)
            .map(|(page, uniqueness)| VariantQuality {
                presence: presence(page, requirements),
                uniqueness,
            })
            .collect();

        let eligible: Vec<usize> = (0..state.variants.len())
            .filter(|&i| state.cursors[i].is_some() && state.reports[i].error.is_none())
            .collect();

        let exploit_count = state.controller.limits().exploitation_variants;
        let selected = select_variants(&qualities, &eligible, exploit_count);

        for (index, quality) in qualities.iter().enumerate() {
            let report = &mut state.reports[index];
            report.presence = quality.presence;
            report.uniqueness = quality.uniqueness;
            report.selection_score = quality.score();
            report.selected = selected.contains(&index);
        }

        let names: Vec<&str> = selected
            .iter()
            .map(|&i| state.variants[i].name.as_str())
            .collect();
        info!(selected = ?names, "Variants selected for exploitation");
        if selected.is_empty() {
            state
                .notes
                .push("No variant had further pages to exploit".to_string());
        }
        selected
    }

    /// Follow the cursors of the selected variants, one page at a time.
    async fn exploit(
        &self,
        state: &mut RunState,
        selected: &[usize],
        exclusions: &PostProcessing,
    ) -> Result<(), SourcingError> {
        let pages_per_variant = state.controller.limits().exploitation_pages_per_variant;

        'variants: for &index in selected {
            for _ in 0..pages_per_variant {
                let Some(cursor) = state.cursors[index].clone() else {
                    continue 'variants;
                };
                let grant = match state.controller.authorize() {
                    Ok(grant) => grant,
                    Err(BudgetError::Exhausted(_)) => break 'variants,
                    Err(e) => return Err(e.into()),
                };

                let request = Self::search_request(
                    &state.variants[index],
                    grant.limit,
                    Some(&cursor),
                    exclusions,
                );
                match self.searcher.search(&request).await {
                    Ok(page) => {
                        state.record(index, grant, page.profiles, page.credits_used, page.next_cursor);
                        if state.controller.phase() == RunPhase::Done {
                            break 'variants;
                        }
                    }
                    Err(e) => {
                        state.fail(index, grant, e);
                        break 'variants;
                    }
                }
            }
        }
        Ok(())
    }
}

//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - People search calls (results, retries, profiles, credits)
//! - Sourcing runs (stop reasons, pages per run)
//! - External services (LLM, demo Todo API)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// People Search
// =============================================================================

/// Search calls total by result.
pub static SEARCH_CALLS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("recruiter_search_calls_total", "Total people search calls"),
        &["result"], // "success", "validation_error", "transport_error", "api_error"
    )
    .unwrap()
});

/// Search retries total.
pub static SEARCH_RETRIES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "recruiter_search_retries_total",
        "Total people search calls retried after a failure",
    )
    .unwrap()
});

/// Profiles retrieved total.
pub static PROFILES_RETRIEVED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "recruiter_profiles_retrieved_total",
        "Total candidate profiles retrieved from the search API",
    )
    .unwrap()
});

/// Skipped profiles that failed to decode.
pub static PROFILES_SKIPPED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "recruiter_profiles_skipped_total",
        "Total malformed profiles skipped while decoding",
    )
    .unwrap()
});

/// Estimated credits, in hundredths (counters are integral).
pub static CREDITS_ESTIMATED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "recruiter_credits_estimated_centi_total",
        "Estimated search API credits consumed, in hundredths of a credit",
    )
    .unwrap()
});

/// Search call duration in seconds.
pub static SEARCH_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "recruiter_search_duration_seconds",
            "Duration of people search calls including retry",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 20.0]),
        &["result"],
    )
    .unwrap()
});

// =============================================================================
// Sourcing Runs
// =============================================================================

/// Runs finished by stop reason.
pub static RUNS_FINISHED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("recruiter_runs_finished_total", "Total sourcing runs finished"),
        &["stop_reason"],
    )
    .unwrap()
});

/// Pages fetched per run.
pub static RUN_PAGES: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new("recruiter_run_pages", "Pages fetched per sourcing run")
            .buckets(vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 8.0]),
        &[],
    )
    .unwrap()
});

// =============================================================================
// External Service Metrics
// =============================================================================

/// External service requests total.
pub static EXTERNAL_SERVICE_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "recruiter_external_service_requests_total",
            "Total external service requests",
        ),
        &["service", "operation", "status"], // status: "success", "error"
    )
    .unwrap()
});

/// LLM tokens used.
pub static LLM_TOKENS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("recruiter_llm_tokens_total", "Total LLM tokens used"),
        &["provider", "direction"], // direction: "input", "output"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Convert an estimated credit amount into the hundredths recorded by
/// [`CREDITS_ESTIMATED`].
pub fn record_credits(credits: f64) {
    if credits > 0.0 {
        CREDITS_ESTIMATED.inc_by((credits * 100.0).round() as u64);
    }
}

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Search
        Box::new(SEARCH_CALLS.clone()),
        Box::new(SEARCH_RETRIES.clone()),
        Box::new(PROFILES_RETRIEVED.clone()),
        Box::new(PROFILES_SKIPPED.clone()),
        Box::new(CREDITS_ESTIMATED.clone()),
        Box::new(SEARCH_DURATION.clone()),
        // Runs
        Box::new(RUNS_FINISHED.clone()),
        Box::new(RUN_PAGES.clone()),
        // External services
        Box::new(EXTERNAL_SERVICE_REQUESTS.clone()),
        Box::new(LLM_TOKENS.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_metrics_register_cleanly() {
        let registry = prometheus::Registry::new();
        for metric in all_metrics() {
            registry.register(metric).unwrap();
        }
        SEARCH_CALLS.with_label_values(&["success"]).inc();
        let families = registry.gather();
        assert!(families
            .iter()
            .any(|f| f.get_name() == "recruiter_search_calls_total"));
    }

    #[test]
    fn test_record_credits_rounds_to_hundredths() {
        let before = CREDITS_ESTIMATED.get();
        record_credits(1.5);
        record_credits(0.0);
        assert!(CREDITS_ESTIMATED.get() >= before + 150);
    }
}

//! People Discovery search backend.

use async_trait::async_trait;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::SearchApiConfig;
use crate::http::{ApiClient, HttpError};
use crate::metrics;

use super::shaping::{estimate_credits, truncate_profile};
use super::{CandidateProfile, PeopleSearcher, SearchError, SearchPage, SearchRequest};

/// Search endpoint, relative to the API base URL.
pub const SEARCH_PATH: &str = "/screener/persondb/search";

/// People Discovery API client with a single fixed-delay retry.
pub struct PeopleDiscoveryClient {
    api: ApiClient,
    retry_delay: Duration,
}

impl PeopleDiscoveryClient {
    /// Create a client from configuration. Fails when no API key is set.
    pub fn new(config: &SearchApiConfig) -> Result<Self, SearchError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|_| config.is_configured())
            .ok_or_else(|| {
                SearchError::NotConfigured("search_api.api_key is not set".to_string())
            })?;

        let api = ApiClient::new(
            config.base_url.clone(),
            Duration::from_secs(config.timeout_secs as u64),
        )?
        .with_bearer_token(api_key);

        Ok(Self {
            api,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        })
    }

    pub fn base_url(&self) -> &str {
        self.api.base_url()
    }

    async fn post_with_retry(&self, request: &SearchRequest) -> Result<Value, HttpError> {
        match self.api.post_json(SEARCH_PATH, request).await {
            Err(e) if e.is_transport() => {
                warn!(
                    error = %e,
                    delay_ms = self.retry_delay.as_millis() as u64,
                    "People search failed, retrying once"
                );
                metrics::SEARCH_RETRIES.inc();
                tokio::time::sleep(self.retry_delay).await;
                self.api.post_json(SEARCH_PATH, request).await
            }
            other => other,
        }
    }
}

/// Decode the `profiles` array one entry at a time, skipping bad entries.
fn decode_profiles(raw: Vec<Value>) -> (Vec<CandidateProfile>, usize) {
    let mut skipped = 0;
    let profiles = raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(profile) => Some(truncate_profile(profile)),
            Err(e) => {
                warn!(index, error = %e, "Skipping malformed profile");
                skipped += 1;
                None
            }
        })
        .collect();
    (profiles, skipped)
}

/// Turn a raw search response into a page.
pub(crate) fn parse_search_response(body: Value, duration_ms: u64) -> Result<SearchPage, SearchError> {
    let Value::Object(mut body) = body else {
        return Err(SearchError::Decode("response is not a JSON object".to_string()));
    };

    let raw_profiles = match body.remove("profiles") {
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => Vec::new(),
        Some(other) => {
            return Err(SearchError::Decode(format!(
                "'profiles' is not an array: {}",
                other
            )))
        }
    };
    let next_cursor = match body.remove("next_cursor") {
        Some(Value::String(c)) if !c.is_empty() => Some(c),
        _ => None,
    };

    let total_results = raw_profiles.len();
    let (profiles, skipped_profiles) = decode_profiles(raw_profiles);

    Ok(SearchPage {
        profiles,
        next_cursor,
        total_results,
        skipped_profiles,
        credits_used: estimate_credits(total_results),
        duration_ms,
    })
}

#[async_trait]
impl PeopleSearcher for PeopleDiscoveryClient {
    fn name(&self) -> &str {
        "people_discovery"
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchPage, SearchError> {
        if let Err(e) = request.validate() {
            metrics::SEARCH_CALLS
                .with_label_values(&[e.metric_label()])
                .inc();
            return Err(e);
        }

        debug!(
            limit = request.limit,
            has_cursor = request.cursor.is_some(),
            "Searching People Discovery API"
        );

        let start = Instant::now();
        let result = self
            .post_with_retry(request)
            .await
            .map_err(SearchError::from)
            .and_then(|body| parse_search_response(body, start.elapsed().as_millis() as u64));

        let label = match &result {
            Ok(_) => "success",
            Err(e) => e.metric_label(),
        };
        metrics::SEARCH_CALLS.with_label_values(&[label]).inc();
        metrics::SEARCH_DURATION
            .with_label_values(&[label])
            .observe(start.elapsed().as_secs_f64());

        let page = result?;
        metrics::PROFILES_RETRIEVED.inc_by(page.total_results as u64);
        metrics::PROFILES_SKIPPED.inc_by(page.skipped_profiles as u64);
        metrics::record_credits(page.credits_used);

        info!(
            returned = page.total_results,
            skipped = page.skipped_profiles,
            has_next = page.next_cursor.is_some(),
            duration_ms = page.duration_ms,
            "People search completed"
        );
        Ok(page)
    }
}

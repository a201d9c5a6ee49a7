//! Types for the people search system.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::filter::{FilterError, FilterNode};
use crate::http::HttpError;

/// Largest page the search API accepts.
pub const MAX_PAGE_LIMIT: u32 = 1000;

fn default_limit() -> u32 {
    200
}

/// Server-side exclusions applied by the search API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostProcessing {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_profiles: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_names: Vec<String>,
}

impl PostProcessing {
    pub fn is_empty(&self) -> bool {
        self.exclude_profiles.is_empty() && self.exclude_names.is_empty()
    }
}

/// One page request against the search API.
///
/// When `cursor` is set, `filters` must be identical to the request that
/// returned it. The API does not check this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub filters: FilterNode,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_processing: Option<PostProcessing>,
}

impl SearchRequest {
    pub fn new(filters: FilterNode) -> Self {
        Self {
            filters,
            limit: default_limit(),
            cursor: None,
            post_processing: None,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    /// Attach exclusions, dropping them entirely when both lists are empty.
    pub fn with_post_processing(mut self, post_processing: PostProcessing) -> Self {
        self.post_processing = (!post_processing.is_empty()).then_some(post_processing);
        self
    }

    /// Check the limit range and the filter tree.
    pub fn validate(&self) -> Result<(), SearchError> {
        if !(1..=MAX_PAGE_LIMIT).contains(&self.limit) {
            return Err(SearchError::Validation(format!(
                "limit must be between 1 and {}, got {}",
                MAX_PAGE_LIMIT, self.limit
            )));
        }
        self.filters.validate()?;
        Ok(())
    }
}

/// An employment record of a candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmploymentRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub start_date: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub company_headcount_latest: u64,
    #[serde(default, deserialize_with = "string_or_list")]
    pub company_industries: Vec<String>,
}

/// A candidate profile as returned by the search API.
///
/// Decoding is lenient: missing or null fields become empty values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    #[serde(default, deserialize_with = "lenient_string")]
    pub person_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub headline: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub region: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub years_of_experience_raw: f64,
    #[serde(default, deserialize_with = "string_or_list")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_employers: Vec<EmploymentRecord>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub profile_url: String,
}

impl CandidateProfile {
    /// The first current employment record, the only one scoring looks at.
    pub fn current_employer(&self) -> Option<&EmploymentRecord> {
        self.current_employers.first()
    }

    /// Identity used for deduplication: `person_id`, else `profile_url`.
    ///
    /// Keys carry an `id:` or `url:` prefix so the two namespaces never collide.
    pub fn identity_key(&self) -> Option<String> {
        if !self.person_id.trim().is_empty() {
            Some(format!("id:{}", self.person_id))
        } else if !self.profile_url.trim().is_empty() {
            Some(format!("url:{}", self.profile_url))
        } else {
            None
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts strings and numbers; anything else becomes empty.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        _ => 0.0,
    })
}

fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = lenient_number(deserializer)?;
    Ok(if value.is_finite() && value > 0.0 {
        value as u64
    } else {
        0
    })
}

/// Accepts a list of strings, a single string, or null.
fn string_or_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if s.is_empty() => Vec::new(),
        Value::String(s) => vec![s],
        Value::Array(items) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// One page of search results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchPage {
    /// Decoded (and truncated) profiles, in API order.
    pub profiles: Vec<CandidateProfile>,
    /// Cursor for the next page, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    /// Number of profiles the API returned, including skipped ones.
    pub total_results: usize,
    /// Profiles that failed to decode.
    #[serde(default)]
    pub skipped_profiles: usize,
    /// Estimated credits for this call.
    pub credits_used: f64,
    /// How long the call took in milliseconds (including any retry).
    pub duration_ms: u64,
}

/// Errors that can occur during search operations.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Invalid search request: {0}")]
    Validation(String),

    #[error("Search API is not configured: {0}")]
    NotConfigured(String),

    #[error("Search API transport failure: {0}")]
    Transport(String),

    #[error("Search API error: HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Search API returned an unreadable response: {0}")]
    Decode(String),
}

impl SearchError {
    /// Failures caused by the request itself rather than the backend.
    pub fn is_validation(&self) -> bool {
        matches!(self, SearchError::Validation(_))
    }

    pub fn metric_label(&self) -> &'static str {
        match self {
            SearchError::Validation(_) => "validation_error",
            SearchError::NotConfigured(_) => "not_configured",
            SearchError::Transport(_) => "transport_error",
            SearchError::Api { .. } => "api_error",
            SearchError::Decode(_) => "decode_error",
        }
    }
}

impl From<FilterError> for SearchError {
    fn from(err: FilterError) -> Self {
        SearchError::Validation(err.to_string())
    }
}

impl From<HttpError> for SearchError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Status { status, body } => SearchError::Api {
                status,
                message: body,
            },
            HttpError::Decode(msg) => SearchError::Decode(msg),
            HttpError::Client(msg) => SearchError::NotConfigured(msg),
            other => SearchError::Transport(other.to_string()),
        }
    }
}

/// Trait for people search backends.
#[async_trait]
pub trait PeopleSearcher: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Fetch one page of candidates.
    async fn search(&self, request: &SearchRequest) -> Result<SearchPage, SearchError>;
}

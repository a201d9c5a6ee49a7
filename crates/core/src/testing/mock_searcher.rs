//! Mock people searcher for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::filter::FilterValue;
use crate::searcher::{
    estimate_credits, PeopleSearcher, SearchError, SearchPage, SearchRequest,
};

/// Mock implementation of the [`PeopleSearcher`] trait.
///
/// Pages are looked up by a key derived from the request: the cursor when
/// one is set, otherwise the first text value in the filter tree. Unknown
/// keys return an empty last page.
///
/// # Example
///
/// ```rust,ignore
/// use recruiter_core::testing::{MockPeopleSearcher, fixtures};
///
/// let searcher = MockPeopleSearcher::new();
/// searcher.add_page("Rust", fixtures::page("rust", 200, Some("rust-2"))).await;
/// searcher.add_page("rust-2", fixtures::page("rust2", 50, None)).await;
///
/// let page = searcher.search(&request).await?;
/// assert_eq!(searcher.recorded_requests().await.len(), 1);
/// ```
pub struct MockPeopleSearcher {
    /// Pages by lookup key.
    pages: Arc<RwLock<HashMap<String, SearchPage>>>,
    /// One-shot failures by lookup key.
    failures: Arc<RwLock<HashMap<String, SearchError>>>,
    /// Recorded requests.
    requests: Arc<RwLock<Vec<SearchRequest>>>,
    /// If set, the next search will fail with this error.
    next_error: Arc<RwLock<Option<SearchError>>>,
}

impl std::fmt::Debug for MockPeopleSearcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockPeopleSearcher")
            .field("pages", &"<pages>")
            .field("failures", &"<failures>")
            .field("requests", &"<requests>")
            .field("next_error", &"<next_error>")
            .finish()
    }
}

impl Default for MockPeopleSearcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPeopleSearcher {
    pub fn new() -> Self {
        Self {
            pages: Arc::new(RwLock::new(HashMap::new())),
            failures: Arc::new(RwLock::new(HashMap::new())),
            requests: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Serve `page` for requests matching `key`.
    pub async fn add_page(&self, key: &str, page: SearchPage) {
        self.pages.write().await.insert(key.to_string(), page);
    }

    /// Fail the next request matching `key`.
    pub async fn fail_on(&self, key: &str, error: SearchError) {
        self.failures.write().await.insert(key.to_string(), error);
    }

    /// Configure the next search to fail with the given error.
    pub async fn set_next_error(&self, error: SearchError) {
        *self.next_error.write().await = Some(error);
    }

    /// Get recorded search requests, in call order.
    pub async fn recorded_requests(&self) -> Vec<SearchRequest> {
        self.requests.read().await.clone()
    }

    pub async fn search_count(&self) -> usize {
        self.requests.read().await.len()
    }

    /// Lookup key of a request.
    pub fn request_key(request: &SearchRequest) -> String {
        if let Some(cursor) = &request.cursor {
            return cursor.clone();
        }
        request
            .filters
            .conditions()
            .into_iter()
            .find_map(|(_, _, value)| match value {
                FilterValue::Text(text) => Some(text.clone()),
                FilterValue::List(items) => items.iter().find_map(|v| match v {
                    FilterValue::Text(text) => Some(text.clone()),
                    _ => None,
                }),
                _ => None,
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl PeopleSearcher for MockPeopleSearcher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchPage, SearchError> {
        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }
        request.validate()?;

        self.requests.write().await.push(request.clone());

        let key = Self::request_key(request);
        if let Some(err) = self.failures.write().await.remove(&key) {
            return Err(err);
        }

        let mut page = self.pages.read().await.get(&key).cloned().unwrap_or_default();
        page.profiles.truncate(request.limit as usize);
        page.credits_used = estimate_credits(page.profiles.len());
        page.duration_ms = 5;
        Ok(page)
    }
}

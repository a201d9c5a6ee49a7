//! Thin JSON-over-HTTP client shared by the search backend and the demo
//! Todo client.

use reqwest::{header::CONTENT_TYPE, Client, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Maximum number of characters of an error body kept in [`HttpError::Status`].
const ERROR_BODY_LIMIT: usize = 200;

/// Errors from a single HTTP exchange.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid JSON response: {0}")]
    Decode(String),

    #[error("HTTP client error: {0}")]
    Client(String),
}

impl HttpError {
    /// Whether the failure happened on the wire or was a non-2xx reply.
    /// Decoding and client construction failures are not transport failures.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            HttpError::Timeout(_) | HttpError::Connection(_) | HttpError::Status { .. }
        )
    }
}

/// JSON client bound to one base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    bearer_token: Option<String>,
    timeout: Duration,
}

impl ApiClient {
    /// Create a client with a fixed per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bearer_token: None,
            timeout,
        })
    }

    /// Attach `Authorization: Bearer <token>` to every request.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// POST a JSON body (`application/json`) and decode the JSON reply.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, HttpError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(url = %url, "POST");
        self.send(self.client.post(&url).json(body)).await
    }

    /// GET with query parameters and decode the JSON reply.
    pub async fn get_json<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(url = %url, "GET");
        let mut request = self.client.get(&url).header(CONTENT_TYPE, "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }
        self.send(request).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, HttpError> {
        let request = match &self.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout(self.timeout)
            } else {
                HttpError::Connection(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HttpError::Status {
                status: status.as_u16(),
                body: body.chars().take(ERROR_BODY_LIMIT).collect(),
            });
        }

        let bytes = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout(self.timeout)
            } else {
                HttpError::Connection(e.to_string())
            }
        })?;

        serde_json::from_slice(&bytes).map_err(|e| HttpError::Decode(e.to_string()))
    }
}

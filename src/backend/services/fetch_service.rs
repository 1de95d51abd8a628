// src/backend/services/fetch_service.rs
// Conditional GET of the remote content document.

use reqwest::header::{CACHE_CONTROL, ETAG, IF_NONE_MATCH};
use reqwest::{Client, StatusCode};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("portfolio-backend/", env!("CARGO_PKG_VERSION"));

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Fetch failed ({0})")]
    Status(u16),
}

/// Result of one fetch attempt that reached the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    NotModified,
    Fetched { raw: String, etag: Option<String> },
}

/// Where content comes from. The HTTP implementation is the only production
/// one; tests script outcomes directly.
pub trait ContentSource: Send + Sync {
    /// GETs `url`, sending `If-None-Match: etag` when a validator is known.
    /// Any status other than 2xx or 304 is an error.
    fn fetch(
        &self,
        url: &str,
        etag: Option<&str>,
    ) -> impl Future<Output = Result<FetchOutcome, FetchError>> + Send;
}

#[derive(Clone, Debug)]
pub struct HttpContentSource {
    client: Client,
}

impl HttpContentSource {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl ContentSource for HttpContentSource {
    async fn fetch(&self, url: &str, etag: Option<&str>) -> Result<FetchOutcome, FetchError> {
        let mut request = self.client.get(url).header(CACHE_CONTROL, "no-store");
        if let Some(etag) = etag {
            request = request.header(IF_NONE_MATCH, etag);
        }

        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::NOT_MODIFIED {
            tracing::debug!(url, "content not modified");
            return Ok(FetchOutcome::NotModified);
        }
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let etag = response
            .headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let raw = response.text().await?;
        tracing::debug!(url, bytes = raw.len(), etag = ?etag, "content fetched");
        Ok(FetchOutcome::Fetched { raw, etag })
    }
}

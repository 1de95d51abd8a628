// src/backend/services/content_service.rs
// Cache-first loading with conditional background revalidation.

use crate::error::PortfolioError;
use crate::models::content::ContentDocument;
use crate::models::defaults::placeholder_document;
use crate::models::load_state::LoadState;
use crate::services::fetch_service::{ContentSource, FetchError, FetchOutcome};
use crate::services::validation_service::{validate_json_text, TextValidation};
use crate::storage::ContentCache;
use futures::future::{AbortHandle, Abortable};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const MISSING_URL_MESSAGE: &str = "Missing PORTFOLIO_JSON_URL";
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch portfolio JSON.";

const CACHED_ERROR_LIMIT: usize = 3;
const FETCHED_ERROR_LIMIT: usize = 4;
const SERVER_ERROR_LIMIT: usize = 3;

/// Discrete inputs to the load-state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    FetchSucceeded(ContentDocument),
    FetchInvalid(String),
    NotModified,
    FetchFailed(String),
}

/// Next state for `event`, or `None` when the current state stays as is.
pub fn reduce(current: &LoadState, event: PipelineEvent) -> Option<LoadState> {
    match event {
        PipelineEvent::FetchSucceeded(data) => Some(LoadState::Ready { data }),
        PipelineEvent::FetchInvalid(message) => Some(LoadState::Error {
            data: current.document().clone(),
            message,
        }),
        PipelineEvent::NotModified => None,
        // Stale content beats an error page.
        PipelineEvent::FetchFailed(_) if current.is_ready() => None,
        PipelineEvent::FetchFailed(_) => Some(LoadState::Error {
            data: current.document().clone(),
            message: FETCH_FAILED_MESSAGE.to_string(),
        }),
    }
}

/// One-shot load performed while generating the page, before any client state exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerPrefetch {
    pub document: ContentDocument,
    /// Raw text of a valid response, used to seed the client cache.
    pub raw: Option<String>,
    pub error: Option<String>,
}

impl ServerPrefetch {
    /// No server pass: the client starts from the placeholder.
    pub fn empty() -> Self {
        Self {
            document: placeholder_document(),
            raw: None,
            error: None,
        }
    }

    fn failed(error: String) -> Self {
        tracing::warn!(%error, "server prefetch failed");
        Self {
            error: Some(error),
            ..Self::empty()
        }
    }
}

/// Fetches and validates once, without caching or cancellation.
pub async fn server_prefetch<S: ContentSource>(source: &S, url: Option<&str>) -> ServerPrefetch {
    let Some(url) = url else {
        return ServerPrefetch::failed(MISSING_URL_MESSAGE.to_string());
    };

    let raw = match source.fetch(url, None).await {
        Ok(FetchOutcome::Fetched { raw, .. }) => raw,
        Ok(FetchOutcome::NotModified) => return ServerPrefetch::failed("Server fetch failed (304)".to_string()),
        Err(FetchError::Status(code)) => return ServerPrefetch::failed(format!("Server fetch failed ({})", code)),
        Err(e) => return ServerPrefetch::failed(e.to_string()),
    };

    match validate_json_text(&raw) {
        TextValidation::Valid(document) => ServerPrefetch {
            document,
            raw: Some(raw),
            error: None,
        },
        TextValidation::Invalid(errors) => ServerPrefetch::failed(format!(
            "Fetched JSON failed validation: {}",
            errors.iter().take(SERVER_ERROR_LIMIT).cloned().collect::<Vec<_>>().join("; ")
        )),
        TextValidation::Unparseable(e) => ServerPrefetch::failed(e),
    }
}

/// Reconciles the local cache with the remote source.
pub struct ContentPipeline<S> {
    source_url: Option<String>,
    cache: ContentCache,
    source: S,
}

impl<S: ContentSource> ContentPipeline<S> {
    pub fn new(source_url: Option<String>, cache: ContentCache, source: S) -> Self {
        Self {
            source_url,
            cache,
            source,
        }
    }

    pub fn source_url(&self) -> Option<&str> {
        self.source_url.as_deref()
    }

    pub fn cache(&self) -> &ContentCache {
        &self.cache
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Reads the cached document. `Loading` with the placeholder when nothing is cached.
    pub fn load_from_cache(&self) -> LoadState {
        let Some(raw) = self.cache.read_raw() else {
            return LoadState::Loading {
                data: placeholder_document(),
            };
        };
        match validate_json_text(&raw) {
            TextValidation::Valid(data) => LoadState::Ready { data },
            TextValidation::Invalid(errors) => LoadState::Error {
                data: placeholder_document(),
                message: format!(
                    "Cached portfolio data is invalid.\n{}",
                    PortfolioError::validation_prefix(&errors, CACHED_ERROR_LIMIT)
                ),
            },
            TextValidation::Unparseable(_) => LoadState::Error {
                data: placeholder_document(),
                message: "Failed to parse cached portfolio JSON.".to_string(),
            },
        }
    }

    /// Synchronous first state: configuration check, then the cache.
    pub fn bootstrap(&self, prefetch: &ServerPrefetch) -> LoadState {
        if self.source_url.is_none() {
            return LoadState::Error {
                data: prefetch.document.clone(),
                message: MISSING_URL_MESSAGE.to_string(),
            };
        }
        match self.load_from_cache() {
            ready @ LoadState::Ready { .. } => ready,
            other => {
                if let Some(message) = other.message() {
                    tracing::warn!(%message, "ignoring cached content");
                }
                LoadState::Loading {
                    data: prefetch.document.clone(),
                }
            }
        }
    }

    /// Validates and caches server-provided text once at mount.
    pub fn seed(&self, prefetch: &ServerPrefetch) -> Option<PipelineEvent> {
        let raw = prefetch.raw.as_deref()?;
        match self.accept(raw, None) {
            event @ PipelineEvent::FetchSucceeded(_) => Some(event),
            _ => None,
        }
    }

    /// Validates a fetched body and caches it when valid.
    fn accept(&self, raw: &str, etag: Option<&str>) -> PipelineEvent {
        match validate_json_text(raw) {
            TextValidation::Valid(document) => {
                self.cache.write_raw(raw);
                if let Some(etag) = etag {
                    self.cache.write_etag(etag);
                }
                PipelineEvent::FetchSucceeded(document)
            }
            TextValidation::Invalid(errors) => {
                tracing::warn!(count = errors.len(), "fetched content failed validation");
                PipelineEvent::FetchInvalid(format!(
                    "Fetched portfolio JSON is invalid.\n{}",
                    PortfolioError::validation_prefix(&errors, FETCHED_ERROR_LIMIT)
                ))
            }
            TextValidation::Unparseable(e) => {
                tracing::warn!(error = %e, "fetched content is not JSON");
                PipelineEvent::FetchInvalid("Fetched portfolio JSON could not be parsed.".to_string())
            }
        }
    }

    /// Conditional GET against the source. Cache writes happen only after the
    /// last suspension point, so dropping this future never leaves a partial update.
    pub async fn revalidate(&self) -> PipelineEvent {
        let Some(url) = self.source_url.as_deref() else {
            return PipelineEvent::FetchFailed(MISSING_URL_MESSAGE.to_string());
        };
        let etag = self.cache.read_etag();
        match self.source.fetch(url, etag.as_deref()).await {
            Ok(FetchOutcome::NotModified) => PipelineEvent::NotModified,
            Ok(FetchOutcome::Fetched { raw, etag }) => self.accept(&raw, etag.as_deref()),
            Err(e) => {
                tracing::warn!(url, error = %e, "content fetch failed");
                PipelineEvent::FetchFailed(e.to_string())
            }
        }
    }
}

fn apply(state: &watch::Sender<LoadState>, event: PipelineEvent) {
    state.send_if_modified(|current| match reduce(current, event) {
        Some(next) => {
            tracing::debug!(ready = next.is_ready(), "load state changed");
            *current = next;
            true
        }
        None => false,
    });
}

/// A mounted page: owns the load state and the in-flight revalidation.
/// Dropping or unmounting the view aborts the fetch without touching state.
pub struct ContentView {
    state: watch::Receiver<LoadState>,
    abort: Option<AbortHandle>,
    task: Option<JoinHandle<()>>,
}

impl ContentView {
    /// Renders from cache immediately, then revalidates in the background.
    /// Must be called inside a tokio runtime.
    pub fn mount<S>(pipeline: Arc<ContentPipeline<S>>, prefetch: &ServerPrefetch) -> Self
    where
        S: ContentSource + 'static,
    {
        let (tx, rx) = watch::channel(pipeline.bootstrap(prefetch));
        if pipeline.source_url().is_none() {
            return Self {
                state: rx,
                abort: None,
                task: None,
            };
        }

        if let Some(event) = pipeline.seed(prefetch) {
            apply(&tx, event);
        }

        let (abort, registration) = AbortHandle::new_pair();
        let revalidation = Abortable::new(
            async move {
                let event = pipeline.revalidate().await;
                apply(&tx, event);
            },
            registration,
        );
        let task = tokio::spawn(async move {
            if revalidation.await.is_err() {
                tracing::debug!("revalidation aborted");
            }
        });

        Self {
            state: rx,
            abort: Some(abort),
            task: Some(task),
        }
    }

    pub fn state(&self) -> LoadState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LoadState> {
        self.state.clone()
    }

    /// Waits for the background revalidation (if any) to finish or abort.
    pub async fn settled(&mut self) {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "revalidation task failed");
            }
        }
    }

    pub fn unmount(mut self) {
        self.abort_in_flight();
    }

    fn abort_in_flight(&mut self) {
        if let Some(abort) = self.abort.take() {
            abort.abort();
        }
    }
}

impl Drop for ContentView {
    fn drop(&mut self) {
        self.abort_in_flight();
    }
}

// src/backend/api.rs
// Application facade: wires configuration, stores, clock and content source
// into the pipeline, the credential gate and the editor.

use crate::{
    config::AppConfig,
    error::PortfolioError,
    services::{
        content_service::{self, ContentPipeline, ContentView, ServerPrefetch},
        fetch_service::{ContentSource, HttpContentSource},
        scheduler,
        CredentialGate, EditorSession,
    },
    storage::{ContentCache, FileStore, KeyValueStore, LocalStore, MemoryStore},
    utils::time::{Clock, SystemClock},
};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

pub struct PortfolioApp<S = HttpContentSource> {
    config: AppConfig,
    durable: LocalStore,
    // Process lifetime stands in for the browsing session.
    session: LocalStore,
    clock: Arc<dyn Clock>,
    pipeline: Arc<ContentPipeline<S>>,
}

/// Durable store named by the config: file-backed when a path is set, in-memory otherwise.
pub fn open_durable_store(config: &AppConfig) -> Result<Arc<dyn KeyValueStore>, PortfolioError> {
    match &config.store_path {
        Some(path) => {
            let store = FileStore::open(path.clone()).map_err(|e| PortfolioError::Storage(e.to_string()))?;
            Ok(Arc::new(store))
        }
        None => Ok(Arc::new(MemoryStore::new())),
    }
}

impl PortfolioApp<HttpContentSource> {
    /// Production wiring: HTTP source, system clock, durable store from config.
    pub fn from_config(config: AppConfig) -> Result<Self, PortfolioError> {
        let source = HttpContentSource::new(config.http_timeout())
            .map_err(|e| PortfolioError::Configuration(e.to_string()))?;
        let durable = open_durable_store(&config)?;
        Ok(Self::with_parts(config, durable, Arc::new(SystemClock), source))
    }
}

impl<S: ContentSource + 'static> PortfolioApp<S> {
    pub fn with_parts(config: AppConfig, durable: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, source: S) -> Self {
        let durable = LocalStore::new(durable);
        let session = LocalStore::new(Arc::new(MemoryStore::new()));
        let cache = ContentCache::new(durable.clone(), clock.clone());
        let pipeline = Arc::new(ContentPipeline::new(config.content_url.clone(), cache, source));
        tracing::info!(
            content_url = config.content_url.as_deref().unwrap_or("<unset>"),
            file_backed = config.store_path.is_some(),
            "portfolio app ready"
        );
        Self {
            config,
            durable,
            session,
            clock,
            pipeline,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn cache(&self) -> &ContentCache {
        self.pipeline.cache()
    }

    pub fn source(&self) -> &S {
        self.pipeline.source()
    }

    /// Server-side fetch used to seed the first render.
    pub async fn server_prefetch(&self) -> ServerPrefetch {
        content_service::server_prefetch(self.pipeline.source(), self.pipeline.source_url()).await
    }

    /// Mounts a content view. Must be called inside a tokio runtime.
    pub fn mount_view(&self, prefetch: &ServerPrefetch) -> ContentView {
        ContentView::mount(self.pipeline.clone(), prefetch)
    }

    pub fn credential_gate(&self) -> CredentialGate {
        CredentialGate::new(
            self.durable.clone(),
            self.session.clone(),
            self.clock.clone(),
            self.config.pbkdf2_iterations,
        )
    }

    pub fn open_editor(&self) -> EditorSession {
        EditorSession::open(self.credential_gate(), self.cache().clone(), self.config.idle_timeout())
    }

    /// Opens a shared editor guarded by the idle watchdog. Must be called inside a tokio runtime.
    pub fn open_watched_editor(&self) -> (Arc<Mutex<EditorSession>>, JoinHandle<()>) {
        let editor = Arc::new(Mutex::new(self.open_editor()));
        let watchdog = scheduler::spawn_idle_watchdog(&editor, self.config.idle_poll_interval());
        (editor, watchdog)
    }
}

// src/backend/services/mod.rs

pub mod auth_service;
pub mod content_service;
pub mod editor_service;
pub mod fetch_service;
pub mod scheduler;
pub mod validation_service;

pub use auth_service::{CredentialGate, CredentialRecord};
pub use content_service::{ContentPipeline, ContentView, PipelineEvent, ServerPrefetch};
pub use editor_service::{array_apply, ArrayOp, EditorSession};
pub use fetch_service::{ContentSource, FetchError, FetchOutcome, HttpContentSource};
pub use validation_service::{validate_content, validate_document, validate_json_text, TextValidation};

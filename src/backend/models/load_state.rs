// src/backend/models/load_state.rs
use crate::models::content::ContentDocument;
use serde::Serialize;

/// Renderable state handed to presentation. Every variant carries the
/// best document available, so there is always something to draw.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum LoadState {
    Loading { data: ContentDocument },
    Ready { data: ContentDocument },
    Error { data: ContentDocument, message: String },
}

impl LoadState {
    pub fn document(&self) -> &ContentDocument {
        match self {
            LoadState::Loading { data } | LoadState::Ready { data } | LoadState::Error { data, .. } => data,
        }
    }

    pub fn into_document(self) -> ContentDocument {
        match self {
            LoadState::Loading { data } | LoadState::Ready { data } | LoadState::Error { data, .. } => data,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready { .. })
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            LoadState::Error { message, .. } => Some(message),
            _ => None,
        }
    }
}

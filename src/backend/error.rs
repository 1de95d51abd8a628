// src/backend/error.rs
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PortfolioError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error("Editor is locked")]
    Locked,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Failure reported by the credential gate.
///
/// Both variants are produced after the same amount of key-derivation work
/// when a credential exists; only the user-facing text differs.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialError {
    #[error("No passphrase configured yet.")]
    NotConfigured,

    #[error("Invalid passphrase.")]
    InvalidPassphrase,
}

impl CredentialError {
    /// Stable reason code, e.g. for a JSON response body.
    pub fn reason(&self) -> &'static str {
        match self {
            CredentialError::NotConfigured => "not-configured",
            CredentialError::InvalidPassphrase => "invalid-passphrase",
        }
    }
}

impl PortfolioError {
    /// Validation error list truncated to the first `limit` entries.
    pub fn validation_prefix(errors: &[String], limit: usize) -> String {
        errors
            .iter()
            .take(limit)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

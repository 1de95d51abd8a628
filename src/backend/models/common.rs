// src/backend/models/common.rs
use serde::{Deserialize, Serialize};

pub type TimestampMs = u64; // Milliseconds since epoch
pub type Etag = String; // Opaque HTTP entity tag

/// Whether a credential record exists on this device.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Copy)]
#[serde(rename_all = "kebab-case")]
pub enum ConfigStatus {
    Configured,
    NotConfigured,
}

/// Which screen the editor is showing.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Copy)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
    Setup,  // No credential on this device yet
    Login,  // Credential exists, session locked
    Editor, // Session unlocked
}

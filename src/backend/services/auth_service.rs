// src/backend/services/auth_service.rs
// Local passphrase credential and the tab-lifetime unlocked session.

use crate::error::{CredentialError, PortfolioError};
use crate::models::common::{ConfigStatus, TimestampMs};
use crate::storage::{keys, LocalStore};
use crate::utils::crypto::{constant_time_eq, derive_key, generate_salt};
use crate::utils::time::Clock;
use std::sync::Arc;
use std::time::Duration;

const UNLOCKED_FLAG: &str = "1";

/// Salt and derived hash as stored on the device. Never holds the passphrase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CredentialRecord {
    pub salt: Vec<u8>,
    pub hash: Vec<u8>,
    pub iterations: u32,
}

/// Derives and checks the owner passphrase without any network round trip,
/// and tracks whether the current session is unlocked.
#[derive(Clone)]
pub struct CredentialGate {
    durable: LocalStore,
    session: LocalStore,
    clock: Arc<dyn Clock>,
    iterations: u32,
}

impl CredentialGate {
    pub fn new(durable: LocalStore, session: LocalStore, clock: Arc<dyn Clock>, iterations: u32) -> Self {
        Self {
            durable,
            session,
            clock,
            iterations: iterations.max(1),
        }
    }

    pub fn config_status(&self) -> ConfigStatus {
        let hash = self.durable.read(keys::CREDENTIAL_HASH);
        let salt = self.durable.read(keys::CREDENTIAL_SALT);
        match (hash, salt) {
            (Some(h), Some(s)) if !h.is_empty() && !s.is_empty() => ConfigStatus::Configured,
            _ => ConfigStatus::NotConfigured,
        }
    }

    fn read_record(&self) -> Option<CredentialRecord> {
        let salt = self.durable.read(keys::CREDENTIAL_SALT)?;
        let hash = self.durable.read(keys::CREDENTIAL_HASH)?;
        let iterations = self
            .durable
            .read(keys::CREDENTIAL_ITERATIONS)
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(self.iterations);

        match (hex::decode(&salt), hex::decode(&hash)) {
            (Ok(salt), Ok(hash)) if !salt.is_empty() && !hash.is_empty() => Some(CredentialRecord {
                salt,
                hash,
                iterations,
            }),
            _ => {
                tracing::warn!("stored credential is not decodable; treating as not configured");
                None
            }
        }
    }

    /// Creates a new credential, replacing any previous one.
    pub fn configure(&self, passphrase: &str) -> Result<(), PortfolioError> {
        let salt = generate_salt()?;
        let hash = derive_key(passphrase, &salt, self.iterations);
        let salt_hex = hex::encode(salt);
        let hash_hex = hex::encode(hash);
        let iterations = self.iterations.to_string();

        self.durable.write_many(&[
            (keys::CREDENTIAL_SALT, salt_hex.as_str()),
            (keys::CREDENTIAL_HASH, hash_hex.as_str()),
            (keys::CREDENTIAL_ITERATIONS, iterations.as_str()),
        ]);
        tracing::info!(iterations = self.iterations, "admin passphrase configured");
        Ok(())
    }

    /// Re-derives the hash with the stored salt and compares in constant time.
    pub fn verify(&self, passphrase: &str) -> Result<(), CredentialError> {
        let record = self.read_record().ok_or(CredentialError::NotConfigured)?;
        let candidate = derive_key(passphrase, &record.salt, record.iterations);
        if constant_time_eq(&candidate, &record.hash) {
            Ok(())
        } else {
            tracing::info!("admin passphrase rejected");
            Err(CredentialError::InvalidPassphrase)
        }
    }

    pub fn set_unlocked(&self, unlocked: bool) {
        if unlocked {
            let now = self.clock.now_ms().to_string();
            self.session.write_many(&[
                (keys::SESSION_UNLOCKED, UNLOCKED_FLAG),
                (keys::SESSION_LAST_ACTIVE_AT, now.as_str()),
            ]);
        } else {
            self.session.remove(keys::SESSION_UNLOCKED);
            self.session.remove(keys::SESSION_LAST_ACTIVE_AT);
        }
    }

    fn flag_set(&self) -> bool {
        self.session.read(keys::SESSION_UNLOCKED).as_deref() == Some(UNLOCKED_FLAG)
    }

    fn last_active_at(&self) -> Option<TimestampMs> {
        self.session
            .read(keys::SESSION_LAST_ACTIVE_AT)
            .and_then(|v| v.parse::<TimestampMs>().ok())
    }

    /// True while the flag is set and the last activity is within `timeout`.
    /// An expired session is cleared as a side effect.
    pub fn is_unlocked(&self, timeout: Duration) -> bool {
        if !self.flag_set() {
            return false;
        }
        let Some(last) = self.last_active_at() else {
            return false;
        };

        let elapsed = self.clock.now_ms().saturating_sub(last);
        if u128::from(elapsed) > timeout.as_millis() {
            tracing::info!(elapsed_ms = elapsed, "admin session expired");
            self.set_unlocked(false);
            return false;
        }
        true
    }

    /// Refreshes the activity stamp of an unlocked session. Does nothing when locked.
    pub fn touch_activity(&self) {
        if !self.flag_set() {
            return;
        }
        let now = self.clock.now_ms().to_string();
        self.session.write(keys::SESSION_LAST_ACTIVE_AT, &now);
    }
}

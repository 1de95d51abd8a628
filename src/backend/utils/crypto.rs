// src/backend/utils/crypto.rs
// Key derivation, randomness and comparison helpers for the credential gate.

use crate::error::PortfolioError;
use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

pub const SALT_LEN: usize = 16;
pub const DERIVED_KEY_LEN: usize = 32;
pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 140_000;

/// Fresh random salt for a new credential.
pub fn generate_salt() -> Result<[u8; SALT_LEN], PortfolioError> {
    let mut salt = [0u8; SALT_LEN];
    OsRng
        .try_fill_bytes(&mut salt)
        .map_err(|e| PortfolioError::InternalError(format!("OS RNG failed: {}", e)))?;
    Ok(salt)
}

/// PBKDF2-HMAC-SHA256 over the passphrase. `iterations` is clamped to at least 1.
pub fn derive_key(passphrase: &str, salt: &[u8], iterations: u32) -> [u8; DERIVED_KEY_LEN] {
    let mut key = [0u8; DERIVED_KEY_LEN];
    pbkdf2_hmac::<Sha256>(passphrase.as_bytes(), salt, iterations.max(1), &mut key);
    key
}

/// Equality check whose running time does not depend on where the inputs differ.
/// Inputs of different length compare unequal.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

use crate::error::PortfolioError;
use crate::services::auth_service::CredentialGate;
use std::time::Duration;

/// Checks that the editing session is unlocked and not idle-expired.
///
/// # Errors
///
/// Returns `PortfolioError::Locked` otherwise.
pub fn require_unlocked(gate: &CredentialGate, idle_timeout: Duration) -> Result<(), PortfolioError> {
    if gate.is_unlocked(idle_timeout) {
        Ok(())
    } else {
        Err(PortfolioError::Locked)
    }
}

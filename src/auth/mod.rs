//! PIN-based access gate.
//!
//! The journal is locked until the user proves they know the PIN. The gate
//! never stores the PIN itself, only `base64(sha256(pin))` in a
//! [`SecretStore`]. Whether the current invocation is unlocked lives in an
//! explicit [`Session`] value that callers pass around.
//!
//! # Example
//!
//! ```
//! use daybook::auth::{AccessGate, MemorySecretStore, Session};
//!
//! let gate = AccessGate::new(MemorySecretStore::new());
//! let mut session = Session::new();
//!
//! gate.set_pin(&mut session, "1234")?;
//! gate.logout(&mut session);
//! assert!(!gate.verify_pin(&mut session, "0000")?);
//! assert!(gate.verify_pin(&mut session, "1234")?);
//! session.require_unlocked()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod secrets;

pub use secrets::{FileSecretStore, MemorySecretStore, SecretStore};

use crate::constants::{MIN_PIN_LENGTH, PIN_SECRET_NAME};
use crate::errors::{AppError, AppResult, AuthError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

/// Per-invocation authentication state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    authenticated: bool,
}

impl Session {
    /// A fresh, locked session.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Fails with `AuthError::Locked` unless the session has been unlocked.
    pub fn require_unlocked(&self) -> AppResult<()> {
        if self.authenticated {
            Ok(())
        } else {
            Err(AuthError::Locked.into())
        }
    }
}

/// Sets, checks and clears the PIN.
pub struct AccessGate<S: SecretStore> {
    secrets: S,
}

impl<S: SecretStore> AccessGate<S> {
    pub fn new(secrets: S) -> Self {
        Self { secrets }
    }

    /// Whether a PIN digest is currently stored.
    pub fn has_pin(&self) -> AppResult<bool> {
        Ok(self.secrets.get(PIN_SECRET_NAME)?.is_some())
    }

    /// Stores a new PIN and unlocks the session.
    ///
    /// Any existing digest is replaced; callers that must not overwrite a PIN
    /// check [`has_pin`](Self::has_pin) first.
    ///
    /// # Errors
    ///
    /// `AppError::InvalidInput` if the PIN is blank or shorter than
    /// four characters. Nothing is stored in that case.
    pub fn set_pin(&self, session: &mut Session, pin: &str) -> AppResult<()> {
        if pin.trim().is_empty() || pin.chars().count() < MIN_PIN_LENGTH {
            return Err(AppError::InvalidInput(format!(
                "PIN must be at least {} characters",
                MIN_PIN_LENGTH
            )));
        }

        self.secrets.set(PIN_SECRET_NAME, &hash_pin(pin))?;
        session.authenticated = true;
        info!("PIN configured");
        Ok(())
    }

    /// Checks `pin` against the stored digest.
    ///
    /// With no stored digest this returns `false` and leaves the session as it
    /// was. Otherwise the session's flag is set to the result.
    pub fn verify_pin(&self, session: &mut Session, pin: &str) -> AppResult<bool> {
        let Some(stored) = self.secrets.get(PIN_SECRET_NAME)? else {
            debug!("No PIN configured; verification refused");
            return Ok(false);
        };

        let matches = digests_match(&stored, &hash_pin(pin));
        session.authenticated = matches;
        if matches {
            debug!("PIN verified");
        } else {
            warn!("PIN verification failed");
        }
        Ok(matches)
    }

    /// Locks the session. The stored PIN is untouched.
    pub fn logout(&self, session: &mut Session) {
        session.authenticated = false;
    }

    /// Removes the stored PIN and locks the session.
    pub fn reset_pin(&self, session: &mut Session) -> AppResult<()> {
        self.secrets.delete(PIN_SECRET_NAME)?;
        session.authenticated = false;
        info!("PIN removed");
        Ok(())
    }
}

/// `base64(sha256(utf8(pin)))`, the form the PIN is stored in.
pub fn hash_pin(pin: &str) -> String {
    STANDARD.encode(Sha256::digest(pin.as_bytes()))
}

// Compares every byte regardless of where the first difference is
fn digests_match(stored: &str, candidate: &str) -> bool {
    let a = stored.as_bytes();
    let b = candidate.as_bytes();
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

//! PIN prompts and the `pin` commands.

use crate::auth::{AccessGate, SecretStore, Session};
use crate::constants::ENV_VAR_DAYBOOK_PIN;
use crate::errors::{AppResult, AuthError};
use std::env;
use tracing::{debug, info};
use zeroize::Zeroizing;

/// Source of PIN input.
pub trait PinReader {
    fn read_pin(&self, prompt: &str) -> AppResult<Zeroizing<String>>;
}

/// Reads the PIN from `DAYBOOK_PIN` if set, otherwise from the terminal
/// without echo.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPinReader;

impl PinReader for TerminalPinReader {
    fn read_pin(&self, prompt: &str) -> AppResult<Zeroizing<String>> {
        if let Ok(pin) = env::var(ENV_VAR_DAYBOOK_PIN) {
            debug!("Using PIN from {}", ENV_VAR_DAYBOOK_PIN);
            return Ok(Zeroizing::new(pin));
        }

        let pin = rpassword::prompt_password(prompt)
            .map_err(|e| AuthError::PinPrompt(e.to_string()))?;
        Ok(Zeroizing::new(pin))
    }
}

/// Creates the first PIN, asking for it twice.
///
/// # Errors
///
/// - `AuthError::PinAlreadySet` if a PIN exists
/// - `AuthError::PinMismatch` if the two answers differ
/// - `AppError::InvalidInput` if the PIN is too short
pub fn set_pin<S: SecretStore>(
    gate: &AccessGate<S>,
    session: &mut Session,
    reader: &dyn PinReader,
) -> AppResult<()> {
    if gate.has_pin()? {
        return Err(AuthError::PinAlreadySet.into());
    }

    let pin = reader.read_pin("New PIN: ")?;
    let confirmation = reader.read_pin("Confirm PIN: ")?;
    if *pin != *confirmation {
        return Err(AuthError::PinMismatch.into());
    }

    gate.set_pin(session, &pin)
}

/// Asks for the PIN and unlocks the session.
///
/// # Errors
///
/// - `AuthError::NoPinConfigured` if no PIN has been set
/// - `AuthError::IncorrectPin` if the answer is wrong
pub fn unlock<S: SecretStore>(
    gate: &AccessGate<S>,
    session: &mut Session,
    reader: &dyn PinReader,
) -> AppResult<()> {
    if session.is_authenticated() {
        return Ok(());
    }
    if !gate.has_pin()? {
        return Err(AuthError::NoPinConfigured.into());
    }

    let pin = reader.read_pin("PIN: ")?;
    if !gate.verify_pin(session, &pin)? {
        return Err(AuthError::IncorrectPin.into());
    }
    info!("Journal unlocked");
    Ok(())
}

/// Removes the PIN. The current PIN must be entered first.
pub fn reset_pin<S: SecretStore>(
    gate: &AccessGate<S>,
    session: &mut Session,
    reader: &dyn PinReader,
) -> AppResult<()> {
    unlock(gate, session, reader)?;
    gate.reset_pin(session)
}

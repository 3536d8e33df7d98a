//! Error handling utilities for the daybook application.
//!
//! This module provides the central error type `AppError` which represents all
//! possible error conditions that might occur in the application, as well as the
//! convenience type alias `AppResult` for functions that can return these errors.
//!
//! Expected conditions on read paths ("no entry today", "no such id") are not
//! errors: those queries return `Ok(None)`. Only primary-path failures reach
//! the caller as an `AppError`.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Represents specific error cases that can occur during database operations.
///
/// # Examples
///
/// ```
/// use daybook::errors::DatabaseError;
///
/// let error = DatabaseError::NotFound("Entry with id 123 not found".to_string());
/// assert!(format!("{}", error).contains("not found"));
/// ```
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// SQLite database error.
    #[error("Database error: {0}\n\nIf you're seeing 'file is not a database', the file at DAYBOOK_DB may be corrupted or not a daybook database.")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error.
    #[error("Failed to get connection from pool: {0}\n\nThis may indicate database connection issues. Try closing other daybook instances.")]
    Pool(#[from] r2d2::Error),

    /// Requested entry not found in database.
    #[error("Entry not found: {0}")]
    NotFound(String),

    /// A write would break a uniqueness rule, such as a second entry on the same day.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

/// Represents errors raised by the access gate.
///
/// # Examples
///
/// ```
/// use daybook::errors::AuthError;
///
/// let error = AuthError::Locked;
/// assert!(format!("{}", error).contains("locked"));
/// ```
#[derive(Debug, Error)]
pub enum AuthError {
    /// An entry operation was attempted without an unlocked session.
    #[error("Journal is locked. Unlock it with your PIN before reading or writing entries.")]
    Locked,

    /// No PIN has been configured yet.
    #[error("No PIN configured. Run `daybook pin set` to create one.")]
    NoPinConfigured,

    /// The supplied PIN did not match the stored digest.
    #[error("Incorrect PIN.")]
    IncorrectPin,

    /// A PIN exists and would be silently replaced.
    #[error("A PIN is already configured. Run `daybook pin reset` first to replace it.")]
    PinAlreadySet,

    /// The two PIN prompts did not match.
    #[error("PINs do not match. Please try again.")]
    PinMismatch,

    /// Reading the PIN from the terminal failed.
    #[error("Failed to read PIN: {0}")]
    PinPrompt(String),

    /// The secret store could not be read or written.
    #[error("Failed to access credential store at {path}: {source}")]
    SecretStore {
        /// Path of the secret that could not be accessed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Represents errors produced while rendering exports.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The PDF document could not be assembled or serialized.
    #[error("PDF generation failed: {0}")]
    Pdf(#[from] lopdf::Error),

    /// JSON serialization of entries failed.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Represents all possible errors that can occur in the daybook application.
///
/// This enum is the central error type used across the application, with variants
/// for different error categories. It uses `thiserror` for deriving the `Error` trait
/// implementation and formatted error messages.
///
/// # Examples
///
/// Creating a configuration error:
/// ```
/// use daybook::errors::AppError;
///
/// let error = AppError::Config("Missing data directory".to_string());
/// assert_eq!(format!("{}", error), "Configuration error: Missing data directory");
/// ```
///
/// Converting from an IO error:
/// ```
/// use daybook::errors::AppError;
/// use std::io::{self, ErrorKind};
///
/// let io_error = io::Error::new(ErrorKind::NotFound, "file not found");
/// let app_error: AppError = io_error.into();
///
/// match app_error {
///     AppError::Io(inner) => assert_eq!(inner.kind(), ErrorKind::NotFound),
///     _ => panic!("Expected Io variant"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors from filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Caller-supplied input was rejected before any state changed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Errors related to database operations.
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Errors raised by the access gate.
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Errors raised while exporting entries.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

impl AppError {
    /// Returns true when this error reports a second entry for the same day.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            AppError::Database(DatabaseError::ConstraintViolation(_))
        )
    }

    /// Returns true when this error reports a missing entry.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::Database(DatabaseError::NotFound(_)))
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        AppError::Database(DatabaseError::Sqlite(err))
    }
}

impl From<lopdf::Error> for AppError {
    fn from(err: lopdf::Error) -> Self {
        AppError::Export(ExportError::Pdf(err))
    }
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
///
/// # Examples
///
/// ```
/// use daybook::errors::{AppResult, AppError};
///
/// fn might_fail() -> AppResult<String> {
///     if false {
///         return Err(AppError::InvalidInput("Something went wrong".to_string()));
///     }
///     Ok("Operation succeeded".to_string())
/// }
/// ```
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io;

    #[test]
    fn test_app_error_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");

        let app_error: AppError = io_error.into();

        match app_error {
            AppError::Io(inner) => {
                assert_eq!(inner.kind(), io::ErrorKind::NotFound);
            }
            _ => panic!("Expected AppError::Io variant"),
        }
    }

    #[test]
    fn test_app_error_display() {
        let config_error = AppError::Config("Invalid configuration".to_string());
        assert_eq!(
            format!("{}", config_error),
            "Configuration error: Invalid configuration"
        );

        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
        let app_io_error = AppError::Io(io_error);
        assert_eq!(format!("{}", app_io_error), "I/O error: permission denied");

        let input_error = AppError::InvalidInput("PIN too short".to_string());
        assert_eq!(format!("{}", input_error), "Invalid input: PIN too short");

        let auth_error = AppError::Auth(AuthError::Locked);
        assert!(format!("{}", auth_error).contains("Authentication error"));
        assert!(format!("{}", auth_error).contains("locked"));
    }

    #[test]
    fn test_database_error_classification() {
        let duplicate: AppError =
            DatabaseError::ConstraintViolation("entry exists for 2024-01-15".to_string()).into();
        assert!(duplicate.is_constraint_violation());
        assert!(!duplicate.is_not_found());

        let missing: AppError = DatabaseError::NotFound("Entry with id 9".to_string()).into();
        assert!(missing.is_not_found());
        assert!(!missing.is_constraint_violation());

        let other = AppError::InvalidInput("blank title".to_string());
        assert!(!other.is_not_found());
        assert!(!other.is_constraint_violation());
    }

    #[test]
    fn test_rusqlite_error_converts_to_database_variant() {
        let app_error: AppError = rusqlite::Error::QueryReturnedNoRows.into();
        match app_error {
            AppError::Database(DatabaseError::Sqlite(rusqlite::Error::QueryReturnedNoRows)) => {}
            other => panic!("Expected DatabaseError::Sqlite, got {:?}", other),
        }
    }

    #[test]
    fn test_secret_store_error_source_chaining() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
        let auth_error = AuthError::SecretStore {
            path: PathBuf::from("/home/user/.config/daybook/.pin"),
            source: io_error,
        };

        let message = format!("{}", auth_error);
        assert!(message.contains("/home/user/.config/daybook/.pin"));
        assert!(message.contains("permission denied"));

        let source = auth_error
            .source()
            .expect("AuthError::SecretStore should have a source");
        let source_io_error = source
            .downcast_ref::<io::Error>()
            .expect("Source should be an io::Error");
        assert_eq!(source_io_error.kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_auth_errors_carry_resolution_hints() {
        assert!(format!("{}", AuthError::NoPinConfigured).contains("daybook pin set"));
        assert!(format!("{}", AuthError::PinAlreadySet).contains("daybook pin reset"));
        assert!(AuthError::IncorrectPin.source().is_none());
    }

    #[test]
    fn test_result_combinators() {
        let io_result: Result<(), io::Error> = Err(io::Error::other("test error"));
        let app_result: AppResult<()> = io_result.map_err(AppError::Io);

        match app_result {
            Err(AppError::Io(inner)) => {
                assert_eq!(inner.kind(), io::ErrorKind::Other);
            }
            _ => panic!("Expected AppError::Io variant"),
        }
    }
}

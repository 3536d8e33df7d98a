//! Constants used throughout the application.
//!
//! This module contains all constants used in daybook, organized into logical
//! groups. Having constants centralized makes them easier to find, modify, and
//! reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "daybook";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str = "A PIN-protected journal with one entry per day";

// CLI Arguments & Defaults
/// Log format identifier for plain text.
pub const LOG_FORMAT_TEXT: &str = "text";
/// Log format identifier for JSON.
pub const LOG_FORMAT_JSON: &str = "json";
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// Configuration Keys & Environment Variables
/// Environment variable for the data directory holding the database.
pub const ENV_VAR_DAYBOOK_DIR: &str = "DAYBOOK_DIR";
/// Environment variable overriding the database file path.
pub const ENV_VAR_DAYBOOK_DB: &str = "DAYBOOK_DB";
/// Environment variable for the directory holding the credential file.
pub const ENV_VAR_DAYBOOK_SECRETS_DIR: &str = "DAYBOOK_SECRETS_DIR";
/// Environment variable for the debug dump artifact path (or `off`).
pub const ENV_VAR_DAYBOOK_DUMP: &str = "DAYBOOK_DUMP";
/// Environment variable supplying the PIN non-interactively.
pub const ENV_VAR_DAYBOOK_PIN: &str = "DAYBOOK_PIN";
/// Standard environment variable for the user's home directory.
pub const ENV_VAR_HOME: &str = "HOME";
/// Default data sub-directory within the user's home directory.
pub const DEFAULT_DATA_SUBDIR: &str = ".local/share/daybook";
/// Default secrets sub-directory within the user's home directory.
pub const DEFAULT_SECRETS_SUBDIR: &str = ".config/daybook";
/// Values of `DAYBOOK_DUMP` that disable the debug dump.
pub const DUMP_DISABLED_VALUES: &[&str] = &["off", "0", "false", "none"];

// File System Parameters
/// Default database file name inside the data directory.
pub const DEFAULT_DB_FILENAME: &str = "daybook.db";
/// Default debug dump file name inside the data directory.
pub const DEFAULT_DUMP_FILENAME: &str = "database_query.txt";
/// Default POSIX permissions for newly created directories (owner read/write/execute).
#[cfg(unix)]
pub const DEFAULT_DIR_PERMISSIONS: u32 = 0o700;
/// Default POSIX permissions for newly created files (owner read/write).
#[cfg(unix)]
pub const DEFAULT_FILE_PERMISSIONS: u32 = 0o600;
/// Placeholder string for redacted information in debug output.
pub const REDACTED_PLACEHOLDER: &str = "[REDACTED]";

// Journal Entries
/// Category assigned when none is given.
pub const DEFAULT_CATEGORY: &str = "General";
/// Separator used when joining tags into the stored text.
pub const TAG_SEPARATOR: &str = ", ";

// Date/Time Logic
/// Date format string for ISO date format (YYYY-MM-DD).
pub const DATE_FORMAT_ISO: &str = "%Y-%m-%d";
/// Date format string for compact date format (YYYYMMDD).
pub const DATE_FORMAT_COMPACT: &str = "%Y%m%d";
/// Storage format for timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";
/// Human-readable date format used in exports ("October 18, 2026").
pub const DISPLAY_DATE_FORMAT: &str = "%B %d, %Y";
/// Human-readable timestamp format used by the CLI.
pub const DISPLAY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

// Access Gate
/// Minimum number of characters in a PIN.
pub const MIN_PIN_LENGTH: usize = 4;
/// Name of the secret holding the PIN digest.
pub const PIN_SECRET_NAME: &str = "pin";

// Logging Configuration
/// Service name used in tracing spans and structured logs.
pub const TRACING_SERVICE_NAME: &str = "daybook";
/// Name for the root tracing span covering an application invocation.
pub const TRACING_ROOT_SPAN_NAME: &str = "app_invocation";

/*!
# Daybook

Daybook is a PIN-protected personal journal. It keeps one entry per calendar
day, each tagged with a primary mood, up to two secondary moods, a category
and free-form tags, and can export entries to PDF.

## Architecture

- `journal_core`: Entry types, moods, word counting and the clock
- `db`: SQLite schema, entry queries and the debug dump renderer
- `store`: The entry store, the only writer of entries
- `auth`: PIN access gate, session state and secret storage
- `export`: PDF (and JSON) rendering of entries
- `audit`: Background writer of the debug dump
- `config`: Configuration loading and validation
- `cli`: Command-line interface handling using clap
- `ops`: User-facing operations wiring the above together
- `errors`: Error handling infrastructure

## Usage Example

```rust,no_run
use daybook::auth::{AccessGate, FileSecretStore, Session};
use daybook::db::Database;
use daybook::journal_core::{EntryDraft, Mood};
use daybook::store::EntryStore;
use daybook::Config;

fn main() -> daybook::AppResult<()> {
    let config = Config::load()?;
    config.validate()?;
    config.ensure_data_dir()?;

    let gate = AccessGate::new(FileSecretStore::new(&config.secrets_dir));
    let mut session = Session::new();
    if !gate.verify_pin(&mut session, "1234")? {
        return Ok(());
    }

    let store = EntryStore::new(Database::open(&config.db_path)?)?;
    store.add(EntryDraft::new("Monday", "Long walk by the river", Mood::Relaxed))?;
    Ok(())
}
```
*/

pub mod audit;
pub mod auth;
pub mod cli;
pub mod config;
pub mod constants;
pub mod db;
pub mod errors;
pub mod export;
pub mod journal_core;
pub mod ops;
pub mod store;

// Re-export important types for convenience
pub use cli::CliArgs;
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use journal_core::{EntryDraft, JournalEntry, Mood};
pub use store::EntryStore;

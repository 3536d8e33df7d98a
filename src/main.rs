/*!
# Daybook - A PIN-protected journal

Command-line front end. Parses arguments, sets up logging, loads
configuration, opens the database and runs one command.

## Usage

```
daybook [-v] [--log-format text|json] <COMMAND>

Commands:
  pin      Set, check or reset the PIN
  add      Write today's entry
  edit     Change an existing entry
  delete   Delete an entry
  show     Show one entry
  list     List entries, newest first
  export   Export entries to a PDF file
```

## Configuration

- `DAYBOOK_DIR`: Data directory (defaults to ~/.local/share/daybook)
- `DAYBOOK_DB`: Database file (defaults to `$DAYBOOK_DIR/daybook.db`)
- `DAYBOOK_SECRETS_DIR`: PIN digest directory (defaults to ~/.config/daybook)
- `DAYBOOK_DUMP`: Debug dump path, or `off`
- `DAYBOOK_PIN`: PIN to use instead of prompting
*/

use clap::Parser;
use daybook::auth::{AccessGate, FileSecretStore};
use daybook::cli::CliArgs;
use daybook::config::Config;
use daybook::constants::{
    DEFAULT_LOG_LEVEL, LOG_FORMAT_JSON, TRACING_ROOT_SPAN_NAME, TRACING_SERVICE_NAME,
};
use daybook::db::Database;
use daybook::errors::AppResult;
use daybook::ops::{App, TerminalPinReader};
use daybook::store::EntryStore;
use std::io;
use std::process::ExitCode;
use tracing::{debug, info, info_span};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

fn init_tracing(args: &CliArgs) {
    let default_level = if args.verbose { "debug" } else { DEFAULT_LOG_LEVEL };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Logs go to stderr so command output on stdout stays clean
    if args.log_format == LOG_FORMAT_JSON {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }
}

fn run(args: &CliArgs) -> AppResult<()> {
    debug!("CLI arguments: {:?}", args);

    let config = Config::load()?;
    config.validate()?;
    config.ensure_data_dir()?;
    debug!("Configuration loaded: {:?}", config);

    let db = Database::open(&config.db_path)?;
    let mut store = EntryStore::new(db)?;
    if let Some(dump_path) = &config.dump_path {
        store = store.with_audit_dump(dump_path.clone())?;
    }

    let gate = AccessGate::new(FileSecretStore::new(&config.secrets_dir));
    let mut app = App::new(store, gate, Box::new(TerminalPinReader));

    let stdin = io::stdin();
    let stdout = io::stdout();
    app.run(&args.command, &mut stdin.lock(), &mut stdout.lock())
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(&args);

    let correlation_id = Uuid::new_v4().to_string();
    let root_span = info_span!(
        TRACING_ROOT_SPAN_NAME,
        service_name = TRACING_SERVICE_NAME,
        correlation_id = %correlation_id
    );
    let _guard = root_span.enter();

    info!("Starting daybook");
    match run(&args) {
        Ok(()) => {
            info!("Done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

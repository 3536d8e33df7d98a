//! Database operations for journal entries.
//!
//! This module provides SQLite storage for journal entries. It uses connection
//! pooling via r2d2 so the background dump worker can read the table on its
//! own connection while the store keeps writing.
//!
//! # Module Structure
//!
//! - `schema`: Table definitions and schema initialization
//! - `entries`: Entry CRUD and filter queries
//! - `dump`: Plain-text rendering of the schema and rows
//!
//! # Example
//!
//! ```no_run
//! use daybook::db::Database;
//! use std::path::Path;
//!
//! let db = Database::open(Path::new("/tmp/daybook.db"))?;
//! db.initialize_schema()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod dump;
pub mod entries;
pub mod schema;

use crate::errors::{AppResult, DatabaseError};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Type alias for a pooled SQLite connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Database handle with connection pooling.
///
/// Cloning is cheap and shares the underlying pool.
#[derive(Clone)]
pub struct Database {
    pool: Pool<SqliteConnectionManager>,
}

impl Database {
    /// Opens or creates a SQLite database.
    ///
    /// If the database file doesn't exist, it will be created.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Database file cannot be opened
    /// - The file is not a SQLite database
    /// - Connection pool cannot be initialized
    pub fn open(db_path: &Path) -> AppResult<Self> {
        debug!("Opening database at: {:?}", db_path);

        let manager = SqliteConnectionManager::file(db_path);
        let pool = Pool::builder()
            .max_size(4)
            .connection_customizer(Box::new(ConnectionConfig))
            .build(manager)
            .map_err(DatabaseError::Pool)?;

        // Fail early on a file that is not a database
        let conn = pool.get().map_err(DatabaseError::Pool)?;
        conn.query_row("PRAGMA schema_version", [], |row| row.get::<_, i64>(0))
            .map_err(DatabaseError::Sqlite)?;
        drop(conn);

        info!("Database opened successfully");
        Ok(Database { pool })
    }

    /// Gets a connection from the pool.
    ///
    /// # Errors
    ///
    /// Returns an error if no connection is available or the pool is exhausted.
    pub fn get_conn(&self) -> AppResult<PooledConnection> {
        self.pool
            .get()
            .map_err(|e| DatabaseError::Pool(e).into())
    }

    /// Initializes the database schema.
    ///
    /// Creates all necessary tables and indexes if they don't exist.
    /// This is idempotent and safe to call multiple times.
    pub fn initialize_schema(&self) -> AppResult<()> {
        let conn = self.get_conn()?;
        schema::create_tables(&conn)?;
        info!("Database schema initialized");
        Ok(())
    }
}

/// Per-connection settings applied when the pool hands out a connection.
#[derive(Debug)]
struct ConnectionConfig;

impl r2d2::CustomizeConnection<Connection, rusqlite::Error> for ConnectionConfig {
    fn on_acquire(&self, conn: &mut Connection) -> Result<(), rusqlite::Error> {
        // The dump worker reads while the store writes
        conn.busy_timeout(Duration::from_secs(5))
    }

    fn on_release(&self, _conn: Connection) {}
}

//! Plain-text rendering of the entries table.
//!
//! Produces the same shape as running `sqlite3 <db> ".schema entries"`
//! followed by `sqlite3 <db> "SELECT * FROM entries;"`: the DDL statements,
//! then one line per row with `|` between columns and NULL shown as nothing.

use crate::db::schema::ENTRIES_TABLE;
use crate::errors::{AppResult, DatabaseError};
use rusqlite::types::ValueRef;
use rusqlite::Connection;

/// Renders the schema and all rows of the entries table.
pub fn render_entries_dump(conn: &Connection) -> AppResult<String> {
    let mut out = String::new();

    let mut schema_stmt = conn
        .prepare(
            "SELECT sql FROM sqlite_master
             WHERE tbl_name = ?1 AND sql IS NOT NULL
             ORDER BY CASE type WHEN 'table' THEN 0 ELSE 1 END, name",
        )
        .map_err(DatabaseError::Sqlite)?;
    let statements = schema_stmt
        .query_map([ENTRIES_TABLE], |row| row.get::<_, String>(0))
        .map_err(DatabaseError::Sqlite)?;
    for statement in statements {
        let statement = statement.map_err(DatabaseError::Sqlite)?;
        out.push_str(statement.trim());
        out.push_str(";\n");
    }

    let mut rows_stmt = conn
        .prepare("SELECT * FROM entries ORDER BY id")
        .map_err(DatabaseError::Sqlite)?;
    let column_count = rows_stmt.column_count();
    let mut rows = rows_stmt.query([]).map_err(DatabaseError::Sqlite)?;
    while let Some(row) = rows.next().map_err(DatabaseError::Sqlite)? {
        for idx in 0..column_count {
            if idx > 0 {
                out.push('|');
            }
            match row.get_ref(idx).map_err(DatabaseError::Sqlite)? {
                ValueRef::Null => {}
                ValueRef::Integer(value) => {
                    out.push_str(&value.to_string());
                }
                ValueRef::Real(value) => {
                    out.push_str(&value.to_string());
                }
                ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
                    out.push_str(&String::from_utf8_lossy(bytes));
                }
            }
        }
        out.push('\n');
    }

    Ok(out)
}

//! Entry CRUD operations.
//!
//! This module provides functions for creating, reading, updating, deleting
//! and filtering journal entries in the database. Callers are expected to pass
//! validated drafts; stamping dates and the word count is the store's job.

use crate::constants::{DATE_FORMAT_ISO, TIMESTAMP_FORMAT};
use crate::errors::{AppError, AppResult, DatabaseError};
use crate::journal_core::{EntryDraft, JournalEntry, Mood};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::str::FromStr;
use tracing::debug;

const ENTRY_COLUMNS: &str = "id, title, content, created_date, modified_date, primary_mood, \
     secondary_mood1, secondary_mood2, category, tags, entry_date, word_count";

/// Inserts a new entry and returns its id.
///
/// # Errors
///
/// Returns `DatabaseError::ConstraintViolation` if an entry already exists
/// for `entry_date`.
pub fn insert_entry(
    conn: &Connection,
    draft: &EntryDraft,
    entry_date: NaiveDate,
    created_date: NaiveDateTime,
    word_count: usize,
) -> AppResult<i64> {
    debug!("Inserting entry for date {}", entry_date);

    conn.execute(
        r#"
        INSERT INTO entries (
            title, content, created_date, modified_date, primary_mood,
            secondary_mood1, secondary_mood2, category, tags, entry_date, word_count
        )
        VALUES (?1, ?2, ?3, NULL, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        "#,
        params![
            draft.title,
            draft.content,
            format_timestamp(created_date),
            draft.primary_mood.as_str(),
            draft.secondary_mood1.map(|m| m.as_str()),
            draft.secondary_mood2.map(|m| m.as_str()),
            draft.category,
            draft.tags,
            format_date(entry_date),
            word_count as i64
        ],
    )
    .map_err(|e| map_write_error(e, entry_date))?;

    let entry_id = conn.last_insert_rowid();
    debug!("Entry inserted with id {}", entry_id);
    Ok(entry_id)
}

/// Overwrites the editable fields of an entry.
///
/// `id`, `entry_date` and `created_date` are never written here.
///
/// # Errors
///
/// Returns `DatabaseError::NotFound` if no entry has the given id.
pub fn update_entry(
    conn: &Connection,
    entry_id: i64,
    draft: &EntryDraft,
    modified_date: NaiveDateTime,
    word_count: usize,
) -> AppResult<()> {
    debug!("Updating entry {}", entry_id);

    let rows_affected = conn
        .execute(
            r#"
            UPDATE entries SET
                title = ?1,
                content = ?2,
                modified_date = ?3,
                primary_mood = ?4,
                secondary_mood1 = ?5,
                secondary_mood2 = ?6,
                category = ?7,
                tags = ?8,
                word_count = ?9
            WHERE id = ?10
            "#,
            params![
                draft.title,
                draft.content,
                format_timestamp(modified_date),
                draft.primary_mood.as_str(),
                draft.secondary_mood1.map(|m| m.as_str()),
                draft.secondary_mood2.map(|m| m.as_str()),
                draft.category,
                draft.tags,
                word_count as i64,
                entry_id
            ],
        )
        .map_err(DatabaseError::Sqlite)?;

    if rows_affected == 0 {
        return Err(
            DatabaseError::NotFound(format!("Entry with id {} not found", entry_id)).into(),
        );
    }

    Ok(())
}

/// Deletes an entry. Returns whether a row was removed.
pub fn delete_entry(conn: &Connection, entry_id: i64) -> AppResult<bool> {
    debug!("Deleting entry {}", entry_id);

    let rows_affected = conn
        .execute("DELETE FROM entries WHERE id = ?1", params![entry_id])
        .map_err(DatabaseError::Sqlite)?;

    Ok(rows_affected > 0)
}

/// Retrieves an entry by id.
///
/// Returns `Ok(None)` if no entry has the given id.
pub fn get_entry(conn: &Connection, entry_id: i64) -> AppResult<Option<JournalEntry>> {
    debug!("Getting entry {}", entry_id);

    let sql = format!("SELECT {} FROM entries WHERE id = ?1", ENTRY_COLUMNS);
    conn.query_row(&sql, params![entry_id], entry_from_row)
        .optional()
        .map_err(|e| DatabaseError::Sqlite(e).into())
}

/// Retrieves the entry for a calendar day.
///
/// Returns `Ok(None)` if no entry exists for the given date.
pub fn get_entry_by_date(conn: &Connection, date: NaiveDate) -> AppResult<Option<JournalEntry>> {
    debug!("Getting entry for date {}", date);

    let sql = format!("SELECT {} FROM entries WHERE entry_date = ?1", ENTRY_COLUMNS);
    conn.query_row(&sql, params![format_date(date)], entry_from_row)
        .optional()
        .map_err(|e| DatabaseError::Sqlite(e).into())
}

/// Checks whether an entry exists for a calendar day.
pub fn entry_exists_for_date(conn: &Connection, date: NaiveDate) -> AppResult<bool> {
    let exists: bool = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM entries WHERE entry_date = ?1)",
            params![format_date(date)],
            |row| row.get(0),
        )
        .map_err(DatabaseError::Sqlite)?;
    Ok(exists)
}

/// All entries, newest entry date first.
pub fn list_entries(conn: &Connection) -> AppResult<Vec<JournalEntry>> {
    query_entries(conn, "1 = 1", [])
}

/// Entries whose title or content contains `text`, ignoring case.
pub fn search_entries(conn: &Connection, text: &str) -> AppResult<Vec<JournalEntry>> {
    debug!("Searching entries");

    // SQLite's lower() only folds ASCII, so matching happens here
    let needle = text.to_lowercase();
    Ok(list_entries(conn)?
        .into_iter()
        .filter(|entry| {
            entry.title.to_lowercase().contains(&needle)
                || entry.content.to_lowercase().contains(&needle)
        })
        .collect())
}

/// Entries with `start <= entry_date <= end`.
pub fn entries_in_range(
    conn: &Connection,
    start: NaiveDate,
    end: NaiveDate,
) -> AppResult<Vec<JournalEntry>> {
    debug!("Filtering entries from {} to {}", start, end);
    query_entries(
        conn,
        "entry_date >= ?1 AND entry_date <= ?2",
        [format_date(start), format_date(end)],
    )
}

/// Entries whose primary mood is `mood`.
pub fn entries_with_mood(conn: &Connection, mood: Mood) -> AppResult<Vec<JournalEntry>> {
    debug!("Filtering entries by mood {}", mood);
    query_entries(conn, "primary_mood = ?1", [mood.as_str().to_string()])
}

/// Entries whose raw tags text contains `tag` as a substring.
///
/// This is a plain case-sensitive substring test on the stored text, so
/// `"art"` also matches an entry tagged `"cart"`.
pub fn entries_with_tag(conn: &Connection, tag: &str) -> AppResult<Vec<JournalEntry>> {
    debug!("Filtering entries by tag");
    query_entries(conn, "instr(tags, ?1) > 0", [tag.to_string()])
}

fn query_entries<const N: usize>(
    conn: &Connection,
    condition: &str,
    args: [String; N],
) -> AppResult<Vec<JournalEntry>> {
    let sql = format!(
        "SELECT {} FROM entries WHERE {} ORDER BY entry_date DESC",
        ENTRY_COLUMNS, condition
    );
    let mut stmt = conn.prepare(&sql).map_err(DatabaseError::Sqlite)?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(args.iter()), entry_from_row)
        .map_err(DatabaseError::Sqlite)?;

    let mut entries = Vec::new();
    for row in rows {
        entries.push(row.map_err(DatabaseError::Sqlite)?);
    }
    Ok(entries)
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<JournalEntry> {
    Ok(JournalEntry {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        created_date: parse_column(3, &row.get::<_, String>(3)?, parse_timestamp)?,
        modified_date: row
            .get::<_, Option<String>>(4)?
            .map(|value| parse_column(4, &value, parse_timestamp))
            .transpose()?,
        primary_mood: parse_column(5, &row.get::<_, String>(5)?, parse_mood)?,
        secondary_mood1: row
            .get::<_, Option<String>>(6)?
            .map(|value| parse_column(6, &value, parse_mood))
            .transpose()?,
        secondary_mood2: row
            .get::<_, Option<String>>(7)?
            .map(|value| parse_column(7, &value, parse_mood))
            .transpose()?,
        category: row.get(8)?,
        tags: row.get(9)?,
        entry_date: parse_column(10, &row.get::<_, String>(10)?, parse_date_column)?,
        word_count: row.get::<_, i64>(11)? as usize,
    })
}

fn parse_column<T>(
    idx: usize,
    value: &str,
    parse: fn(&str) -> Result<T, String>,
) -> rusqlite::Result<T> {
    parse(value).map_err(|msg| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, msg.into()))
}

fn parse_timestamp(value: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|e| e.to_string())
}

fn parse_date_column(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, DATE_FORMAT_ISO).map_err(|e| e.to_string())
}

fn parse_mood(value: &str) -> Result<Mood, String> {
    Mood::from_str(value).map_err(|e| e.to_string())
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT_ISO).to_string()
}

fn format_timestamp(timestamp: NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

fn map_write_error(err: rusqlite::Error, entry_date: NaiveDate) -> AppError {
    match err {
        rusqlite::Error::SqliteFailure(ref failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            DatabaseError::ConstraintViolation(format!(
                "An entry already exists for {}. Only one entry per day is allowed.",
                entry_date
            ))
            .into()
        }
        other => DatabaseError::Sqlite(other).into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn setup_test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::schema::create_tables(&conn).unwrap();
        conn
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn at(d: u32, hour: u32) -> NaiveDateTime {
        day(d).and_hms_micro_opt(hour, 15, 30, 250).unwrap()
    }

    fn insert(conn: &Connection, d: u32, draft: &EntryDraft) -> i64 {
        insert_entry(conn, draft, day(d), at(d, 9), draft.word_count()).unwrap()
    }

    #[test]
    fn test_insert_and_get_entry() {
        let conn = setup_test_db();
        let mut draft = EntryDraft::new("First", "hello there world", Mood::Happy);
        draft.secondary_mood2 = Some(Mood::Relaxed);
        draft.tags = "work, art".to_string();

        let entry_id = insert(&conn, 15, &draft);
        assert!(entry_id > 0);

        let entry = get_entry(&conn, entry_id).unwrap().unwrap();
        assert_eq!(entry.id, entry_id);
        assert_eq!(entry.title, "First");
        assert_eq!(entry.content, "hello there world");
        assert_eq!(entry.created_date, at(15, 9));
        assert_eq!(entry.modified_date, None);
        assert_eq!(entry.primary_mood, Mood::Happy);
        assert_eq!(entry.secondary_mood1, None);
        assert_eq!(entry.secondary_mood2, Some(Mood::Relaxed));
        assert_eq!(entry.category, "General");
        assert_eq!(entry.tags, "work, art");
        assert_eq!(entry.entry_date, day(15));
        assert_eq!(entry.word_count, 3);
    }

    #[test]
    fn test_insert_same_day_is_constraint_violation() {
        let conn = setup_test_db();
        let draft = EntryDraft::new("One", "a", Mood::Happy);
        insert(&conn, 15, &draft);

        let err = insert_entry(&conn, &draft, day(15), at(15, 20), 1).unwrap_err();
        assert!(err.is_constraint_violation(), "got {:?}", err);

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_update_entry_overwrites_editable_fields() {
        let conn = setup_test_db();
        let entry_id = insert(&conn, 15, &EntryDraft::new("Old", "a b", Mood::Sad));

        let mut changed = EntryDraft::new("New", "a b c d", Mood::Confident);
        changed.secondary_mood1 = Some(Mood::Happy);
        changed.category = "Work".to_string();
        changed.tags = "focus".to_string();
        update_entry(&conn, entry_id, &changed, at(16, 8), 4).unwrap();

        let entry = get_entry(&conn, entry_id).unwrap().unwrap();
        assert_eq!(entry.title, "New");
        assert_eq!(entry.word_count, 4);
        assert_eq!(entry.primary_mood, Mood::Confident);
        assert_eq!(entry.secondary_mood1, Some(Mood::Happy));
        assert_eq!(entry.category, "Work");
        assert_eq!(entry.tags, "focus");
        assert_eq!(entry.modified_date, Some(at(16, 8)));
        assert_eq!(entry.entry_date, day(15));
        assert_eq!(entry.created_date, at(15, 9));
    }

    #[test]
    fn test_update_entry_not_found() {
        let conn = setup_test_db();
        let draft = EntryDraft::new("t", "c", Mood::Happy);

        let err = update_entry(&conn, 999, &draft, at(15, 9), 1).unwrap_err();
        assert!(err.is_not_found());

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_delete_entry() {
        let conn = setup_test_db();
        let entry_id = insert(&conn, 15, &EntryDraft::new("t", "c", Mood::Happy));

        assert!(delete_entry(&conn, entry_id).unwrap());
        assert!(get_entry(&conn, entry_id).unwrap().is_none());
        assert!(!delete_entry(&conn, entry_id).unwrap());
    }

    #[test]
    fn test_get_entry_by_date() {
        let conn = setup_test_db();
        assert!(get_entry_by_date(&conn, day(15)).unwrap().is_none());
        assert!(!entry_exists_for_date(&conn, day(15)).unwrap());

        let entry_id = insert(&conn, 15, &EntryDraft::new("t", "c", Mood::Happy));
        let entry = get_entry_by_date(&conn, day(15)).unwrap().unwrap();
        assert_eq!(entry.id, entry_id);
        assert!(entry_exists_for_date(&conn, day(15)).unwrap());
    }

    #[test]
    fn test_list_entries_newest_first() {
        let conn = setup_test_db();
        insert(&conn, 10, &EntryDraft::new("ten", "c", Mood::Happy));
        insert(&conn, 12, &EntryDraft::new("twelve", "c", Mood::Happy));
        insert(&conn, 11, &EntryDraft::new("eleven", "c", Mood::Happy));

        let titles: Vec<String> = list_entries(&conn)
            .unwrap()
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(titles, vec!["twelve", "eleven", "ten"]);
    }

    #[test]
    fn test_search_entries_case_insensitive() {
        let conn = setup_test_db();
        insert(&conn, 10, &EntryDraft::new("Morning RUN", "legs tired", Mood::Happy));
        insert(&conn, 11, &EntryDraft::new("Quiet day", "went for a run", Mood::Relaxed));
        insert(&conn, 12, &EntryDraft::new("Café", "ÉCLAIR at noon", Mood::Happy));
        insert(&conn, 13, &EntryDraft::new("Nothing", "here", Mood::Neutral));

        let found: Vec<NaiveDate> = search_entries(&conn, "run")
            .unwrap()
            .into_iter()
            .map(|e| e.entry_date)
            .collect();
        assert_eq!(found, vec![day(11), day(10)]);

        let unicode = search_entries(&conn, "éclair").unwrap();
        assert_eq!(unicode.len(), 1);
        assert_eq!(unicode[0].entry_date, day(12));
    }

    #[test]
    fn test_entries_in_range_inclusive() {
        let conn = setup_test_db();
        for d in 10..=14 {
            insert(&conn, d, &EntryDraft::new("t", "c", Mood::Happy));
        }

        let dates: Vec<NaiveDate> = entries_in_range(&conn, day(11), day(13))
            .unwrap()
            .into_iter()
            .map(|e| e.entry_date)
            .collect();
        assert_eq!(dates, vec![day(13), day(12), day(11)]);

        assert!(entries_in_range(&conn, day(13), day(11)).unwrap().is_empty());
    }

    #[test]
    fn test_entries_with_mood_exact_primary_match() {
        let conn = setup_test_db();
        insert(&conn, 10, &EntryDraft::new("t", "c", Mood::Sad));
        let mut secondary_sad = EntryDraft::new("t", "c", Mood::Happy);
        secondary_sad.secondary_mood1 = Some(Mood::Sad);
        insert(&conn, 11, &secondary_sad);
        insert(&conn, 12, &EntryDraft::new("t", "c", Mood::Sad));

        let entries = entries_with_mood(&conn, Mood::Sad).unwrap();
        let dates: Vec<NaiveDate> = entries.iter().map(|e| e.entry_date).collect();
        assert_eq!(dates, vec![day(12), day(10)]);
        assert!(entries.iter().all(|e| e.primary_mood == Mood::Sad));
    }

    #[test]
    fn test_entries_with_tag_is_raw_substring() {
        let conn = setup_test_db();
        let mut cart = EntryDraft::new("t", "c", Mood::Happy);
        cart.tags = "shopping, cart".to_string();
        insert(&conn, 10, &cart);
        let mut art = EntryDraft::new("t", "c", Mood::Happy);
        art.tags = "art".to_string();
        insert(&conn, 11, &art);
        let mut upper = EntryDraft::new("t", "c", Mood::Happy);
        upper.tags = "ART".to_string();
        insert(&conn, 12, &upper);

        let dates: Vec<NaiveDate> = entries_with_tag(&conn, "art")
            .unwrap()
            .into_iter()
            .map(|e| e.entry_date)
            .collect();
        assert_eq!(dates, vec![day(11), day(10)]);
    }

    #[test]
    fn test_corrupt_mood_surfaces_as_error() {
        let conn = setup_test_db();
        conn.execute(
            "INSERT INTO entries (title, content, created_date, primary_mood, entry_date)
             VALUES ('t', 'c', '2024-01-15 10:00:00.000000', 'Elated', '2024-01-15')",
            [],
        )
        .unwrap();

        assert!(list_entries(&conn).is_err());
    }
}

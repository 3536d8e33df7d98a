//! The journal entry store.
//!
//! `EntryStore` is the only way entries are created, changed or removed. It
//! validates drafts, stamps the entry date and timestamps from its clock,
//! derives the word count, and hands the SQL to [`crate::db::entries`]. After
//! each successful mutation it asks the audit dumper for a fresh debug dump.
//!
//! # Example
//!
//! ```no_run
//! use daybook::db::Database;
//! use daybook::journal_core::{EntryDraft, Mood};
//! use daybook::store::EntryStore;
//! use std::path::Path;
//!
//! let db = Database::open(Path::new("/tmp/daybook.db"))?;
//! let store = EntryStore::new(db)?;
//! let entry = store.add(EntryDraft::new("Monday", "Long walk by the river", Mood::Relaxed))?;
//! assert_eq!(entry.word_count, 5);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::audit::AuditDumper;
use crate::db::{entries, Database};
use crate::errors::{AppResult, DatabaseError};
use crate::journal_core::{word_count, Clock, EntryDraft, JournalEntry, Mood, SystemClock};
use chrono::{NaiveDate, NaiveDateTime, SubsecRound};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Persistent store of journal entries, one per calendar day.
pub struct EntryStore {
    db: Database,
    clock: Arc<dyn Clock>,
    audit: Option<AuditDumper>,
}

impl EntryStore {
    /// Creates a store on `db` using the system clock, initializing the schema.
    pub fn new(db: Database) -> AppResult<Self> {
        Self::with_clock(db, Arc::new(SystemClock))
    }

    /// Creates a store with an explicit clock.
    pub fn with_clock(db: Database, clock: Arc<dyn Clock>) -> AppResult<Self> {
        db.initialize_schema()?;
        Ok(Self {
            db,
            clock,
            audit: None,
        })
    }

    /// Enables the debug dump, written to `path` after every mutation.
    pub fn with_audit_dump(mut self, path: PathBuf) -> AppResult<Self> {
        self.audit = Some(AuditDumper::spawn(self.db.clone(), path)?);
        Ok(self)
    }

    /// Creates today's entry.
    ///
    /// The entry date is always today and the creation time is always now,
    /// according to the store's clock.
    ///
    /// # Errors
    ///
    /// - `AppError::InvalidInput` if the title or content is blank
    /// - `DatabaseError::ConstraintViolation` if today already has an entry
    pub fn add(&self, draft: EntryDraft) -> AppResult<JournalEntry> {
        let draft = draft.validate()?;
        let now = self.stored_now();
        let entry_date = now.date();
        let words = word_count(&draft.content);

        let conn = self.db.get_conn()?;
        let entry_id = entries::insert_entry(&conn, &draft, entry_date, now, words)?;
        drop(conn);

        info!("Created entry {} for {}", entry_id, entry_date);
        self.notify_audit();

        Ok(JournalEntry {
            id: entry_id,
            title: draft.title,
            content: draft.content,
            created_date: now,
            modified_date: None,
            primary_mood: draft.primary_mood,
            secondary_mood1: draft.secondary_mood1,
            secondary_mood2: draft.secondary_mood2,
            category: draft.category,
            tags: draft.tags,
            entry_date,
            word_count: words,
        })
    }

    /// Overwrites the editable fields of an existing entry.
    ///
    /// # Errors
    ///
    /// - `AppError::InvalidInput` if the title or content is blank
    /// - `DatabaseError::NotFound` if no entry has `entry_id`
    pub fn update(&self, entry_id: i64, draft: EntryDraft) -> AppResult<JournalEntry> {
        let draft = draft.validate()?;
        let now = self.stored_now();
        let words = word_count(&draft.content);

        let mut conn = self.db.get_conn()?;
        let tx = conn.transaction()?;
        entries::update_entry(&tx, entry_id, &draft, now, words)?;
        let updated = entries::get_entry(&tx, entry_id)?;
        tx.commit()?;
        drop(conn);

        info!("Updated entry {}", entry_id);
        self.notify_audit();

        updated.ok_or_else(|| {
            DatabaseError::NotFound(format!("Entry with id {} not found", entry_id)).into()
        })
    }

    /// Deletes an entry if it exists.
    ///
    /// Deleting a missing entry is not an error; the return value says
    /// whether anything was removed.
    pub fn delete(&self, entry_id: i64) -> AppResult<bool> {
        let conn = self.db.get_conn()?;
        let removed = entries::delete_entry(&conn, entry_id)?;
        drop(conn);

        if removed {
            info!("Deleted entry {}", entry_id);
            self.notify_audit();
        } else {
            debug!("Entry {} did not exist; nothing deleted", entry_id);
        }
        Ok(removed)
    }

    pub fn get_by_id(&self, entry_id: i64) -> AppResult<Option<JournalEntry>> {
        entries::get_entry(&*self.db.get_conn()?, entry_id)
    }

    pub fn get_by_date(&self, date: NaiveDate) -> AppResult<Option<JournalEntry>> {
        entries::get_entry_by_date(&*self.db.get_conn()?, date)
    }

    /// Today's entry, if one has been written.
    pub fn get_today(&self) -> AppResult<Option<JournalEntry>> {
        self.get_by_date(self.clock.today())
    }

    pub fn has_entry_for(&self, date: NaiveDate) -> AppResult<bool> {
        entries::entry_exists_for_date(&*self.db.get_conn()?, date)
    }

    /// All entries, newest entry date first.
    pub fn list_all(&self) -> AppResult<Vec<JournalEntry>> {
        entries::list_entries(&*self.db.get_conn()?)
    }

    /// Entries whose title or content contains `text`, ignoring case.
    pub fn search(&self, text: &str) -> AppResult<Vec<JournalEntry>> {
        entries::search_entries(&*self.db.get_conn()?, text)
    }

    /// Entries dated between `start` and `end`, both inclusive.
    pub fn filter_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<JournalEntry>> {
        entries::entries_in_range(&*self.db.get_conn()?, start, end)
    }

    /// Entries whose primary mood is `mood`.
    pub fn filter_by_mood(&self, mood: Mood) -> AppResult<Vec<JournalEntry>> {
        entries::entries_with_mood(&*self.db.get_conn()?, mood)
    }

    /// Entries whose tags text contains `tag` anywhere, including inside a
    /// longer tag.
    pub fn filter_by_tag(&self, tag: &str) -> AppResult<Vec<JournalEntry>> {
        entries::entries_with_tag(&*self.db.get_conn()?, tag)
    }

    /// Today's date according to the store's clock.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    // Timestamps are stored with microsecond precision
    fn stored_now(&self) -> NaiveDateTime {
        self.clock.now().trunc_subsecs(6)
    }

    fn notify_audit(&self) {
        if let Some(audit) = &self.audit {
            audit.notify();
        }
    }
}

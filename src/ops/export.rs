//! Writing PDF exports to disk.

use crate::auth::Session;
use crate::errors::{AppResult, DatabaseError};
use crate::export::{render_entries, render_entry};
use crate::ops::entries::{entry_by_id, find_entries, EntryQuery};
use crate::store::EntryStore;
use std::fs;
use std::path::Path;
use tracing::info;

/// What to export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportSelection {
    /// One entry, no cover page
    Single(i64),
    /// Every entry matching the query, behind a cover page
    Matching(EntryQuery),
}

/// Renders the selection to `output` and returns how many entries it holds.
///
/// # Errors
///
/// `DatabaseError::NotFound` when a single entry is requested and does not
/// exist. Nothing is written in that case.
pub fn export_to_pdf(
    store: &EntryStore,
    session: &Session,
    selection: &ExportSelection,
    output: &Path,
) -> AppResult<usize> {
    let (bytes, count) = match selection {
        ExportSelection::Single(entry_id) => {
            let entry = entry_by_id(store, session, *entry_id)?.ok_or_else(|| {
                DatabaseError::NotFound(format!("Entry with id {} not found", entry_id))
            })?;
            (render_entry(&entry)?, 1)
        }
        ExportSelection::Matching(query) => {
            let entries = find_entries(store, session, query)?;
            (render_entries(&entries)?, entries.len())
        }
    };

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(output, bytes)?;
    info!("Exported {} entries to {:?}", count, output);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AccessGate, MemorySecretStore};
    use crate::db::Database;
    use crate::journal_core::{EntryDraft, Mood};
    use lopdf::Document;
    use tempfile::TempDir;

    #[test]
    fn test_export_single_and_all() {
        let dir = TempDir::new().unwrap();
        let store = EntryStore::new(Database::open(&dir.path().join("daybook.db")).unwrap())
            .unwrap();
        let mut session = Session::new();
        AccessGate::new(MemorySecretStore::new())
            .set_pin(&mut session, "1234")
            .unwrap();
        let entry = store
            .add(EntryDraft::new("Only", "one entry today", Mood::Happy))
            .unwrap();

        let single = dir.path().join("out").join("single.pdf");
        let count =
            export_to_pdf(&store, &session, &ExportSelection::Single(entry.id), &single).unwrap();
        assert_eq!(count, 1);
        assert_eq!(Document::load(&single).unwrap().get_pages().len(), 1);

        let all = dir.path().join("all.pdf");
        let count = export_to_pdf(
            &store,
            &session,
            &ExportSelection::Matching(EntryQuery::All),
            &all,
        )
        .unwrap();
        assert_eq!(count, 1);
        assert_eq!(Document::load(&all).unwrap().get_pages().len(), 2);
    }

    #[test]
    fn test_export_missing_entry_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let store = EntryStore::new(Database::open(&dir.path().join("daybook.db")).unwrap())
            .unwrap();
        let mut session = Session::new();
        AccessGate::new(MemorySecretStore::new())
            .set_pin(&mut session, "1234")
            .unwrap();

        let output = dir.path().join("missing.pdf");
        let err = export_to_pdf(&store, &session, &ExportSelection::Single(5), &output)
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(!output.exists());
    }
}

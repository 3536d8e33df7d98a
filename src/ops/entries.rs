//! Entry commands: add, edit, delete, show and list.
//!
//! Every function here checks the session before touching the store.

use crate::auth::Session;
use crate::cli::{AddArgs, EditArgs, FilterArgs};
use crate::errors::{AppError, AppResult, DatabaseError};
use crate::journal_core::{join_tags, EntryDraft, JournalEntry, Mood};
use crate::store::EntryStore;
use chrono::NaiveDate;
use std::io::Read;
use tracing::debug;

/// Which entries a `list` or `export` covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryQuery {
    All,
    Search(String),
    Mood(Mood),
    Tag(String),
    Range(NaiveDate, NaiveDate),
}

impl From<&FilterArgs> for EntryQuery {
    fn from(filter: &FilterArgs) -> Self {
        if let Some(text) = &filter.search {
            EntryQuery::Search(text.clone())
        } else if let Some(mood) = filter.mood {
            EntryQuery::Mood(mood)
        } else if let Some(tag) = &filter.tag {
            EntryQuery::Tag(tag.clone())
        } else if let (Some(from), Some(to)) = (filter.from, filter.to) {
            EntryQuery::Range(from, to)
        } else {
            EntryQuery::All
        }
    }
}

fn secondary_slots(moods: &[Mood]) -> AppResult<(Option<Mood>, Option<Mood>)> {
    if moods.len() > 2 {
        return Err(AppError::InvalidInput(
            "At most two secondary moods are allowed".to_string(),
        ));
    }
    Ok((moods.first().copied(), moods.get(1).copied()))
}

/// Creates today's entry. Content comes from `--content` or, failing that,
/// all of `input`.
pub fn add_entry(
    store: &EntryStore,
    session: &Session,
    args: &AddArgs,
    input: &mut dyn Read,
) -> AppResult<JournalEntry> {
    session.require_unlocked()?;

    // Refuse before stdin is consumed
    let today = store.today();
    if store.has_entry_for(today)? {
        return Err(DatabaseError::ConstraintViolation(format!(
            "An entry for {} already exists; use `daybook edit` to change it",
            today
        ))
        .into());
    }

    let content = match &args.content {
        Some(content) => content.clone(),
        None => {
            debug!("Reading entry content from stdin");
            let mut buffer = String::new();
            input.read_to_string(&mut buffer)?;
            buffer
        }
    };

    let (secondary_mood1, secondary_mood2) = secondary_slots(&args.secondary)?;
    let mut draft = EntryDraft::new(args.title.as_str(), content, args.mood);
    draft.secondary_mood1 = secondary_mood1;
    draft.secondary_mood2 = secondary_mood2;
    if let Some(category) = &args.category {
        draft.category = category.clone();
    }
    draft.tags = join_tags(&args.tags);

    store.add(draft)
}

/// Applies the given changes to an existing entry. Unset options keep their
/// current value.
pub fn edit_entry(
    store: &EntryStore,
    session: &Session,
    args: &EditArgs,
) -> AppResult<JournalEntry> {
    session.require_unlocked()?;

    let existing = store.get_by_id(args.id)?.ok_or_else(|| {
        AppError::from(DatabaseError::NotFound(format!(
            "Entry with id {} not found",
            args.id
        )))
    })?;
    let mut draft = existing.to_draft();

    if let Some(title) = &args.title {
        draft.title = title.clone();
    }
    if let Some(content) = &args.content {
        draft.content = content.clone();
    }
    if let Some(mood) = args.mood {
        draft.primary_mood = mood;
    }
    if args.clear_secondary {
        draft.secondary_mood1 = None;
        draft.secondary_mood2 = None;
    } else if !args.secondary.is_empty() {
        let (first, second) = secondary_slots(&args.secondary)?;
        draft.secondary_mood1 = first;
        draft.secondary_mood2 = second;
    }
    if let Some(category) = &args.category {
        draft.category = category.clone();
    }
    if !args.tags.is_empty() {
        draft.tags = join_tags(&args.tags);
    }

    store.update(args.id, draft)
}

/// Deletes an entry. Returns whether it existed.
pub fn delete_entry(store: &EntryStore, session: &Session, entry_id: i64) -> AppResult<bool> {
    session.require_unlocked()?;
    store.delete(entry_id)
}

pub fn entry_by_id(
    store: &EntryStore,
    session: &Session,
    entry_id: i64,
) -> AppResult<Option<JournalEntry>> {
    session.require_unlocked()?;
    store.get_by_id(entry_id)
}

pub fn today_entry(store: &EntryStore, session: &Session) -> AppResult<Option<JournalEntry>> {
    session.require_unlocked()?;
    store.get_today()
}

pub fn entry_by_date(
    store: &EntryStore,
    session: &Session,
    date: NaiveDate,
) -> AppResult<Option<JournalEntry>> {
    session.require_unlocked()?;
    store.get_by_date(date)
}

/// Runs `query` against the store, newest entry date first.
pub fn find_entries(
    store: &EntryStore,
    session: &Session,
    query: &EntryQuery,
) -> AppResult<Vec<JournalEntry>> {
    session.require_unlocked()?;
    match query {
        EntryQuery::All => store.list_all(),
        EntryQuery::Search(text) => store.search(text),
        EntryQuery::Mood(mood) => store.filter_by_mood(*mood),
        EntryQuery::Tag(tag) => store.filter_by_tag(tag),
        EntryQuery::Range(start, end) => store.filter_by_date_range(*start, *end),
    }
}

//! Core journal functionality without I/O operations.
//!
//! This module contains the pure logic behind journal entries: the mood
//! vocabulary, entry drafts and their validation, derived fields such as the
//! word count, tag helpers, and the clock used to stamp entries. Nothing here
//! touches the database or the filesystem.

use crate::constants::{
    DATE_FORMAT_COMPACT, DATE_FORMAT_ISO, DEFAULT_CATEGORY, TAG_SEPARATOR,
};
use crate::errors::{AppError, AppResult};
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;

/// The fixed mood vocabulary.
///
/// # Examples
///
/// ```
/// use daybook::journal_core::Mood;
///
/// let mood: Mood = "sad".parse().unwrap();
/// assert_eq!(mood, Mood::Sad);
/// assert_eq!(mood.to_string(), "Sad");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Mood {
    Happy,
    Relaxed,
    Confident,
    Sad,
    Angry,
    Anxious,
    #[default]
    Neutral,
}

impl Mood {
    /// Every mood, in display order.
    pub const ALL: [Mood; 7] = [
        Mood::Happy,
        Mood::Relaxed,
        Mood::Confident,
        Mood::Sad,
        Mood::Angry,
        Mood::Anxious,
        Mood::Neutral,
    ];

    /// The name stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "Happy",
            Mood::Relaxed => "Relaxed",
            Mood::Confident => "Confident",
            Mood::Sad => "Sad",
            Mood::Angry => "Angry",
            Mood::Anxious => "Anxious",
            Mood::Neutral => "Neutral",
        }
    }

    /// Glyph shown next to the mood in terminal output.
    pub fn emoji(&self) -> &'static str {
        match self {
            Mood::Happy => "😃",
            Mood::Relaxed => "😌",
            Mood::Confident => "😎",
            Mood::Sad => "😢",
            Mood::Angry => "😠",
            Mood::Anxious => "😰",
            Mood::Neutral => "😐",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Mood::ALL
            .iter()
            .copied()
            .find(|mood| mood.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                let names: Vec<&str> = Mood::ALL.iter().map(Mood::as_str).collect();
                AppError::InvalidInput(format!(
                    "Unknown mood '{}'. Expected one of: {}",
                    wanted,
                    names.join(", ")
                ))
            })
    }
}

/// The caller-editable fields of an entry.
///
/// Used both to create an entry and to overwrite one. It carries no dates or
/// id: those are assigned by the store and never change afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryDraft {
    pub title: String,
    pub content: String,
    pub primary_mood: Mood,
    pub secondary_mood1: Option<Mood>,
    pub secondary_mood2: Option<Mood>,
    pub category: String,
    pub tags: String,
}

impl EntryDraft {
    /// Creates a draft with the required fields and defaults for the rest.
    pub fn new(title: impl Into<String>, content: impl Into<String>, primary_mood: Mood) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            primary_mood,
            category: DEFAULT_CATEGORY.to_string(),
            ..Self::default()
        }
    }

    /// Checks required fields and normalizes the category.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` if the title or content is blank.
    pub fn validate(mut self) -> AppResult<Self> {
        if self.title.trim().is_empty() {
            return Err(AppError::InvalidInput("Entry title cannot be empty".to_string()));
        }
        if self.content.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Entry content cannot be empty".to_string(),
            ));
        }
        if self.category.trim().is_empty() {
            self.category = DEFAULT_CATEGORY.to_string();
        }
        Ok(self)
    }

    /// Number of words in the content.
    pub fn word_count(&self) -> usize {
        word_count(&self.content)
    }
}

/// A persisted journal entry.
///
/// Values returned from the store are copies: changing one has no effect on
/// the database until it is passed back through an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalEntry {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_date: NaiveDateTime,
    pub modified_date: Option<NaiveDateTime>,
    pub primary_mood: Mood,
    pub secondary_mood1: Option<Mood>,
    pub secondary_mood2: Option<Mood>,
    pub category: String,
    pub tags: String,
    pub entry_date: NaiveDate,
    pub word_count: usize,
}

impl JournalEntry {
    /// The secondary moods that are set, in slot order.
    pub fn secondary_moods(&self) -> Vec<Mood> {
        [self.secondary_mood1, self.secondary_mood2]
            .into_iter()
            .flatten()
            .collect()
    }

    /// The editable fields of this entry, for round-tripping through an update.
    pub fn to_draft(&self) -> EntryDraft {
        EntryDraft {
            title: self.title.clone(),
            content: self.content.clone(),
            primary_mood: self.primary_mood,
            secondary_mood1: self.secondary_mood1,
            secondary_mood2: self.secondary_mood2,
            category: self.category.clone(),
            tags: self.tags.clone(),
        }
    }
}

/// Counts maximal runs of non-whitespace characters.
///
/// Only space, tab, newline and carriage return separate words.
///
/// # Examples
///
/// ```
/// use daybook::journal_core::word_count;
///
/// assert_eq!(word_count("  a  b\tc\n"), 3);
/// assert_eq!(word_count(""), 0);
/// ```
pub fn word_count(text: &str) -> usize {
    text.split([' ', '\t', '\n', '\r'])
        .filter(|token| !token.is_empty())
        .count()
}

/// Joins tag values into the stored comma-separated form, skipping blanks.
pub fn join_tags<S: AsRef<str>>(tags: &[S]) -> String {
    tags.iter()
        .map(|tag| tag.as_ref().trim())
        .filter(|tag| !tag.is_empty())
        .collect::<Vec<_>>()
        .join(TAG_SEPARATOR)
}

/// Splits the stored tags text into trimmed, non-empty tags.
pub fn split_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses a date in `YYYY-MM-DD` or `YYYYMMDD` form.
pub fn parse_date(input: &str) -> AppResult<NaiveDate> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT_ISO)
        .or_else(|_| NaiveDate::parse_from_str(trimmed, DATE_FORMAT_COMPACT))
        .map_err(|e| {
            AppError::InvalidInput(format!(
                "Invalid date '{}': {} (expected YYYY-MM-DD or YYYYMMDD)",
                trimmed, e
            ))
        })
}

/// Source of the current local time.
pub trait Clock: Send + Sync {
    /// The current local wall-clock time.
    fn now(&self) -> NaiveDateTime;

    /// The current calendar day.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Reads the system's local time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = now;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut guard = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *guard += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn fixed_datetime() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_word_count_examples() {
        assert_eq!(word_count("  a  b\tc\n"), 3);
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count(" \t\r\n "), 0);
        assert_eq!(word_count("one"), 1);
        assert_eq!(word_count("line one\r\nline two"), 4);
    }

    #[test]
    fn test_word_count_ignores_other_separators() {
        // Punctuation and non-breaking spaces do not split words.
        assert_eq!(word_count("well,then"), 1);
        assert_eq!(word_count("a\u{00A0}b"), 1);
    }

    #[test]
    fn test_mood_parse_is_case_insensitive() {
        assert_eq!("happy".parse::<Mood>().unwrap(), Mood::Happy);
        assert_eq!(" ANXIOUS ".parse::<Mood>().unwrap(), Mood::Anxious);
        for mood in Mood::ALL {
            assert_eq!(mood.as_str().parse::<Mood>().unwrap(), mood);
        }
    }

    #[test]
    fn test_mood_parse_rejects_unknown() {
        let err = "Elated".parse::<Mood>().unwrap_err();
        match err {
            AppError::InvalidInput(msg) => {
                assert!(msg.contains("Elated"));
                assert!(msg.contains("Happy"));
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_draft_defaults() {
        let draft = EntryDraft::new("Title", "Body", Mood::Happy);
        assert_eq!(draft.category, "General");
        assert_eq!(draft.tags, "");
        assert!(draft.secondary_mood1.is_none());
        assert!(draft.secondary_mood2.is_none());
    }

    #[test]
    fn test_draft_validate_rejects_blank_fields() {
        let blank_title = EntryDraft::new("   ", "Body", Mood::Happy);
        assert!(matches!(
            blank_title.validate(),
            Err(AppError::InvalidInput(_))
        ));

        let blank_content = EntryDraft::new("Title", "\n\t", Mood::Happy);
        assert!(matches!(
            blank_content.validate(),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_draft_validate_fills_blank_category() {
        let mut draft = EntryDraft::new("Title", "Body", Mood::Sad);
        draft.category = "  ".to_string();
        let draft = draft.validate().unwrap();
        assert_eq!(draft.category, "General");
    }

    #[test]
    fn test_join_and_split_tags() {
        let joined = join_tags(&[" work ", "", "art", "  "]);
        assert_eq!(joined, "work, art");
        assert_eq!(split_tags(&joined), vec!["work", "art"]);
        assert!(split_tags("").is_empty());
        assert_eq!(split_tags("a,,b ,"), vec!["a", "b"]);
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2023, 1, 15).unwrap();
        assert_eq!(parse_date("2023-01-15").unwrap(), expected);
        assert_eq!(parse_date("20230115").unwrap(), expected);
        assert!(parse_date("15/01/2023").is_err());
        assert!(parse_date("2023-02-30").is_err());
    }

    #[test]
    fn test_fixed_clock_moves_only_when_told() {
        let clock = FixedClock::new(fixed_datetime());
        assert_eq!(clock.now(), fixed_datetime());
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());

        clock.advance(Duration::days(1));
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 1, 16).unwrap());

        clock.set(fixed_datetime());
        assert_eq!(clock.now(), fixed_datetime());
    }

    #[test]
    fn test_secondary_moods_skip_empty_slots() {
        let entry = JournalEntry {
            id: 1,
            title: "t".to_string(),
            content: "c".to_string(),
            created_date: fixed_datetime(),
            modified_date: None,
            primary_mood: Mood::Happy,
            secondary_mood1: None,
            secondary_mood2: Some(Mood::Anxious),
            category: "General".to_string(),
            tags: String::new(),
            entry_date: fixed_datetime().date(),
            word_count: 1,
        };
        assert_eq!(entry.secondary_moods(), vec![Mood::Anxious]);
        assert_eq!(entry.to_draft().secondary_mood2, Some(Mood::Anxious));
    }
}

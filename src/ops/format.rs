//! Plain-text rendering of entries for the terminal.

use crate::constants::{DATE_FORMAT_ISO, DISPLAY_TIMESTAMP_FORMAT};
use crate::journal_core::{split_tags, JournalEntry};

/// One line per entry: date, id, mood, title and word count.
pub fn summary_line(entry: &JournalEntry) -> String {
    format!(
        "{}  #{:<4} {} {:<9} {}  ({} words)",
        entry.entry_date.format(DATE_FORMAT_ISO),
        entry.id,
        entry.primary_mood.emoji(),
        entry.primary_mood.as_str(),
        entry.title,
        entry.word_count
    )
}

/// Full entry with a header block, a blank line, then the content.
pub fn detail(entry: &JournalEntry) -> String {
    let mut out = String::new();
    out.push_str(&format!("# {}\n", entry.title));
    out.push_str(&format!(
        "Date:     {} (#{})\n",
        entry.entry_date.format(DATE_FORMAT_ISO),
        entry.id
    ));
    out.push_str(&format!(
        "Mood:     {} {}\n",
        entry.primary_mood.emoji(),
        entry.primary_mood
    ));

    let secondary = entry.secondary_moods();
    if !secondary.is_empty() {
        let names: Vec<String> = secondary
            .iter()
            .map(|m| format!("{} {}", m.emoji(), m))
            .collect();
        out.push_str(&format!("Also:     {}\n", names.join(", ")));
    }
    out.push_str(&format!("Category: {}\n", entry.category));
    let tags = split_tags(&entry.tags);
    if !tags.is_empty() {
        out.push_str(&format!("Tags:     {}\n", tags.join(", ")));
    }
    out.push_str(&format!(
        "Created:  {}\n",
        entry.created_date.format(DISPLAY_TIMESTAMP_FORMAT)
    ));
    if let Some(modified) = entry.modified_date {
        out.push_str(&format!(
            "Modified: {}\n",
            modified.format(DISPLAY_TIMESTAMP_FORMAT)
        ));
    }
    out.push_str(&format!("Words:    {}\n", entry.word_count));
    out.push('\n');
    out.push_str(entry.content.trim_end());
    out.push('\n');
    out
}

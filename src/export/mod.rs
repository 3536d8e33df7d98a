//! Exporting entries to shareable documents.
//!
//! PDF is the only document format. Every entry is laid out with the same
//! fixed field order, see [`entry_fields`]. A multi-entry export starts with
//! a cover page and gives each entry its own page, newest entry date first.
//!
//! JSON output for scripting lives here too, so every serialization failure
//! surfaces as an `ExportError`.

pub mod pdf;

use crate::constants::DISPLAY_DATE_FORMAT;
use crate::errors::{AppResult, ExportError};
use crate::journal_core::JournalEntry;
use pdf::{Face, PdfWriter};
use tracing::debug;

const TITLE_SIZE: f32 = 20.0;
const COVER_TITLE_SIZE: f32 = 28.0;
const FIELD_SIZE: f32 = 11.0;
const BODY_SIZE: f32 = 11.0;

/// One labelled line of an exported entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryField {
    pub label: &'static str,
    pub value: String,
}

impl EntryField {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

/// The fields of `entry` in export order.
///
/// Secondary moods, category and tags only appear when they carry a value.
pub fn entry_fields(entry: &JournalEntry) -> Vec<EntryField> {
    let mut fields = vec![
        EntryField::new("Title", entry.title.as_str()),
        EntryField::new(
            "Date",
            entry.entry_date.format(DISPLAY_DATE_FORMAT).to_string(),
        ),
        EntryField::new("Mood", entry.primary_mood.as_str()),
    ];

    let secondary = entry.secondary_moods();
    if !secondary.is_empty() {
        let names: Vec<&str> = secondary.iter().map(|m| m.as_str()).collect();
        fields.push(EntryField::new("Secondary moods", names.join(", ")));
    }
    if !entry.category.trim().is_empty() {
        fields.push(EntryField::new("Category", entry.category.as_str()));
    }
    if !entry.tags.trim().is_empty() {
        fields.push(EntryField::new("Tags", entry.tags.as_str()));
    }

    fields.push(EntryField::new("Word count", entry.word_count.to_string()));
    fields.push(EntryField::new("Content", entry.content.as_str()));
    fields
}

fn write_entry(writer: &mut PdfWriter, entry: &JournalEntry) {
    writer.new_page();
    for field in entry_fields(entry) {
        match field.label {
            "Title" => {
                writer.paragraph(&field.value, Face::Bold, TITLE_SIZE);
                writer.gap(6.0);
            }
            "Content" => {
                writer.gap(12.0);
                writer.paragraph(&field.value, Face::Regular, BODY_SIZE);
            }
            label => writer.paragraph(
                &format!("{}: {}", label, field.value),
                Face::Regular,
                FIELD_SIZE,
            ),
        }
    }
}

/// Renders a single entry as a PDF document.
pub fn render_entry(entry: &JournalEntry) -> AppResult<Vec<u8>> {
    let mut writer = PdfWriter::new();
    write_entry(&mut writer, entry);
    debug!(
        "Rendered entry {} to {} page(s)",
        entry.id,
        writer.page_count()
    );
    writer.finish()
}

/// Renders several entries behind a cover page.
///
/// Entries are sorted by entry date, newest first, whatever order they were
/// passed in.
pub fn render_entries(entries: &[JournalEntry]) -> AppResult<Vec<u8>> {
    let mut sorted: Vec<&JournalEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| b.entry_date.cmp(&a.entry_date));

    let mut writer = PdfWriter::new();
    writer.new_page();
    writer.gap(180.0);
    writer.paragraph("Journal Entries", Face::Bold, COVER_TITLE_SIZE);
    writer.gap(12.0);
    writer.paragraph(
        &format!("Total entries: {}", entries.len()),
        Face::Regular,
        FIELD_SIZE,
    );

    for entry in sorted {
        write_entry(&mut writer, entry);
    }

    debug!(
        "Rendered {} entries to {} page(s)",
        entries.len(),
        writer.page_count()
    );
    writer.finish()
}

/// Pretty-printed JSON array of entries.
pub fn entries_to_json(entries: &[JournalEntry]) -> AppResult<String> {
    serde_json::to_string_pretty(entries).map_err(|e| ExportError::Json(e).into())
}

//! Minimal text-only PDF writer on top of `lopdf`.
//!
//! Pages are A4 with the two standard Helvetica faces, so nothing has to be
//! embedded. Text is laid out top to bottom; a line that would run past the
//! bottom margin starts a new page.

use crate::errors::AppResult;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 56.0;
const LINE_SPACING: f32 = 1.35;

const REGULAR_FONT: &str = "F1";
const BOLD_FONT: &str = "F2";

/// Font face for a line of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Regular,
    Bold,
}

impl Face {
    fn resource_name(self) -> &'static str {
        match self {
            Face::Regular => REGULAR_FONT,
            Face::Bold => BOLD_FONT,
        }
    }
}

/// Accumulates pages of positioned text, then serializes them.
pub struct PdfWriter {
    pages: Vec<Vec<Operation>>,
    cursor: f32,
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfWriter {
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            cursor: PAGE_HEIGHT - MARGIN,
        }
    }

    /// Starts a fresh page. The next line goes at its top margin.
    pub fn new_page(&mut self) {
        self.pages.push(Vec::new());
        self.cursor = PAGE_HEIGHT - MARGIN;
    }

    /// Vertical whitespace, in points. Never breaks the page on its own.
    pub fn gap(&mut self, points: f32) {
        self.cursor -= points;
    }

    /// Writes `text` word-wrapped to the page width.
    ///
    /// Embedded newlines start new lines; empty lines are kept as blank space.
    pub fn paragraph(&mut self, text: &str, face: Face, size: f32) {
        let max_width = PAGE_WIDTH - 2.0 * MARGIN;
        for source_line in text.lines() {
            let wrapped = wrap(source_line, size, max_width);
            if wrapped.is_empty() {
                self.line("", face, size);
            }
            for line in wrapped {
                self.line(&line, face, size);
            }
        }
    }

    fn line(&mut self, text: &str, face: Face, size: f32) {
        let leading = size * LINE_SPACING;
        if self.pages.is_empty() || self.cursor - leading < MARGIN {
            self.new_page();
        }
        self.cursor -= leading;
        if text.is_empty() {
            return;
        }

        let y = self.cursor;
        if let Some(ops) = self.pages.last_mut() {
            ops.push(Operation::new("BT", vec![]));
            ops.push(Operation::new(
                "Tf",
                vec![face.resource_name().into(), Object::Real(size)],
            ));
            ops.push(Operation::new(
                "Td",
                vec![Object::Real(MARGIN), Object::Real(y)],
            ));
            ops.push(Operation::new(
                "Tj",
                vec![Object::string_literal(to_win_ansi(text))],
            ));
            ops.push(Operation::new("ET", vec![]));
        }
    }

    /// Number of pages written so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Serializes every page into a complete PDF document.
    pub fn finish(mut self) -> AppResult<Vec<u8>> {
        if self.pages.is_empty() {
            self.new_page();
        }

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(font_dictionary("Helvetica"));
        let bold_id = doc.add_object(font_dictionary("Helvetica-Bold"));
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                REGULAR_FONT => regular_id,
                BOLD_FONT => bold_id,
            },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(self.pages.len());
        for operations in self.pages {
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id: ObjectId = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(PAGE_WIDTH),
                    Object::Real(PAGE_HEIGHT),
                ],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;
        Ok(bytes)
    }
}

fn font_dictionary(base_font: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => Object::Name(base_font.as_bytes().to_vec()),
        "Encoding" => "WinAnsiEncoding",
    }
}

/// Approximate Helvetica advance width of `c` as a fraction of the font size.
fn char_width(c: char) -> f32 {
    match c {
        ' ' | 'i' | 'j' | 'l' | 't' | 'f' | 'I' | '.' | ',' | ';' | ':' | '\'' | '!' | '|' => {
            0.28
        }
        'm' | 'w' | 'M' | 'W' => 0.85,
        c if c.is_uppercase() => 0.68,
        _ => 0.56,
    }
}

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().map(char_width).sum::<f32>() * size
}

/// Greedy word wrap. Words wider than a whole line are split by character.
fn wrap(text: &str, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if text_width(&candidate, size) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if text_width(word, size) <= max_width {
            current = word.to_string();
            continue;
        }
        for c in word.chars() {
            if !current.is_empty() && text_width(&current, size) + char_width(c) * size > max_width
            {
                lines.push(std::mem::take(&mut current));
            }
            current.push(c);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Encodes `text` for a WinAnsi font. Unrepresentable characters become `?`.
pub fn to_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\t' => b' ',
            '\u{20}'..='\u{7e}' | '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '\u{20ac}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201c}' => 0x93,
            '\u{201d}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            _ => b'?',
        })
        .collect()
}

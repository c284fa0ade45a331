use std::borrow::Cow;

use encoding_rs::{GBK, UTF_8};
use khitan_core::Entry;

/// Header substrings naming the script-form column, in tie-break order
pub const SOURCE_COLUMN_HINTS: [&str; 3] = ["source", "word", "契丹"];

/// Header substrings naming the meaning column, in tie-break order
pub const MEANING_COLUMN_HINTS: [&str; 3] = ["target", "meaning", "中文"];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Encodings tried when reading the glyph table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Utf8Bom,
    Gbk,
}

impl TextEncoding {
    pub const PREFERENCE: [TextEncoding; 3] = [TextEncoding::Utf8, TextEncoding::Utf8Bom, TextEncoding::Gbk];

    pub fn label(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Utf8Bom => "utf-8-sig",
            TextEncoding::Gbk => "gbk",
        }
    }

    /// Strict decode, `None` on any malformed sequence
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Option<Cow<'a, str>> {
        match self {
            TextEncoding::Utf8 => UTF_8.decode_without_bom_handling_and_without_replacement(bytes),
            TextEncoding::Utf8Bom => {
                let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
                UTF_8.decode_without_bom_handling_and_without_replacement(body)
            }
            TextEncoding::Gbk => GBK.decode_without_bom_handling_and_without_replacement(bytes),
        }
    }
}

/// A parsed delimited table with normalized headers
#[derive(Debug, Clone)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Rows the reader rejected or that had more cells than headers
    pub skipped_rows: usize,
}

impl Table {
    pub fn parse(text: &str) -> Result<Self, csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader.headers()?.iter().map(normalize_column).collect();

        let mut rows = Vec::new();
        let mut skipped_rows = 0;
        for result in reader.records() {
            match result {
                Ok(record) if record.len() <= headers.len() => {
                    rows.push(record.iter().map(str::to_string).collect());
                }
                Ok(record) => {
                    tracing::debug!("Skipping row with {} cells, header has {}", record.len(), headers.len());
                    skipped_rows += 1;
                }
                Err(e) => {
                    tracing::debug!("Skipping unreadable row: {}", e);
                    skipped_rows += 1;
                }
            }
        }

        Ok(Self {
            headers,
            rows,
            skipped_rows,
        })
    }

    /// First encoding in preference order that yields more than one column
    pub fn decode(bytes: &[u8]) -> Option<(Self, TextEncoding)> {
        TextEncoding::PREFERENCE.into_iter().find_map(|encoding| {
            let text = encoding.decode(bytes)?;
            match Table::parse(&text) {
                Ok(table) if table.headers.len() > 1 => Some((table, encoding)),
                Ok(_) => None,
                Err(e) => {
                    tracing::debug!("Table unreadable as {}: {}", encoding.label(), e);
                    None
                }
            }
        })
    }

    pub fn source_column(&self) -> usize {
        pick_column(&self.headers, &SOURCE_COLUMN_HINTS).unwrap_or(0)
    }

    pub fn meaning_column(&self) -> usize {
        pick_column(&self.headers, &MEANING_COLUMN_HINTS).unwrap_or(1)
    }

    /// Glyph entries for every row whose selected cells pass validation
    pub fn glyph_entries(&self) -> Vec<Entry> {
        let source = self.source_column();
        let meaning = self.meaning_column();

        self.rows
            .iter()
            .filter_map(|row| {
                let word = row.get(source).map(String::as_str).unwrap_or_default();
                let gloss = row.get(meaning).map(String::as_str).unwrap_or_default();
                Entry::glyph(word, gloss)
            })
            .collect()
    }
}

fn normalize_column(name: &str) -> String {
    name.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
        .to_lowercase()
}

/// First column whose name contains any hint
fn pick_column(headers: &[String], hints: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|name| hints.iter().any(|hint| name.contains(hint)))
}

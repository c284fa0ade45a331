use khitan_core::Entry;
use once_cell::sync::Lazy;
use regex::Regex;

/// `WORD (PRONUNCIATION): MEANING`, parentheses and colon in ASCII or full width
static LINE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([^(（\s]+)\s*(?:[(（](.+?)[)）])?\s*[:：]\s*(.+)$").unwrap()
});

/// Lines containing this are reserved and never parsed
const RESERVED_MARKER: &str = " - ";

const FULL_WIDTH_COLON: char = '：';

/// Parse one line of the phonetic list. Returns `None` for blank, short,
/// reserved and unparseable lines.
pub fn parse_line(raw: &str) -> Option<Entry> {
    let line = raw.trim();
    if line.is_empty() || line.chars().count() < 2 || line.contains(RESERVED_MARKER) {
        return None;
    }

    if let Some(caps) = LINE_PATTERN.captures(line) {
        let word = caps.get(1).map_or("", |m| m.as_str());
        let pronunciation = caps.get(2).map_or("", |m| m.as_str());
        let meaning = caps.get(3).map_or("", |m| m.as_str());
        return Entry::phonetic(word, meaning, pronunciation);
    }

    // Split once on whichever colon is present, full width first.
    // An empty side means the line is skipped.
    let separator = if line.contains(FULL_WIDTH_COLON) {
        FULL_WIDTH_COLON
    } else if line.contains(':') {
        ':'
    } else {
        return None;
    };

    let (word, meaning) = line.split_once(separator)?;
    Entry::phonetic(word, meaning, "")
}

/// Parse a whole phonetic list, skipping lines that do not parse
pub fn parse_lines(text: &str) -> Vec<Entry> {
    text.lines().filter_map(parse_line).collect()
}

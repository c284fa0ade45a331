use std::fmt;

use serde::{Deserialize, Serialize};

use crate::preprocess::normalize_phonetic;

/// Glossary lookup operations
pub trait Dictionary: Send + Sync {
    /// All entries in scan order
    fn entries(&self) -> &[Entry];

    /// Load diagnostics, one line per source
    fn diagnostics(&self) -> &[String];

    /// Get dictionary metadata
    fn metadata(&self) -> DictionaryMetadata;
}

/// Which source file produced an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Tabular glyph-to-meaning table
    Glyph,
    /// Line-oriented phonetic gloss list
    Phonetic,
}

/// One glossary record. Construction refuses empty words or meanings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    word: String,
    meaning: String,
    pronunciation: String,
    pronunciation_normalized: String,
    source_kind: SourceKind,
}

impl Entry {
    /// Entry from the glyph table, `None` when either side is blank or the
    /// meaning is the `nan` placeholder
    pub fn glyph(word: &str, meaning: &str) -> Option<Self> {
        let meaning = meaning.trim();
        if meaning.eq_ignore_ascii_case("nan") {
            return None;
        }
        Self::build(word, meaning, "", SourceKind::Glyph)
    }

    /// Entry from the phonetic list, `None` when either side is blank
    pub fn phonetic(word: &str, meaning: &str, pronunciation: &str) -> Option<Self> {
        Self::build(word, meaning, pronunciation, SourceKind::Phonetic)
    }

    fn build(word: &str, meaning: &str, pronunciation: &str, source_kind: SourceKind) -> Option<Self> {
        let word = word.trim();
        let meaning = meaning.trim();
        if word.is_empty() || meaning.is_empty() {
            return None;
        }

        let pronunciation = pronunciation.trim().to_string();
        let pronunciation_normalized = normalize_phonetic(&pronunciation);

        Some(Self {
            word: word.to_string(),
            meaning: meaning.to_string(),
            pronunciation,
            pronunciation_normalized,
            source_kind,
        })
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn meaning(&self) -> &str {
        &self.meaning
    }

    pub fn pronunciation(&self) -> &str {
        &self.pronunciation
    }

    pub fn pronunciation_normalized(&self) -> &str {
        &self.pronunciation_normalized
    }

    pub fn source_kind(&self) -> SourceKind {
        self.source_kind
    }
}

/// How an entry matched a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchType {
    ExactWord,
    MeaningContains,
    MeaningRelated,
    PhoneticExact,
    PhoneticFuzzy,
}

impl MatchType {
    pub fn label(&self) -> &'static str {
        match self {
            MatchType::ExactWord => "exact word",
            MatchType::MeaningContains => "meaning contains token",
            MatchType::MeaningRelated => "meaning related",
            MatchType::PhoneticExact => "phonetic exact",
            MatchType::PhoneticFuzzy => "phonetic fuzzy",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone)]
pub struct DictionaryMetadata {
    pub name: String,
    pub language: String,
    pub entry_count: usize,
    pub glyph_count: usize,
    pub phonetic_count: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

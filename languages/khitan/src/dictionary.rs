use khitan_core::{Dictionary, DictionaryMetadata, Entry, SourceKind};

/// In-memory Khitan glossary: glyph table entries followed by phonetic list
/// entries, in scan order
#[derive(Debug, Clone, Default)]
pub struct KhitanGlossary {
    entries: Vec<Entry>,
    diagnostics: Vec<String>,
}

impl KhitanGlossary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(entries: Vec<Entry>, diagnostics: Vec<String>) -> Self {
        Self { entries, diagnostics }
    }

    /// Get the number of entries in the glossary
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    fn count_kind(&self, kind: SourceKind) -> usize {
        self.entries.iter().filter(|e| e.source_kind() == kind).count()
    }
}

impl Dictionary for KhitanGlossary {
    fn entries(&self) -> &[Entry] {
        &self.entries
    }

    fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    fn metadata(&self) -> DictionaryMetadata {
        DictionaryMetadata {
            name: "Khitan small script glossary".to_string(),
            language: "zkt".to_string(),
            entry_count: self.entries.len(),
            glyph_count: self.count_kind(SourceKind::Glyph),
            phonetic_count: self.count_kind(SourceKind::Phonetic),
        }
    }
}

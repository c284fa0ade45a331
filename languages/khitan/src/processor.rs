use std::path::Path;
use std::sync::Arc;

use khitan_core::language::{ContextBlock, Direction, LanguageProcessor, Token};
use khitan_core::{Dictionary, normalize_phonetic};

use crate::dictionary::KhitanGlossary;
use crate::loader::GlossaryLoader;
use crate::retriever::{ContextRetriever, DEFAULT_MAX_CONTEXT_ENTRIES};

/// Khitan language processor
pub struct KhitanProcessor {
    glossary: Arc<KhitanGlossary>,
    retriever: ContextRetriever,
}

impl KhitanProcessor {
    pub fn new(glossary: Arc<KhitanGlossary>) -> Self {
        Self::with_max_context_entries(glossary, DEFAULT_MAX_CONTEXT_ENTRIES)
    }

    pub fn with_max_context_entries(glossary: Arc<KhitanGlossary>, max_context_entries: usize) -> Self {
        Self {
            glossary,
            retriever: ContextRetriever::new(max_context_entries),
        }
    }

    /// Processor over the process-wide cached glossary for these sources
    pub fn from_sources(tabular_path: &Path, line_path: &Path, max_context_entries: usize) -> Self {
        let glossary = GlossaryLoader::load_cached(tabular_path, line_path);
        if glossary.entry_count() == 0 {
            tracing::warn!("Glossary is empty, every query will use the fallback context");
        }
        Self::with_max_context_entries(glossary, max_context_entries)
    }

    pub fn glossary(&self) -> &KhitanGlossary {
        &self.glossary
    }
}

impl LanguageProcessor for KhitanProcessor {
    fn language_code(&self) -> &str {
        "zkt"
    }

    fn normalize(&self, text: &str) -> String {
        normalize_phonetic(text.trim())
    }

    fn tokenize(&self, text: &str) -> Vec<Token> {
        ContextRetriever::tokenize(text.trim())
    }

    fn retrieve(&self, query: &str, direction: Direction) -> ContextBlock {
        self.retriever.retrieve(self.glossary.entries(), query, direction)
    }
}

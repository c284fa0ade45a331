use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_tabular_path() -> PathBuf {
    PathBuf::from("data/khitan_glyphs.csv")
}

fn default_line_path() -> PathBuf {
    PathBuf::from("data/khitan_phonetic.txt")
}

fn default_max_context_entries() -> usize {
    50
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GlossaryConfig {
    /// Delimited glyph-to-meaning table
    #[serde(default = "default_tabular_path")]
    pub tabular_path: PathBuf,
    /// Line-oriented phonetic gloss list
    #[serde(default = "default_line_path")]
    pub line_path: PathBuf,
    /// Upper bound on context lines handed to the completion service
    #[serde(default = "default_max_context_entries")]
    pub max_context_entries: usize,
}

impl GlossaryConfig {
    pub fn new() -> Self {
        let tabular_path = env::var("KHITAN_GLYPH_TABLE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_tabular_path());

        let line_path = env::var("KHITAN_PHONETIC_LIST")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_line_path());

        Self {
            tabular_path,
            line_path,
            max_context_entries: default_max_context_entries(),
        }
    }
}

impl Default for GlossaryConfig {
    fn default() -> Self {
        Self {
            tabular_path: default_tabular_path(),
            line_path: default_line_path(),
            max_context_entries: default_max_context_entries(),
        }
    }
}

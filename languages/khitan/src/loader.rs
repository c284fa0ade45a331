use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use khitan_core::{Entry, LoadError};
use once_cell::sync::Lazy;

use crate::dictionary::KhitanGlossary;
use crate::phonetic;
use crate::tabular::{Table, TextEncoding};

type SourceKey = (PathBuf, PathBuf);

/// Loaded glossaries keyed by (glyph table, phonetic list). Filled once per
/// pair and kept until the process exits.
static GLOSSARY_CACHE: Lazy<Mutex<HashMap<SourceKey, Arc<KhitanGlossary>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Glyph table parse outcome
#[derive(Debug)]
pub struct TabularLoad {
    pub entries: Vec<Entry>,
    pub rows: usize,
    pub encoding: TextEncoding,
}

pub struct GlossaryLoader;

impl GlossaryLoader {
    /// Load both sources. Never fails: a missing or broken source
    /// contributes no entries and one diagnostic line.
    pub fn load(tabular_path: &Path, line_path: &Path) -> KhitanGlossary {
        let mut entries = Vec::new();
        let mut diagnostics = Vec::new();

        match Self::load_tabular(tabular_path) {
            Ok(load) => {
                tracing::info!(
                    "Loaded {} glyph entries from {} ({} rows, {})",
                    load.entries.len(),
                    tabular_path.display(),
                    load.rows,
                    load.encoding.label()
                );
                diagnostics.push(format!(
                    "glyph table: {} entries ({} rows, {})",
                    load.entries.len(),
                    load.rows,
                    load.encoding.label()
                ));
                entries.extend(load.entries);
            }
            Err(e) => {
                tracing::warn!("Glyph table {} not loaded: {}", tabular_path.display(), e);
                diagnostics.push(diagnostic("glyph table", &e));
            }
        }

        match Self::load_lines(line_path) {
            Ok(phonetic_entries) => {
                tracing::info!(
                    "Loaded {} phonetic entries from {}",
                    phonetic_entries.len(),
                    line_path.display()
                );
                diagnostics.push(format!("phonetic list: {} entries", phonetic_entries.len()));
                entries.extend(phonetic_entries);
            }
            Err(e) => {
                tracing::warn!("Phonetic list {} not loaded: {}", line_path.display(), e);
                diagnostics.push(diagnostic("phonetic list", &e));
            }
        }

        KhitanGlossary::from_parts(entries, diagnostics)
    }

    /// Memoized [`GlossaryLoader::load`]. Later calls with the same pair of
    /// paths return the first result even if the files changed.
    pub fn load_cached(tabular_path: &Path, line_path: &Path) -> Arc<KhitanGlossary> {
        let key = (tabular_path.to_path_buf(), line_path.to_path_buf());

        // Held across the load so each pair is computed at most once
        let mut cache = GLOSSARY_CACHE.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(glossary) = cache.get(&key) {
            tracing::debug!("Glossary cache hit for {}, {}", tabular_path.display(), line_path.display());
            return Arc::clone(glossary);
        }

        let glossary = Arc::new(Self::load(tabular_path, line_path));
        cache.insert(key, Arc::clone(&glossary));
        glossary
    }

    /// Parse the delimited glyph table
    pub fn load_tabular(path: &Path) -> Result<TabularLoad, LoadError> {
        let bytes = read_source(path)?;

        let (table, encoding) = Table::decode(&bytes).ok_or_else(|| {
            LoadError::InvalidFormat(format!(
                "{}: no supported encoding yields more than one column",
                path.display()
            ))
        })?;

        if table.skipped_rows > 0 {
            tracing::debug!("Skipped {} malformed rows in {}", table.skipped_rows, path.display());
        }

        Ok(TabularLoad {
            entries: table.glyph_entries(),
            rows: table.rows.len(),
            encoding,
        })
    }

    /// Parse the line-oriented phonetic list (UTF-8)
    pub fn load_lines(path: &Path) -> Result<Vec<Entry>, LoadError> {
        let bytes = read_source(path)?;
        let text = String::from_utf8(bytes)
            .map_err(|e| LoadError::ParseError(format!("{}: {}", path.display(), e)))?;

        Ok(phonetic::parse_lines(&text))
    }
}

/// `<source> unavailable: <path>` for a missing file, `<source> error: ..` otherwise
fn diagnostic(source: &str, error: &LoadError) -> String {
    match error {
        LoadError::FileNotFound(path) => format!("{source} unavailable: {path}"),
        other => format!("{source} error: {other}"),
    }
}

fn read_source(path: &Path) -> Result<Vec<u8>, LoadError> {
    fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LoadError::FileNotFound(path.display().to_string()),
        _ => LoadError::IoError(e),
    })
}

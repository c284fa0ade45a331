use unicode_normalization::UnicodeNormalization;
use unicode_properties::{GeneralCategory, UnicodeGeneralCategory};

pub trait Preprocessor {
    // Default query preprocessor
    fn process(&self, text: &str) -> String {
        let text = text.trim();

        if text.is_empty() {
            return String::new();
        }

        // Queries are single-line
        text.replace(['\n', '\r'], " ").trim().to_string()
    }
}

pub struct DefaultPreprocessor;
impl Preprocessor for DefaultPreprocessor {}

/// Canonical decomposition, nonspacing marks (Mn) dropped, lower-cased.
/// "Línyá" and "linya" normalize identically. Spacing and enclosing marks
/// are kept.
pub fn normalize_phonetic(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    text.nfd()
        .filter(|c| c.general_category() != GeneralCategory::NonspacingMark)
        .collect::<String>()
        .to_lowercase()
}

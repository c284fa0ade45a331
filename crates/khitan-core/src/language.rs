use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Text processing and retrieval interface for language implementations
pub trait LanguageProcessor: Send + Sync {
    /// Language identifier
    fn language_code(&self) -> &str;

    /// Normalize text for phonetic comparison
    fn normalize(&self, text: &str) -> String;

    /// Break a query into match tokens
    fn tokenize(&self, text: &str) -> Vec<Token>;

    /// Select, rank and format the glossary entries relevant to a query
    fn retrieve(&self, query: &str, direction: Direction) -> ContextBlock;
}

/// Query direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Modern language to script (translation / coinage)
    #[serde(rename = "c2k")]
    ModernToScript,
    /// Script to modern language (origin analysis)
    #[default]
    #[serde(rename = "k2c")]
    ScriptToModern,
}

impl Direction {
    pub fn code(&self) -> &'static str {
        match self {
            Direction::ModernToScript => "c2k",
            Direction::ScriptToModern => "k2c",
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Direction::ModernToScript => "modern -> Khitan (translation / coinage)",
            Direction::ScriptToModern => "Khitan -> modern (origin / analysis)",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown direction '{0}', expected c2k or k2c")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "c2k" | "modern" | "modern-to-script" => Ok(Direction::ModernToScript),
            "k2c" | "script" | "script-to-modern" => Ok(Direction::ScriptToModern),
            other => Err(ParseDirectionError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub surface: String,
    pub position: usize,
}

/// Ranked, formatted retrieval output handed to the completion service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextBlock {
    pub text: String,
    pub match_count: usize,
    pub matched_tokens: Vec<String>,
}

impl ContextBlock {
    pub fn is_empty(&self) -> bool {
        self.match_count == 0
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }
}

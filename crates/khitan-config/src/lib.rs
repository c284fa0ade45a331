use std::env;

use khitan_core::Direction;
use serde::{Deserialize, Serialize};

use self::completion::CompletionConfig;
use self::glossary::GlossaryConfig;
use self::history::HistoryConfig;

pub mod completion;
pub mod glossary;
pub mod history;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub completion: CompletionConfig,
    pub glossary: GlossaryConfig,
    pub history: HistoryConfig,

    /// Direction used when a query does not name one
    pub default_direction: Direction,
}

impl Config {
    /// Defaults with environment overrides applied
    pub fn new() -> Self {
        let default_direction = env::var("KHITAN_DIRECTION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();

        Config {
            completion: CompletionConfig::new(),
            glossary: GlossaryConfig::new(),
            history: HistoryConfig::new(),

            default_direction,
        }
    }

    /// Fill an empty credential from the environment. File-based profiles
    /// usually leave the key out.
    pub fn with_env_credential(mut self) -> Self {
        if !self.completion.has_credential() {
            if let Ok(key) = env::var("DEEPSEEK_API_KEY") {
                self.completion.api_key = key;
            }
        }
        self
    }
}

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_path() -> PathBuf {
    PathBuf::from("khitan_history.json")
}

fn default_capacity() -> usize {
    30
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct HistoryConfig {
    #[serde(default = "default_path")]
    pub path: PathBuf,
    /// Most-recent records kept on insert
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl HistoryConfig {
    pub fn new() -> Self {
        let path = env::var("KHITAN_HISTORY_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_path());

        Self {
            path,
            capacity: default_capacity(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            capacity: default_capacity(),
        }
    }
}

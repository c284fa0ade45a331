use chrono::Local;
use khitan_core::Direction;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Display precision for record timestamps
pub const TIMESTAMP_FORMAT: &str = "%m-%d %H:%M";

/// One past query and its answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: String,
    pub query: String,
    pub mode: Direction,
    pub result: String,
    /// Context lines supplied to the completion service
    pub context_count: usize,
    pub timestamp: String,
}

impl HistoryRecord {
    pub fn new(query: &str, mode: Direction, result: &str, context_count: usize) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            query: query.to_string(),
            mode,
            result: result.to_string(),
            context_count,
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    /// Short label for list views, at most `max_chars` characters of the query
    pub fn label(&self, max_chars: usize) -> String {
        if self.query.chars().count() > max_chars {
            let head: String = self.query.chars().take(max_chars).collect();
            format!("{head}..")
        } else {
            self.query.clone()
        }
    }
}

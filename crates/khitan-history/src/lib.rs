mod record;
mod store;

pub use record::{HistoryRecord, TIMESTAMP_FORMAT};
pub use store::{HistoryError, HistoryRepository, JsonHistoryStore};

/// Records kept when no capacity is configured
pub const DEFAULT_CAPACITY: usize = 30;

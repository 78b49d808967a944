//! Comparison history
//! Persists one record per compared pair and archives the compared files

pub mod files;
pub mod store;

pub use files::FileStore;
pub use store::{BatchSummary, ComparisonRecord, HistoryPage, HistoryQuery, HistoryStore};

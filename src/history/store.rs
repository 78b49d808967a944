//! JSON-file-backed comparison history

use crate::error::{ContractDifferError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// One compared pair of documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub batch_id: String,
    pub original_filename: String,
    pub original_file_path: String,
    pub target_filename: String,
    pub target_file_path: String,
    pub create_time: DateTime<Utc>,
}

impl ComparisonRecord {
    pub fn new(
        original_filename: impl Into<String>,
        original_file_path: impl Into<String>,
        target_filename: impl Into<String>,
        target_file_path: impl Into<String>,
    ) -> Self {
        Self {
            batch_id: String::new(),
            original_filename: original_filename.into(),
            original_file_path: original_file_path.into(),
            target_filename: target_filename.into(),
            target_file_path: target_file_path.into(),
            create_time: Utc::now(),
        }
    }
}

/// Listing filter and pagination.
#[derive(Debug, Clone)]
pub struct HistoryQuery {
    pub page: usize,
    pub size: usize,
    /// Substring match against either file name
    pub filename: Option<String>,
    /// Inclusive creation date range
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            page: 1,
            size: 10,
            filename: None,
            start_date: None,
            end_date: None,
        }
    }
}

/// One batch of compared pairs, grouped for listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    pub batch_id: String,
    pub create_time: DateTime<Utc>,
    pub original_filenames: Vec<String>,
    pub target_filenames: Vec<String>,
}

/// One page of history listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryPage {
    pub records: Vec<BatchSummary>,
    pub total: usize,
    pub current: usize,
    pub size: usize,
    pub pages: usize,
}

/// History persisted as a single JSON file under the data directory.
pub struct HistoryStore {
    records_path: PathBuf,
}

impl HistoryStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            records_path: data_dir.join("records.json"),
        }
    }

    fn load(&self) -> Result<Vec<ComparisonRecord>> {
        if !self.records_path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.records_path)?;
        let records = serde_json::from_str(&content).map_err(|e| {
            ContractDifferError::Storage(format!(
                "Failed to parse {}: {}",
                self.records_path.display(),
                e
            ))
        })?;
        Ok(records)
    }

    fn persist(&self, records: &[ComparisonRecord]) -> Result<()> {
        if let Some(parent) = self.records_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(records)?;
        std::fs::write(&self.records_path, content)?;
        Ok(())
    }

    /// Append one record, assigning a batch id when absent and stamping
    /// the creation time.
    pub fn record(&self, mut record: ComparisonRecord) -> Result<ComparisonRecord> {
        if record.batch_id.is_empty() {
            record.batch_id = Uuid::new_v4().simple().to_string();
        }
        record.create_time = Utc::now();

        let mut records = self.load()?;
        records.push(record.clone());
        self.persist(&records)?;

        Ok(record)
    }

    /// List past comparisons grouped by batch, newest first, with
    /// filename and date filtering.
    pub fn list(&self, query: &HistoryQuery) -> Result<HistoryPage> {
        let size = query.size.max(1);
        let page = query.page.max(1);

        let records = self.load()?;
        let filtered = records.iter().filter(|r| matches_query(r, query));

        // Group by batch: earliest creation time, distinct sorted names.
        let mut batches: BTreeMap<String, (DateTime<Utc>, BTreeSet<String>, BTreeSet<String>)> =
            BTreeMap::new();
        for record in filtered {
            let entry = batches
                .entry(record.batch_id.clone())
                .or_insert_with(|| (record.create_time, BTreeSet::new(), BTreeSet::new()));
            entry.0 = entry.0.min(record.create_time);
            entry.1.insert(record.original_filename.clone());
            entry.2.insert(record.target_filename.clone());
        }

        let mut summaries: Vec<BatchSummary> = batches
            .into_iter()
            .map(|(batch_id, (create_time, originals, targets))| BatchSummary {
                batch_id,
                create_time,
                original_filenames: originals.into_iter().collect(),
                target_filenames: targets.into_iter().collect(),
            })
            .collect();
        summaries.sort_by(|a, b| {
            b.create_time
                .cmp(&a.create_time)
                .then_with(|| a.batch_id.cmp(&b.batch_id))
        });

        let total = summaries.len();
        let pages = (total + size - 1) / size;
        let offset = (page - 1) * size;
        let records = summaries
            .into_iter()
            .skip(offset)
            .take(size)
            .collect();

        Ok(HistoryPage {
            records,
            total,
            current: page,
            size,
            pages,
        })
    }

    /// All records of one batch, in insertion order.
    pub fn batch(&self, batch_id: &str) -> Result<Vec<ComparisonRecord>> {
        let records = self.load()?;
        Ok(records
            .into_iter()
            .filter(|r| r.batch_id == batch_id)
            .collect())
    }
}

fn matches_query(record: &ComparisonRecord, query: &HistoryQuery) -> bool {
    if let Some(filename) = &query.filename {
        if !record.original_filename.contains(filename)
            && !record.target_filename.contains(filename)
        {
            return false;
        }
    }
    let date = record.create_time.date_naive();
    if let Some(start) = query.start_date {
        if date < start {
            return false;
        }
    }
    if let Some(end) = query.end_date {
        if date > end {
            return false;
        }
    }
    true
}

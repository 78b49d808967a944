//! Comparison report structures

use crate::diff;
use crate::extract::ExtractionWarning;
use crate::pipeline::Comparison;
use crate::present::{segments, DisplaySegment, SegmentKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary statistics derived from the edit script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffStats {
    pub unchanged_chars: usize,
    pub inserted_chars: usize,
    pub deleted_chars: usize,
    /// Edit distance implied by the script
    pub levenshtein: usize,
    /// 1.0 for identical documents, 0.0 for completely rewritten
    pub similarity: f64,
}

impl DiffStats {
    pub fn from_segments(segments: &[DisplaySegment], levenshtein: usize) -> Self {
        let mut unchanged_chars = 0;
        let mut inserted_chars = 0;
        let mut deleted_chars = 0;

        for segment in segments {
            let chars = segment.text.chars().count();
            match segment.kind {
                SegmentKind::Unchanged => unchanged_chars += chars,
                SegmentKind::Inserted => inserted_chars += chars,
                SegmentKind::Deleted => deleted_chars += chars,
            }
        }

        let before_len = unchanged_chars + deleted_chars;
        let after_len = unchanged_chars + inserted_chars;
        let longest = before_len.max(after_len);
        let similarity = if longest == 0 {
            1.0
        } else {
            1.0 - levenshtein as f64 / longest as f64
        };

        Self {
            unchanged_chars,
            inserted_chars,
            deleted_chars,
            levenshtein,
            similarity,
        }
    }
}

/// Full result of one comparison run, ready for any formatter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub original_name: String,
    pub target_name: String,
    pub segments: Vec<DisplaySegment>,
    pub stats: DiffStats,
    pub original_warnings: Vec<ExtractionWarning>,
    pub target_warnings: Vec<ExtractionWarning>,
    pub generated_at: DateTime<Utc>,
    pub processing_time_ms: u64,
    pub version: String,
}

impl ComparisonReport {
    pub fn new(comparison: &Comparison, processing_time_ms: u64) -> Self {
        let segments = segments(comparison);
        let stats = DiffStats::from_segments(&segments, diff::levenshtein(&comparison.ops));

        Self {
            original_name: comparison.original_name.clone(),
            target_name: comparison.target_name.clone(),
            segments,
            stats,
            original_warnings: comparison.original.warnings.clone(),
            target_warnings: comparison.target.warnings.clone(),
            generated_at: Utc::now(),
            processing_time_ms,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// True when the two documents extracted to identical text.
    pub fn is_identical(&self) -> bool {
        self.stats.inserted_chars == 0 && self.stats.deleted_chars == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(kind: SegmentKind, text: &str) -> DisplaySegment {
        DisplaySegment {
            text: text.to_string(),
            kind,
        }
    }

    #[test]
    fn test_stats_counts() {
        let segs = vec![
            segment(SegmentKind::Unchanged, "Hello "),
            segment(SegmentKind::Inserted, "brave "),
            segment(SegmentKind::Unchanged, "world"),
        ];
        let stats = DiffStats::from_segments(&segs, 6);
        assert_eq!(stats.unchanged_chars, 11);
        assert_eq!(stats.inserted_chars, 6);
        assert_eq!(stats.deleted_chars, 0);
        // 6 of 17 chars changed
        assert!((stats.similarity - (1.0 - 6.0 / 17.0)).abs() < 1e-9);
    }

    #[test]
    fn test_stats_identical() {
        let segs = vec![segment(SegmentKind::Unchanged, "same text")];
        let stats = DiffStats::from_segments(&segs, 0);
        assert_eq!(stats.similarity, 1.0);
    }

    #[test]
    fn test_stats_empty() {
        let stats = DiffStats::from_segments(&[], 0);
        assert_eq!(stats.similarity, 1.0);
        assert_eq!(stats.levenshtein, 0);
    }
}

//! Comparison pipeline orchestration
//!
//! One comparison flows Extractor -> Differ -> Presenter. The two
//! extractions are independent pure computations and run concurrently;
//! the diff is the join point. The whole run sits under a caller-level
//! timeout, and a failure on either side aborts the comparison with an
//! error naming that side.

use crate::config::Config;
use crate::diff::{self, DiffOp, DiffOptions};
use crate::error::{ContractDifferError, Result, Side};
use crate::extract::{ExtractedText, ExtractionOptions};
use crate::input::manager::InputManager;
use crate::input::Document;
use log::{debug, info};
use std::path::Path;
use std::time::Duration;

/// Result of one comparison: the edit script plus owned copies of both
/// extracted texts. Holds no reference to the source documents.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub ops: Vec<DiffOp>,
    pub original: ExtractedText,
    pub target: ExtractedText,
    pub original_name: String,
    pub target_name: String,
}

/// Library entry point for running comparisons.
pub struct Comparer {
    extraction: ExtractionOptions,
    diff_options: DiffOptions,
    timeout_secs: u64,
}

impl Comparer {
    pub fn new(config: &Config) -> Self {
        Self {
            extraction: ExtractionOptions::from(&config.extraction),
            diff_options: DiffOptions::from(&config.diff),
            timeout_secs: config.diff.timeout_secs,
        }
    }

    pub fn with_diff_options(mut self, diff_options: DiffOptions) -> Self {
        self.diff_options = diff_options;
        self
    }

    /// Compare the documents at two paths.
    pub async fn compare(&self, original: &Path, target: &Path) -> Result<Comparison> {
        match tokio::time::timeout(
            Duration::from_secs(self.timeout_secs),
            self.run(original, target),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(ContractDifferError::Timeout(self.timeout_secs)),
        }
    }

    async fn run(&self, original: &Path, target: &Path) -> Result<Comparison> {
        let manager = InputManager::new(self.extraction.clone()).with_cache(false);

        let original_side = async {
            let document = Document::load(original)
                .await
                .map_err(|e| attribute(Side::Original, e))?;
            let name = document.name().to_string();
            let extracted = manager
                .extract_document(&document)
                .map_err(|e| attribute(Side::Original, e))?;
            Ok::<_, ContractDifferError>((name, extracted))
        };

        let target_side = async {
            let document = Document::load(target)
                .await
                .map_err(|e| attribute(Side::Target, e))?;
            let name = document.name().to_string();
            let extracted = manager
                .extract_document(&document)
                .map_err(|e| attribute(Side::Target, e))?;
            Ok::<_, ContractDifferError>((name, extracted))
        };

        // Join point: the differ needs both sides.
        let ((original_name, original_text), (target_name, target_text)) =
            tokio::try_join!(original_side, target_side)?;

        debug!(
            "Extracted {} and {} characters",
            original_text.character_count, target_text.character_count
        );

        let ops = diff::diff(&original_text.text, &target_text.text, &self.diff_options);
        info!(
            "Comparison of '{}' and '{}' produced {} ops",
            original_name,
            target_name,
            ops.len()
        );

        Ok(Comparison {
            ops,
            original: original_text,
            target: target_text,
            original_name,
            target_name,
        })
    }
}

/// Tag a format-level extraction failure with the side it happened on.
/// Input validation errors already carry the file name and pass through.
fn attribute(side: Side, err: ContractDifferError) -> ContractDifferError {
    match err {
        ContractDifferError::Extraction(message) => {
            ContractDifferError::ExtractionFailed { side, message }
        }
        other => other,
    }
}

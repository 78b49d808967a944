//! Text extraction stage
//! Converts a loaded document into plain text plus non-fatal warnings

pub mod docx;
pub mod pdf;
pub mod plain;

pub use docx::DocxExtractor;
pub use pdf::PdfExtractor;
pub use plain::{MarkdownExtractor, PlainTextExtractor};

use crate::config::ExtractionConfig;
use crate::error::Result;
use crate::input::Document;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Options recognized by every extractor.
#[derive(Debug, Clone)]
pub struct ExtractionOptions {
    /// Strips zero-content paragraphs from the output
    pub ignore_empty_paragraphs: bool,
    /// Includes DOCX table cell text in the output
    pub include_tables: bool,
    /// Normalizes CRLF/CR line endings to LF
    pub normalize_line_endings: bool,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            ignore_empty_paragraphs: true,
            include_tables: true,
            normalize_line_endings: true,
        }
    }
}

impl From<&ExtractionConfig> for ExtractionOptions {
    fn from(config: &ExtractionConfig) -> Self {
        Self {
            ignore_empty_paragraphs: config.ignore_empty_paragraphs,
            include_tables: config.include_tables,
            normalize_line_endings: config.normalize_line_endings,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// An embedded image was excluded from the text output
    ImageSkipped,
    /// Table content was present but excluded by options
    TableSkipped,
    /// Invalid byte sequences were replaced during decoding
    InvalidEncoding,
    /// The document parsed but produced no text
    EmptyDocument,
}

/// A non-fatal problem encountered while extracting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionWarning {
    pub kind: WarningKind,
    pub message: String,
}

impl ExtractionWarning {
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }
}

/// Text extracted from exactly one document. Holds no reference back to
/// the source bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedText {
    pub text: String,
    pub warnings: Vec<ExtractionWarning>,
    pub word_count: usize,
    pub character_count: usize,
}

impl ExtractedText {
    pub fn new(text: String, warnings: Vec<ExtractionWarning>) -> Self {
        let word_count = text.unicode_words().count();
        let character_count = text.chars().count();
        Self { text, warnings, word_count, character_count }
    }
}

pub trait TextExtractor {
    /// Pure transformation of a document buffer into text. No I/O.
    fn extract(&self, document: &Document, options: &ExtractionOptions) -> Result<ExtractedText>;
}

/// Shared post-processing applied by the text-based extractors.
pub(crate) fn postprocess(text: String, options: &ExtractionOptions) -> String {
    let text = if options.normalize_line_endings {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text
    };

    if options.ignore_empty_paragraphs {
        text.lines()
            .filter(|line| !line.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracted_text_counts() {
        let extracted = ExtractedText::new("Hello brave world".to_string(), Vec::new());
        assert_eq!(extracted.word_count, 3);
        assert_eq!(extracted.character_count, 17);
        assert!(extracted.warnings.is_empty());
    }

    #[test]
    fn test_postprocess_normalizes_endings() {
        let options = ExtractionOptions {
            ignore_empty_paragraphs: false,
            ..Default::default()
        };
        assert_eq!(postprocess("a\r\nb\rc".to_string(), &options), "a\nb\nc");
    }

    #[test]
    fn test_postprocess_strips_empty_paragraphs() {
        let options = ExtractionOptions::default();
        assert_eq!(postprocess("a\n\n\nb\n \nc".to_string(), &options), "a\nb\nc");
    }
}

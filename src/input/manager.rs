//! Input manager for handling different document formats

use crate::error::{ContractDifferError, Result};
use crate::extract::{
    DocxExtractor, ExtractedText, ExtractionOptions, MarkdownExtractor, PdfExtractor,
    PlainTextExtractor, TextExtractor,
};
use crate::input::document::Document;
use crate::input::file_detector::DocumentFormat;
use log::info;
use std::collections::HashMap;
use std::path::Path;

pub struct InputManager {
    options: ExtractionOptions,
    cache: HashMap<String, ExtractedText>,
    enable_cache: bool,
}

impl InputManager {
    pub fn new(options: ExtractionOptions) -> Self {
        Self {
            options,
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    /// Load a document from disk and extract its text, with caching.
    pub async fn extract_from_path(&mut self, path: &Path) -> Result<ExtractedText> {
        let path_str = path.to_string_lossy().to_string();

        if self.enable_cache {
            if let Some(cached) = self.cache.get(&path_str) {
                info!("Using cached text for: {}", path.display());
                return Ok(cached.clone());
            }
        }

        let document = Document::load(path).await?;
        let extracted = self.extract_document(&document)?;

        if self.enable_cache {
            self.cache.insert(path_str, extracted.clone());
        }

        Ok(extracted)
    }

    /// Route a loaded document to the extractor for its format.
    pub fn extract_document(&self, document: &Document) -> Result<ExtractedText> {
        match document.format() {
            DocumentFormat::Docx => {
                info!("Extracting text from DOCX: {}", document.name());
                DocxExtractor.extract(document, &self.options)
            }
            DocumentFormat::Pdf => {
                info!("Extracting text from PDF: {}", document.name());
                PdfExtractor.extract(document, &self.options)
            }
            DocumentFormat::PlainText => {
                info!("Reading plain text document: {}", document.name());
                PlainTextExtractor.extract(document, &self.options)
            }
            DocumentFormat::Markdown => {
                info!("Processing markdown document: {}", document.name());
                MarkdownExtractor.extract(document, &self.options)
            }
            DocumentFormat::Unknown => Err(ContractDifferError::UnsupportedFormat(format!(
                "Unsupported document format for: {}",
                document.name()
            ))),
        }
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

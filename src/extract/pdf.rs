//! PDF text extraction

use crate::error::{ContractDifferError, Result};
use crate::extract::{
    postprocess, ExtractedText, ExtractionOptions, ExtractionWarning, TextExtractor, WarningKind,
};
use crate::input::Document;

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, document: &Document, options: &ExtractionOptions) -> Result<ExtractedText> {
        let text = pdf_extract::extract_text_from_mem(document.bytes()).map_err(|e| {
            ContractDifferError::Extraction(format!(
                "Failed to extract text from PDF '{}': {}",
                document.name(),
                e
            ))
        })?;

        let text = postprocess(text, options);

        let mut warnings = Vec::new();
        if text.trim().is_empty() {
            // Image-only PDFs parse fine but carry no text layer
            warnings.push(ExtractionWarning::new(
                WarningKind::EmptyDocument,
                format!("'{}' contains no extractable text", document.name()),
            ));
        }

        Ok(ExtractedText::new(text, warnings))
    }
}

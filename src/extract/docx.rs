//! DOCX text extraction
//!
//! A .docx file is a ZIP archive of XML parts; the docx-rs crate parses it
//! into a typed tree (Document -> Paragraph -> Run -> Text) that we walk,
//! collecting text nodes paragraph by paragraph.

use crate::error::{ContractDifferError, Result};
use crate::extract::{
    postprocess, ExtractedText, ExtractionOptions, ExtractionWarning, TextExtractor, WarningKind,
};
use crate::input::file_detector::OLE_MAGIC;
use crate::input::Document;
use docx_rs::{DocumentChild, ParagraphChild, RunChild, TableCellContent, TableChild, TableRowChild};

pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    fn extract(&self, document: &Document, options: &ExtractionOptions) -> Result<ExtractedText> {
        let bytes = document.bytes();

        // Legacy .doc and password-protected OOXML share the OLE container
        // format; neither holds readable OOXML parts.
        if bytes.starts_with(OLE_MAGIC) {
            return Err(ContractDifferError::Extraction(format!(
                "'{}' is an OLE compound file (legacy .doc or password-protected); only plain .docx can be read",
                document.name()
            )));
        }

        let docx = docx_rs::read_docx(bytes).map_err(|e| {
            ContractDifferError::Extraction(format!(
                "Failed to parse DOCX '{}': {}",
                document.name(),
                e
            ))
        })?;

        let mut warnings = Vec::new();
        let mut paragraphs: Vec<String> = Vec::new();

        for child in &docx.document.children {
            match child {
                DocumentChild::Paragraph(p) => {
                    paragraphs.push(paragraph_text(&p.children, &mut warnings));
                }
                DocumentChild::Table(t) => {
                    if options.include_tables {
                        collect_table(t, &mut paragraphs, &mut warnings);
                    } else {
                        warnings.push(ExtractionWarning::new(
                            WarningKind::TableSkipped,
                            "table content excluded by options",
                        ));
                    }
                }
                _ => {}
            }
        }

        let text = postprocess(paragraphs.join("\n"), options);

        if text.trim().is_empty() {
            warnings.push(ExtractionWarning::new(
                WarningKind::EmptyDocument,
                format!("'{}' contains no extractable text", document.name()),
            ));
        }

        Ok(ExtractedText::new(text, warnings))
    }
}

/// Collect the text of one paragraph. Tabs and breaks become whitespace;
/// images are excluded and surfaced as warnings.
fn paragraph_text(children: &[ParagraphChild], warnings: &mut Vec<ExtractionWarning>) -> String {
    let mut text = String::new();

    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    match run_child {
                        RunChild::Text(t) => text.push_str(&t.text),
                        RunChild::Tab(_) => text.push('\t'),
                        RunChild::Break(_) => text.push('\n'),
                        RunChild::Drawing(_) => {
                            warnings.push(ExtractionWarning::new(
                                WarningKind::ImageSkipped,
                                "embedded image excluded from text output",
                            ));
                        }
                        _ => {}
                    }
                }
            }
            // Hyperlinks wrap ordinary runs
            ParagraphChild::Hyperlink(link) => {
                text.push_str(&paragraph_text(&link.children, warnings));
            }
            _ => {}
        }
    }

    text
}

/// Flatten a table row by row: cells joined with tabs, one line per row.
fn collect_table(
    table: &docx_rs::Table,
    out: &mut Vec<String>,
    warnings: &mut Vec<ExtractionWarning>,
) {
    for row_child in &table.rows {
        if let TableChild::TableRow(row) = row_child {
            let mut cells = Vec::new();
            for cell_child in &row.cells {
                if let TableRowChild::TableCell(cell) = cell_child {
                    let mut cell_text = Vec::new();
                    for content in &cell.children {
                        if let TableCellContent::Paragraph(p) = content {
                            cell_text.push(paragraph_text(&p.children, warnings));
                        }
                    }
                    cells.push(cell_text.join(" "));
                }
            }
            out.push(cells.join("\t"));
        }
    }
}

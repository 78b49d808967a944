//! Plain text and Markdown extraction

use crate::error::Result;
use crate::extract::{
    postprocess, ExtractedText, ExtractionOptions, ExtractionWarning, TextExtractor, WarningKind,
};
use crate::input::Document;
use pulldown_cmark::{html, Parser};

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, document: &Document, options: &ExtractionOptions) -> Result<ExtractedText> {
        let (text, warnings) = decode_utf8(document);
        Ok(ExtractedText::new(postprocess(text, options), warnings))
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    fn extract(&self, document: &Document, options: &ExtractionOptions) -> Result<ExtractedText> {
        let (markdown_content, warnings) = decode_utf8(document);

        let parser = Parser::new(&markdown_content);
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);

        let text = html_to_text(&html_output);
        Ok(ExtractedText::new(postprocess(text, options), warnings))
    }
}

/// Lossy UTF-8 decode; replacement characters are surfaced as a warning,
/// never a failure.
fn decode_utf8(document: &Document) -> (String, Vec<ExtractionWarning>) {
    match String::from_utf8(document.bytes().to_vec()) {
        Ok(text) => (text, Vec::new()),
        Err(e) => {
            let text = String::from_utf8_lossy(e.as_bytes()).into_owned();
            let warnings = vec![ExtractionWarning::new(
                WarningKind::InvalidEncoding,
                format!("'{}' contains invalid UTF-8; offending bytes were replaced", document.name()),
            )];
            (text, warnings)
        }
    }
}

fn html_to_text(html: &str) -> String {
    let text = html
        .replace("<br>", "\n")
        .replace("</p>", "\n\n")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");

    let re = regex::Regex::new(r"<[^>]*>").unwrap();
    let clean_text = re.replace_all(&text, "");

    let lines: Vec<String> = clean_text
        .lines()
        .map(|line| line.trim().to_string())
        .collect();

    lines.join("\n")
}

//! Output formatters for comparison reports

use crate::config::OutputFormat;
use crate::error::{ContractDifferError, Result};
use crate::present::report::ComparisonReport;
use crate::present::{DisplaySegment, SegmentKind};
use askama::Template;
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for formatting comparison reports
pub trait OutputFormatter {
    fn format_report(&self, report: &ComparisonReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with inline change markup
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for API integration and structured data
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for documentation and reports
pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// HTML formatter with ins/del styling
pub struct HtmlFormatter {
    include_styles: bool,
}

/// Report generator that coordinates different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
}

/// Askama template for HTML output
#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Document Comparison Report</title>
    {% if include_styles %}
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.6;
            color: #333;
            max-width: 900px;
            margin: 0 auto;
            padding: 20px;
            background: #f8f9fa;
        }
        .container {
            background: white;
            padding: 30px;
            border-radius: 8px;
            box-shadow: 0 2px 10px rgba(0,0,0,0.1);
        }
        .header {
            text-align: center;
            margin-bottom: 30px;
            border-bottom: 3px solid #007acc;
            padding-bottom: 20px;
        }
        .summary {
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
            gap: 15px;
            margin: 20px 0;
        }
        .summary-item {
            background: #f8f9fa;
            padding: 15px;
            border-radius: 6px;
            border-left: 4px solid #007acc;
        }
        .diff-body {
            background: #fff;
            border: 1px solid #e9ecef;
            border-radius: 6px;
            padding: 20px;
            white-space: pre-wrap;
            font-family: 'SFMono-Regular', Consolas, monospace;
            font-size: 0.95em;
        }
        .diff-body ins {
            background: #d4f8d4;
            color: #1a7f37;
            text-decoration: none;
        }
        .diff-body del {
            background: #ffd7d5;
            color: #cf222e;
        }
        .warnings {
            background: #fff8e1;
            border-left: 4px solid #ffc107;
            padding: 15px;
            border-radius: 6px;
            margin: 15px 0;
        }
        .metadata {
            background: #e9ecef;
            padding: 15px;
            border-radius: 6px;
            margin-top: 30px;
            font-size: 0.9em;
            color: #6c757d;
        }
    </style>
    {% endif %}
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>Document Comparison Report</h1>
            <p>{{ original_name }} → {{ target_name }}</p>
            <p>Generated: {{ generated_at }} | Processing time: {{ processing_time }}ms</p>
        </div>

        <div class="summary">
            <div class="summary-item">
                <h4>Similarity</h4>
                <p><strong>{{ similarity }}%</strong></p>
            </div>
            <div class="summary-item">
                <h4>Inserted</h4>
                <p><strong>{{ inserted_chars }}</strong> characters</p>
            </div>
            <div class="summary-item">
                <h4>Deleted</h4>
                <p><strong>{{ deleted_chars }}</strong> characters</p>
            </div>
            <div class="summary-item">
                <h4>Unchanged</h4>
                <p><strong>{{ unchanged_chars }}</strong> characters</p>
            </div>
        </div>

        {% if has_warnings %}
        <div class="warnings">
            {{ warnings_html | safe }}
        </div>
        {% endif %}

        <div class="diff-body">{{ body_html | safe }}</div>

        <div class="metadata">
            <p><strong>Generated by contract-differ v{{ version }}</strong></p>
            <p><strong>Original:</strong> {{ original_name }} | <strong>Target:</strong> {{ target_name }}</p>
        </div>
    </div>
</body>
</html>"#, ext = "html")]
struct HtmlTemplate {
    include_styles: bool,
    original_name: String,
    target_name: String,
    generated_at: String,
    processing_time: u64,
    similarity: String,
    inserted_chars: usize,
    deleted_chars: usize,
    unchanged_chars: usize,
    has_warnings: bool,
    warnings_html: String,
    body_html: String,
    version: String,
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    /// Inline markup for one segment. Without colors, wdiff-style
    /// markers keep insertions and deletions readable.
    fn format_segment(&self, segment: &DisplaySegment) -> String {
        match segment.kind {
            SegmentKind::Unchanged => segment.text.clone(),
            SegmentKind::Inserted => {
                if self.use_colors {
                    segment.text.color(Color::Green).underline().to_string()
                } else {
                    format!("{{+{}+}}", segment.text)
                }
            }
            SegmentKind::Deleted => {
                if self.use_colors {
                    segment.text.color(Color::Red).strikethrough().to_string()
                } else {
                    format!("[-{}-]", segment.text)
                }
            }
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &ComparisonReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.colorize(
            &format!(
                "\n█ Comparison: {} → {}\n",
                report.original_name, report.target_name
            ),
            Color::Blue,
        ));

        output.push_str(&format!(
            "  Similarity: {:.1}%  (+{} / -{} characters, {} unchanged)\n",
            report.stats.similarity * 100.0,
            report.stats.inserted_chars,
            report.stats.deleted_chars,
            report.stats.unchanged_chars,
        ));

        for warning in report
            .original_warnings
            .iter()
            .chain(report.target_warnings.iter())
        {
            output.push_str(&self.colorize(
                &format!("  ⚠ {}\n", warning.message),
                Color::Yellow,
            ));
        }

        if report.is_identical() {
            output.push_str(&self.colorize("\n  Documents are identical.\n", Color::Green));
            return Ok(output);
        }

        output.push('\n');
        for segment in &report.segments {
            output.push_str(&self.format_segment(segment));
        }
        output.push('\n');

        if self.detailed {
            output.push_str(&self.colorize("\n▓ Segments\n", Color::Green));
            for (i, segment) in report.segments.iter().enumerate() {
                let label = match segment.kind {
                    SegmentKind::Unchanged => "  ",
                    SegmentKind::Inserted => "+ ",
                    SegmentKind::Deleted => "- ",
                };
                output.push_str(&format!(
                    "  {:>3}. {}{:?}\n",
                    i + 1,
                    label,
                    segment.text
                ));
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &ComparisonReport) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        Ok(json)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &ComparisonReport) -> Result<String> {
        let mut output = String::new();

        output.push_str("# Document Comparison Report\n\n");
        output.push_str(&format!(
            "**{}** → **{}**\n\n",
            report.original_name, report.target_name
        ));
        output.push_str(&format!(
            "- Similarity: {:.1}%\n- Inserted: {} characters\n- Deleted: {} characters\n- Unchanged: {} characters\n\n",
            report.stats.similarity * 100.0,
            report.stats.inserted_chars,
            report.stats.deleted_chars,
            report.stats.unchanged_chars,
        ));

        let all_warnings: Vec<_> = report
            .original_warnings
            .iter()
            .chain(report.target_warnings.iter())
            .collect();
        if !all_warnings.is_empty() {
            output.push_str("## Warnings\n\n");
            for warning in all_warnings {
                output.push_str(&format!("- {}\n", warning.message));
            }
            output.push('\n');
        }

        output.push_str("## Changes\n\n");
        for segment in &report.segments {
            match segment.kind {
                SegmentKind::Unchanged => output.push_str(&segment.text),
                SegmentKind::Inserted => {
                    output.push_str(&format!("**{}**", segment.text));
                }
                SegmentKind::Deleted => {
                    output.push_str(&format!("~~{}~~", segment.text));
                }
            }
        }
        output.push('\n');

        if self.include_metadata {
            output.push_str(&format!(
                "\n---\nGenerated by contract-differ v{} at {} in {}ms\n",
                report.version, report.generated_at, report.processing_time_ms,
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl HtmlFormatter {
    pub fn new(include_styles: bool) -> Self {
        Self { include_styles }
    }

    fn body_html(segments: &[DisplaySegment]) -> String {
        let mut body = String::new();
        for segment in segments {
            let escaped = escape_html(&segment.text);
            match segment.kind {
                SegmentKind::Unchanged => body.push_str(&escaped),
                SegmentKind::Inserted => {
                    body.push_str(&format!("<ins>{}</ins>", escaped));
                }
                SegmentKind::Deleted => {
                    body.push_str(&format!("<del>{}</del>", escaped));
                }
            }
        }
        body
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_report(&self, report: &ComparisonReport) -> Result<String> {
        let warnings: Vec<String> = report
            .original_warnings
            .iter()
            .chain(report.target_warnings.iter())
            .map(|w| format!("<p>⚠ {}</p>", escape_html(&w.message)))
            .collect();

        let template = HtmlTemplate {
            include_styles: self.include_styles,
            original_name: report.original_name.clone(),
            target_name: report.target_name.clone(),
            generated_at: report.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            processing_time: report.processing_time_ms,
            similarity: format!("{:.1}", report.stats.similarity * 100.0),
            inserted_chars: report.stats.inserted_chars,
            deleted_chars: report.stats.deleted_chars,
            unchanged_chars: report.stats.unchanged_chars,
            has_warnings: !warnings.is_empty(),
            warnings_html: warnings.join("\n"),
            body_html: Self::body_html(&report.segments),
            version: report.version.clone(),
        };

        template
            .render()
            .map_err(|e| ContractDifferError::OutputFormatting(format!("HTML rendering failed: {}", e)))
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Html
    }
}

impl ReportGenerator {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
            html_formatter: HtmlFormatter::new(true),
        }
    }

    pub fn generate(&self, report: &ComparisonReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
            OutputFormat::Html => self.html_formatter.format_report(report),
        }
    }

    pub fn save_to_file(
        &self,
        report: &ComparisonReport,
        format: &OutputFormat,
        path: &Path,
    ) -> Result<()> {
        let content = self.generate(report, format)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff;
    use crate::extract::ExtractedText;
    use crate::pipeline::Comparison;

    fn sample_report() -> ComparisonReport {
        let a = "Hello world";
        let b = "Hello brave world";
        let comparison = Comparison {
            ops: diff::diff(a, b, &Default::default()),
            original: ExtractedText::new(a.to_string(), Vec::new()),
            target: ExtractedText::new(b.to_string(), Vec::new()),
            original_name: "old.docx".to_string(),
            target_name: "new.docx".to_string(),
        };
        ComparisonReport::new(&comparison, 7)
    }

    #[test]
    fn test_console_plain_markers() {
        let report = sample_report();
        let output = ConsoleFormatter::new(false, false)
            .format_report(&report)
            .unwrap();
        assert!(output.contains("{+brave +}"));
        assert!(output.contains("Hello "));
        assert!(output.contains("old.docx"));
    }

    #[test]
    fn test_json_round_trips() {
        let report = sample_report();
        let output = JsonFormatter::new(true).format_report(&report).unwrap();
        let parsed: ComparisonReport = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.segments, report.segments);
        assert_eq!(parsed.stats.inserted_chars, 6);
    }

    #[test]
    fn test_markdown_marks_changes() {
        let report = sample_report();
        let output = MarkdownFormatter::new(false).format_report(&report).unwrap();
        assert!(output.contains("**brave **"));
        assert!(!output.contains("Generated by"));
    }

    #[test]
    fn test_html_wraps_insertions() {
        let report = sample_report();
        let output = HtmlFormatter::new(true).format_report(&report).unwrap();
        assert!(output.contains("<ins>brave </ins>"));
        assert!(output.contains("old.docx"));
        assert!(output.contains("<style>"));
    }

    #[test]
    fn test_html_escapes_content() {
        let a = "safe";
        let b = "<script>alert(1)</script>";
        let comparison = Comparison {
            ops: diff::diff(a, b, &Default::default()),
            original: ExtractedText::new(a.to_string(), Vec::new()),
            target: ExtractedText::new(b.to_string(), Vec::new()),
            original_name: "a".to_string(),
            target_name: "b".to_string(),
        };
        let report = ComparisonReport::new(&comparison, 0);
        let output = HtmlFormatter::new(false).format_report(&report).unwrap();
        assert!(!output.contains("<script>alert"));
        assert!(output.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_generator_dispatch() {
        let report = sample_report();
        let generator = ReportGenerator::new(false, false);
        for format in [
            OutputFormat::Console,
            OutputFormat::Json,
            OutputFormat::Markdown,
            OutputFormat::Html,
        ] {
            assert!(generator.generate(&report, &format).is_ok());
        }
    }
}

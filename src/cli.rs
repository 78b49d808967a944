//! CLI interface for the contract differ

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "contract-differ")]
#[command(about = "Word document comparison tool")]
#[command(long_about = "Compare two contract documents, highlight insertions and deletions, and keep a searchable comparison history")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare two documents
    Compare {
        /// Path to the original document (DOCX, PDF, TXT, MD)
        #[arg(short, long)]
        original: PathBuf,

        /// Path to the revised document (DOCX, PDF, TXT, MD)
        #[arg(short, long)]
        target: PathBuf,

        /// Output format: console, json, markdown, html
        #[arg(short, long, default_value = "console")]
        format: String,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Show per-segment detail in console output
        #[arg(short, long)]
        detailed: bool,

        /// Disable the line-level fast path
        #[arg(long)]
        no_checklines: bool,

        /// Skip the semantic and efficiency cleanup passes
        #[arg(long)]
        raw: bool,

        /// Do not record this comparison in the history store
        #[arg(long)]
        no_record: bool,
    },

    /// Comparison history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List past comparisons, newest first
    List {
        /// Page number
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Page size
        #[arg(short, long, default_value_t = 10)]
        size: usize,

        /// Filter by file name substring
        #[arg(short, long)]
        filename: Option<String>,

        /// Start date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        to: Option<String>,
    },

    /// Show the documents of one comparison batch
    Show {
        /// Batch ID
        batch: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(crate::config::OutputFormat::Console),
        "json" => Ok(crate::config::OutputFormat::Json),
        "markdown" | "md" => Ok(crate::config::OutputFormat::Markdown),
        "html" => Ok(crate::config::OutputFormat::Html),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown, html", format)),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &PathBuf, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

//! Contract differ: Word document comparison tool

mod cli;
mod config;
mod diff;
mod error;
mod extract;
mod history;
mod input;
mod pipeline;
mod present;

use chrono::NaiveDate;
use clap::Parser;
use cli::{Cli, Commands, ConfigAction, HistoryAction};
use config::Config;
use error::{ContractDifferError, Result};
use history::{ComparisonRecord, FileStore, HistoryQuery, HistoryStore};
use indicatif::ProgressBar;
use log::{error, info};
use pipeline::Comparer;
use present::{ComparisonReport, ReportGenerator};
use std::path::PathBuf;
use std::process;
use std::time::{Duration, Instant};

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_level)
    ).init();

    // Load configuration
    let config = match cli.config.clone() {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Execute command
    if let Err(e) = run_command(cli.command, config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Compare {
            original,
            target,
            format,
            save,
            detailed,
            no_checklines,
            raw,
            no_record,
        } => {
            info!("Starting document comparison");

            // Validate input files
            let allowed = ["docx", "doc", "pdf", "txt", "md", "markdown"];
            cli::validate_file_extension(&original, &allowed)
                .map_err(|e| ContractDifferError::InvalidInput(format!("Original file: {}", e)))?;
            cli::validate_file_extension(&target, &allowed)
                .map_err(|e| ContractDifferError::InvalidInput(format!("Target file: {}", e)))?;

            // Parse output format
            let output_format = cli::parse_output_format(&format)
                .map_err(ContractDifferError::InvalidInput)?;

            println!("🚀 Document comparison");
            println!("📄 Original: {}", original.display());
            println!("📄 Target: {}", target.display());

            let mut diff_options = diff::DiffOptions::from(&config.diff);
            if no_checklines {
                diff_options.check_lines = false;
            }
            if raw {
                diff_options.semantic_cleanup = false;
                diff_options.efficiency_cleanup = false;
                println!("⚠️  Cleanup passes disabled");
            }

            let comparer = Comparer::new(&config).with_diff_options(diff_options);

            let spinner = ProgressBar::new_spinner();
            spinner.set_message("Extracting and comparing...");
            spinner.enable_steady_tick(Duration::from_millis(100));

            let started = Instant::now();
            let comparison = match comparer.compare(&original, &target).await {
                Ok(comparison) => {
                    spinner.finish_and_clear();
                    comparison
                }
                Err(e) => {
                    spinner.finish_and_clear();
                    return Err(e);
                }
            };
            let elapsed_ms = started.elapsed().as_millis() as u64;

            let report = ComparisonReport::new(&comparison, elapsed_ms);
            let generator = ReportGenerator::new(config.output.color_output, detailed || config.output.detailed);
            let rendered = generator.generate(&report, &output_format)?;

            match &save {
                Some(path) => {
                    generator.save_to_file(&report, &output_format, path)?;
                    println!("💾 Report saved to {}", path.display());
                }
                None => {
                    println!("{}", rendered);
                }
            }

            println!(
                "✅ Comparison complete: {:.1}% similar, +{} / -{} characters in {}ms",
                report.stats.similarity * 100.0,
                report.stats.inserted_chars,
                report.stats.deleted_chars,
                elapsed_ms,
            );

            // Record the run so it shows up in history
            if !no_record {
                let batch_id = record_comparison(&config, &original, &target).await?;
                println!("📝 Recorded as batch {}", batch_id);
            }
        }

        Commands::History { action } => match action {
            HistoryAction::List {
                page,
                size,
                filename,
                from,
                to,
            } => {
                let store = HistoryStore::new(config.data_dir());
                let query = HistoryQuery {
                    page,
                    size,
                    filename,
                    start_date: parse_date(from.as_deref())?,
                    end_date: parse_date(to.as_deref())?,
                };

                let listing = store.list(&query)?;
                println!(
                    "📚 Comparison history (page {}/{}, {} total)\n",
                    listing.current,
                    listing.pages.max(1),
                    listing.total
                );

                if listing.records.is_empty() {
                    println!("  No comparisons recorded yet.");
                }
                for batch in &listing.records {
                    println!(
                        "  • {} [{}]",
                        batch.create_time.format("%Y-%m-%d %H:%M:%S"),
                        batch.batch_id
                    );
                    println!(
                        "    {} → {}",
                        batch.original_filenames.join(", "),
                        batch.target_filenames.join(", ")
                    );
                }
            }

            HistoryAction::Show { batch } => {
                let store = HistoryStore::new(config.data_dir());
                let records = store.batch(&batch)?;

                if records.is_empty() {
                    return Err(ContractDifferError::Storage(format!(
                        "No comparison found for batch: {}",
                        batch
                    )));
                }

                println!("📋 Batch {}\n", batch);
                for record in &records {
                    println!(
                        "  {} | {} → {}",
                        record.create_time.format("%Y-%m-%d %H:%M:%S"),
                        record.original_filename,
                        record.target_filename
                    );
                    println!(
                        "    stored at: {} | {}",
                        record.original_file_path, record.target_file_path
                    );
                }
            }
        },

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration\n");
                println!("Data Directory: {}", config.data_dir().display());
                println!("Keep Copies: {}", config.storage.keep_copies);
                println!("\nExtraction:");
                println!("  Ignore empty paragraphs: {}", config.extraction.ignore_empty_paragraphs);
                println!("  Include tables: {}", config.extraction.include_tables);
                println!("  Normalize line endings: {}", config.extraction.normalize_line_endings);
                println!("\nDiff:");
                println!("  Line-mode fast path: {}", config.diff.check_lines);
                println!("  Semantic cleanup: {}", config.diff.semantic_cleanup);
                println!("  Efficiency cleanup: {}", config.diff.efficiency_cleanup);
                println!("  Edit cost: {}", config.diff.edit_cost);
                println!("  Timeout: {}s", config.diff.timeout_secs);
            }

            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                let default_config = Config::default();
                default_config.save()?;
                println!("✅ Configuration reset successfully!");
            }
        },
    }

    Ok(())
}

/// Store a history record (and archived copies when configured).
async fn record_comparison(
    config: &Config,
    original: &PathBuf,
    target: &PathBuf,
) -> Result<String> {
    config.ensure_data_dir()?;

    let original_name = file_name(original);
    let target_name = file_name(target);

    let mut record = ComparisonRecord::new(
        original_name.clone(),
        original.display().to_string(),
        target_name.clone(),
        target.display().to_string(),
    );

    if config.storage.keep_copies {
        let file_store = FileStore::new(config.data_dir());
        file_store.init()?;

        let original_bytes = tokio::fs::read(original).await?;
        record.original_file_path = file_store.store(&original_bytes, &original_name)?;

        let target_bytes = tokio::fs::read(target).await?;
        record.target_file_path = file_store.store(&target_bytes, &target_name)?;
    }

    let store = HistoryStore::new(config.data_dir());
    let stored = store.record(record)?;
    Ok(stored.batch_id)
}

fn file_name(path: &PathBuf) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn parse_date(value: Option<&str>) -> Result<Option<NaiveDate>> {
    match value {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|e| ContractDifferError::InvalidInput(format!("Invalid date '{}': {}", s, e))),
        None => Ok(None),
    }
}

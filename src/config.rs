//! Configuration management for the contract differ

use crate::error::{ContractDifferError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub extraction: ExtractionConfig,
    pub diff: DiffConfig,
    pub output: OutputConfig,
    pub storage: StorageConfig,
}

/// Options recognized by the extraction stage and their effect on output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Strips zero-content paragraphs from extracted text
    pub ignore_empty_paragraphs: bool,
    /// Includes table cell text in extracted DOCX output
    pub include_tables: bool,
    /// Normalizes CRLF/CR line endings to LF before diffing
    pub normalize_line_endings: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffConfig {
    /// Line-level first pass before character-level refinement
    pub check_lines: bool,
    /// Merge spurious short matches into the surrounding edits
    pub semantic_cleanup: bool,
    /// Trade boundary exactness for fewer, larger ops
    pub efficiency_cleanup: bool,
    /// Cost of an empty edit operation in terms of edit characters
    pub edit_cost: usize,
    /// Caller-level timeout for a whole comparison run
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
    Html,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for history records and archived documents
    pub data_dir: PathBuf,
    /// Archive a copy of each compared document under the data dir
    pub keep_copies: bool,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("contract-differ");

        Self {
            extraction: ExtractionConfig {
                ignore_empty_paragraphs: true,
                include_tables: true,
                normalize_line_endings: true,
            },
            diff: DiffConfig {
                check_lines: true,
                semantic_cleanup: true,
                efficiency_cleanup: true,
                edit_cost: 4,
                timeout_secs: 30,
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
            },
            storage: StorageConfig {
                data_dir,
                keep_copies: true,
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_path())
    }

    pub fn load_from(config_path: PathBuf) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| ContractDifferError::Configuration(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ContractDifferError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(&config_path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("contract-differ")
            .join("config.toml")
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.storage.data_dir
    }

    pub fn ensure_data_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.storage.data_dir)?;
        Ok(())
    }
}

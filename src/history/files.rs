//! Archived copies of compared documents

use crate::error::{ContractDifferError, Result};
use chrono::Utc;
use log::{error, info};
use std::path::{Component, Path, PathBuf};
use uuid::Uuid;

const ALLOWED_EXTENSIONS: &[&str] = &["docx", "doc", "pdf", "txt", "md", "markdown"];

/// Stores compared documents under date-based directories with generated
/// unique names, so history entries can be re-opened later.
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            base_dir: data_dir.join("files"),
        }
    }

    /// Create the storage root. Called once on startup.
    pub fn init(&self) -> Result<()> {
        match std::fs::create_dir_all(&self.base_dir) {
            Ok(()) => {
                info!("Storage directory ready: {}", self.base_dir.display());
                Ok(())
            }
            Err(e) => {
                error!("Storage directory init failed: {}", self.base_dir.display());
                Err(e.into())
            }
        }
    }

    /// Archive one document; returns the relative path it was stored at.
    pub fn store(&self, bytes: &[u8], original_name: &str) -> Result<String> {
        let extension = Path::new(original_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .ok_or_else(|| {
                ContractDifferError::InvalidInput(format!(
                    "File has no extension: {}",
                    original_name
                ))
            })?;

        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(ContractDifferError::InvalidInput(format!(
                "Unsupported file extension: .{}",
                extension
            )));
        }

        let date_path = Utc::now().format("%Y/%m/%d").to_string();
        let dir = self.base_dir.join(&date_path);
        std::fs::create_dir_all(&dir)?;

        let file_name = format!("{}.{}", Uuid::new_v4().simple(), extension);
        let dest = dir.join(&file_name);
        std::fs::write(&dest, bytes)?;

        let relative_path = format!("{}/{}", date_path, file_name);
        info!(
            "Stored document copy: {} ({} bytes)",
            relative_path,
            bytes.len()
        );

        Ok(relative_path)
    }

    /// Resolve a stored relative path, rejecting traversal outside the
    /// storage root.
    pub fn resolve(&self, relative_path: &str) -> Result<PathBuf> {
        let relative = Path::new(relative_path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if relative.is_absolute() || escapes {
            return Err(ContractDifferError::Storage(format!(
                "Illegal path access: {}",
                relative_path
            )));
        }

        let candidate = self.base_dir.join(relative);
        if !candidate.exists() {
            return Err(ContractDifferError::Storage(format!(
                "File does not exist: {}",
                relative_path
            )));
        }

        Ok(candidate)
    }
}

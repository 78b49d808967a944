//! Loaded document representation

use crate::error::{ContractDifferError, Result};
use crate::input::file_detector::DocumentFormat;
use std::path::Path;
use tokio::fs;

/// A raw document: byte buffer plus declared format. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct Document {
    bytes: Vec<u8>,
    format: DocumentFormat,
    name: String,
}

impl Document {
    /// Build a document from an in-memory buffer. Rejects empty buffers and
    /// buffers that contradict the declared format before extraction begins.
    pub fn from_bytes(bytes: Vec<u8>, format: DocumentFormat, name: impl Into<String>) -> Result<Self> {
        let name = name.into();

        if bytes.is_empty() {
            return Err(ContractDifferError::InvalidInput(
                format!("Document is empty: {}", name)
            ));
        }

        if format == DocumentFormat::Unknown {
            return Err(ContractDifferError::UnsupportedFormat(
                format!("Unsupported document format for: {}", name)
            ));
        }

        if !format.matches(&bytes) {
            return Err(ContractDifferError::InvalidInput(
                format!("Document {} does not look like {} content", name, format)
            ));
        }

        Ok(Self { bytes, format, name })
    }

    /// Load a document from disk, detecting the format from the extension.
    pub async fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ContractDifferError::InvalidInput(
                format!("File does not exist: {}", path.display())
            ));
        }

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| ContractDifferError::InvalidInput(
                format!("File has no extension: {}", path.display())
            ))?;

        let format = DocumentFormat::from_extension(extension);
        let bytes = fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        Self::from_bytes(bytes, format, name)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

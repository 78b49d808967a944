//! Document format detection

/// Declared format of a loaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Docx,
    Pdf,
    PlainText,
    Markdown,
    Unknown,
}

/// OOXML containers are ZIP archives.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
/// Legacy Word and password-protected OOXML use the OLE compound file format.
pub(crate) const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0];
const PDF_MAGIC: &[u8] = b"%PDF";

impl DocumentFormat {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "docx" | "doc" => DocumentFormat::Docx,
            "pdf" => DocumentFormat::Pdf,
            "txt" => DocumentFormat::PlainText,
            "md" | "markdown" => DocumentFormat::Markdown,
            _ => DocumentFormat::Unknown,
        }
    }

    /// Best-effort sniff from leading magic bytes. Text formats are
    /// indistinguishable here and come back as `Unknown`.
    pub fn sniff(bytes: &[u8]) -> Self {
        if bytes.starts_with(ZIP_MAGIC) || bytes.starts_with(OLE_MAGIC) {
            DocumentFormat::Docx
        } else if bytes.starts_with(PDF_MAGIC) {
            DocumentFormat::Pdf
        } else {
            DocumentFormat::Unknown
        }
    }

    /// Whether a buffer is plausible for this declared format. Used to
    /// reject mismatched format hints before extraction begins.
    pub fn matches(&self, bytes: &[u8]) -> bool {
        match self {
            DocumentFormat::Docx => {
                bytes.starts_with(ZIP_MAGIC) || bytes.starts_with(OLE_MAGIC)
            }
            DocumentFormat::Pdf => bytes.starts_with(PDF_MAGIC),
            // Any byte soup can claim to be text; extraction decides.
            DocumentFormat::PlainText | DocumentFormat::Markdown => true,
            DocumentFormat::Unknown => false,
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, DocumentFormat::Docx | DocumentFormat::Pdf)
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentFormat::Docx => write!(f, "DOCX"),
            DocumentFormat::Pdf => write!(f, "PDF"),
            DocumentFormat::PlainText => write!(f, "plain text"),
            DocumentFormat::Markdown => write!(f, "Markdown"),
            DocumentFormat::Unknown => write!(f, "unknown"),
        }
    }
}

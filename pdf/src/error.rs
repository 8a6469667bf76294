use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading and extracting text from a PDF.
#[derive(Debug, Error)]
pub enum PdfError {
    /// The requested file does not exist under the configured base directory.
    #[error("document not found: {0}")]
    NotFound(PathBuf),

    /// `lopdf` could not parse the file as a PDF document.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// The source PDF could not be read from the filesystem.
    #[error("failed to read PDF: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, PdfError>;

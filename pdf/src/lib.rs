//! Per-page text extraction for local PDF files.
//!
//! [`PdfLoader`] resolves a caller-supplied file name against a configured
//! base directory and extracts each page's text with `lopdf`. There is no
//! rendering or OCR fallback here — only text already embedded in the PDF is
//! recovered, which is sufficient for the policy/regulatory documents this
//! workspace indexes.

mod error;
mod model;
mod parser;

pub use error::{PdfError, Result};
pub use model::{PageText, PdfDocument};

use std::path::{Path, PathBuf};

/// Loads PDF files from a fixed base directory.
#[derive(Debug, Clone)]
pub struct PdfLoader {
    base_dir: PathBuf,
}

impl PdfLoader {
    /// Creates a loader rooted at `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Loads and extracts text from `file_name`, joined onto the loader's base directory.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::NotFound`] if the resolved path does not exist, or
    /// [`PdfError::Parse`] if `lopdf` rejects the file's structure.
    pub fn load(&self, file_name: &str) -> Result<PdfDocument> {
        let path = self.base_dir.join(file_name);
        if !path.exists() {
            return Err(PdfError::NotFound(path));
        }
        parser::parse_from_path(&path, file_name)
    }

    /// Returns the configured base directory.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let loader = PdfLoader::new(dir.path());
        let err = loader.load("missing.pdf").unwrap_err();
        assert!(matches!(err, PdfError::NotFound(_)));
    }

    #[test]
    fn invalid_pdf_bytes_fail_to_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"not a pdf").unwrap();

        let loader = PdfLoader::new(dir.path());
        let err = loader.load("broken.pdf").unwrap_err();
        assert!(matches!(err, PdfError::Parse(_)));
    }
}

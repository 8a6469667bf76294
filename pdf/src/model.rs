/// Extracted text for a single page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    /// 1-based ordinal of the page within the document.
    ///
    /// `lopdf` does not expose a PDF's printed page labels, so this is simply
    /// the page's position in reading order.
    pub page_label: usize,
    /// Normalized text content of the page (blank lines collapsed, lines trimmed).
    pub text: String,
}

/// A loaded PDF document, ready to be handed to the hierarchical node builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfDocument {
    /// File name the document was loaded from, relative to the loader's base directory.
    pub file_name: String,
    /// Total page count in the source PDF.
    pub page_count: usize,
    /// Per-page extracted text, in page order.
    pub pages: Vec<PageText>,
}

use std::path::Path;

use lopdf::Document;

use crate::error::{PdfError, Result};
use crate::model::{PageText, PdfDocument};

pub(crate) fn parse_from_path(path: &Path, file_name: &str) -> Result<PdfDocument> {
    let doc = Document::load(path).map_err(|e| PdfError::Parse(e.to_string()))?;
    parse_document(&doc, file_name.to_string())
}

fn parse_document(doc: &Document, file_name: String) -> Result<PdfDocument> {
    let page_map = doc.get_pages();
    let mut page_numbers: Vec<u32> = page_map.keys().copied().collect();
    page_numbers.sort_unstable();

    let mut pages = Vec::with_capacity(page_numbers.len());
    for (idx, page_number) in page_numbers.iter().enumerate() {
        let raw = doc
            .extract_text(&[*page_number])
            .unwrap_or_else(|_| String::new());
        pages.push(PageText {
            page_label: idx + 1,
            text: normalize_text(&raw),
        });
    }

    Ok(PdfDocument {
        file_name,
        page_count: page_numbers.len(),
        pages,
    })
}

fn normalize_text(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_blank_lines() {
        let raw = "  line one  \n\n\n  line two\n   \n";
        assert_eq!(normalize_text(raw), "line one\nline two");
    }
}

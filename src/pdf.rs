use tracing::debug;

use crate::error::PdfError;

const PDF_MAGIC: &[u8] = b"%PDF";

/// Extract machine-readable text page by page, each page as trimmed,
/// non-empty lines.
pub fn extract_pages(bytes: &[u8]) -> Result<Vec<Vec<String>>, PdfError> {
    if !bytes.starts_with(PDF_MAGIC) {
        return Err(PdfError::NotPdf);
    }
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| PdfError::Extraction(e.to_string()))?;
    if pages.iter().all(|p| p.trim().is_empty()) {
        return Err(PdfError::Empty);
    }
    debug!(pages = pages.len(), "extracted PDF text");
    Ok(pages.iter().map(|p| page_lines(p)).collect())
}

pub fn page_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

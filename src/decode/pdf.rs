//! PDF text extraction.

use super::DecodeError;

/// Text of all pages concatenated in document order. `pdf-extract` emits
/// blank lines at page boundaries, which downstream extraction treats as
/// paragraph breaks.
pub fn extract_pdf(bytes: &[u8]) -> Result<String, DecodeError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| DecodeError::ExtractionFailed(format!("pdf: {e}")))?;
    Ok(text.trim().to_string())
}

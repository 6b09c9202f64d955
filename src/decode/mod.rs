//! Document decoding: format dispatch over `{pdf, docx, doc}` into
//! line-aware UTF-8 text with paragraph breaks preserved.

mod doc;
mod docx;
mod html;
mod pdf;

use thiserror::Error;

pub use html::html_to_text;

#[derive(Debug, Error)]
pub enum DecodeError {
    /// Extension outside the allow-list. Checked before any byte is read.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// The document could not be cracked open. The pipeline downgrades
    /// this to a warning and continues with empty text.
    #[error("Text extraction failed: {0}")]
    ExtractionFailed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Doc,
}

impl DocumentFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" => Some(DocumentFormat::Docx),
            "doc" => Some(DocumentFormat::Doc),
            _ => None,
        }
    }

    pub fn from_filename(filename: &str) -> Option<Self> {
        filename
            .rsplit_once('.')
            .and_then(|(_, ext)| Self::from_extension(ext))
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
            DocumentFormat::Doc => "doc",
        }
    }
}

/// Decodes `bytes` according to the filename's extension.
pub fn decode_document(bytes: &[u8], filename: &str) -> Result<String, DecodeError> {
    let format = DocumentFormat::from_filename(filename)
        .ok_or_else(|| DecodeError::UnsupportedFormat(filename.to_string()))?;
    decode_as(bytes, format)
}

pub fn decode_as(bytes: &[u8], format: DocumentFormat) -> Result<String, DecodeError> {
    match format {
        DocumentFormat::Pdf => pdf::extract_pdf(bytes),
        DocumentFormat::Docx => docx::extract_docx(bytes),
        DocumentFormat::Doc => doc::extract_doc(bytes),
    }
}

use lopdf::Document;
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors raised while turning a PDF byte stream into plain text.
///
/// An all-pages-empty document is not an error; it extracts to an empty
/// string.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("failed to parse PDF document: {0}")]
    InvalidDocument(#[from] lopdf::Error),
    #[error("PDF document is encrypted and cannot be read")]
    Encrypted,
}

/// Extract the text of every page, in document order, concatenated with no
/// separator between pages.
///
/// Returns an empty string for zero-page documents and for documents whose
/// pages carry no extractable text (scanned-image-only PDFs). A page whose
/// content stream cannot be decoded contributes nothing rather than failing
/// the whole document.
#[instrument(skip(pdf_bytes), fields(byte_len = pdf_bytes.len()))]
pub fn extract_text(pdf_bytes: &[u8]) -> Result<String, ExtractionError> {
    let doc = Document::load_mem(pdf_bytes)?;
    if doc.is_encrypted() {
        return Err(ExtractionError::Encrypted);
    }

    let pages = doc.get_pages();
    let mut text = String::new();
    for (page_number, _object_id) in pages {
        match doc.extract_text(&[page_number]) {
            Ok(page_text) => text.push_str(&page_text),
            Err(err) => {
                debug!(page = page_number, %err, "page yielded no extractable text");
            }
        }
    }

    debug!(chars = text.len(), "text extraction completed");
    Ok(text)
}

//! PDF text extraction.
//!
//! Wraps pdf-extract. Layout recovery is whatever that crate produces; this
//! adapter only maps its failures onto [`ExtractError`].

use crate::extractor::capability::{ExtractContext, ExtractError, FormatExtractor};
use tracing::debug;

pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatExtractor for PdfExtractor {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["pdf"]
    }

    fn extract_bytes(&self, bytes: &[u8], _ctx: &ExtractContext<'_>) -> Result<String, ExtractError> {
        if !bytes.starts_with(b"%PDF") {
            return Err(ExtractError::malformed("PDF", "missing %PDF header"));
        }

        debug!("Extracting PDF text from {} bytes", bytes.len());
        let text = pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
            let message = e.to_string();
            if message.to_lowercase().contains("encrypt") {
                ExtractError::Encrypted("PDF")
            } else {
                ExtractError::malformed("PDF", message)
            }
        })?;

        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::capability::ExtractorRegistry;

    #[test]
    fn test_rejects_non_pdf_bytes() {
        let registry = ExtractorRegistry::with_builtin_formats();
        let result = registry.extract_bytes("pdf", b"PK\x03\x04 not a pdf");

        match result.unwrap_err() {
            ExtractError::Malformed { format, .. } => assert_eq!(format, "PDF"),
            other => panic!("Expected Malformed, got {:?}", other),
        }
    }

    #[test]
    fn test_truncated_pdf_is_an_error() {
        let registry = ExtractorRegistry::with_builtin_formats();
        assert!(registry.extract_bytes("pdf", b"%PDF-1.7\n").is_err());
    }
}

use crate::extractor::capability::{ExtractContext, ExtractError, FormatExtractor};
use crate::extractor::formats::xml::XmlTextScanner;
use crate::extractor::formats::{open_zip, read_zip_entry};

/// Parts that carry body text, in reading order. Only `document.xml` is
/// required.
const TEXT_PARTS: &[&str] = &[
    "word/document.xml",
    "word/footnotes.xml",
    "word/endnotes.xml",
];

/// Office Open XML word-processing documents (.docx).
pub struct DocxExtractor;

impl DocxExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DocxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatExtractor for DocxExtractor {
    fn name(&self) -> &'static str {
        "docx"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["docx"]
    }

    fn extract_bytes(&self, bytes: &[u8], _ctx: &ExtractContext<'_>) -> Result<String, ExtractError> {
        let mut archive = open_zip(bytes)?;
        let scanner = XmlTextScanner::new("w").map_err(|e| ExtractError::malformed("DOCX", e))?;

        let mut sections = Vec::new();
        for (index, part) in TEXT_PARTS.iter().enumerate() {
            match read_zip_entry(&mut archive, part)? {
                Some(xml) => {
                    let text = scanner.extract(&xml);
                    if !text.is_empty() {
                        sections.push(text);
                    }
                }
                None if index == 0 => {
                    return Err(ExtractError::malformed("DOCX", "word/document.xml not found"));
                }
                None => {}
            }
        }

        Ok(sections.join("\n\n"))
    }
}

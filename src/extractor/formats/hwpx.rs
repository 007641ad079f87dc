use crate::extractor::capability::{ExtractContext, ExtractError, FormatExtractor};
use crate::extractor::formats::xml::XmlTextScanner;
use crate::extractor::formats::{open_zip, read_zip_entry};

/// Hancom OWPML documents (.hwpx): a zip with one XML part per section
/// under `Contents/`.
pub struct HwpxExtractor;

impl HwpxExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HwpxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatExtractor for HwpxExtractor {
    fn name(&self) -> &'static str {
        "hwpx"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["hwpx"]
    }

    fn extract_bytes(&self, bytes: &[u8], _ctx: &ExtractContext<'_>) -> Result<String, ExtractError> {
        let mut archive = open_zip(bytes)?;

        let mut sections: Vec<(u32, String)> = archive
            .file_names()
            .filter_map(|name| section_number(name).map(|n| (n, name.to_string())))
            .collect();

        if sections.is_empty() {
            return Err(ExtractError::malformed("HWPX", "no Contents/section*.xml parts"));
        }
        sections.sort_by_key(|(n, _)| *n);

        let scanner = XmlTextScanner::new("hp").map_err(|e| ExtractError::malformed("HWPX", e))?;

        let mut texts = Vec::new();
        for (_, name) in sections {
            if let Some(xml) = read_zip_entry(&mut archive, &name)? {
                let text = scanner.extract(&xml);
                if !text.is_empty() {
                    texts.push(text);
                }
            }
        }

        Ok(texts.join("\n\n"))
    }
}

/// `Contents/section12.xml` -> 12
fn section_number(name: &str) -> Option<u32> {
    name.strip_prefix("Contents/section")?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

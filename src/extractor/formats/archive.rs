use crate::extractor::capability::{ExtractContext, ExtractError, FormatExtractor};
use crate::extractor::formats::open_zip;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Members with these suffixes are copied through as text.
const PLAIN_TEXT_MEMBERS: &[&str] = &["txt", "md", "csv"];

/// Generic zip containers. Supported members are dispatched back through the
/// registry; each member's text is preceded by a `[member name]` header line.
pub struct ArchiveExtractor;

impl ArchiveExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ArchiveExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatExtractor for ArchiveExtractor {
    fn name(&self) -> &'static str {
        "archive"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["zip"]
    }

    fn extract_bytes(&self, bytes: &[u8], ctx: &ExtractContext<'_>) -> Result<String, ExtractError> {
        let mut archive = open_zip(bytes)?;
        let mut sections = Vec::new();

        for index in 0..archive.len() {
            let mut member = match archive.by_index(index) {
                Ok(member) => member,
                Err(e) => {
                    warn!("Failed to open archive member #{}: {}", index, e);
                    continue;
                }
            };
            if member.is_dir() {
                continue;
            }

            let name = member.name().to_string();
            let plain = is_plain_text(&name);
            if !plain && !ctx.can_extract(&name) {
                debug!("Skipping archive member {}", name);
                continue;
            }

            let mut data = Vec::new();
            if let Err(e) = member.read_to_end(&mut data) {
                warn!("Failed to read archive member {}: {}", name, e);
                continue;
            }

            let text = if plain {
                String::from_utf8_lossy(&data).into_owned()
            } else {
                match ctx.extract_member(&name, &data) {
                    Ok(text) => text,
                    Err(e) => {
                        warn!("Skipping archive member {}: {}", name, e);
                        continue;
                    }
                }
            };

            let text = text.trim();
            if !text.is_empty() {
                sections.push(format!("[{}]\n{}", name, text));
            }
        }

        Ok(sections.join("\n\n"))
    }
}

fn is_plain_text(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            PLAIN_TEXT_MEMBERS
                .iter()
                .any(|plain| plain.eq_ignore_ascii_case(ext))
        })
}

//! Legacy Hangul word-processor documents (.hwp, v5 binary).
//!
//! The file is an OLE compound document. Body text lives in
//! `/BodyText/SectionN` streams as a sequence of tagged records, raw-deflated
//! when the header says so. Only paragraph text records are read.

use crate::extractor::capability::{ExtractContext, ExtractError, FormatExtractor};
use flate2::read::DeflateDecoder;
use std::io::{Cursor, Read, Seek};
use tracing::debug;

const SIGNATURE: &[u8] = b"HWP Document File";
const FLAG_COMPRESSED: u32 = 1;
const FLAG_PASSWORD: u32 = 1 << 1;
const FLAG_DISTRIBUTION: u32 = 1 << 2;
const TAG_PARA_TEXT: u32 = 0x10 + 51;

pub struct HwpExtractor;

impl HwpExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HwpExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatExtractor for HwpExtractor {
    fn name(&self) -> &'static str {
        "hwp"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["hwp"]
    }

    fn extract_bytes(&self, bytes: &[u8], _ctx: &ExtractContext<'_>) -> Result<String, ExtractError> {
        let mut file = cfb::CompoundFile::open(Cursor::new(bytes))
            .map_err(|e| ExtractError::malformed("HWP", e))?;

        let flags = read_header_flags(&mut file)?;
        if flags & FLAG_PASSWORD != 0 {
            return Err(ExtractError::Encrypted("HWP"));
        }
        if flags & FLAG_DISTRIBUTION != 0 {
            return Err(ExtractError::malformed("HWP", "distribution documents are not supported"));
        }
        let compressed = flags & FLAG_COMPRESSED != 0;

        let mut paragraphs = Vec::new();
        let mut section = 0;
        loop {
            let path = format!("/BodyText/Section{}", section);
            if !file.is_stream(&path) {
                break;
            }

            let raw = read_stream(&mut file, &path)?;
            let data = if compressed { inflate(&raw)? } else { raw };
            paragraphs.extend(paragraph_texts(&data)?);
            section += 1;
        }

        if section == 0 {
            debug!("No BodyText sections, falling back to preview text");
            return preview_text(&mut file);
        }

        Ok(paragraphs.join("\n").trim_end().to_string())
    }
}

fn read_stream<F: Read + Seek>(file: &mut cfb::CompoundFile<F>, path: &str) -> Result<Vec<u8>, ExtractError> {
    let mut stream = file
        .open_stream(path)
        .map_err(|e| ExtractError::malformed("HWP", format!("{}: {}", path, e)))?;
    let mut data = Vec::new();
    stream.read_to_end(&mut data)?;
    Ok(data)
}

fn read_header_flags<F: Read + Seek>(file: &mut cfb::CompoundFile<F>) -> Result<u32, ExtractError> {
    let header = read_stream(file, "/FileHeader")?;

    if !header.starts_with(SIGNATURE) || header.len() < 40 {
        return Err(ExtractError::malformed("HWP", "invalid file header"));
    }

    Ok(u32::from_le_bytes([header[36], header[37], header[38], header[39]]))
}

fn inflate(data: &[u8]) -> Result<Vec<u8>, ExtractError> {
    let mut out = Vec::new();
    DeflateDecoder::new(data)
        .read_to_end(&mut out)
        .map_err(|e| ExtractError::malformed("HWP", format!("section decompression failed: {}", e)))?;
    Ok(out)
}

fn preview_text<F: Read + Seek>(file: &mut cfb::CompoundFile<F>) -> Result<String, ExtractError> {
    if !file.is_stream("/PrvText") {
        return Err(ExtractError::malformed("HWP", "no body text or preview text"));
    }
    let data = read_stream(file, "/PrvText")?;
    let units: Vec<u16> = data
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    Ok(String::from_utf16_lossy(&units).trim().to_string())
}

/// Walk the record stream and decode every paragraph text record.
fn paragraph_texts(data: &[u8]) -> Result<Vec<String>, ExtractError> {
    let mut texts = Vec::new();
    let mut pos = 0;

    while pos + 4 <= data.len() {
        let header = read_u32(data, pos);
        pos += 4;

        let tag = header & 0x3FF;
        let mut size = ((header >> 20) & 0xFFF) as usize;
        if size == 0xFFF {
            if pos + 4 > data.len() {
                break;
            }
            size = read_u32(data, pos) as usize;
            pos += 4;
        }

        let end = pos
            .checked_add(size)
            .filter(|end| *end <= data.len())
            .ok_or_else(|| ExtractError::malformed("HWP", "record runs past end of section"))?;

        if tag == TAG_PARA_TEXT {
            texts.push(decode_para_text(&data[pos..end]));
        }
        pos = end;
    }

    Ok(texts)
}

fn read_u32(data: &[u8], pos: usize) -> u32 {
    u32::from_le_bytes([data[pos], data[pos + 1], data[pos + 2], data[pos + 3]])
}

/// UTF-16LE with embedded control codes. Codes 0, 10, 13 and 24..=31 take
/// one unit; every other code below 32 is followed by seven units of payload.
fn decode_para_text(record: &[u8]) -> String {
    let units: Vec<u16> = record
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();

    let mut out: Vec<u16> = Vec::with_capacity(units.len());
    let mut i = 0;
    while i < units.len() {
        let unit = units[i];
        match unit {
            10 => {
                out.push(u16::from(b'\n'));
                i += 1;
            }
            0 | 13 | 24..=31 => i += 1,
            9 => {
                out.push(u16::from(b'\t'));
                i += 8;
            }
            1..=31 => i += 8,
            _ => {
                out.push(unit);
                i += 1;
            }
        }
    }

    String::from_utf16_lossy(&out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::capability::ExtractorRegistry;
    use std::io::Write;

    fn utf16(text: &str) -> Vec<u8> {
        text.encode_utf16().flat_map(|u| u.to_le_bytes()).collect()
    }

    fn record(tag: u32, payload: &[u8]) -> Vec<u8> {
        let header = tag | ((payload.len() as u32) << 20);
        let mut out = header.to_le_bytes().to_vec();
        out.extend_from_slice(payload);
        out
    }

    fn file_header(flags: u32) -> Vec<u8> {
        let mut header = vec![0u8; 256];
        header[..SIGNATURE.len()].copy_from_slice(SIGNATURE);
        header[36..40].copy_from_slice(&flags.to_le_bytes());
        header
    }

    fn hwp_bytes(flags: u32, section: &[u8]) -> Vec<u8> {
        let mut file = cfb::CompoundFile::create(Cursor::new(Vec::new())).unwrap();
        file.create_stream("/FileHeader")
            .unwrap()
            .write_all(&file_header(flags))
            .unwrap();
        file.create_storage("/BodyText").unwrap();
        file.create_stream("/BodyText/Section0")
            .unwrap()
            .write_all(section)
            .unwrap();
        file.flush().unwrap();
        file.into_inner().into_inner()
    }

    #[test]
    fn test_decode_para_text_controls() {
        let mut payload = utf16("가나");
        // Inline tab control: code 9 plus seven payload units
        payload.extend_from_slice(&9u16.to_le_bytes());
        payload.extend(utf16("xxxxxxx"));
        payload.extend(utf16("다"));
        payload.extend_from_slice(&13u16.to_le_bytes());

        assert_eq!(decode_para_text(&payload), "가나\t다");
    }

    #[test]
    fn test_uncompressed_sections() {
        let mut section = record(TAG_PARA_TEXT, &utf16("첫 문단\r"));
        section.extend(record(0x10 + 50, &[0u8; 8]));
        section.extend(record(TAG_PARA_TEXT, &utf16("둘째 문단\r")));

        let bytes = hwp_bytes(0, &section);
        let registry = ExtractorRegistry::with_builtin_formats();
        assert_eq!(
            registry.extract_bytes("hwp", &bytes).unwrap(),
            "첫 문단\n둘째 문단"
        );
    }

    #[test]
    fn test_compressed_sections() {
        let section = record(TAG_PARA_TEXT, &utf16("압축\r"));
        let mut encoder =
            flate2::write::DeflateEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(&section).unwrap();
        let compressed = encoder.finish().unwrap();

        let bytes = hwp_bytes(FLAG_COMPRESSED, &compressed);
        let registry = ExtractorRegistry::with_builtin_formats();
        assert_eq!(registry.extract_bytes("hwp", &bytes).unwrap(), "압축");
    }

    #[test]
    fn test_password_protected() {
        let bytes = hwp_bytes(FLAG_PASSWORD, &[]);
        let registry = ExtractorRegistry::with_builtin_formats();
        assert!(matches!(
            registry.extract_bytes("hwp", &bytes),
            Err(ExtractError::Encrypted("HWP"))
        ));
    }

    #[test]
    fn test_not_a_compound_file() {
        let registry = ExtractorRegistry::with_builtin_formats();
        assert!(registry.extract_bytes("hwp", b"not ole at all").is_err());
    }
}

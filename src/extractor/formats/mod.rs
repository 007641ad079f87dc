//! Format adapters behind [`FormatExtractor`](crate::extractor::FormatExtractor).

pub mod archive;
pub mod docx;
pub mod hwp;
pub mod hwpx;
pub mod pdf;
pub mod spreadsheet;
pub mod xml;

pub use archive::ArchiveExtractor;
pub use docx::DocxExtractor;
pub use hwp::HwpExtractor;
pub use hwpx::HwpxExtractor;
pub use pdf::PdfExtractor;
pub use spreadsheet::SpreadsheetExtractor;

use crate::extractor::capability::ExtractError;
use std::io::{Cursor, Read};
use zip::result::ZipError;
use zip::ZipArchive;

pub(crate) fn open_zip(bytes: &[u8]) -> Result<ZipArchive<Cursor<&[u8]>>, ExtractError> {
    Ok(ZipArchive::new(Cursor::new(bytes))?)
}

/// Read a UTF-8 member, `None` if the archive has no such entry.
pub(crate) fn read_zip_entry(
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    name: &str,
) -> Result<Option<String>, ExtractError> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut content = String::new();
    file.read_to_string(&mut content)?;
    Ok(Some(content))
}

use crate::extractor::capability::{ExtractContext, ExtractError, FormatExtractor};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;
use tracing::warn;

/// Excel workbooks, both OOXML (.xlsx, .xlsm) and legacy BIFF (.xls).
///
/// Each sheet becomes a `Sheet: <name>` line followed by its non-empty rows,
/// cells separated by tabs.
pub struct SpreadsheetExtractor;

impl SpreadsheetExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SpreadsheetExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatExtractor for SpreadsheetExtractor {
    fn name(&self) -> &'static str {
        "spreadsheet"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["xlsx", "xlsm", "xls"]
    }

    fn extract_bytes(&self, bytes: &[u8], _ctx: &ExtractContext<'_>) -> Result<String, ExtractError> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| {
            let message = e.to_string();
            if message.to_lowercase().contains("password") {
                ExtractError::Encrypted("Excel")
            } else {
                ExtractError::malformed("Excel", message)
            }
        })?;

        let mut blocks = Vec::new();
        for name in workbook.sheet_names() {
            let range = match workbook.worksheet_range(&name) {
                Ok(range) => range,
                Err(e) => {
                    warn!("Skipping sheet '{}': {}", name, e);
                    continue;
                }
            };

            let mut lines = vec![format!("Sheet: {}", name)];
            for row in range.rows() {
                if row.iter().all(|cell| matches!(cell, Data::Empty)) {
                    continue;
                }
                let cells: Vec<String> = row.iter().map(|cell| cell.to_string()).collect();
                lines.push(cells.join("\t").trim_end().to_string());
            }
            blocks.push(lines.join("\n"));
        }

        Ok(blocks.join("\n\n"))
    }
}

#[cfg(test)]
mod tests {
    use crate::extractor::capability::ExtractorRegistry;
    use crate::extractor::formats::test_support::zip_bytes;

    const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Sales" sheetId="1" r:id="rId1"/></sheets></workbook>"#;

    const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;

    const SHEET: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData><row r="1"><c r="A1" t="inlineStr"><is><t>Region</t></is></c><c r="B1" t="inlineStr"><is><t>Total</t></is></c></row><row r="2"><c r="A2" t="inlineStr"><is><t>Seoul</t></is></c><c r="B2"><v>42</v></c></row></sheetData></worksheet>"#;

    #[test]
    fn test_sheet_rows_are_tab_separated() {
        let bytes = zip_bytes(&[
            ("xl/workbook.xml", WORKBOOK.as_bytes()),
            ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.as_bytes()),
            ("xl/worksheets/sheet1.xml", SHEET.as_bytes()),
        ]);

        let registry = ExtractorRegistry::with_builtin_formats();
        let text = registry.extract_bytes("xlsx", &bytes).unwrap();

        assert!(text.starts_with("Sheet: Sales"));
        assert!(text.contains("Region\tTotal"));
        assert!(text.contains("Seoul\t42"));
    }

    #[test]
    fn test_garbage_is_an_error() {
        let registry = ExtractorRegistry::with_builtin_formats();
        assert!(registry.extract_bytes("xlsx", b"not a workbook").is_err());
        assert!(registry.extract_bytes("xls", b"not a workbook").is_err());
    }
}

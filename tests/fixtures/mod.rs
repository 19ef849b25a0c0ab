//! Test fixtures for generating inventory workbooks in memory.
//!
//! # Example
//!
//! ```rust,ignore
//! use fixtures::{InventoryBuilder, CellValue};
//!
//! let xlsx = InventoryBuilder::new()
//!     .header("ID", "DETAILS")
//!     .row("AAAAA11101", "Y")
//!     .row("AAAAA11102", "N")
//!     .build();
//!
//! let records = binscout::loader::xlsx::read_first_sheet(&xlsx).unwrap();
//! ```
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic,
    clippy::cast_possible_truncation
)]

use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

/// Represents a cell value written to the sheet.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Stored in the shared string table.
    Shared(String),
    /// Stored inline in the cell (`t="inlineStr"`).
    Inline(String),
    /// A numeric value.
    Number(f64),
    /// A boolean value.
    Boolean(bool),
    /// No value at all.
    Empty,
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Shared(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Shared(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

/// One worksheet row: column A, column B, and anything to the right.
#[derive(Debug, Clone)]
pub struct RowEntry {
    pub cells: Vec<CellValue>,
}

/// Builder for a single worksheet.
#[derive(Debug, Clone, Default)]
pub struct SheetBuilder {
    pub name: String,
    pub rows: Vec<RowEntry>,
}

impl SheetBuilder {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            rows: Vec::new(),
        }
    }

    /// Add a row with arbitrary cells starting at column A.
    #[must_use]
    pub fn cells(mut self, cells: Vec<CellValue>) -> Self {
        self.rows.push(RowEntry { cells });
        self
    }

    /// Add an (id, status) row.
    #[must_use]
    pub fn row<A: Into<CellValue>, B: Into<CellValue>>(self, id: A, status: B) -> Self {
        self.cells(vec![id.into(), status.into()])
    }
}

/// Builder for an inventory workbook.
///
/// The first sheet added is the one listed first in `xl/workbook.xml`.
/// Worksheet parts are written in reverse order (`sheetN.xml` for the first
/// sheet) so readers must follow the relationship ids, not file names.
#[derive(Debug, Default)]
pub struct InventoryBuilder {
    sheets: Vec<SheetBuilder>,
    current: Option<SheetBuilder>,
}

impl InventoryBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sheets: Vec::new(),
            current: Some(SheetBuilder::new("Inventory")),
        }
    }

    /// Add a header row to the current sheet.
    #[must_use]
    pub fn header(self, id: &str, status: &str) -> Self {
        self.row(id, status)
    }

    /// Add an (id, status) row to the current sheet.
    #[must_use]
    pub fn row<A: Into<CellValue>, B: Into<CellValue>>(mut self, id: A, status: B) -> Self {
        let sheet = self.current.take().unwrap_or_default();
        self.current = Some(sheet.row(id, status));
        self
    }

    /// Add a row with arbitrary cells to the current sheet.
    #[must_use]
    pub fn cells(mut self, cells: Vec<CellValue>) -> Self {
        let sheet = self.current.take().unwrap_or_default();
        self.current = Some(sheet.cells(cells));
        self
    }

    /// Finish the current sheet and start another one.
    #[must_use]
    pub fn sheet(mut self, name: &str) -> Self {
        if let Some(sheet) = self.current.take() {
            self.sheets.push(sheet);
        }
        self.current = Some(SheetBuilder::new(name));
        self
    }

    /// Build the XLSX file as bytes.
    #[must_use]
    pub fn build(mut self) -> Vec<u8> {
        if let Some(sheet) = self.current.take() {
            self.sheets.push(sheet);
        }
        let count = self.sheets.len();

        let mut shared_strings: Vec<String> = Vec::new();
        for sheet in &self.sheets {
            for row in &sheet.rows {
                for cell in &row.cells {
                    if let CellValue::Shared(s) = cell {
                        if !shared_strings.contains(s) {
                            shared_strings.push(s.clone());
                        }
                    }
                }
            }
        }

        let cursor = Cursor::new(Vec::new());
        let mut zip = ZipWriter::new(cursor);
        let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        zip.start_file("[Content_Types].xml", options).unwrap();
        zip.write_all(generate_content_types(count).as_bytes())
            .unwrap();

        zip.start_file("_rels/.rels", options).unwrap();
        zip.write_all(RELS_XML.as_bytes()).unwrap();

        zip.start_file("xl/_rels/workbook.xml.rels", options)
            .unwrap();
        zip.write_all(generate_workbook_rels(count).as_bytes())
            .unwrap();

        zip.start_file("xl/workbook.xml", options).unwrap();
        zip.write_all(generate_workbook(&self.sheets).as_bytes())
            .unwrap();

        zip.start_file("xl/sharedStrings.xml", options).unwrap();
        zip.write_all(generate_shared_strings(&shared_strings).as_bytes())
            .unwrap();

        for (i, sheet) in self.sheets.iter().enumerate() {
            let path = format!("xl/worksheets/sheet{}.xml", count - i);
            zip.start_file(path, options).unwrap();
            zip.write_all(generate_sheet_xml(sheet, &shared_strings).as_bytes())
                .unwrap();
        }

        zip.finish().unwrap().into_inner()
    }
}

const RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

fn generate_content_types(sheet_count: usize) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    xml.push_str(r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#);
    xml.push_str(r#"<Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>"#);
    for i in 1..=sheet_count {
        xml.push_str(&format!(
            r#"<Override PartName="/xl/worksheets/sheet{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
        ));
    }
    xml.push_str("</Types>");
    xml
}

/// Sheet `i` (0-based, workbook order) has id `rId{i+1}` and lives in `sheet{count-i}.xml`.
fn generate_workbook_rels(sheet_count: usize) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for i in 0..sheet_count {
        xml.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
            i + 1,
            sheet_count - i
        ));
    }
    xml.push_str(&format!(
        r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>"#,
        sheet_count + 1
    ));
    xml.push_str("</Relationships>");
    xml
}

fn generate_workbook(sheets: &[SheetBuilder]) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#);
    xml.push_str("<sheets>");
    for (i, sheet) in sheets.iter().enumerate() {
        xml.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            escape_xml(&sheet.name),
            i + 1,
            i + 1
        ));
    }
    xml.push_str("</sheets></workbook>");
    xml
}

fn generate_shared_strings(strings: &[String]) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(&format!(
        r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{}" uniqueCount="{}">"#,
        strings.len(),
        strings.len()
    ));
    for s in strings {
        xml.push_str(&format!(
            r#"<si><t xml:space="preserve">{}</t></si>"#,
            escape_xml(s)
        ));
    }
    xml.push_str("</sst>");
    xml
}

fn generate_sheet_xml(sheet: &SheetBuilder, shared_strings: &[String]) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(
        r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    );
    xml.push_str("<sheetData>");

    for (r, row) in sheet.rows.iter().enumerate() {
        let row_num = r + 1;
        xml.push_str(&format!(r#"<row r="{row_num}">"#));
        for (c, cell) in row.cells.iter().enumerate() {
            let cell_ref = format!("{}{row_num}", col_num_to_letter(c as u32 + 1));
            match cell {
                CellValue::Shared(s) => {
                    let idx = shared_strings.iter().position(|x| x == s).unwrap();
                    xml.push_str(&format!(r#"<c r="{cell_ref}" t="s"><v>{idx}</v></c>"#));
                }
                CellValue::Inline(s) => xml.push_str(&format!(
                    r#"<c r="{cell_ref}" t="inlineStr"><is><t>{}</t></is></c>"#,
                    escape_xml(s)
                )),
                CellValue::Number(n) => {
                    xml.push_str(&format!(r#"<c r="{cell_ref}"><v>{n}</v></c>"#));
                }
                CellValue::Boolean(b) => xml.push_str(&format!(
                    r#"<c r="{cell_ref}" t="b"><v>{}</v></c>"#,
                    u8::from(*b)
                )),
                CellValue::Empty => xml.push_str(&format!(r#"<c r="{cell_ref}" s="1"/>"#)),
            }
        }
        xml.push_str("</row>");
    }

    xml.push_str("</sheetData>");
    xml.push_str("</worksheet>");
    xml
}

/// Convert a 1-indexed column number to letters (1 -> A, 27 -> AA).
pub fn col_num_to_letter(mut col: u32) -> String {
    let mut result = String::new();
    while col > 0 {
        col -= 1;
        result.insert(0, (b'A' + (col % 26) as u8) as char);
        col /= 26;
    }
    result
}

/// Escape special XML characters.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

//! XLSX reader: first worksheet, first two columns.
//!
//! Only what the inventory table needs is read: workbook relationships (to
//! locate the first sheet and the shared strings part), the shared string
//! table, and the `<sheetData>` of the first sheet. Styles, themes, drawings
//! and every other part of the package are skipped.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Cursor, Read, Seek};
use zip::ZipArchive;

use crate::cell_ref::parse_column_bytes;
use crate::error::{BinScoutError, Result};
use crate::table::RawRecord;
use crate::xml_helpers::{attr_bytes, attr_string, attr_string_local};

/// Paths pulled from xl/_rels/workbook.xml.rels.
#[derive(Default, Debug)]
struct WorkbookRelationships {
    /// rId -> full path, e.g. "rId1" -> "xl/worksheets/sheet1.xml"
    worksheets: HashMap<String, String>,
    shared_strings: Option<String>,
}

/// Cell type tag from the `t` attribute of a `<c>` element.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum CellTypeTag {
    Shared,
    Inline,
    Str,
    Bool,
    Error,
    Default,
}

fn parse_cell_type_tag(value: &[u8]) -> CellTypeTag {
    match value {
        b"s" => CellTypeTag::Shared,
        b"b" => CellTypeTag::Bool,
        b"e" => CellTypeTag::Error,
        b"str" => CellTypeTag::Str,
        b"inlineStr" => CellTypeTag::Inline,
        _ => CellTypeTag::Default,
    }
}

/// Read the first worksheet of an XLSX package into two-column records.
///
/// Records come out in sheet order. Rows that are missing from the XML are
/// not synthesized.
///
/// # Errors
/// Returns an error if the data is not a ZIP archive, the workbook part is
/// missing, or the sheet XML is malformed.
pub fn read_first_sheet(data: &[u8]) -> Result<Vec<RawRecord>> {
    let mut archive = ZipArchive::new(Cursor::new(data))?;

    let rels = parse_workbook_relationships(&mut archive);
    let sheet_path = first_sheet_path(&mut archive, &rels.worksheets)?;
    let shared_strings = parse_shared_strings(&mut archive, rels.shared_strings.as_deref());

    let file = archive.by_name(&sheet_path)?;
    parse_sheet_rows(BufReader::new(file), &shared_strings)
}

fn parse_workbook_relationships<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
) -> WorkbookRelationships {
    let mut rels = WorkbookRelationships::default();

    let Ok(file) = archive.by_name("xl/_rels/workbook.xml.rels") else {
        return rels; // Relationships file is optional
    };

    let mut xml = Reader::from_reader(BufReader::new(file));
    xml.trim_text(true);
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e) | Event::Start(ref e)) => {
                if e.local_name().as_ref() == b"Relationship" {
                    let id = attr_string(e, b"Id").unwrap_or_default();
                    let target = attr_string(e, b"Target").unwrap_or_default();
                    let rel_type = attr_string(e, b"Type").unwrap_or_default();

                    // Targets are relative to xl/ unless absolute
                    let full_path = match target.strip_prefix('/') {
                        Some(stripped) => stripped.to_string(),
                        None => format!("xl/{target}"),
                    };

                    if rel_type.contains("worksheet") && !id.is_empty() && !target.is_empty() {
                        rels.worksheets.insert(id, full_path);
                    } else if rel_type.contains("sharedStrings") {
                        rels.shared_strings = Some(full_path);
                    }
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    rels
}

/// Path of the first `<sheet>` listed in xl/workbook.xml.
fn first_sheet_path<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    worksheets: &HashMap<String, String>,
) -> Result<String> {
    let file = archive.by_name("xl/workbook.xml")?;
    let mut xml = Reader::from_reader(BufReader::new(file));
    xml.trim_text(true);
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Empty(ref e) | Event::Start(ref e) if e.local_name().as_ref() == b"sheet" => {
                let path = attr_string_local(e, b"id")
                    .and_then(|r_id| worksheets.get(&r_id).cloned())
                    .unwrap_or_else(|| "xl/worksheets/sheet1.xml".to_string());
                return Ok(path);
            }
            Event::Eof => {
                return Err(BinScoutError::Parse("workbook lists no sheets".into()));
            }
            _ => {}
        }
        buf.clear();
    }
}

fn parse_shared_strings<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: Option<&str>,
) -> Vec<String> {
    let sst_path = path.unwrap_or("xl/sharedStrings.xml");
    let Ok(file) = archive.by_name(sst_path) else {
        return Vec::new(); // SharedStrings is optional
    };

    let mut xml = Reader::from_reader(BufReader::new(file));
    xml.trim_text(false);

    let mut strings = Vec::new();
    let mut buf = Vec::new();
    let mut current = String::new();
    let mut in_si = false;
    let mut in_t = false;
    // Phonetic runs (<rPh><t>) are not part of the displayed text
    let mut in_rph = false;

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"si" => {
                    in_si = true;
                    current.clear();
                }
                b"rPh" => in_rph = true,
                b"t" if in_si && !in_rph => in_t = true,
                _ => {}
            },
            Ok(Event::Text(ref e)) if in_t => {
                if let Ok(text) = e.unescape() {
                    current.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"si" => {
                    strings.push(std::mem::take(&mut current));
                    in_si = false;
                }
                b"rPh" => in_rph = false,
                b"t" => in_t = false,
                _ => {}
            },
            Ok(Event::Empty(ref e)) if e.local_name().as_ref() == b"si" => {
                strings.push(String::new());
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    strings
}

/// Cell under construction while walking a `<c>` element.
struct PendingCell {
    col: u32,
    tag: CellTypeTag,
    value: String,
    has_value: bool,
}

impl PendingCell {
    /// Final display text, `None` for a cell with no value.
    fn resolve(self, shared_strings: &[String]) -> Option<String> {
        if !self.has_value {
            return None;
        }
        match self.tag {
            CellTypeTag::Shared => self
                .value
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|idx| shared_strings.get(idx).cloned()),
            CellTypeTag::Bool => {
                let truthy = self.value.trim() == "1";
                Some(if truthy { "TRUE" } else { "FALSE" }.to_string())
            }
            CellTypeTag::Inline | CellTypeTag::Str | CellTypeTag::Error | CellTypeTag::Default => {
                Some(self.value)
            }
        }
    }
}

/// Walk `<sheetData>` and keep columns A and B of every row.
fn parse_sheet_rows<B: BufRead>(reader: B, shared_strings: &[String]) -> Result<Vec<RawRecord>> {
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(false);

    let mut records = Vec::new();
    let mut buf = Vec::new();

    let mut current: Option<RawRecord> = None;
    let mut next_col: u32 = 0;
    let mut cell: Option<PendingCell> = None;
    let mut in_value = false;
    let mut in_rph = false;

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"row" => {
                    current = Some(RawRecord::default());
                    next_col = 0;
                }
                b"c" => {
                    let (col, tag) = cell_attrs(e, next_col);
                    next_col = col.saturating_add(1);
                    cell = Some(PendingCell {
                        col,
                        tag,
                        value: String::new(),
                        has_value: false,
                    });
                }
                b"rPh" => in_rph = true,
                b"v" | b"t" if cell.is_some() && !in_rph => {
                    in_value = true;
                    if let Some(c) = cell.as_mut() {
                        c.has_value = true;
                    }
                }
                _ => {}
            },
            Event::Empty(ref e) => match e.local_name().as_ref() {
                // <row r="4"/> still occupies a position in the table
                b"row" => {
                    records.push(RawRecord::default());
                    next_col = 0;
                }
                b"c" => {
                    let (col, _) = cell_attrs(e, next_col);
                    next_col = col.saturating_add(1);
                }
                _ => {}
            },
            Event::Text(ref e) if in_value => {
                if let Some(c) = cell.as_mut() {
                    c.value.push_str(&e.unescape()?);
                }
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"v" | b"t" => in_value = false,
                b"rPh" => in_rph = false,
                b"c" => {
                    if let (Some(pending), Some(record)) = (cell.take(), current.as_mut()) {
                        let col = pending.col;
                        let value = pending.resolve(shared_strings);
                        match col {
                            0 => record.id = value,
                            1 => record.status = value,
                            _ => {}
                        }
                    }
                }
                b"row" => {
                    if let Some(record) = current.take() {
                        records.push(record);
                    }
                }
                b"sheetData" => break,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(record) = current.take() {
        records.push(record);
    }

    Ok(records)
}

/// Column (from `r`, else positional) and type tag of a `<c>` element.
fn cell_attrs(e: &BytesStart, next_col: u32) -> (u32, CellTypeTag) {
    let col = attr_bytes(e, b"r")
        .and_then(|r| parse_column_bytes(&r))
        .unwrap_or(next_col);
    let tag = attr_bytes(e, b"t")
        .map(|t| parse_cell_type_tag(&t))
        .unwrap_or(CellTypeTag::Default);
    (col, tag)
}

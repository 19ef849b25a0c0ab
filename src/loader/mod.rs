//! Data loaders: turn a spreadsheet into ordered two-column records.
//!
//! The table store only sees the [`DataSource`] trait. Concrete sources read
//! XLSX workbooks (first sheet) and CSV/TSV text, picked by content sniffing
//! and file extension.

pub mod delimited;
pub mod xlsx;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{BinScoutError, Result};
use crate::table::RawRecord;

pub use delimited::Delimiter;

/// Port through which the table store pulls inventory records.
pub trait DataSource {
    /// Produce every record in source order.
    ///
    /// # Errors
    /// Returns a load error if the source is unreachable or unreadable.
    fn records(&self) -> Result<Vec<RawRecord>>;

    /// Human-readable name for logs and error messages.
    fn describe(&self) -> String;
}

/// Spreadsheet formats the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Xlsx,
    Delimited(Delimiter),
}

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = b"\xD0\xCF\x11\xE0";

impl Format {
    /// Pick a format from the content, falling back to the file name.
    ///
    /// # Errors
    /// Returns [`BinScoutError::UnsupportedFormat`] for legacy `.xls` files and
    /// for `.xlsx` names whose content is not a ZIP package.
    pub fn detect(data: &[u8], name: &str) -> Result<Self> {
        if data.starts_with(ZIP_MAGIC) {
            return Ok(Self::Xlsx);
        }
        if data.starts_with(OLE_MAGIC) {
            return Err(BinScoutError::UnsupportedFormat(format!(
                "{name}: legacy .xls workbooks are not supported, save as .xlsx or .csv"
            )));
        }

        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "xlsx" | "xlsm" => Err(BinScoutError::UnsupportedFormat(format!(
                "{name}: not a valid XLSX package"
            ))),
            "tsv" | "tab" => Ok(Self::Delimited(Delimiter::Tab)),
            _ => Ok(Self::Delimited(Delimiter::Comma)),
        }
    }
}

/// Spreadsheet bytes already in memory (uploaded file, fetched asset).
#[derive(Debug, Clone)]
pub struct BytesSource {
    name: String,
    data: Vec<u8>,
}

impl BytesSource {
    #[must_use]
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

impl DataSource for BytesSource {
    fn records(&self) -> Result<Vec<RawRecord>> {
        read_records(&self.data, &self.name)
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}

/// Spreadsheet on disk, read at load time.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DataSource for FileSource {
    fn records(&self) -> Result<Vec<RawRecord>> {
        let data = std::fs::read(&self.path)?;
        read_records(&data, &self.describe())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

fn read_records(data: &[u8], name: &str) -> Result<Vec<RawRecord>> {
    let format = Format::detect(data, name)?;
    debug!(source = name, ?format, bytes = data.len(), "reading inventory");
    match format {
        Format::Xlsx => xlsx::read_first_sheet(data),
        Format::Delimited(delim) => Ok(delimited::parse_delimited(data, delim)),
    }
}

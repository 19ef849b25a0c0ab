//! The inventory table: an ordered, immutable snapshot of `(identifier, status)` rows.
//!
//! Row order is taken from the data source as-is. It defines what "next" and
//! "wrap around" mean for the resolver, so nothing here ever sorts.

use serde::Serialize;
use tracing::debug;

use crate::config::HeaderMarkers;

/// One raw two-column record as produced by a data loader.
///
/// Cells may be absent (short rows, blank cells).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub id: Option<String>,
    pub status: Option<String>,
}

impl RawRecord {
    #[must_use]
    pub fn new(id: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            status: Some(status.into()),
        }
    }
}

/// A bin identifier and its free-text status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub id: String,
    pub status: String,
}

impl Row {
    #[must_use]
    pub fn new(id: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: status.into(),
        }
    }
}

/// Ordered row snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    /// An empty table. Every lookup against it reports not-found.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table from already-clean rows, keeping their order.
    #[must_use]
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Build a table from raw loader records.
    ///
    /// The first record is dropped when it looks like a header; every other
    /// record becomes a row with both cells trimmed and absent cells as `""`.
    #[must_use]
    pub fn from_records(records: Vec<RawRecord>, header: &HeaderMarkers) -> Self {
        let mut records = records.into_iter().peekable();
        if let Some(first) = records.peek() {
            let id = first.id.as_deref().unwrap_or("");
            let status = first.status.as_deref().unwrap_or("");
            if header.is_header(id, status) {
                debug!(id, status, "skipping header row");
                records.next();
            }
        }

        let rows = records
            .map(|r| Row {
                id: r.id.as_deref().unwrap_or("").trim().to_string(),
                status: r.status.as_deref().unwrap_or("").trim().to_string(),
            })
            .collect();
        Self { rows }
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the first row whose identifier equals `id` exactly.
    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.rows.iter().position(|row| row.id == id)
    }
}

//! Holder of the current inventory snapshot.
//!
//! The store owns one immutable [`Table`] behind an `Arc`. Loading builds a
//! complete new table first and then swaps the pointer, so a reader that
//! grabbed the previous snapshot keeps using it undisturbed and no reader can
//! see a half-built table. A failed load leaves the previous snapshot in place.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::{info, warn};

use crate::config::HeaderMarkers;
use crate::error::{BinScoutError, Result};
use crate::loader::DataSource;
use crate::table::Table;

#[derive(Debug, Default)]
pub struct TableStore {
    current: RwLock<Arc<Table>>,
}

impl TableStore {
    /// A store with no rows; every lookup reports not-found until a load succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read all records from `source`, build a table and install it.
    ///
    /// # Errors
    /// Returns a load error if the source cannot be read or yields no rows.
    /// The previously installed snapshot is kept.
    pub fn load(&self, source: &dyn DataSource, header: &HeaderMarkers) -> Result<Arc<Table>> {
        let name = source.describe();
        let table = match source.records() {
            Ok(records) => Table::from_records(records, header),
            Err(e) => {
                warn!(source = %name, error = %e, "inventory load failed");
                return Err(e);
            }
        };

        if table.is_empty() {
            warn!(source = %name, "inventory source produced no rows");
            return Err(BinScoutError::EmptySource(name));
        }

        let table = Arc::new(table);
        self.install(Arc::clone(&table));
        info!(source = %name, rows = table.len(), "inventory loaded");
        Ok(table)
    }

    /// The snapshot lookups should run against.
    #[must_use]
    pub fn current(&self) -> Arc<Table> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Replace the snapshot wholesale.
    pub fn install(&self, table: Arc<Table>) {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = table;
    }
}

//! binscout - find empty storage bins next to a scanned inventory ID
//!
//! Loads an inventory spreadsheet (ID, status) once and answers lookups:
//! - Normalizes scanner output (AIM symbology markers, control bytes)
//! - Locates the scanned row and collects empty bins sharing its prefix
//! - Bounded-run or wrap-around search, configurable emptiness tokens
//! - Groups results into contiguous, colored display blocks
//! - XLSX, CSV and TSV inventories; native CLI and WebAssembly bindings
//!
//! # Usage (Rust)
//!
//! ```no_run
//! use std::sync::Arc;
//! use binscout::{FileSource, LookupConfig, Outcome, Session, TableStore};
//!
//! let session = Session::new(LookupConfig::default(), Arc::new(TableStore::new()));
//! let mut shown: Vec<Outcome> = Vec::new();
//! session.startup(&FileSource::new("inventory.xlsx"), &mut shown);
//! session.submit("]C1AAAAA11201", &mut shown);
//! ```

// Core
pub mod config;
pub mod error;
pub mod grouper;
pub mod normalize;
pub mod resolver;
pub mod session;
pub mod store;
pub mod table;

// Data loading
pub mod cell_ref;
pub mod loader;
pub mod xml_helpers;

// Browser bindings
pub mod wasm;

pub use config::{HeaderMarkers, LookupConfig};
pub use error::{BinScoutError, Result};
pub use grouper::{group, runs, GroupedLocation, LocationGroup};
pub use loader::{BytesSource, DataSource, FileSource};
pub use normalize::normalize;
pub use resolver::{EmptinessPredicate, Resolution, Resolver, SearchPolicy};
pub use session::{Outcome, PresentationSink, Session};
pub use store::TableStore;
pub use table::{RawRecord, Row, Table};
pub use wasm::BinScout;

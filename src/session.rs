//! Lookup session: normalizer -> store -> resolver -> grouper -> sink.
//!
//! The front end owns the scanner and the display. It hands raw text (or
//! capture events) to a [`Session`] and receives exactly one [`Outcome`] per
//! lookup through its [`PresentationSink`].

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::LookupConfig;
use crate::error::{BinScoutError, Result};
use crate::grouper::{group, GroupedLocation};
use crate::loader::DataSource;
use crate::normalize::normalize;
use crate::resolver::{Resolution, Resolver, SearchPolicy};
use crate::store::TableStore;
use crate::table::Table;

/// Everything the core can ask the front end to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "kebab-case")]
pub enum Outcome {
    /// The identifier was blank after normalization.
    InputEmpty,
    /// The scanned identifier is not in the table (bounded-run policy).
    NotFound { id: String },
    /// No empty bin shares the identifier's prefix.
    NoEmptyBins { id: String },
    /// Empty bins, tagged with display group and color.
    Locations {
        id: String,
        found: bool,
        locations: Vec<GroupedLocation>,
    },
    /// The inventory could not be loaded.
    LoadFailed { reason: String },
}

/// Port through which results reach the display.
pub trait PresentationSink {
    fn present(&mut self, outcome: &Outcome);
}

impl PresentationSink for Vec<Outcome> {
    fn present(&mut self, outcome: &Outcome) {
        self.push(outcome.clone());
    }
}

/// Glue between input, the table snapshot and the display.
#[derive(Debug)]
pub struct Session {
    config: LookupConfig,
    resolver: Resolver,
    store: Arc<TableStore>,
}

impl Session {
    #[must_use]
    pub fn new(config: LookupConfig, store: Arc<TableStore>) -> Self {
        let resolver = Resolver::new(&config);
        Self {
            config,
            resolver,
            store,
        }
    }

    #[must_use]
    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &Arc<TableStore> {
        &self.store
    }

    /// Load the inventory, reporting a failure to `sink` instead of returning it.
    ///
    /// Returns the number of rows now available.
    pub fn startup(&self, source: &dyn DataSource, sink: &mut dyn PresentationSink) -> usize {
        match self.store.load(source, &self.config.header) {
            Ok(table) => table.len(),
            Err(e) => {
                sink.present(&Outcome::LoadFailed {
                    reason: e.to_string(),
                });
                self.store.current().len()
            }
        }
    }

    /// Handle typed input.
    pub fn submit(&self, raw: &str, sink: &mut dyn PresentationSink) -> Outcome {
        let outcome = self.lookup(raw);
        sink.present(&outcome);
        outcome
    }

    /// Handle one capture event from the scanner; failed captures are ignored.
    pub fn on_scan<E: std::fmt::Display>(
        &self,
        capture: std::result::Result<String, E>,
        sink: &mut dyn PresentationSink,
    ) -> Option<Outcome> {
        match capture {
            Ok(text) => Some(self.submit(&text, sink)),
            Err(e) => {
                debug!(error = %e, "scan capture failed, ignoring");
                None
            }
        }
    }

    /// Normalize, resolve and group without touching a sink.
    #[must_use]
    pub fn lookup(&self, raw: &str) -> Outcome {
        let Ok(id) = validate(raw) else {
            return Outcome::InputEmpty;
        };
        let table = self.store.current();
        if table.is_empty() {
            warn!(id = %id, "lookup against an empty inventory");
        }
        self.outcome_for(&table, id)
    }

    fn outcome_for(&self, table: &Table, id: String) -> Outcome {
        let Resolution { found, locations } = self.resolver.resolve(table, &id);

        if !found && self.resolver.policy() == SearchPolicy::BoundedRun {
            return Outcome::NotFound { id };
        }
        if locations.is_empty() {
            return Outcome::NoEmptyBins { id };
        }

        let locations = group(
            &locations,
            self.config.group_key_len,
            self.config.palette_size(),
        );
        Outcome::Locations {
            id,
            found,
            locations,
        }
    }
}

/// Normalize raw input and reject a blank result.
///
/// # Errors
/// Returns [`BinScoutError::EmptyInput`] when nothing is left after normalization.
pub fn validate(raw: &str) -> Result<String> {
    let id = normalize(raw);
    if id.is_empty() {
        return Err(BinScoutError::EmptyInput);
    }
    Ok(id)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::loader::BytesSource;

    const INVENTORY: &str = "ID,DETAILS\n\
        AAAAA11101,Y\n\
        AAAAA11102,N\n\
        AAAAA11201,\n\
        BBBBB22201,Y\n\
        AAAAA11301,EMPTY\n";

    fn session(config: LookupConfig) -> (Session, Vec<Outcome>) {
        let session = Session::new(config, Arc::new(TableStore::new()));
        let mut sink = Vec::new();
        let rows = session.startup(
            &BytesSource::new("inventory.csv", INVENTORY.as_bytes().to_vec()),
            &mut sink,
        );
        assert_eq!(rows, 5);
        (session, sink)
    }

    fn locations(outcome: &Outcome) -> Vec<(&str, usize)> {
        match outcome {
            Outcome::Locations { locations, .. } => locations
                .iter()
                .map(|l| (l.location.as_str(), l.color))
                .collect(),
            other => panic!("expected locations, got {other:?}"),
        }
    }

    #[test]
    fn test_default_policy_wraps_and_groups() {
        let (session, mut sink) = session(LookupConfig::default());
        assert!(sink.is_empty());

        let outcome = session.submit("]C1AAAAA11201\r\n", &mut sink);
        assert_eq!(sink, vec![outcome.clone()]);
        assert_eq!(
            locations(&outcome),
            vec![("AAAAA11201", 0), ("AAAAA11301", 1), ("AAAAA11101", 2)]
        );
    }

    #[test]
    fn test_legacy_policy() {
        let (session, mut sink) = session(LookupConfig::legacy());
        let outcome = session.submit("AAAAA11101", &mut sink);
        // Run stops at BBBBB22201; the blank status is not empty in legacy mode.
        assert_eq!(locations(&outcome), vec![("AAAAA11101", 0)]);

        let outcome = session.submit("AAAAA99999", &mut sink);
        assert_eq!(
            outcome,
            Outcome::NotFound {
                id: "AAAAA99999".into()
            }
        );

        let outcome = session.submit("AAAAA11102", &mut sink);
        assert_eq!(
            outcome,
            Outcome::NoEmptyBins {
                id: "AAAAA11102".into()
            }
        );
    }

    #[test]
    fn test_absent_id_under_wraparound_still_lists_prefix() {
        let (session, mut sink) = session(LookupConfig::default());
        let outcome = session.submit("aaaaa00000", &mut sink);
        match outcome {
            Outcome::Locations { found, .. } => assert!(!found),
            other => panic!("unexpected {other:?}"),
        }
        let outcome = session.submit("ZZZZZ999", &mut sink);
        assert_eq!(
            outcome,
            Outcome::NoEmptyBins {
                id: "ZZZZZ999".into()
            }
        );
    }

    #[test]
    fn test_blank_input_rejected() {
        let (session, mut sink) = session(LookupConfig::default());
        assert_eq!(session.submit("", &mut sink), Outcome::InputEmpty);
        assert_eq!(session.submit(" \u{2}]C1 \n", &mut sink), Outcome::InputEmpty);
        assert!(matches!(validate("\t"), Err(BinScoutError::EmptyInput)));
    }

    #[test]
    fn test_scan_failures_ignored() {
        let (session, mut sink) = session(LookupConfig::default());
        assert!(session
            .on_scan(Err::<String, _>("no barcode in frame"), &mut sink)
            .is_none());
        assert!(sink.is_empty());
        assert!(session
            .on_scan(Ok::<_, String>("BBBBB22201".into()), &mut sink)
            .is_some());
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_load_failure_reported_and_lookups_not_found() {
        let session = Session::new(LookupConfig::legacy(), Arc::new(TableStore::new()));
        let mut sink = Vec::new();
        let rows = session.startup(&BytesSource::new("inventory.csv", Vec::new()), &mut sink);
        assert_eq!(rows, 0);
        assert!(matches!(sink.as_slice(), [Outcome::LoadFailed { .. }]));
        assert_eq!(
            session.lookup("AAAAA11101"),
            Outcome::NotFound {
                id: "AAAAA11101".into()
            }
        );
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_value(Outcome::NoEmptyBins { id: "X".into() }).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "no-empty-bins", "detail": {"id": "X"}})
        );
        let json = serde_json::to_value(Outcome::InputEmpty).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "input-empty"}));
    }
}

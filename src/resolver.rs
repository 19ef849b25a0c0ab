//! Location resolution: find the scanned row, collect nearby empty bins.
//!
//! Two policies are supported, both scoped by the case-insensitive search
//! prefix of the start identifier:
//!
//! - [`SearchPolicy::BoundedRun`] walks forward from the exact match and stops
//!   at the first row whose prefix differs. An absent start identifier yields
//!   nothing.
//! - [`SearchPolicy::Wraparound`] visits every row once, starting at the exact
//!   match and wrapping to the top, or top-to-bottom when there is no match.
//!
//! Resolution is a pure function of the table snapshot and the identifier.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::LookupConfig;
use crate::normalize::prefix_key;
use crate::table::{Row, Table};

/// How the resolver walks the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchPolicy {
    /// Forward from the exact match until the prefix changes.
    BoundedRun,
    /// Whole table, rotated to start at the exact match.
    #[default]
    Wraparound,
}

/// Result of a lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Whether the start identifier exists in the table.
    pub found: bool,
    /// Empty bins in visitation order.
    pub locations: Vec<String>,
}

impl Resolution {
    #[must_use]
    pub fn not_found() -> Self {
        Self::default()
    }
}

/// Decides whether a status cell marks a bin as empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptinessPredicate {
    tokens: HashSet<String>,
}

impl EmptinessPredicate {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tokens: tokens
                .into_iter()
                .map(|t| t.as_ref().trim().to_uppercase())
                .collect(),
        }
    }

    /// Status is trimmed and uppercased before comparison.
    #[must_use]
    pub fn matches(&self, status: &str) -> bool {
        self.tokens.contains(&status.trim().to_uppercase())
    }
}

/// Resolver bound to one configuration.
#[derive(Debug, Clone)]
pub struct Resolver {
    policy: SearchPolicy,
    prefix_len: usize,
    predicate: EmptinessPredicate,
}

impl Resolver {
    #[must_use]
    pub fn new(config: &LookupConfig) -> Self {
        Self {
            policy: config.policy,
            prefix_len: config.prefix_len,
            predicate: EmptinessPredicate::new(&config.empty_tokens),
        }
    }

    #[must_use]
    pub fn policy(&self) -> SearchPolicy {
        self.policy
    }

    /// Resolve `start_id` (already normalized) against `table`.
    #[must_use]
    pub fn resolve(&self, table: &Table, start_id: &str) -> Resolution {
        if start_id.is_empty() {
            return Resolution::not_found();
        }
        let resolution = match self.policy {
            SearchPolicy::BoundedRun => self.bounded_run(table, start_id),
            SearchPolicy::Wraparound => self.wraparound(table, start_id),
        };
        debug!(
            start_id,
            policy = ?self.policy,
            found = resolution.found,
            locations = resolution.locations.len(),
            "resolved"
        );
        resolution
    }

    /// Row indices the wraparound policy visits, in order.
    ///
    /// Starts at the first exact match of `start_id` and wraps to the top,
    /// or runs top-to-bottom when there is no match. Each index appears once.
    pub fn visit_order(table: &Table, start_id: &str) -> impl Iterator<Item = usize> {
        let len = table.len();
        let start = table.position(start_id).unwrap_or(0);
        (start..len).chain(0..start)
    }

    fn bounded_run(&self, table: &Table, start_id: &str) -> Resolution {
        let Some(start) = table.position(start_id) else {
            return Resolution::not_found();
        };
        let prefix = prefix_key(start_id, self.prefix_len);

        let locations = table
            .rows()
            .iter()
            .skip(start)
            .take_while(|row| prefix_key(&row.id, self.prefix_len) == prefix)
            .filter(|row| self.is_empty_bin(row))
            .map(|row| row.id.clone())
            .collect();

        Resolution {
            found: true,
            locations,
        }
    }

    fn wraparound(&self, table: &Table, start_id: &str) -> Resolution {
        let found = table.position(start_id).is_some();
        let prefix = prefix_key(start_id, self.prefix_len);
        let rows = table.rows();

        let locations = Self::visit_order(table, start_id)
            .filter_map(|idx| rows.get(idx))
            .filter(|row| prefix_key(&row.id, self.prefix_len) == prefix)
            .filter(|row| self.is_empty_bin(row))
            .map(|row| row.id.clone())
            .collect();

        Resolution { found, locations }
    }

    fn is_empty_bin(&self, row: &Row) -> bool {
        !row.id.is_empty() && self.predicate.matches(&row.status)
    }
}

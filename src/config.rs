//! Lookup configuration.
//!
//! Every knob has a default, so an empty TOML document (or no file at all)
//! yields [`LookupConfig::default`]:
//!
//! ```toml
//! policy = "wraparound"      # or "bounded-run"
//! prefix_len = 5
//! group_key_len = 8
//! empty_tokens = ["", "Y", "EMPTY"]
//! palette = ["#2563eb", "#16a34a", "#d97706", "#9333ea", "#dc2626"]
//!
//! [header]
//! id_markers = ["ID"]
//! status_markers = ["DETAILS", "STATUS"]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BinScoutError, Result};
use crate::resolver::SearchPolicy;

/// Default search prefix length (characters).
pub const DEFAULT_PREFIX_LEN: usize = 5;

/// Default display group key length (characters).
pub const DEFAULT_GROUP_KEY_LEN: usize = 8;

/// Group colors used by the current front end.
pub const DEFAULT_PALETTE: [&str; 5] = ["#2563eb", "#16a34a", "#d97706", "#9333ea", "#dc2626"];

/// Group colors used by the earlier three-color front end.
pub const LEGACY_PALETTE: [&str; 3] = ["#2563eb", "#16a34a", "#d97706"];

/// Full configuration for normalization, resolution and grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Which search policy the resolver runs.
    pub policy: SearchPolicy,
    /// Number of leading characters compared (case-insensitively) when scoping a search.
    pub prefix_len: usize,
    /// Number of leading characters that partition results into display groups.
    pub group_key_len: usize,
    /// Status values (trimmed, uppercased) that mark a bin as empty.
    pub empty_tokens: Vec<String>,
    /// Colors cycled through by consecutive result groups.
    pub palette: Vec<String>,
    /// Header row sentinels.
    pub header: HeaderMarkers,
}

/// Column-name sentinels used to detect a header as the first record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderMarkers {
    /// Matched case-insensitively against the first column.
    pub id_markers: Vec<String>,
    /// Matched case-insensitively against the second column.
    pub status_markers: Vec<String>,
}

impl Default for HeaderMarkers {
    fn default() -> Self {
        Self {
            id_markers: vec!["ID".to_string()],
            status_markers: vec!["DETAILS".to_string(), "STATUS".to_string()],
        }
    }
}

impl HeaderMarkers {
    /// Whether a first record with these two cells is a header.
    #[must_use]
    pub fn is_header(&self, id: &str, status: &str) -> bool {
        let id = id.trim();
        let status = status.trim();
        self.id_markers.iter().any(|m| m.eq_ignore_ascii_case(id))
            || self.status_markers.iter().any(|m| m.eq_ignore_ascii_case(status))
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            policy: SearchPolicy::Wraparound,
            prefix_len: DEFAULT_PREFIX_LEN,
            group_key_len: DEFAULT_GROUP_KEY_LEN,
            empty_tokens: vec![String::new(), "Y".to_string(), "EMPTY".to_string()],
            palette: DEFAULT_PALETTE.iter().map(ToString::to_string).collect(),
            header: HeaderMarkers::default(),
        }
    }
}

impl LookupConfig {
    /// The earlier behavior: stop at the first prefix change, blank status is not empty,
    /// three group colors.
    #[must_use]
    pub fn legacy() -> Self {
        Self {
            policy: SearchPolicy::BoundedRun,
            empty_tokens: vec!["Y".to_string(), "EMPTY".to_string()],
            palette: LEGACY_PALETTE.iter().map(ToString::to_string).collect(),
            ..Self::default()
        }
    }

    /// Parse and validate a TOML document.
    ///
    /// # Errors
    /// Returns an error if the document is not valid TOML or fails [`validate`](Self::validate).
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or its content is invalid.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            BinScoutError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Reject values the resolver and grouper cannot work with.
    ///
    /// # Errors
    /// Returns [`BinScoutError::Config`] describing the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.prefix_len == 0 {
            return Err(BinScoutError::Config("prefix_len must be at least 1".into()));
        }
        if self.group_key_len == 0 {
            return Err(BinScoutError::Config(
                "group_key_len must be at least 1".into(),
            ));
        }
        if self.palette.is_empty() {
            return Err(BinScoutError::Config("palette must not be empty".into()));
        }
        Ok(())
    }

    /// Number of colors groups cycle through.
    #[must_use]
    pub fn palette_size(&self) -> usize {
        self.palette.len()
    }
}

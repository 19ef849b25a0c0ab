//! Structured error types for binscout.
//!
//! Lookups never fail: a missing identifier is an ordinary `found = false`
//! resolution. Errors come from input validation and from loading the
//! inventory snapshot.

/// All errors that can occur while loading inventory data or validating input.
#[derive(Debug, thiserror::Error)]
pub enum BinScoutError {
    /// XML parsing error from quick-xml.
    #[error("XML parsing: {0}")]
    Xml(#[from] quick_xml::Error),

    /// ZIP archive error.
    #[error("ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// I/O error (missing or unreadable data source).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed spreadsheet content.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The data source produced no rows.
    #[error("Data source is empty: {0}")]
    EmptySource(String),

    /// The data source is not a format we can read.
    #[error("Unsupported data source: {0}")]
    UnsupportedFormat(String),

    /// Configuration file could not be parsed.
    #[error("Config parse: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration parsed but holds unusable values.
    #[error("Invalid config: {0}")]
    Config(String),

    /// The identifier was blank after normalization.
    #[error("Input is empty")]
    EmptyInput,
}

impl BinScoutError {
    /// Whether this error came from loading the inventory snapshot.
    #[must_use]
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            Self::Xml(_)
                | Self::Zip(_)
                | Self::Io(_)
                | Self::Parse(_)
                | Self::EmptySource(_)
                | Self::UnsupportedFormat(_)
        )
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BinScoutError>;

impl From<BinScoutError> for wasm_bindgen::JsValue {
    fn from(e: BinScoutError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}

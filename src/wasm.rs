//! JavaScript surface for the browser front end.
//!
//! ```javascript
//! import init, { BinScout } from 'binscout';
//! await init();
//! const scout = new BinScout();            // or new BinScout(tomlText)
//! const bytes = new Uint8Array(await (await fetch('inventory.xlsx')).arrayBuffer());
//! scout.load('inventory.xlsx', bytes);
//! const outcome = scout.lookup(decodedText); // { kind, detail }
//! ```

use std::sync::Arc;

use wasm_bindgen::prelude::*;

use crate::config::LookupConfig;
use crate::loader::BytesSource;
use crate::normalize::normalize;
use crate::session::Session;
use crate::store::TableStore;

/// One inventory snapshot plus the lookup configuration.
#[wasm_bindgen]
pub struct BinScout {
    session: Session,
}

#[wasm_bindgen]
impl BinScout {
    /// Create a lookup engine, optionally configured from TOML text.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid.
    #[wasm_bindgen(constructor)]
    pub fn new(config_toml: Option<String>) -> Result<BinScout, JsValue> {
        console_error_panic_hook::set_once();
        let config = match config_toml {
            Some(text) => LookupConfig::from_toml_str(&text)?,
            None => LookupConfig::default(),
        };
        Ok(Self {
            session: Session::new(config, Arc::new(TableStore::new())),
        })
    }

    /// Replace the inventory with the spreadsheet in `data` (XLSX, CSV or TSV).
    ///
    /// Returns the number of rows loaded. On failure the previous inventory stays.
    ///
    /// # Errors
    /// Returns an error if the data cannot be read or holds no rows.
    pub fn load(&self, name: &str, data: &[u8]) -> Result<usize, JsValue> {
        let source = BytesSource::new(name, data.to_vec());
        let table = self
            .session
            .store()
            .load(&source, &self.session.config().header)?;
        Ok(table.len())
    }

    /// Look up raw scanner or keyboard text; returns an `Outcome` object.
    ///
    /// # Errors
    /// Returns an error if the outcome cannot be converted to a JS value.
    pub fn lookup(&self, raw: &str) -> Result<JsValue, JsValue> {
        let outcome = self.session.lookup(raw);
        serde_wasm_bindgen::to_value(&outcome)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    /// Same as [`lookup`](Self::lookup) but returns a JSON string.
    ///
    /// # Errors
    /// Returns an error if JSON serialization fails.
    #[wasm_bindgen(js_name = lookupJson)]
    pub fn lookup_json(&self, raw: &str) -> Result<String, JsValue> {
        let outcome = self.session.lookup(raw);
        serde_json::to_string(&outcome)
            .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {e}")))
    }

    /// Rows in the current inventory snapshot.
    #[wasm_bindgen(js_name = rowCount)]
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.session.store().current().len()
    }

    /// Colors used for result groups, indexed by `color` in each location.
    #[must_use]
    pub fn palette(&self) -> Vec<String> {
        self.session.config().palette.clone()
    }
}

/// Canonical form of raw scanner text.
#[must_use]
#[wasm_bindgen(js_name = normalizeId)]
pub fn normalize_id(raw: &str) -> String {
    normalize(raw)
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

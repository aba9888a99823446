//! JavaScript bindings for woot-core types

use crate::config::SessionConfig;
use crate::protocol;
use crate::session::{DiffSpan, ReceiveReport, Session};
use crate::sites::{SiteAllocator, SiteRegistry};
use wasm_bindgen::prelude::*;

fn js_error(context: &str, err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{}: {}", context, err))
}

/// JavaScript-friendly wrapper for Session
///
/// Every method that produces operations returns the encoded payload, ready
/// to be handed to the host's socket.
#[wasm_bindgen]
pub struct WasmSession {
    inner: Session,
}

#[wasm_bindgen]
impl WasmSession {
    /// Create a session for the given site (optional JSON config)
    #[wasm_bindgen(constructor)]
    pub fn new(site: i32, config_json: Option<String>) -> Result<WasmSession, JsValue> {
        let config = match config_json {
            Some(json) => SessionConfig::from_json(&json).map_err(|e| js_error("Invalid config", e))?,
            None => SessionConfig::default(),
        };

        Session::with_config(site.into(), config)
            .map(|inner| WasmSession { inner })
            .map_err(|e| js_error("Session creation failed", e))
    }

    /// Get the site id
    #[wasm_bindgen(js_name = getSite)]
    pub fn get_site(&self) -> f64 {
        self.inner.site() as f64
    }

    /// Get the topic operations should be published on
    #[wasm_bindgen(js_name = getTopic)]
    pub fn get_topic(&self) -> String {
        self.inner.config().topic.clone()
    }

    /// Get the visible text
    #[wasm_bindgen(js_name = text)]
    pub fn text(&self) -> String {
        self.inner.text()
    }

    /// Get the visible length in glyphs
    #[wasm_bindgen(js_name = length)]
    pub fn length(&self) -> usize {
        self.inner.len()
    }

    /// Number of remote operations waiting for dependencies
    #[wasm_bindgen(js_name = pendingCount)]
    pub fn pending_count(&self) -> usize {
        self.inner.pending_len()
    }

    /// Insert text at the given visible position
    ///
    /// # Returns
    /// JSON array of operations to broadcast
    #[wasm_bindgen(js_name = insert)]
    pub fn insert(&mut self, position: usize, text: String) -> Result<String, JsValue> {
        let ops = self
            .inner
            .insert_text(position, &text)
            .map_err(|e| js_error("Insert failed", e))?;
        protocol::encode_batch(&ops).map_err(|e| js_error("Encoding failed", e))
    }

    /// Delete `length` glyphs starting at the given visible position
    ///
    /// # Returns
    /// JSON array of operations to broadcast
    #[wasm_bindgen(js_name = delete)]
    pub fn delete(&mut self, position: usize, length: usize) -> Result<String, JsValue> {
        let ops = self
            .inner
            .delete_range(position, length)
            .map_err(|e| js_error("Delete failed", e))?;
        protocol::encode_batch(&ops).map_err(|e| js_error("Encoding failed", e))
    }

    /// Apply diff output computed by the host
    ///
    /// # Arguments
    /// * `spans_json` - JSON array of `{"kind": "equal"|"delete"|"insert", "text": "..."}`
    ///
    /// # Example
    /// ```javascript
    /// const session = new WasmSession(1);
    /// session.insert(0, "cat");
    /// const payload = session.applyDiff('[{"kind":"delete","text":"c"},{"kind":"insert","text":"b"},{"kind":"equal","text":"at"}]');
    /// socket.emit(session.getTopic(), payload);
    /// ```
    #[wasm_bindgen(js_name = applyDiff)]
    pub fn apply_diff(&mut self, spans_json: String) -> Result<String, JsValue> {
        let spans: Vec<DiffSpan> =
            serde_json::from_str(&spans_json).map_err(|e| js_error("Invalid diff", e))?;
        let ops = self
            .inner
            .apply_diff(spans)
            .map_err(|e| js_error("Diff application failed", e))?;
        protocol::encode_batch(&ops).map_err(|e| js_error("Encoding failed", e))
    }

    /// Handle an inbound payload (one operation or an array)
    ///
    /// # Returns
    /// JSON summary: `{rejected, integrated, duplicates, dropped, pending}`
    #[wasm_bindgen(js_name = receive)]
    pub fn receive(&mut self, payload: String) -> Result<String, JsValue> {
        let report = self
            .inner
            .receive_payload(&payload)
            .map_err(|e| js_error("Receive failed", e))?;
        Ok(report_json(&report).to_string())
    }
}

fn report_json(report: &ReceiveReport) -> serde_json::Value {
    serde_json::json!({
        "rejected": report.rejected,
        "integrated": report.drain.integrated,
        "duplicates": report.drain.duplicates,
        "dropped": report.drain.dropped,
        "pending": report.drain.pending,
    })
}

/// JavaScript-friendly wrapper for SiteRegistry
///
/// For relays that hand out site ids from JavaScript.
#[wasm_bindgen]
pub struct WasmSiteRegistry {
    inner: SiteRegistry,
}

impl Default for WasmSiteRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl WasmSiteRegistry {
    /// Create a registry whose first site is 1
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: SiteRegistry::new(),
        }
    }

    /// Reserve the next site id
    #[wasm_bindgen(js_name = allocate)]
    pub fn allocate(&self) -> f64 {
        self.inner.allocate() as f64
    }
}

//! WASM utility functions

use wasm_bindgen::prelude::*;

/// Install the panic hook so integration bugs surface in the browser console
///
/// Call once before creating sessions.
#[wasm_bindgen(js_name = initPanicHook)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Crate version, for hosts that log which core they loaded
#[wasm_bindgen(js_name = coreVersion)]
pub fn core_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

//! WASM bindings for woot-core
//!
//! This module provides JavaScript-friendly bindings for editing sessions.

#[cfg(feature = "wasm")]
pub mod bindings;

#[cfg(feature = "wasm")]
pub mod utils;

// Re-export main types
#[cfg(feature = "wasm")]
pub use bindings::{WasmSession, WasmSiteRegistry};

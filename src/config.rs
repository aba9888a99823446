//! Session configuration

use crate::error::{Result, WootError};
use crate::protocol::OPERATIONS_TOPIC;
use serde::{Deserialize, Serialize};

/// Tunables for a [`crate::Session`]
///
/// All fields have defaults, so an empty JSON object is a valid config.
///
/// ```rust
/// use woot_core::SessionConfig;
///
/// let config = SessionConfig::from_json(r#"{"record_stats": true}"#).unwrap();
/// assert!(config.record_stats);
/// assert_eq!(config.topic, "text_operations");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Topic operations are published on
    pub topic: String,

    /// Warn once the pending buffer holds more operations than this.
    /// Buffered operations are never dropped.
    pub pending_warn_threshold: usize,

    /// Accumulate integration statistics across the session
    pub record_stats: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            topic: OPERATIONS_TOPIC.to_string(),
            pending_warn_threshold: 1024,
            record_stats: false,
        }
    }
}

impl SessionConfig {
    /// Parse a config from JSON, filling missing fields with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| WootError::Decode(format!("Invalid session config: {}", e)))
    }
}

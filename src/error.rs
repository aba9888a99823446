//! Error types for woot-core

use crate::crdt::woot::{Identifier, SiteId};
use thiserror::Error;

/// Result type for woot-core operations
pub type Result<T> = std::result::Result<T, WootError>;

/// Broad category of a [`WootError`], used to pick the propagation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller bug; propagate, do not retry
    Precondition,
    /// Operation violated the integration contract; drop it
    Integration,
    /// Malformed wire payload; reject the message
    Decode,
    /// Serialization of an outgoing payload failed
    Encode,
}

/// Errors produced by the replicated sequence and its session layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WootError {
    #[error("Position {position} out of bounds (visible length: {length})")]
    PositionOutOfBounds { position: usize, length: usize },

    #[error("Range {start}..{end} out of bounds (visible length: {length})")]
    RangeOutOfBounds {
        start: usize,
        end: usize,
        length: usize,
    },

    #[error("Invalid glyph {0:?}: expected exactly one grapheme")]
    InvalidGlyph(String),

    #[error("Invalid site id {0}: sites must be non-negative")]
    InvalidSite(SiteId),

    #[error("Identifier {0} is not present in the sequence")]
    MissingIdentifier(Identifier),

    #[error("Bounds out of order: {next} is not after {previous}")]
    BoundsOutOfOrder {
        previous: Identifier,
        next: Identifier,
    },

    #[error("Integration of {id} stalled between {previous} and {next}")]
    IntegrationStalled {
        id: Identifier,
        previous: Identifier,
        next: Identifier,
    },

    #[error("Sentinel {0} cannot be inserted or deleted")]
    SentinelTarget(Identifier),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Encode error: {0}")]
    Encode(String),
}

impl WootError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WootError::PositionOutOfBounds { .. }
            | WootError::RangeOutOfBounds { .. }
            | WootError::InvalidGlyph(_)
            | WootError::InvalidSite(_) => ErrorKind::Precondition,
            WootError::MissingIdentifier(_)
            | WootError::BoundsOutOfOrder { .. }
            | WootError::IntegrationStalled { .. }
            | WootError::SentinelTarget(_) => ErrorKind::Integration,
            WootError::Decode(_) => ErrorKind::Decode,
            WootError::Encode(_) => ErrorKind::Encode,
        }
    }
}

impl From<serde_json::Error> for WootError {
    fn from(err: serde_json::Error) -> Self {
        WootError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let precondition = WootError::PositionOutOfBounds {
            position: 5,
            length: 3,
        };
        assert_eq!(precondition.kind(), ErrorKind::Precondition);

        let integration = WootError::MissingIdentifier(Identifier::new(1, 1));
        assert_eq!(integration.kind(), ErrorKind::Integration);

        assert_eq!(WootError::InvalidGlyph("ab".into()).kind(), ErrorKind::Precondition);
        assert_eq!(WootError::Decode("bad".into()).kind(), ErrorKind::Decode);
    }

    #[test]
    fn test_error_display() {
        let err = WootError::PositionOutOfBounds {
            position: 5,
            length: 3,
        };
        assert_eq!(err.to_string(), "Position 5 out of bounds (visible length: 3)");

        let err = WootError::MissingIdentifier(Identifier::new(2, 7));
        assert_eq!(err.to_string(), "Identifier 2/7 is not present in the sequence");
    }
}

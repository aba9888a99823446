//! Wire protocol for exchanging operations between sites
//!
//! The transport itself (socket, pub-sub relay, ...) belongs to the host.
//! This module only defines the payload encoding and the topic operations
//! are published on.

pub mod serialize;

pub use serialize::{
    decode_batch, decode_operation, encode_batch, encode_operation, operation_from_value,
    validate_operation,
};

/// Default topic for operation broadcasts
pub const OPERATIONS_TOPIC: &str = "text_operations";

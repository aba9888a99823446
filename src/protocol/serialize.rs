// Serialization layer - Convert operations to/from the JSON wire format
//!
//! Operations travel between sites as JSON, one object per operation or an
//! array of them when a site flushes a batch. Decoding is strict: unknown or
//! missing fields, multi-glyph characters, bounds that can never be resolved
//! and sentinel targets are rejected instead of producing a partially
//! populated value.

use crate::crdt::woot::{Character, Operation};
use crate::error::{Result, WootError};
use serde_json::Value;

/// Serialize one operation
pub fn encode_operation(op: &Operation) -> Result<String> {
    serde_json::to_string(op)
        .map_err(|e| WootError::Encode(format!("Failed to encode operation: {}", e)))
}

/// Serialize a batch of operations as a JSON array
pub fn encode_batch(ops: &[Operation]) -> Result<String> {
    serde_json::to_string(ops)
        .map_err(|e| WootError::Encode(format!("Failed to encode batch: {}", e)))
}

/// Deserialize and validate one operation
pub fn decode_operation(payload: &str) -> Result<Operation> {
    let op: Operation = serde_json::from_str(payload)
        .map_err(|e| WootError::Decode(format!("Malformed operation: {}", e)))?;
    validate_operation(&op)?;
    Ok(op)
}

/// Deserialize a payload holding one operation or an array of operations
///
/// The outer error covers payloads that are not JSON or not an object/array.
/// Each element is decoded on its own so one bad message does not reject the
/// rest of the batch.
pub fn decode_batch(payload: &str) -> Result<Vec<Result<Operation>>> {
    let value: Value = serde_json::from_str(payload)
        .map_err(|e| WootError::Decode(format!("Malformed payload: {}", e)))?;

    match value {
        Value::Array(items) => Ok(items.into_iter().map(operation_from_value).collect()),
        Value::Object(_) => Ok(vec![operation_from_value(value)]),
        other => Err(WootError::Decode(format!(
            "Payload must be an operation or an array of operations, got {}",
            json_type_name(&other)
        ))),
    }
}

/// Convert an already parsed JSON value into a validated operation
pub fn operation_from_value(value: Value) -> Result<Operation> {
    let op: Operation = serde_json::from_value(value)
        .map_err(|e| WootError::Decode(format!("Malformed operation: {}", e)))?;
    validate_operation(&op)?;
    Ok(op)
}

/// Check the invariants serde cannot express
pub fn validate_operation(op: &Operation) -> Result<()> {
    match op {
        Operation::Insert { character } => validate_character(character),
        Operation::Delete { id } if id.is_sentinel() => Err(WootError::Decode(format!(
            "Delete targets sentinel {}",
            id
        ))),
        Operation::Delete { .. } => Ok(()),
    }
}

fn validate_character(character: &Character) -> Result<()> {
    if character.id.site < 0 {
        return Err(WootError::Decode(format!(
            "Character id {} uses a reserved site",
            character.id
        )));
    }

    for (role, bound) in [("previous", character.previous), ("next", character.next)] {
        if bound == character.id {
            return Err(WootError::Decode(format!(
                "Character {} uses itself as its {} bound",
                character.id, role
            )));
        }
        if bound.site < 0 && !bound.is_sentinel() {
            return Err(WootError::Decode(format!(
                "Character {} has {} bound {} on a reserved site",
                character.id, role, bound
            )));
        }
    }

    if !Character::is_single_glyph(&character.glyph) {
        return Err(WootError::Decode(format!(
            "Character {} must carry exactly one glyph, got {:?}",
            character.id, character.glyph
        )));
    }

    Ok(())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

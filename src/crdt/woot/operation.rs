//! Operation: what sites exchange to stay in sync

use super::character::Character;
use super::id::Identifier;
use serde::{Deserialize, Serialize};

/// An edit generated by one site and integrated by every site
///
/// On the wire an insert carries the full character, a delete only the
/// identifier of the character to hide:
///
/// ```json
/// {"type":"insert","character":{"id":{"site":1,"seq":1},"previous":{"site":-1,"seq":0},"next":{"site":-1,"seq":1},"glyph":"a","visible":true}}
/// {"type":"delete","id":{"site":1,"seq":1}}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
    Insert { character: Character },
    Delete { id: Identifier },
}

impl Operation {
    pub fn insert(character: Character) -> Self {
        Operation::Insert { character }
    }

    pub fn delete(id: Identifier) -> Self {
        Operation::Delete { id }
    }

    /// Identifier of the character this operation creates or hides
    pub fn target(&self) -> Identifier {
        match self {
            Operation::Insert { character } => character.id,
            Operation::Delete { id } => *id,
        }
    }

    /// Identifiers that must be present before this operation can integrate
    pub fn dependencies(&self) -> Vec<Identifier> {
        match self {
            Operation::Insert { character } => vec![character.previous, character.next],
            Operation::Delete { id } => vec![*id],
        }
    }

    pub fn is_insert(&self) -> bool {
        matches!(self, Operation::Insert { .. })
    }
}

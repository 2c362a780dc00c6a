//! Shared vocabulary for the graphdb crates.
//!
//! `graphdb-storage` and `graphdb-query` both depend on this crate instead of
//! on each other's result types, so the two layers can evolve independently.

pub mod result;

pub use result::{EdgeRef, NodeRef, QueryResult, Row};

/// A node or edge identifier. Ids, labels and edge types are plain UTF-8
/// strings that must not contain the NUL byte (see [`validate_field`]).
pub type NodeId = String;

/// One outgoing or incoming neighbour: the id at the other end of the edge
/// and the edge's type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Neighbor {
    pub id: NodeId,
    pub type_: String,
}

/// Rejects id/label/type fields containing the key codec's field separator.
///
/// The key codec (`graphdb-storage::key`) joins fields with a NUL byte, so a
/// field containing NUL would corrupt every composite key it appears in. This
/// is the boundary check both `graphdb-storage` and the Cypher parser call
/// before a field ever reaches the codec.
pub fn validate_field(field: &str) -> Result<(), InvalidFieldError> {
    if field.as_bytes().contains(&0u8) {
        Err(InvalidFieldError)
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidFieldError;

impl std::fmt::Display for InvalidFieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "id, label, or type field contains a NUL byte")
    }
}

impl std::error::Error for InvalidFieldError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_nul_byte() {
        assert!(validate_field("Mark").is_ok());
        assert!(validate_field("Mark\0Alex").is_err());
    }
}

//! The structured result shape returned by `execute_cypher`.

use serde::{Deserialize, Serialize};

/// A reference to a realised node within a matched path, carrying whichever
/// pattern variable named it (if any).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRef {
    pub var: Option<String>,
    pub id: String,
    pub label: Option<String>,
}

/// A reference to a realised edge within a matched path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRef {
    pub var: Option<String>,
    pub from_id: String,
    pub to_id: String,
    pub type_: String,
}

/// One result row: the nodes and edges of a matched path (or a single
/// projected node/edge field, represented as a one-element vector).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub nodes: Vec<NodeRef>,
    pub edges: Vec<EdgeRef>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }
}

/// The full result of executing a query: zero or more rows, in the order
/// the executor produced them (already sorted/deduplicated per §4.6/§4.7).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    pub rows: Vec<Row>,
}

impl QueryResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

//! The parsed-query AST (§3, §4.5).

/// Safety ceiling an unbounded variable-length upper hop count (`*N..`) is
/// clamped to (§4.5).
pub const VARLEN_CEILING: u32 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub pattern: PathPattern,
    pub filters: Vec<Filter>,
    pub kind: QueryKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryKind {
    Create,
    Return(Vec<ReturnItem>),
    Delete(Vec<DeleteItem>),
}

/// An ordered sequence of node patterns interleaved with relationship
/// patterns: `nodes.len() == rels.len() + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    pub pathvar: Option<String>,
    pub nodes: Vec<NodePattern>,
    pub rels: Vec<RelationshipPattern>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodePattern {
    pub var: Option<String>,
    pub label: Option<String>,
    /// Only the `id` property is semantically consulted (§3).
    pub id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Outgoing,
    Incoming,
    Undirected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipPattern {
    pub var: Option<String>,
    pub type_: Option<String>,
    pub direction: Direction,
    pub min_hops: u32,
    pub max_hops: u32,
}

impl RelationshipPattern {
    /// A fixed-length, exactly-one-hop relationship (no `*` in the pattern).
    pub fn is_fixed_single_hop(&self) -> bool {
        self.min_hops == self.max_hops && self.max_hops == 1
    }
}

/// `WHERE` conjunct: `var.prop = 'value'`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub var: String,
    pub prop: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnItem {
    /// Bare variable name: returns the node's `id`, or edge's... bare
    /// relationship variables are not addressable without a property in
    /// this dialect, so this variant is node-only per §4.7.
    Variable(String),
    /// `var.prop`: resolves `prop` against the node (`id`, `label`) or
    /// relationship (`type`) pattern bound to `var`.
    Property(String, String),
    /// The path variable (`pathvar = ...`): the whole realised path.
    Path(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteItem {
    Variable(String),
}

//! `graphdb`: an embedded property-graph database over RocksDB, queried
//! through a restricted Cypher dialect.
//!
//! # Quickstart
//!
//! ```no_run
//! use graphdb::{Database, Options};
//!
//! let mut db = Database::open("./graphdb", Options::default()).unwrap();
//! db.add_node("Mark", "Person").unwrap();
//! db.add_node("Alex", "Person").unwrap();
//! db.add_edge("Mark", "Alex", "FRIEND").unwrap();
//!
//! let result = db
//!     .execute_cypher("MATCH (a)-[:FRIEND]->(b) WHERE a.id = 'Mark' RETURN b.id")
//!     .unwrap();
//! assert_eq!(result.rows.len(), 1);
//! ```

mod error;

pub use error::{Error, Result};
pub use graphdb_api::{EdgeRef, Neighbor, NodeId, NodeRef, QueryResult, Row};
pub use graphdb_storage::AdapterOptions;

use graphdb_storage::GraphEngine;
use std::path::Path;

/// Open-time configuration. `Default` mirrors the reference implementation's
/// hardcoded RocksDB tuning; `block_cache_mb` can additionally be overridden
/// by the `GRAPHDB_BLOCK_CACHE_MB` environment variable, read once at
/// [`Database::open`], the same way the teacher's HNSW index exposes
/// `NERVUSDB_HNSW_*` env tunables.
#[derive(Debug, Clone, Copy)]
pub struct Options {
    pub block_cache_mb: usize,
    pub write_buffer_mb: usize,
    pub parallelism: i32,
}

impl Default for Options {
    fn default() -> Self {
        let adapter_defaults = AdapterOptions::default();
        Self {
            block_cache_mb: adapter_defaults.block_cache_mb,
            write_buffer_mb: adapter_defaults.write_buffer_mb,
            parallelism: adapter_defaults.parallelism,
        }
    }
}

impl Options {
    fn resolved(mut self) -> Self {
        if let Ok(value) = std::env::var("GRAPHDB_BLOCK_CACHE_MB") {
            match value.parse() {
                Ok(mb) => self.block_cache_mb = mb,
                Err(_) => tracing::warn!(
                    value,
                    "ignoring unparsable GRAPHDB_BLOCK_CACHE_MB"
                ),
            }
        }
        self
    }
}

impl From<Options> for AdapterOptions {
    fn from(opts: Options) -> Self {
        AdapterOptions {
            block_cache_mb: opts.block_cache_mb,
            write_buffer_mb: opts.write_buffer_mb,
            parallelism: opts.parallelism,
        }
    }
}

/// The embedded graph database handle. Owns the RocksDB store; dropped via
/// RAII, with no explicit `close()`.
///
/// Mutating methods take `&mut self`: concurrent writers are not supported,
/// and this is enforced at compile time rather than merely documented.
#[derive(Debug)]
pub struct Database {
    engine: GraphEngine,
}

impl Database {
    pub fn open(path: impl AsRef<Path>, options: Options) -> Result<Self> {
        let options = options.resolved();
        let engine = GraphEngine::open(path, options.into())
            .inspect_err(|err| tracing::error!(%err, "failed to open database"))?;
        Ok(Self { engine })
    }

    pub fn add_node(&mut self, id: &str, label: &str) -> Result<()> {
        Ok(self.engine.add_node(id, label)?)
    }

    pub fn add_edge(&mut self, from: &str, to: &str, type_: &str) -> Result<()> {
        Ok(self.engine.add_edge(from, to, type_)?)
    }

    pub fn delete_node(&mut self, id: &str) -> Result<()> {
        Ok(self.engine.delete_node(id)?)
    }

    pub fn delete_edge(&mut self, from: &str, to: &str, type_: &str) -> Result<()> {
        Ok(self.engine.delete_edge(from, to, type_)?)
    }

    pub fn get_outgoing(&self, node: &str, type_: &str) -> Result<Vec<Neighbor>> {
        Ok(self.engine.get_outgoing(node, type_)?)
    }

    pub fn get_incoming(&self, node: &str, type_: &str) -> Result<Vec<Neighbor>> {
        Ok(self.engine.get_incoming(node, type_)?)
    }

    pub fn get_all_outgoing(&self, node: &str) -> Result<Vec<Neighbor>> {
        Ok(self.engine.get_all_outgoing(node)?)
    }

    pub fn get_all_incoming(&self, node: &str) -> Result<Vec<Neighbor>> {
        Ok(self.engine.get_all_incoming(node)?)
    }

    pub fn get_node_label(&self, id: &str) -> Result<Option<String>> {
        Ok(self.engine.get_node_label(id)?)
    }

    pub fn get_nodes_by_label(&self, label: &str) -> Result<Vec<String>> {
        Ok(self.engine.get_nodes_by_label(label)?)
    }

    pub fn get_all_nodes(&self) -> Result<Vec<String>> {
        Ok(self.engine.get_all_nodes()?)
    }

    /// Finds one shortest directed path of edge type `type_` from `start` to
    /// `end`, or `None` if `end` is unreachable.
    pub fn find_shortest_path(
        &self,
        start: &str,
        end: &str,
        type_: &str,
    ) -> Result<Option<Vec<String>>> {
        Ok(graphdb_storage::find_shortest_path(
            &self.engine,
            start,
            end,
            type_,
        )?)
    }

    /// Parses and runs a query written in the restricted Cypher dialect. An
    /// unparsable query returns an empty result rather than an error.
    pub fn execute_cypher(&mut self, query: &str) -> Result<QueryResult> {
        Ok(graphdb_query::execute(&mut self.engine, query)?)
    }
}

//! The Graph API (§4.3): primitive node/edge operations, neighbour and label
//! enumeration, and cascading delete, layered over the [`StorageAdapter`]
//! via the [`key`](crate::key) codec.

use crate::adapter::{AdapterOptions, StorageAdapter};
use crate::error::Result;
use crate::key;
use graphdb_api::{Neighbor, validate_field};
use std::path::Path;

/// Owns the storage adapter and exposes the graph's primitive operations.
/// Mutating methods take `&mut self`: concurrent writers are not supported
/// (§5), and requiring `&mut self` enforces that at compile time rather than
/// merely documenting it.
#[derive(Debug)]
pub struct GraphEngine {
    adapter: StorageAdapter,
}

impl GraphEngine {
    pub fn open(path: impl AsRef<Path>, options: AdapterOptions) -> Result<Self> {
        Ok(Self {
            adapter: StorageAdapter::open(path, options)?,
        })
    }

    /// Writes `N<id> -> label` and `L<label>:<id> -> empty`.
    ///
    /// Idempotent on `id`. If the node already existed under a different
    /// label, the stale `L<oldLabel>:<id>` entry is **not** removed — this is
    /// the reference implementation's documented relabel quirk (§9),
    /// preserved deliberately rather than silently fixed.
    pub fn add_node(&mut self, id: &str, label: &str) -> Result<()> {
        validate_field(id)?;
        validate_field(label)?;
        tracing::debug!(id, label, "add_node");
        self.adapter.put(&key::node_key(id), label.as_bytes())?;
        self.adapter.put(&key::label_key(label, id), b"")?;
        Ok(())
    }

    /// Writes both the outgoing and incoming index entries. Idempotent on
    /// `(from, to, type)`.
    pub fn add_edge(&mut self, from: &str, to: &str, type_: &str) -> Result<()> {
        validate_field(from)?;
        validate_field(to)?;
        validate_field(type_)?;
        tracing::debug!(from, to, type_, "add_edge");
        self.adapter.put(&key::out_key(from, type_, to), b"")?;
        self.adapter.put(&key::in_key(to, type_, from), b"")?;
        Ok(())
    }

    pub fn get_node_label(&self, id: &str) -> Result<Option<String>> {
        let value = self.adapter.get(&key::node_key(id))?;
        Ok(value.map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
    }

    /// Outgoing neighbours of `node` connected by an edge of exactly `type_`.
    /// An empty `type_` scans the literal empty-type prefix, not "any type"
    /// — see [`Self::get_all_outgoing`] for that (§9).
    pub fn get_outgoing(&self, node: &str, type_: &str) -> Result<Vec<Neighbor>> {
        let prefix = key::out_scan_prefix(node, type_);
        self.decode_out_neighbors(&prefix)
    }

    pub fn get_incoming(&self, node: &str, type_: &str) -> Result<Vec<Neighbor>> {
        let prefix = key::in_scan_prefix(node, type_);
        self.decode_in_neighbors(&prefix)
    }

    /// Every outgoing neighbour of `node`, regardless of edge type.
    pub fn get_all_outgoing(&self, node: &str) -> Result<Vec<Neighbor>> {
        let prefix = key::out_node_scan_prefix(node);
        self.decode_out_neighbors(&prefix)
    }

    pub fn get_all_incoming(&self, node: &str) -> Result<Vec<Neighbor>> {
        let prefix = key::in_node_scan_prefix(node);
        self.decode_in_neighbors(&prefix)
    }

    fn decode_out_neighbors(&self, prefix: &[u8]) -> Result<Vec<Neighbor>> {
        let mut out = Vec::new();
        for (raw_key, _) in self.adapter.scan_prefix(prefix)? {
            if let Some((_, type_, to)) = key::decode_out_key(&raw_key) {
                out.push(Neighbor { id: to, type_ });
            } else {
                tracing::warn!("skipping malformed outgoing-edge key");
            }
        }
        Ok(out)
    }

    fn decode_in_neighbors(&self, prefix: &[u8]) -> Result<Vec<Neighbor>> {
        let mut out = Vec::new();
        for (raw_key, _) in self.adapter.scan_prefix(prefix)? {
            if let Some((_, type_, from)) = key::decode_in_key(&raw_key) {
                out.push(Neighbor { id: from, type_ });
            } else {
                tracing::warn!("skipping malformed incoming-edge key");
            }
        }
        Ok(out)
    }

    /// Node ids carrying `label`, in RocksDB key order (lexicographic).
    pub fn get_nodes_by_label(&self, label: &str) -> Result<Vec<String>> {
        let prefix = key::label_scan_prefix(label);
        let mut out = Vec::new();
        for (raw_key, _) in self.adapter.scan_prefix(&prefix)? {
            if let Some((_, id)) = key::decode_label_key(&raw_key) {
                out.push(id);
            }
        }
        Ok(out)
    }

    /// Every node id, in lexicographic order.
    pub fn get_all_nodes(&self) -> Result<Vec<String>> {
        let prefix = key::node_scan_prefix();
        let mut out = Vec::new();
        for (raw_key, _) in self.adapter.scan_prefix(&prefix)? {
            if let Some(id) = key::decode_node_key(&raw_key) {
                out.push(id);
            }
        }
        Ok(out)
    }

    /// Deletes the node's label index entry, its record, and every edge
    /// touching it (both directions), mirror-deleting the opposite index
    /// entry for each. No dangling edges remain afterwards.
    pub fn delete_node(&mut self, id: &str) -> Result<()> {
        tracing::debug!(id, "delete_node");
        if let Some(label) = self.get_node_label(id)? {
            self.adapter.delete(&key::label_key(&label, id))?;
        }
        self.adapter.delete(&key::node_key(id))?;

        let out_prefix = key::out_node_scan_prefix(id);
        for (raw_key, _) in self.adapter.scan_prefix(&out_prefix)? {
            if let Some((from, type_, to)) = key::decode_out_key(&raw_key) {
                self.adapter.delete(&raw_key)?;
                self.adapter.delete(&key::in_key(&to, &type_, &from))?;
            }
        }

        let in_prefix = key::in_node_scan_prefix(id);
        for (raw_key, _) in self.adapter.scan_prefix(&in_prefix)? {
            if let Some((to, type_, from)) = key::decode_in_key(&raw_key) {
                self.adapter.delete(&raw_key)?;
                self.adapter.delete(&key::out_key(&from, &type_, &to))?;
            }
        }
        Ok(())
    }

    pub fn delete_edge(&mut self, from: &str, to: &str, type_: &str) -> Result<()> {
        tracing::debug!(from, to, type_, "delete_edge");
        self.adapter.delete(&key::out_key(from, type_, to))?;
        self.adapter.delete(&key::in_key(to, type_, from))?;
        Ok(())
    }
}

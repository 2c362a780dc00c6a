//! Storage layer for graphdb: the Key Codec, the RocksDB-backed Storage
//! Adapter, the Graph API, and the Shortest-Path Engine (§4.1-§4.4).
//!
//! The ordered key-value engine itself is RocksDB, consumed as an external
//! black box through the `rocksdb` crate — this crate is the adapter on top
//! of it, never a storage engine in its own right.

pub mod adapter;
pub mod engine;
mod error;
pub mod key;
pub mod shortest_path;

pub use adapter::AdapterOptions;
pub use engine::GraphEngine;
pub use error::{Error, Result};
pub use shortest_path::find_shortest_path;

pub use graphdb_api::{Neighbor, NodeId};

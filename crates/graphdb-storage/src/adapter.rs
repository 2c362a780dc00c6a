//! The Storage Adapter (§4.2): a thin wrapper around RocksDB providing
//! `put`/`get`/`delete`/`scan_prefix`, with the engine's options tuned the
//! way `examples/original_source/graphdb.c` tunes the C bindings.

use crate::error::{Error, Result};
use rocksdb::{
    BlockBasedOptions, Cache, DB, IteratorMode, Options, ReadOptions, SliceTransform,
    WriteOptions,
};
use std::path::Path;

/// Tunable knobs for the storage adapter. `Default` matches the reference's
/// hardcoded constants; callers (notably `graphdb::Options`) may override
/// `block_cache_mb` from an environment variable at open time.
#[derive(Debug, Clone, Copy)]
pub struct AdapterOptions {
    pub block_cache_mb: usize,
    pub write_buffer_mb: usize,
    pub parallelism: i32,
}

impl Default for AdapterOptions {
    fn default() -> Self {
        Self {
            block_cache_mb: 512,
            write_buffer_mb: 256,
            parallelism: 16,
        }
    }
}

/// Wraps a RocksDB handle. Readers and writers alike go through this type;
/// nothing above it ever touches a `rocksdb::DB` directly.
pub struct StorageAdapter {
    db: DB,
    write_opts: WriteOptions,
}

impl std::fmt::Debug for StorageAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageAdapter").finish_non_exhaustive()
    }
}

impl StorageAdapter {
    pub fn open(path: impl AsRef<Path>, opts: AdapterOptions) -> Result<Self> {
        let mut options = Options::default();
        options.create_if_missing(true);
        options.set_use_direct_reads(true);
        options.set_use_direct_io_for_flush_and_compaction(true);
        options.increase_parallelism(opts.parallelism);
        options.optimize_level_style_compaction((opts.write_buffer_mb * 1024 * 1024) as u64);
        options.set_compression_type(rocksdb::DBCompressionType::Snappy);
        options.set_write_buffer_size(opts.write_buffer_mb * 1024 * 1024);
        options.set_max_write_buffer_number(8);
        options.set_min_write_buffer_number_to_merge(2);
        options.set_prefix_extractor(SliceTransform::create_fixed_prefix(1));

        let cache = Cache::new_lru_cache(opts.block_cache_mb * 1024 * 1024);
        let mut table_options = BlockBasedOptions::default();
        table_options.set_block_size(16 * 1024);
        table_options.set_bloom_filter(10.0, false);
        table_options.set_cache_index_and_filter_blocks(true);
        table_options.set_block_cache(&cache);
        options.set_block_based_table_factory(&table_options);

        let db = DB::open(&options, path)?;

        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(false);

        Ok(Self { db, write_opts })
    }

    pub fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.db.put_opt(key, value, &self.write_opts)?;
        Ok(())
    }

    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.db.get(key)?)
    }

    pub fn delete(&self, key: &[u8]) -> Result<()> {
        self.db.delete_opt(key, &self.write_opts)?;
        Ok(())
    }

    /// Iterates every `(key, value)` pair whose key starts with `prefix`, in
    /// key order. The fixed one-byte prefix extractor means this is a bloom-
    /// filtered, single-family scan rather than a full-database walk.
    pub fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Box<[u8]>, Box<[u8]>)>> {
        let mut read_opts = ReadOptions::default();
        read_opts.set_prefix_same_as_start(true);
        read_opts.set_readahead_size(2 * 1024 * 1024);

        let mut out = Vec::new();
        let iter = self
            .db
            .iterator_opt(IteratorMode::From(prefix, rocksdb::Direction::Forward), read_opts);
        for item in iter {
            let (key, value) = item.map_err(Error::Engine)?;
            if !key.starts_with(prefix) {
                break;
            }
            out.push((key, value));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn put_get_delete_round_trip() {
        let dir = tempdir().unwrap();
        let adapter = StorageAdapter::open(dir.path(), AdapterOptions::default()).unwrap();

        adapter.put(b"k1", b"v1").unwrap();
        assert_eq!(adapter.get(b"k1").unwrap().as_deref(), Some(&b"v1"[..]));

        adapter.delete(b"k1").unwrap();
        assert_eq!(adapter.get(b"k1").unwrap(), None);
    }

    #[test]
    fn scan_prefix_is_ordered_and_bounded() {
        let dir = tempdir().unwrap();
        let adapter = StorageAdapter::open(dir.path(), AdapterOptions::default()).unwrap();

        adapter.put(b"Oa", b"").unwrap();
        adapter.put(b"Ob", b"").unwrap();
        adapter.put(b"Oc", b"").unwrap();
        adapter.put(b"Pz", b"").unwrap();

        let results = adapter.scan_prefix(b"O").unwrap();
        let keys: Vec<_> = results.iter().map(|(k, _)| k.to_vec()).collect();
        assert_eq!(keys, vec![b"Oa".to_vec(), b"Ob".to_vec(), b"Oc".to_vec()]);
    }
}

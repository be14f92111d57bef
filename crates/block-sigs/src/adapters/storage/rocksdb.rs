//! # RocksDB Bucket Engine
//!
//! Production bucket engine backed by RocksDB. Each bucket is a column
//! family, created on first open.
//!
//! ## Configuration
//!
//! - Block cache (256MB default) with bloom filters (10 bits per key)
//! - Snappy compression
//! - fsync on write for durability

use crate::domain::errors::KVStoreError;
use crate::ports::outbound::{Bucket, BucketEngine};
use parking_lot::RwLock;
use rocksdb::{ColumnFamilyDescriptor, Options, WriteOptions, DB};
use std::path::Path;
use std::sync::Arc;

/// RocksDB configuration.
#[derive(Debug, Clone)]
pub struct RocksDbConfig {
    /// Path to the database directory.
    pub path: String,
    /// Block cache size in bytes (default: 256MB).
    pub block_cache_size: usize,
    /// Write buffer size in bytes (default: 64MB).
    pub write_buffer_size: usize,
    /// Maximum number of write buffers (default: 3).
    pub max_write_buffer_number: i32,
    /// Enable fsync after each write (default: true).
    pub sync_writes: bool,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            path: "./data/rocksdb".to_string(),
            block_cache_size: 256 * 1024 * 1024,
            write_buffer_size: 64 * 1024 * 1024,
            max_write_buffer_number: 3,
            sync_writes: true,
        }
    }
}

impl RocksDbConfig {
    /// Create config for testing (smaller buffers, no sync).
    pub fn for_testing(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            block_cache_size: 8 * 1024 * 1024,
            write_buffer_size: 4 * 1024 * 1024,
            max_write_buffer_number: 2,
            sync_writes: false,
        }
    }
}

/// RocksDB-backed bucket engine.
pub struct RocksDbBucketEngine {
    db: Arc<RwLock<DB>>,
    config: RocksDbConfig,
}

impl RocksDbBucketEngine {
    /// Open or create the database, reopening every existing column family.
    pub fn open(config: RocksDbConfig) -> Result<Self, KVStoreError> {
        let opts = db_options(&config);

        // A fresh directory has no column families to list yet.
        let existing = DB::list_cf(&opts, &config.path).unwrap_or_default();
        let cf_descriptors: Vec<ColumnFamilyDescriptor> = existing
            .iter()
            .map(|name| ColumnFamilyDescriptor::new(name.as_str(), cf_options()))
            .collect();

        let db = DB::open_cf_descriptors(&opts, &config.path, cf_descriptors).map_err(|e| {
            KVStoreError::IOError {
                message: format!("Failed to open RocksDB: {}", e),
            }
        })?;

        tracing::info!("[block-sigs] Opened RocksDB at {}", config.path);

        Ok(Self {
            db: Arc::new(RwLock::new(db)),
            config,
        })
    }

    /// Open with default tuning at `path`.
    pub fn open_default(path: impl AsRef<Path>) -> Result<Self, KVStoreError> {
        Self::open(RocksDbConfig {
            path: path.as_ref().to_string_lossy().to_string(),
            ..Default::default()
        })
    }
}

impl BucketEngine for RocksDbBucketEngine {
    type Bucket = RocksDbBucket;

    fn open_bucket(&self, name: &str) -> Result<RocksDbBucket, KVStoreError> {
        if self.db.read().cf_handle(name).is_none() {
            let mut db = self.db.write();
            if db.cf_handle(name).is_none() {
                db.create_cf(name, &cf_options())
                    .map_err(|e| KVStoreError::IOError {
                        message: format!("RocksDB create_cf failed: {}", e),
                    })?;
            }
        }

        Ok(RocksDbBucket {
            db: Arc::clone(&self.db),
            name: name.to_string(),
            sync_writes: self.config.sync_writes,
        })
    }
}

/// Handle onto one column family.
pub struct RocksDbBucket {
    db: Arc<RwLock<DB>>,
    name: String,
    sync_writes: bool,
}

impl RocksDbBucket {
    fn unknown(&self) -> KVStoreError {
        KVStoreError::UnknownBucket {
            name: self.name.clone(),
        }
    }
}

impl Bucket for RocksDbBucket {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        let db = self.db.read();
        let cf = db.cf_handle(&self.name).ok_or_else(|| self.unknown())?;
        db.get_cf(cf, key).map_err(|e| KVStoreError::IOError {
            message: format!("RocksDB get failed: {}", e),
        })
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        let db = self.db.read();
        let cf = db.cf_handle(&self.name).ok_or_else(|| self.unknown())?;

        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(self.sync_writes);

        db.put_cf_opt(cf, key, value, &write_opts)
            .map_err(|e| KVStoreError::IOError {
                message: format!("RocksDB put failed: {}", e),
            })
    }
}

fn db_options(config: &RocksDbConfig) -> Options {
    let mut opts = Options::default();
    opts.create_if_missing(true);
    opts.create_missing_column_families(true);
    opts.set_write_buffer_size(config.write_buffer_size);
    opts.set_max_write_buffer_number(config.max_write_buffer_number);
    opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

    let mut block_opts = rocksdb::BlockBasedOptions::default();
    block_opts.set_bloom_filter(10.0, false);
    block_opts.set_block_cache(&rocksdb::Cache::new_lru_cache(config.block_cache_size));
    opts.set_block_based_table_factory(&block_opts);
    opts
}

fn cf_options() -> Options {
    let mut cf_opts = Options::default();
    cf_opts.set_compression_type(rocksdb::DBCompressionType::Snappy);
    cf_opts
}

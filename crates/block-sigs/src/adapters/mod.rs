//! # Adapters Module
//!
//! Reference implementations of the outbound ports.
//!
//! ## Modules
//!
//! - `storage`: bucket engines (memory, file, RocksDB behind the `rocksdb` feature)
//! - `chain`: in-memory linear chain

pub mod chain;
pub mod storage;

pub use chain::{ChainAppendError, InMemoryChain};
pub use storage::{FileBucket, FileBucketConfig, FileBucketEngine, MemoryBucket, MemoryBucketEngine};

#[cfg(feature = "rocksdb")]
pub use storage::{RocksDbBucket, RocksDbBucketEngine, RocksDbConfig};

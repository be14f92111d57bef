//! Storage Adapters
//!
//! Implementations of the `BucketEngine` and `Bucket` traits.

mod file;
mod memory;
#[cfg(feature = "rocksdb")]
mod rocksdb;

pub use file::{FileBucket, FileBucketConfig, FileBucketEngine};
pub use memory::{MemoryBucket, MemoryBucketEngine};

#[cfg(feature = "rocksdb")]
pub use self::rocksdb::{RocksDbBucket, RocksDbBucketEngine, RocksDbConfig};

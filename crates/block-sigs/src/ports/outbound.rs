//! # Outbound Ports (Driven Ports)
//!
//! Collaborators the signature store needs the host node to provide.
//!
//! Adapters: `MemoryBucketEngine`, `FileBucketEngine`, `RocksDbBucketEngine`
//! and `InMemoryChain` in `crate::adapters`.

use crate::domain::entities::HeaderHash;
use crate::domain::errors::KVStoreError;

/// A named key-value namespace inside a bucket engine.
///
/// Both methods take `&self`: implementations provide at least per-key
/// atomic reads and writes, so a bucket can be shared between an ingestion
/// path and a verifier without locking in the caller.
pub trait Bucket: Send + Sync {
    /// Get a value by key, `None` on miss.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError>;

    /// Put a single key-value pair, replacing any existing value.
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError>;
}

/// Durable storage that hands out named buckets.
pub trait BucketEngine {
    /// Bucket handle type.
    type Bucket: Bucket;

    /// Open the bucket `name`, creating it if it does not exist.
    fn open_bucket(&self, name: &str) -> Result<Self::Bucket, KVStoreError>;
}

/// Read access to the node's linear chain.
///
/// Implementations present one already-resolved sequence of blocks: depth
/// `0` is genesis and every depth up to `head_depth()` should hold a block.
pub trait ChainReader {
    /// Block type yielded by the chain.
    type Block: HeaderHash;

    /// Depth of the current head block.
    fn head_depth(&self) -> u64;

    /// Block at `depth`, `None` if the chain has no block there.
    fn block_at_depth(&self, depth: u64) -> Option<Self::Block>;
}

use crate::domain::errors::KVStoreError;
use crate::ports::outbound::{Bucket, BucketEngine};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

type Table = HashMap<Vec<u8>, Vec<u8>>;

/// In-memory bucket engine for unit tests and ephemeral nodes.
///
/// Opening the same name twice yields handles onto the same table, so a
/// reopened bucket sees earlier writes for as long as the engine lives.
#[derive(Debug, Default, Clone)]
pub struct MemoryBucketEngine {
    buckets: Arc<RwLock<HashMap<String, Arc<RwLock<Table>>>>>,
}

impl MemoryBucketEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of all buckets opened so far.
    pub fn bucket_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.buckets.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl BucketEngine for MemoryBucketEngine {
    type Bucket = MemoryBucket;

    fn open_bucket(&self, name: &str) -> Result<MemoryBucket, KVStoreError> {
        let table = self
            .buckets
            .write()
            .entry(name.to_string())
            .or_default()
            .clone();
        Ok(MemoryBucket { data: table })
    }
}

/// Handle onto one in-memory bucket.
#[derive(Debug, Default, Clone)]
pub struct MemoryBucket {
    data: Arc<RwLock<Table>>,
}

impl MemoryBucket {
    /// Standalone bucket not attached to any engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}

impl Bucket for MemoryBucket {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        Ok(self.data.read().get(key).cloned())
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.data.write().insert(key.to_vec(), value.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_bucket_get_put() {
        let bucket = MemoryBucket::new();

        bucket.put(b"key1", b"value1").unwrap();
        bucket.put(b"key2", b"value2").unwrap();

        assert_eq!(bucket.get(b"key1").unwrap(), Some(b"value1".to_vec()));
        assert_eq!(bucket.get(b"key2").unwrap(), Some(b"value2".to_vec()));
        assert_eq!(bucket.get(b"key3").unwrap(), None);
        assert_eq!(bucket.len(), 2);
    }

    #[test]
    fn test_memory_bucket_overwrite() {
        let bucket = MemoryBucket::new();

        bucket.put(b"k", b"first").unwrap();
        bucket.put(b"k", b"second").unwrap();

        assert_eq!(bucket.get(b"k").unwrap(), Some(b"second".to_vec()));
        assert_eq!(bucket.len(), 1);
    }

    #[test]
    fn test_engine_reopen_shares_table() {
        let engine = MemoryBucketEngine::new();

        engine.open_bucket("a").unwrap().put(b"k", b"v").unwrap();
        let reopened = engine.open_bucket("a").unwrap();
        let other = engine.open_bucket("b").unwrap();

        assert_eq!(reopened.get(b"k").unwrap(), Some(b"v".to_vec()));
        assert!(other.is_empty());
        assert_eq!(engine.bucket_names(), vec!["a".to_string(), "b".to_string()]);
    }
}

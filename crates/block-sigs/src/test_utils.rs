use crate::adapters::{InMemoryChain, MemoryBucket};
use crate::domain::entities::{Block, HeaderHash, SignedBlock};
use crate::domain::errors::KVStoreError;
use crate::domain::signature::MasterKeyPair;
use crate::ports::inbound::BlockSignatureApi;
use crate::ports::outbound::{Bucket, BucketEngine};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const GENESIS_TIMESTAMP: u64 = 1_700_000_000;

pub fn master() -> MasterKeyPair {
    MasterKeyPair::from_secret_bytes(&[0x11; 32]).unwrap()
}

pub fn impostor() -> MasterKeyPair {
    MasterKeyPair::from_secret_bytes(&[0x22; 32]).unwrap()
}

/// `len` contiguous blocks starting at genesis.
pub fn make_test_blocks(len: u64) -> Vec<Block> {
    let mut blocks: Vec<Block> = Vec::new();
    for seq in 0..len {
        let body = format!("block-{seq}").into_bytes();
        let block = match blocks.last() {
            None => Block::genesis(body, GENESIS_TIMESTAMP),
            Some(parent) => Block::new_child(parent, body, GENESIS_TIMESTAMP + seq),
        };
        blocks.push(block);
    }
    blocks
}

pub fn sign_block(master: &MasterKeyPair, block: &Block) -> SignedBlock {
    let signature = master.sign(&block.header_hash()).unwrap();
    SignedBlock::new(block.clone(), signature)
}

/// Chain of `len` blocks, each signed by `master` and recorded in `store`.
pub fn make_signed_chain<S: BlockSignatureApi>(
    len: u64,
    master: &MasterKeyPair,
    store: &S,
) -> (InMemoryChain, Vec<Block>) {
    let blocks = make_test_blocks(len);
    let chain = InMemoryChain::new();
    for block in &blocks {
        store.add(&sign_block(master, block)).unwrap();
        chain.push(block.clone()).unwrap();
    }
    (chain, blocks)
}

/// Memory bucket that counts reads.
#[derive(Debug, Default, Clone)]
pub struct CountingBucket {
    pub inner: MemoryBucket,
    pub gets: Arc<AtomicUsize>,
}

impl CountingBucket {
    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }
}

impl Bucket for CountingBucket {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(key)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.inner.put(key, value)
    }
}

/// Bucket whose every operation fails with an I/O error.
#[derive(Debug, Default)]
pub struct BrokenBucket;

impl Bucket for BrokenBucket {
    fn get(&self, _key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        Err(KVStoreError::IOError {
            message: "read failed".to_string(),
        })
    }

    fn put(&self, _key: &[u8], _value: &[u8]) -> Result<(), KVStoreError> {
        Err(KVStoreError::IOError {
            message: "write failed".to_string(),
        })
    }
}

/// Engine that cannot open any bucket.
#[derive(Debug, Default)]
pub struct BrokenEngine;

impl BucketEngine for BrokenEngine {
    type Bucket = BrokenBucket;

    fn open_bucket(&self, name: &str) -> Result<BrokenBucket, KVStoreError> {
        Err(KVStoreError::IOError {
            message: format!("cannot open {name}"),
        })
    }
}

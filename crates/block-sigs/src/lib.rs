//! # Block Signature Store
//!
//! Persists the master authority's signature for every accepted block and
//! proves, after the fact, that the whole recorded chain was authorized.
//!
//! ## Architecture
//!
//! ```text
//! block producer / ingestion ──add()──→ ┐
//!                                        ├──→ SignatureStore ──→ bucket "block_sigs"
//! startup / periodic audit ──verify──→  ┘         ↑
//!          │                                      │ get(hash)
//!          └──── ChainReader (depth 0..=head) ────┘
//! ```
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | One Signature Per Hash | A later add for the same header hash replaces the earlier one |
//! | 2 | Strict Decoding | Stored values are exactly 65 bytes, no framing |
//! | 3 | Contiguous Audit | Every depth from genesis to head must hold a block |
//! | 4 | Fail Closed | Verification stops at the first gap, miss or bad signature |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Pure domain logic (entities, signature codec, errors)
//! - `ports/` - Port traits (inbound API, outbound SPI)
//! - `service/` - `SignatureStore` and the chain audit
//! - `adapters/` - Bucket engines and an in-memory chain
//!
//! ## Usage
//!
//! ```
//! use block_sigs::{
//!     verify_chain_signatures, Block, BlockSignatureApi, HeaderHash, InMemoryChain,
//!     MasterKeyPair, MemoryBucketEngine, SignatureStore, SignedBlock,
//! };
//!
//! let master = MasterKeyPair::from_secret_bytes(&[7u8; 32]).unwrap();
//! let store = SignatureStore::new(&MemoryBucketEngine::new());
//!
//! let genesis = Block::genesis(b"genesis".to_vec(), 1_700_000_000);
//! let signature = master.sign(&genesis.header_hash()).unwrap();
//! store.add(&SignedBlock::new(genesis.clone(), signature)).unwrap();
//!
//! let chain = InMemoryChain::with_genesis(genesis).unwrap();
//! verify_chain_signatures(&master.public_key(), &chain, &store).unwrap();
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

#[cfg(test)]
mod test_utils;

// Re-export key types for convenience
pub use adapters::{
    ChainAppendError, FileBucket, FileBucketConfig, FileBucketEngine, InMemoryChain,
    MemoryBucket, MemoryBucketEngine,
};
#[cfg(feature = "rocksdb")]
pub use adapters::{RocksDbBucket, RocksDbBucketEngine, RocksDbConfig};
pub use domain::entities::{Block, BlockHeader, BlockHeaderHash, HeaderHash, SignedBlock, HASH_LENGTH};
pub use domain::errors::{
    ChainVerificationError, KVStoreError, SignatureError, SignatureStoreError, StoreInitError,
};
pub use domain::signature::{
    MasterKeyPair, MasterPublicKey, Signature, PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH,
};
pub use ports::inbound::BlockSignatureApi;
pub use ports::outbound::{Bucket, BucketEngine, ChainReader};
pub use service::{verify_chain_signatures, SignatureStore, BLOCK_SIGS_BUCKET};

//! # Core Domain Entities
//!
//! Block identity types and the reference block model.
//!
//! - `BlockHeaderHash` - content address of a block, the only key space of the store
//! - `BlockHeader` / `Block` - linear chain blocks used by the reference chain adapter
//! - `SignedBlock` - a block paired with the master's detached signature

use crate::domain::signature::Signature;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Byte length of a [`BlockHeaderHash`].
pub const HASH_LENGTH: usize = 32;

/// SHA-256 digest of a block header.
///
/// Two blocks with the same header are indistinguishable to the signature
/// store: a later write under the same hash replaces the earlier one.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct BlockHeaderHash([u8; HASH_LENGTH]);

impl BlockHeaderHash {
    /// All-zero hash, used as the parent of genesis.
    pub const ZERO: Self = Self([0u8; HASH_LENGTH]);

    /// Wrap raw digest bytes.
    pub const fn from_bytes(bytes: [u8; HASH_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Hash arbitrary data with SHA-256.
    pub fn digest(data: &[u8]) -> Self {
        Self(Sha256::digest(data).into())
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; HASH_LENGTH] {
        &self.0
    }

    /// Lowercase hex form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl AsRef<[u8]> for BlockHeaderHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for BlockHeaderHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for BlockHeaderHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockHeaderHash({})", self.to_hex())
    }
}

/// Anything that can name itself by a [`BlockHeaderHash`].
pub trait HeaderHash {
    /// Hash of this block's header.
    fn header_hash(&self) -> BlockHeaderHash;
}

impl<T: HeaderHash + ?Sized> HeaderHash for &T {
    fn header_hash(&self) -> BlockHeaderHash {
        (**self).header_hash()
    }
}

/// Header of a block in the reference chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Protocol version.
    pub version: u32,
    /// Depth of the block in the chain (genesis is 0).
    pub seq: u64,
    /// Unix timestamp in seconds.
    pub timestamp: u64,
    /// Header hash of the previous block, zero for genesis.
    pub prev_hash: BlockHeaderHash,
    /// SHA-256 of the block body.
    pub body_hash: BlockHeaderHash,
}

impl BlockHeader {
    /// Current header version.
    pub const VERSION: u32 = 1;

    /// Canonical encoding hashed to produce the header hash.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        // Fixed-size fields only, serialization cannot fail.
        bincode::serialize(self).unwrap_or_default()
    }
}

impl HeaderHash for BlockHeader {
    fn header_hash(&self) -> BlockHeaderHash {
        BlockHeaderHash::digest(&self.canonical_bytes())
    }
}

/// A block in the reference chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
    pub body: Vec<u8>,
}

impl Block {
    /// Build the genesis block (depth 0).
    pub fn genesis(body: impl Into<Vec<u8>>, timestamp: u64) -> Self {
        let body = body.into();
        Self {
            header: BlockHeader {
                version: BlockHeader::VERSION,
                seq: 0,
                timestamp,
                prev_hash: BlockHeaderHash::ZERO,
                body_hash: BlockHeaderHash::digest(&body),
            },
            body,
        }
    }

    /// Build the block that extends `parent`.
    pub fn new_child(parent: &Block, body: impl Into<Vec<u8>>, timestamp: u64) -> Self {
        let body = body.into();
        Self {
            header: BlockHeader {
                version: BlockHeader::VERSION,
                seq: parent.header.seq + 1,
                timestamp,
                prev_hash: parent.header_hash(),
                body_hash: BlockHeaderHash::digest(&body),
            },
            body,
        }
    }

    /// Depth of this block.
    pub fn seq(&self) -> u64 {
        self.header.seq
    }
}

impl HeaderHash for Block {
    fn header_hash(&self) -> BlockHeaderHash {
        self.header.header_hash()
    }
}

/// A block together with the master's signature over its header hash.
///
/// The signature is carried, not checked: whether it is valid is decided
/// later, against a master key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedBlock<B = Block> {
    pub block: B,
    pub signature: Signature,
}

impl<B: HeaderHash> SignedBlock<B> {
    pub fn new(block: B, signature: Signature) -> Self {
        Self { block, signature }
    }

    /// Header hash of the wrapped block.
    pub fn hash(&self) -> BlockHeaderHash {
        self.block.header_hash()
    }
}

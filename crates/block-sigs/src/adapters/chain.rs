//! # In-Memory Chain
//!
//! Linear chain of reference [`Block`]s, kept by depth. Blocks must be
//! appended contiguously: each new block has `seq == head + 1` and links to
//! the current head by `prev_hash`.

use crate::domain::entities::{Block, BlockHeaderHash, HeaderHash};
use crate::ports::outbound::ChainReader;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use thiserror::Error;

/// Reasons a block cannot extend the chain.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChainAppendError {
    #[error("Expected block at depth {expected}, got {actual}")]
    NonContiguous { expected: u64, actual: u64 },

    #[error("Block at depth {seq} does not link to head {expected}")]
    ParentMismatch {
        seq: u64,
        expected: BlockHeaderHash,
    },

    #[error("Genesis block must have a zero parent hash")]
    InvalidGenesis,
}

/// Thread-safe linear chain.
#[derive(Debug, Default)]
pub struct InMemoryChain {
    blocks: RwLock<BTreeMap<u64, Block>>,
    head: RwLock<Option<(u64, BlockHeaderHash)>>,
}

impl InMemoryChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chain starting at `genesis`.
    pub fn with_genesis(genesis: Block) -> Result<Self, ChainAppendError> {
        let chain = Self::new();
        chain.push(genesis)?;
        Ok(chain)
    }

    /// Append `block` at `head + 1`.
    pub fn push(&self, block: Block) -> Result<(), ChainAppendError> {
        let mut head = self.head.write();
        let seq = block.seq();

        match *head {
            None => {
                if seq != 0 {
                    return Err(ChainAppendError::NonContiguous {
                        expected: 0,
                        actual: seq,
                    });
                }
                if block.header.prev_hash != BlockHeaderHash::ZERO {
                    return Err(ChainAppendError::InvalidGenesis);
                }
            }
            Some((head_seq, head_hash)) => {
                if seq != head_seq + 1 {
                    return Err(ChainAppendError::NonContiguous {
                        expected: head_seq + 1,
                        actual: seq,
                    });
                }
                if block.header.prev_hash != head_hash {
                    return Err(ChainAppendError::ParentMismatch {
                        seq,
                        expected: head_hash,
                    });
                }
            }
        }

        let hash = block.header_hash();
        self.blocks.write().insert(seq, block);
        *head = Some((seq, hash));
        Ok(())
    }

    /// Current head block.
    pub fn head(&self) -> Option<Block> {
        let head = *self.head.read();
        head.and_then(|(seq, _)| self.blocks.read().get(&seq).cloned())
    }

    /// Number of blocks held.
    pub fn len(&self) -> usize {
        self.blocks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.read().is_empty()
    }

    /// Drop the block at `depth` without moving the head.
    ///
    /// Leaves a hole in the chain; used to exercise gap handling.
    pub fn remove_block(&self, depth: u64) -> Option<Block> {
        self.blocks.write().remove(&depth)
    }
}

impl ChainReader for InMemoryChain {
    type Block = Block;

    /// Head depth, `0` for an empty chain.
    fn head_depth(&self) -> u64 {
        self.head.read().map(|(seq, _)| seq).unwrap_or(0)
    }

    fn block_at_depth(&self, depth: u64) -> Option<Block> {
        self.blocks.read().get(&depth).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_contiguous_blocks() {
        let genesis = Block::genesis(b"g".to_vec(), 1000);
        let b1 = Block::new_child(&genesis, b"1".to_vec(), 1001);
        let b2 = Block::new_child(&b1, b"2".to_vec(), 1002);

        let chain = InMemoryChain::with_genesis(genesis.clone()).unwrap();
        chain.push(b1).unwrap();
        chain.push(b2.clone()).unwrap();

        assert_eq!(chain.head_depth(), 2);
        assert_eq!(chain.len(), 3);
        assert_eq!(chain.block_at_depth(0), Some(genesis));
        assert_eq!(chain.head(), Some(b2));
        assert_eq!(chain.block_at_depth(3), None);
    }

    #[test]
    fn test_rejects_skipped_depth() {
        let genesis = Block::genesis(b"g".to_vec(), 1000);
        let b1 = Block::new_child(&genesis, b"1".to_vec(), 1001);
        let b2 = Block::new_child(&b1, b"2".to_vec(), 1002);

        let chain = InMemoryChain::with_genesis(genesis).unwrap();

        assert_eq!(
            chain.push(b2),
            Err(ChainAppendError::NonContiguous {
                expected: 1,
                actual: 2
            })
        );
        assert_eq!(chain.head_depth(), 0);
    }

    #[test]
    fn test_rejects_wrong_parent() {
        let genesis = Block::genesis(b"g".to_vec(), 1000);
        let other = Block::genesis(b"other".to_vec(), 1000);
        let orphan = Block::new_child(&other, b"1".to_vec(), 1001);

        let chain = InMemoryChain::with_genesis(genesis).unwrap();

        assert!(matches!(
            chain.push(orphan),
            Err(ChainAppendError::ParentMismatch { seq: 1, .. })
        ));
    }

    #[test]
    fn test_first_block_must_be_genesis() {
        let genesis = Block::genesis(b"g".to_vec(), 1000);
        let b1 = Block::new_child(&genesis, b"1".to_vec(), 1001);

        assert!(InMemoryChain::with_genesis(b1).is_err());
        assert!(InMemoryChain::new().is_empty());
    }

    #[test]
    fn test_remove_block_keeps_head() {
        let genesis = Block::genesis(b"g".to_vec(), 1000);
        let b1 = Block::new_child(&genesis, b"1".to_vec(), 1001);
        let chain = InMemoryChain::with_genesis(genesis).unwrap();
        chain.push(b1).unwrap();

        assert!(chain.remove_block(0).is_some());

        assert_eq!(chain.head_depth(), 1);
        assert_eq!(chain.block_at_depth(0), None);
    }
}

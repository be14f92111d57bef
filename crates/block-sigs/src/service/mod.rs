//! # Signature Store Service
//!
//! The main service implementing the block signature API.
//!
//! ## Architecture
//!
//! This service:
//! 1. Owns exactly one bucket, `block_sigs`, opened once at construction
//! 2. Implements `BlockSignatureApi` for recording and loading signatures
//! 3. Backs `verify_chain_signatures`, the full-chain audit
//!
//! Keys are raw 32-byte header hashes and values are raw 65-byte
//! signatures. The store keeps no state besides the bucket handle.
//!
//! ## Preconditions
//!
//! Writes are last-writer-wins per hash. This is sound only as long as two
//! distinct blocks never share a header hash; the store does not check it.

mod storage;
mod verifier;

pub use verifier::verify_chain_signatures;

use crate::domain::errors::StoreInitError;
use crate::ports::outbound::{Bucket, BucketEngine};

/// Name of the bucket holding block signatures.
pub const BLOCK_SIGS_BUCKET: &str = "block_sigs";

/// Persistent mapping from block header hash to master signature.
///
/// Construct once per node and share it by reference (or `Arc`) with every
/// component that records or audits signatures.
pub struct SignatureStore<B: Bucket> {
    /// Exclusive backing store.
    pub(crate) sigs: B,
}

impl<B: Bucket> SignatureStore<B> {
    /// Open the signature bucket on `engine`.
    ///
    /// The returned error is an initialization failure: the node cannot run
    /// without its signature store and should abort startup.
    pub fn open<E>(engine: &E) -> Result<Self, StoreInitError>
    where
        E: BucketEngine<Bucket = B>,
    {
        let sigs = engine
            .open_bucket(BLOCK_SIGS_BUCKET)
            .map_err(|source| StoreInitError {
                bucket: BLOCK_SIGS_BUCKET.to_string(),
                source,
            })?;

        tracing::info!("[block-sigs] Opened bucket '{}'", BLOCK_SIGS_BUCKET);

        Ok(Self { sigs })
    }

    /// Open the signature bucket on `engine`, aborting on failure.
    ///
    /// # Panics
    ///
    /// Panics if the bucket cannot be opened.
    pub fn new<E>(engine: &E) -> Self
    where
        E: BucketEngine<Bucket = B>,
    {
        match Self::open(engine) {
            Ok(store) => store,
            Err(err) => {
                tracing::error!("[block-sigs] {}", err);
                panic!("signature store unavailable: {err}");
            }
        }
    }

    /// Wrap an already opened bucket.
    pub fn from_bucket(sigs: B) -> Self {
        Self { sigs }
    }

    /// Access the backing bucket.
    pub fn bucket(&self) -> &B {
        &self.sigs
    }
}

impl<B: Bucket + std::fmt::Debug> std::fmt::Debug for SignatureStore<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureStore")
            .field("bucket", &BLOCK_SIGS_BUCKET)
            .field("sigs", &self.sigs)
            .finish()
    }
}

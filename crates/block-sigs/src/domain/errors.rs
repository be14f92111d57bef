//! # Domain Errors
//!
//! Error types for the block signature store.
//!
//! - `SignatureError` - codec and cryptographic failures of a single signature
//! - `KVStoreError` - opaque failures of the bucket engine
//! - `SignatureStoreError` - failures of `get`/`add` on the store
//! - `StoreInitError` - the store could not open its bucket (fatal)
//! - `ChainVerificationError` - the first failing depth of a chain scan

use crate::domain::entities::BlockHeaderHash;
use thiserror::Error;

/// Errors produced by the signature codec and the signature primitive.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// Encoded signature has the wrong length.
    #[error("Invalid signature format: expected {expected} bytes, got {actual}")]
    InvalidFormat { expected: usize, actual: usize },

    /// Trailing byte is not a secp256k1 recovery id.
    #[error("Invalid recovery ID: {0}")]
    InvalidRecoveryId(u8),

    /// `r` or `s` is zero or out of range.
    #[error("Malformed signature scalars")]
    MalformedScalars,

    /// Public key bytes are not a curve point.
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// Secret key bytes are not a valid scalar.
    #[error("Invalid secret key")]
    InvalidSecretKey,

    /// Signer could not be recovered from the signature and digest.
    #[error("Signature verification failed")]
    VerificationFailed,

    /// Recovered signer is not the master key.
    #[error("Signature was not produced by the master key")]
    SignerMismatch,

    /// The signing primitive rejected the digest.
    #[error("Signing failed")]
    SigningFailed,
}

/// Bucket engine errors.
///
/// Opaque to the store: they are carried upward unchanged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KVStoreError {
    /// I/O error during read/write.
    #[error("KV store I/O error: {message}")]
    IOError { message: String },

    /// Persisted data could not be parsed.
    #[error("KV store corruption: {message}")]
    CorruptionError { message: String },

    /// The engine has no bucket with this name.
    #[error("Unknown bucket: {name}")]
    UnknownBucket { name: String },
}

/// Errors returned by `SignatureStore` operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignatureStoreError {
    /// No signature is stored for this hash.
    #[error("No signature for block {hash}")]
    NotFound { hash: BlockHeaderHash },

    /// Stored bytes do not decode as a signature.
    #[error("Stored signature for block {hash} is corrupt: {source}")]
    Decode {
        hash: BlockHeaderHash,
        #[source]
        source: SignatureError,
    },

    /// Signature does not verify against the master key.
    #[error("Signature for block {hash} is not valid for the master key: {source}")]
    SignatureInvalid {
        hash: BlockHeaderHash,
        #[source]
        source: SignatureError,
    },

    /// Bucket engine failure.
    #[error(transparent)]
    Storage(#[from] KVStoreError),
}

impl SignatureStoreError {
    /// True for a plain miss, which callers may treat as "unsigned".
    pub fn is_not_found(&self) -> bool {
        matches!(self, SignatureStoreError::NotFound { .. })
    }
}

/// The signature bucket could not be opened.
///
/// A node cannot operate without its signature store; callers should abort
/// startup on this error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Failed to open signature bucket '{bucket}': {source}")]
pub struct StoreInitError {
    pub bucket: String,
    #[source]
    pub source: KVStoreError,
}

/// First failure found while verifying a chain against the store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChainVerificationError {
    /// The chain has no block at a depth at or below its head.
    #[error("No block in depth {depth}")]
    ChainGap { depth: u64 },

    /// The signature for the block at this depth could not be loaded.
    #[error("Signature lookup failed at depth {depth}: {source}")]
    Lookup {
        depth: u64,
        #[source]
        source: SignatureStoreError,
    },

    /// The stored signature does not verify against the master key.
    #[error("Invalid master signature at depth {depth} for block {hash}: {source}")]
    SignatureInvalid {
        depth: u64,
        hash: BlockHeaderHash,
        #[source]
        source: SignatureError,
    },
}

impl ChainVerificationError {
    /// Depth at which verification stopped.
    pub fn depth(&self) -> u64 {
        match self {
            ChainVerificationError::ChainGap { depth }
            | ChainVerificationError::Lookup { depth, .. }
            | ChainVerificationError::SignatureInvalid { depth, .. } => *depth,
        }
    }
}

//! # Inbound Ports (Driving Ports)
//!
//! API exposed to block producers, network ingestion and audit logic.

use crate::domain::entities::{BlockHeaderHash, HeaderHash, SignedBlock};
use crate::domain::errors::SignatureStoreError;
use crate::domain::signature::{MasterPublicKey, Signature};

/// Block signature storage API.
pub trait BlockSignatureApi {
    /// Load the signature stored for `hash`.
    ///
    /// # Errors
    /// * `NotFound` - nothing stored under `hash`
    /// * `Decode` - stored bytes are not a well-formed signature
    /// * `Storage` - bucket engine failure
    fn get(&self, hash: &BlockHeaderHash) -> Result<Signature, SignatureStoreError>;

    /// Record the signature of `signed` under its block's header hash.
    ///
    /// Overwrites any previous signature for the same hash. The signature
    /// is not checked.
    fn add<B: HeaderHash>(&self, signed: &SignedBlock<B>) -> Result<(), SignatureStoreError>;

    /// Check the signature against `master` and record it only if valid.
    ///
    /// # Errors
    /// * `SignatureInvalid` - signature is not the master's over this block
    /// * `Storage` - bucket engine failure
    fn add_verified<B: HeaderHash>(
        &self,
        signed: &SignedBlock<B>,
        master: &MasterPublicKey,
    ) -> Result<(), SignatureStoreError>;

    /// Whether any value is stored under `hash`.
    fn contains(&self, hash: &BlockHeaderHash) -> Result<bool, SignatureStoreError>;
}

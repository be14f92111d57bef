//! `BlockSignatureApi` implementation.

use super::SignatureStore;
use crate::domain::entities::{BlockHeaderHash, HeaderHash, SignedBlock};
use crate::domain::errors::SignatureStoreError;
use crate::domain::signature::{MasterPublicKey, Signature};
use crate::ports::inbound::BlockSignatureApi;
use crate::ports::outbound::Bucket;

impl<B: Bucket> BlockSignatureApi for SignatureStore<B> {
    fn get(&self, hash: &BlockHeaderHash) -> Result<Signature, SignatureStoreError> {
        let raw = self
            .sigs
            .get(hash.as_bytes())?
            .ok_or(SignatureStoreError::NotFound { hash: *hash })?;

        Signature::from_bytes(&raw).map_err(|source| SignatureStoreError::Decode {
            hash: *hash,
            source,
        })
    }

    fn add<T: HeaderHash>(&self, signed: &SignedBlock<T>) -> Result<(), SignatureStoreError> {
        let hash = signed.hash();
        self.sigs
            .put(hash.as_bytes(), signed.signature.as_bytes())?;

        tracing::debug!("[block-sigs] Recorded signature for block {}", hash);
        Ok(())
    }

    fn add_verified<T: HeaderHash>(
        &self,
        signed: &SignedBlock<T>,
        master: &MasterPublicKey,
    ) -> Result<(), SignatureStoreError> {
        let hash = signed.hash();
        if let Err(source) = master.verify(&signed.signature, &hash) {
            tracing::warn!(
                "[block-sigs] Rejected signature for block {}: {}",
                hash,
                source
            );
            return Err(SignatureStoreError::SignatureInvalid { hash, source });
        }
        self.add(signed)
    }

    fn contains(&self, hash: &BlockHeaderHash) -> Result<bool, SignatureStoreError> {
        Ok(self.sigs.get(hash.as_bytes())?.is_some())
    }
}

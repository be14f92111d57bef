//! Full-chain signature audit.

use crate::domain::errors::ChainVerificationError;
use crate::domain::entities::HeaderHash;
use crate::domain::signature::MasterPublicKey;
use crate::ports::inbound::BlockSignatureApi;
use crate::ports::outbound::ChainReader;

/// Check that every block from genesis to the current head carries a valid
/// master signature in `store`.
///
/// The head is read once, when the scan starts; blocks appended afterwards
/// are not part of this run. Depths are visited in order and the first
/// failure is returned: a missing block, a signature that cannot be loaded,
/// or a signature that does not verify against `master`.
pub fn verify_chain_signatures<C, S>(
    master: &MasterPublicKey,
    chain: &C,
    store: &S,
) -> Result<(), ChainVerificationError>
where
    C: ChainReader + ?Sized,
    S: BlockSignatureApi,
{
    let head = chain.head_depth();
    tracing::debug!("[block-sigs] Verifying signatures for depths 0..={}", head);

    for depth in 0..=head {
        let block = chain
            .block_at_depth(depth)
            .ok_or(ChainVerificationError::ChainGap { depth })
            .inspect_err(|err| tracing::warn!("[block-sigs] {}", err))?;

        let hash = block.header_hash();

        let signature = store
            .get(&hash)
            .map_err(|source| ChainVerificationError::Lookup { depth, source })
            .inspect_err(|err| tracing::warn!("[block-sigs] {}", err))?;

        master
            .verify(&signature, &hash)
            .map_err(|source| ChainVerificationError::SignatureInvalid {
                depth,
                hash,
                source,
            })
            .inspect_err(|err| tracing::error!("[block-sigs] {}", err))?;
    }

    tracing::info!(
        "[block-sigs] Verified master signatures for {} blocks",
        head.saturating_add(1)
    );
    Ok(())
}

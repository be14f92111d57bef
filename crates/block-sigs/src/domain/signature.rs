//! # Master Signatures (secp256k1)
//!
//! The master authority signs the 32-byte header hash of every block it
//! produces. Signatures travel and rest in a fixed 65-byte compact
//! recoverable form:
//!
//! ```text
//! [ r: 32 bytes ][ s: 32 bytes ][ recovery_id: 1 byte ]
//! ```
//!
//! There is no length prefix and no version tag, so decoding is strict:
//! exactly 65 bytes with a recovery id in `0..=3`.
//!
//! ## Security Properties
//!
//! - RFC 6979 deterministic nonces (no RNG dependency for signing)
//! - Low-S normalization on signing, high-S rejected on verification
//! - Verification recovers the signer and compares it to the master key

use crate::domain::entities::BlockHeaderHash;
use crate::domain::errors::SignatureError;
use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, SigningKey, VerifyingKey};
use std::fmt;

/// Byte length of an encoded [`Signature`].
pub const SIGNATURE_LENGTH: usize = 65;

/// Byte length of a compressed [`MasterPublicKey`].
pub const PUBLIC_KEY_LENGTH: usize = 33;

/// Detached master signature over a block header hash.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; SIGNATURE_LENGTH]);

impl Signature {
    /// Decode from the raw stored form.
    ///
    /// Fails with `InvalidFormat` when the length is not exactly
    /// [`SIGNATURE_LENGTH`] and with `InvalidRecoveryId` when the trailing
    /// byte is not a recovery id.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
        let raw: [u8; SIGNATURE_LENGTH] =
            bytes.try_into().map_err(|_| SignatureError::InvalidFormat {
                expected: SIGNATURE_LENGTH,
                actual: bytes.len(),
            })?;

        let recovery_id = raw[SIGNATURE_LENGTH - 1];
        if RecoveryId::from_byte(recovery_id).is_none() {
            return Err(SignatureError::InvalidRecoveryId(recovery_id));
        }

        Ok(Self(raw))
    }

    /// Raw stored form.
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }

    /// Encode to the raw stored form.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        self.0
    }

    fn split(&self) -> Result<(EcdsaSignature, RecoveryId), SignatureError> {
        let sig = EcdsaSignature::from_slice(&self.0[..64])
            .map_err(|_| SignatureError::MalformedScalars)?;
        let recid = RecoveryId::from_byte(self.0[64])
            .ok_or(SignatureError::InvalidRecoveryId(self.0[64]))?;
        Ok((sig, recid))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}..)", hex::encode(&self.0[..8]))
    }
}

/// Verification key of the master authority.
#[derive(Clone, PartialEq, Eq)]
pub struct MasterPublicKey(VerifyingKey);

impl MasterPublicKey {
    /// Parse a SEC1 encoded key (compressed or uncompressed).
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
        VerifyingKey::from_sec1_bytes(bytes)
            .map(Self)
            .map_err(|_| SignatureError::InvalidPublicKey)
    }

    /// Compressed SEC1 encoding (33 bytes).
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        // SEC1 compressed encoding is always 33 bytes.
        let sec1 = self.0.to_sec1_bytes();
        let mut bytes = [0u8; PUBLIC_KEY_LENGTH];
        bytes.copy_from_slice(&sec1[..PUBLIC_KEY_LENGTH]);
        bytes
    }

    /// Check that `signature` was produced by this key over `hash`.
    pub fn verify(
        &self,
        signature: &Signature,
        hash: &BlockHeaderHash,
    ) -> Result<(), SignatureError> {
        let (sig, recid) = signature.split()?;

        let signer = VerifyingKey::recover_from_prehash(hash.as_bytes(), &sig, recid)
            .map_err(|_| SignatureError::VerificationFailed)?;

        if signer != self.0 {
            return Err(SignatureError::SignerMismatch);
        }
        Ok(())
    }
}

impl fmt::Debug for MasterPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MasterPublicKey({})", hex::encode(self.to_bytes()))
    }
}

/// Signing keypair of the master authority.
pub struct MasterKeyPair {
    signing_key: SigningKey,
}

impl MasterKeyPair {
    /// Generate a random keypair.
    pub fn generate<R>(rng: &mut R) -> Self
    where
        R: k256::elliptic_curve::rand_core::CryptoRngCore,
    {
        Self {
            signing_key: SigningKey::random(rng),
        }
    }

    /// Restore from a 32-byte secret scalar.
    pub fn from_secret_bytes(bytes: &[u8; 32]) -> Result<Self, SignatureError> {
        SigningKey::from_bytes(bytes.into())
            .map(|signing_key| Self { signing_key })
            .map_err(|_| SignatureError::InvalidSecretKey)
    }

    /// Public half of the keypair.
    pub fn public_key(&self) -> MasterPublicKey {
        MasterPublicKey(self.signing_key.verifying_key().clone())
    }

    /// Sign a header hash (deterministic RFC 6979).
    pub fn sign(&self, hash: &BlockHeaderHash) -> Result<Signature, SignatureError> {
        let (sig, recid) = self
            .signing_key
            .sign_prehash_recoverable(hash.as_bytes())
            .map_err(|_| SignatureError::SigningFailed)?;

        let mut raw = [0u8; SIGNATURE_LENGTH];
        raw[..64].copy_from_slice(&sig.to_bytes());
        raw[64] = recid.to_byte();
        Ok(Signature(raw))
    }
}

impl fmt::Debug for MasterKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MasterKeyPair")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

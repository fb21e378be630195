//! Recoverable ECDSA signatures.
//!
//! AVM credentials carry each signature as 65 bytes: `r[32] || s[32] ||
//! recovery_id[1]`. The recovery byte is the raw parity (0 or 1), not the
//! Bitcoin `27 + id` header, and `s` is always low-S normalized.

use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{self, RecoveryId, VerifyingKey};

use crate::ec::private_key::PrivateKey;
use crate::ec::public_key::PublicKey;
use crate::PrimitivesError;

/// Length of a serialized recoverable signature.
pub const SIGNATURE_LEN: usize = 65;

/// Length of the digest that gets signed.
pub const DIGEST_LEN: usize = 32;

/// A 65-byte recoverable secp256k1 signature.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecoverableSignature([u8; SIGNATURE_LEN]);

impl RecoverableSignature {
    /// Sign a 32-byte digest with RFC6979 deterministic nonces.
    ///
    /// # Arguments
    /// * `hash` - The 32-byte digest to sign.
    /// * `priv_key` - The private key to sign with.
    ///
    /// # Returns
    /// `Ok(RecoverableSignature)` on success, or an error if the digest has
    /// the wrong length or signing fails.
    pub fn sign(hash: &[u8], priv_key: &PrivateKey) -> Result<Self, PrimitivesError> {
        check_digest(hash)?;
        let (sig, recovery_id) = priv_key
            .signing_key()
            .sign_prehash_recoverable(hash)
            .map_err(|e| PrimitivesError::InvalidSignature(e.to_string()))?;
        let mut out = [0u8; SIGNATURE_LEN];
        out[..64].copy_from_slice(&sig.to_bytes());
        out[64] = recovery_id.to_byte();
        Ok(RecoverableSignature(out))
    }

    /// Parse a 65-byte signature.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        let arr: [u8; SIGNATURE_LEN] =
            bytes.try_into().map_err(|_| PrimitivesError::InvalidLength {
                expected: SIGNATURE_LEN,
                got: bytes.len(),
            })?;
        Ok(RecoverableSignature(arr))
    }

    /// Access the raw 65 bytes.
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }

    /// The R component.
    pub fn r(&self) -> &[u8] {
        &self.0[..32]
    }

    /// The S component.
    pub fn s(&self) -> &[u8] {
        &self.0[32..64]
    }

    /// The recovery parity byte.
    pub fn recovery_id(&self) -> u8 {
        self.0[64]
    }

    /// Recover the public key that produced this signature over `hash`.
    ///
    /// # Returns
    /// `Ok(PublicKey)` if recovery succeeds, or `InvalidSignature` otherwise.
    pub fn recover(&self, hash: &[u8]) -> Result<PublicKey, PrimitivesError> {
        check_digest(hash)?;
        let recovery_id = RecoveryId::from_byte(self.recovery_id())
            .ok_or_else(|| PrimitivesError::InvalidSignature("invalid recovery id".to_string()))?;
        let sig = self.k256_signature()?;
        let vk = VerifyingKey::recover_from_prehash(hash, &sig, recovery_id)
            .map_err(|e| PrimitivesError::InvalidSignature(e.to_string()))?;
        Ok(PublicKey::from_k256_verifying_key(&vk))
    }

    /// Verify this signature against a digest and public key.
    ///
    /// # Returns
    /// `true` if the signature is valid, `false` otherwise.
    pub fn verify(&self, hash: &[u8], pub_key: &PublicKey) -> bool {
        if check_digest(hash).is_err() {
            return false;
        }
        match self.k256_signature() {
            Ok(sig) => pub_key.verifying_key().verify_prehash(hash, &sig).is_ok(),
            Err(_) => false,
        }
    }

    fn k256_signature(&self) -> Result<ecdsa::Signature, PrimitivesError> {
        ecdsa::Signature::from_slice(&self.0[..64])
            .map_err(|e| PrimitivesError::InvalidSignature(e.to_string()))
    }
}

impl std::fmt::Debug for RecoverableSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RecoverableSignature({})", hex::encode(self.0))
    }
}

fn check_digest(hash: &[u8]) -> Result<(), PrimitivesError> {
    if hash.len() != DIGEST_LEN {
        return Err(PrimitivesError::InvalidLength {
            expected: DIGEST_LEN,
            got: hash.len(),
        });
    }
    Ok(())
}

//! secp256k1 private key.
//!
//! Wraps the k256 signing key and adds the `PrivateKey-<cb58>` string
//! form used by wallets and node APIs to import keys.

use std::fmt;

use k256::ecdsa::SigningKey;
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use crate::cb58::{cb58_decode, cb58_encode};
use crate::ec::public_key::PublicKey;
use crate::ec::signature::RecoverableSignature;
use crate::PrimitivesError;

/// Length of a serialized private key in bytes.
pub const PRIVATE_KEY_BYTES_LEN: usize = 32;

/// Prefix of the string form of a private key.
pub const PRIVATE_KEY_PREFIX: &str = "PrivateKey-";

/// A secp256k1 private key used to sign transaction digests.
#[derive(Clone)]
pub struct PrivateKey {
    /// The underlying k256 signing key.
    inner: SigningKey,
}

impl PrivateKey {
    /// Generate a new random private key using the OS random number generator.
    pub fn new() -> Self {
        PrivateKey {
            inner: SigningKey::random(&mut OsRng),
        }
    }

    /// Create a private key from a raw 32-byte scalar.
    ///
    /// # Arguments
    /// * `bytes` - A 32-byte slice representing the private key scalar.
    ///
    /// # Returns
    /// `Ok(PrivateKey)` if the bytes represent a valid scalar on secp256k1,
    /// or an error if the length is wrong or the scalar is zero or out of range.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != PRIVATE_KEY_BYTES_LEN {
            return Err(PrimitivesError::InvalidPrivateKey(format!(
                "expected {} bytes, got {}",
                PRIVATE_KEY_BYTES_LEN,
                bytes.len()
            )));
        }
        let inner = SigningKey::from_slice(bytes)
            .map_err(|e| PrimitivesError::InvalidPrivateKey(e.to_string()))?;
        Ok(PrivateKey { inner })
    }

    /// Create a private key from a hexadecimal string.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        if hex_str.is_empty() {
            return Err(PrimitivesError::InvalidPrivateKey(
                "private key hex is empty".to_string(),
            ));
        }
        let bytes = Zeroizing::new(hex::decode(hex_str)?);
        Self::from_bytes(&bytes)
    }

    /// Parse the `PrivateKey-<cb58>` string form.
    ///
    /// A bare CB58 string without the prefix is accepted too.
    ///
    /// # Returns
    /// The key, `ChecksumMismatch` for a corrupted string, or
    /// `InvalidPrivateKey` if the payload is not a valid scalar.
    pub fn from_cb58_string(s: &str) -> Result<Self, PrimitivesError> {
        let encoded = s.strip_prefix(PRIVATE_KEY_PREFIX).unwrap_or(s);
        let bytes = Zeroizing::new(cb58_decode(encoded)?);
        Self::from_bytes(&bytes)
    }

    /// Encode as `PrivateKey-<cb58>`.
    pub fn to_cb58_string(&self) -> String {
        let bytes = Zeroizing::new(self.to_bytes());
        format!("{}{}", PRIVATE_KEY_PREFIX, cb58_encode(&bytes[..]))
    }

    /// Serialize the private key as a 32-byte big-endian array.
    pub fn to_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.inner.to_bytes());
        out
    }

    /// Serialize the private key as a lowercase hexadecimal string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Derive the corresponding public key for this private key.
    pub fn pub_key(&self) -> PublicKey {
        PublicKey::from_k256_verifying_key(self.inner.verifying_key())
    }

    /// Sign a 32-byte digest, producing a recoverable signature.
    ///
    /// # Arguments
    /// * `hash` - The digest to sign.
    ///
    /// # Returns
    /// `Ok(RecoverableSignature)` on success, or an error if signing fails.
    pub fn sign(&self, hash: &[u8]) -> Result<RecoverableSignature, PrimitivesError> {
        RecoverableSignature::sign(hash, self)
    }

    /// Access the underlying k256 `SigningKey`.
    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.inner
    }
}

impl Default for PrivateKey {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for PrivateKey {}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("pub_key", &self.pub_key().to_hex())
            .finish()
    }
}

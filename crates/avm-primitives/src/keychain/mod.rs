//! Key pairs and the address-indexed key chain.
//!
//! Signing never asks for a key by index: every signature slot of an input
//! names the 20-byte address it must satisfy, and the signer resolves that
//! address through a [`KeySource`]. [`KeyChain`] is the in-memory source.

use indexmap::IndexMap;
use tracing::debug;

use crate::ec::{PrivateKey, PublicKey, RecoverableSignature};
use crate::ids::{format_address, Address};
use crate::PrimitivesError;

/// Capability to look up the signing key for an address.
pub trait KeySource {
    /// Return the key pair owning `address`, if known.
    fn get_key(&self, address: &Address) -> Option<&KeyPair>;
}

// ---------------------------------------------------------------------------
// KeyPair
// ---------------------------------------------------------------------------

/// A private key together with its public key and derived address.
#[derive(Clone, Debug)]
pub struct KeyPair {
    private_key: PrivateKey,
    public_key: PublicKey,
    address: Address,
}

impl KeyPair {
    /// Generate a fresh random key pair.
    pub fn generate() -> Self {
        Self::from_private_key(PrivateKey::new())
    }

    /// Wrap an existing private key.
    pub fn from_private_key(private_key: PrivateKey) -> Self {
        let public_key = private_key.pub_key();
        let address = public_key.address();
        KeyPair {
            private_key,
            public_key,
            address,
        }
    }

    /// Import a key from its `PrivateKey-<cb58>` string or 64-character hex form.
    ///
    /// # Arguments
    /// * `encoded` - The serialized private key.
    ///
    /// # Returns
    /// The key pair, or an error if the string is neither valid CB58 nor hex.
    pub fn import(encoded: &str) -> Result<Self, PrimitivesError> {
        let key = if encoded.len() == 64 && encoded.chars().all(|c| c.is_ascii_hexdigit()) {
            PrivateKey::from_hex(encoded)?
        } else {
            PrivateKey::from_cb58_string(encoded)?
        };
        Ok(Self::from_private_key(key))
    }

    /// The 20-byte address owned by this key.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Format the address as `<chain>-<hrp>1...`.
    pub fn address_string(&self, chain: &str, hrp: &str) -> Result<String, PrimitivesError> {
        format_address(chain, hrp, &self.address)
    }

    /// The public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// The private key.
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// Sign a 32-byte digest.
    ///
    /// # Returns
    /// A 65-byte `r || s || recovery_id` signature.
    pub fn sign(&self, msg: &[u8]) -> Result<RecoverableSignature, PrimitivesError> {
        self.private_key.sign(msg)
    }

    /// Recover the signer's public key from a digest and signature.
    pub fn recover(&self, msg: &[u8], sig: &RecoverableSignature) -> Result<PublicKey, PrimitivesError> {
        sig.recover(msg)
    }

    /// Verify a signature over `msg` against `pub_key`.
    pub fn verify(&self, msg: &[u8], sig: &RecoverableSignature, pub_key: &PublicKey) -> bool {
        sig.verify(msg, pub_key)
    }
}

// ---------------------------------------------------------------------------
// KeyChain
// ---------------------------------------------------------------------------

/// An insertion-ordered set of key pairs indexed by address.
#[derive(Clone, Debug)]
pub struct KeyChain {
    hrp: String,
    chain_alias: String,
    keys: IndexMap<Address, KeyPair>,
}

impl KeyChain {
    /// Create an empty key chain for a network prefix and chain alias.
    ///
    /// # Arguments
    /// * `hrp` - bech32 human-readable part, e.g. `avax`.
    /// * `chain_alias` - Chain alias used in address strings, e.g. `X`.
    pub fn new(hrp: &str, chain_alias: &str) -> Self {
        KeyChain {
            hrp: hrp.to_string(),
            chain_alias: chain_alias.to_string(),
            keys: IndexMap::new(),
        }
    }

    /// Generate a new key, add it and return its address.
    pub fn make_key(&mut self) -> Address {
        let pair = KeyPair::generate();
        let address = pair.address();
        self.add_key(pair);
        address
    }

    /// Import a serialized private key and return its address.
    pub fn import_key(&mut self, encoded: &str) -> Result<Address, PrimitivesError> {
        let pair = KeyPair::import(encoded)?;
        let address = pair.address();
        self.add_key(pair);
        debug!(address = %address, "imported key");
        Ok(address)
    }

    /// Add a key pair, replacing any existing pair for the same address.
    pub fn add_key(&mut self, pair: KeyPair) {
        self.keys.insert(pair.address(), pair);
    }

    /// Remove the key for `address`. Returns whether a key was present.
    pub fn remove_key(&mut self, address: &Address) -> bool {
        self.keys.shift_remove(address).is_some()
    }

    /// Whether a key for `address` is held.
    pub fn has_key(&self, address: &Address) -> bool {
        self.keys.contains_key(address)
    }

    /// All addresses in insertion order.
    pub fn addresses(&self) -> Vec<Address> {
        self.keys.keys().copied().collect()
    }

    /// All addresses formatted as `<chain>-<hrp>1...`.
    pub fn address_strings(&self) -> Result<Vec<String>, PrimitivesError> {
        self.keys
            .keys()
            .map(|a| format_address(&self.chain_alias, &self.hrp, a))
            .collect()
    }

    /// Number of keys held.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the chain holds no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The bech32 human-readable part.
    pub fn hrp(&self) -> &str {
        &self.hrp
    }

    /// The chain alias.
    pub fn chain_alias(&self) -> &str {
        &self.chain_alias
    }
}

impl KeySource for KeyChain {
    fn get_key(&self, address: &Address) -> Option<&KeyPair> {
        self.keys.get(address)
    }
}

/// AVM SDK - Cryptographic primitives, hashing, and binary codec.
///
/// This crate provides the foundational building blocks for the AVM SDK:
/// - Hash functions (SHA-256, RIPEMD-160, Hash160)
/// - Raw Base58 and checksummed CB58 encoding
/// - Big-endian binary reader and writer for the AVM wire format
/// - 32-byte identifiers and 20-byte addresses with bech32 formatting
/// - secp256k1 keys and 65-byte recoverable signatures
/// - Key pairs and an address-indexed key chain

pub mod hash;
pub mod cb58;
pub mod util;
pub mod ids;
pub mod ec;
pub mod keychain;

mod error;
pub use error::PrimitivesError;
pub use ids::{Address, Id};
pub use keychain::{KeyChain, KeyPair, KeySource};

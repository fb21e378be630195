//! Fixed-width identifiers used throughout the AVM wire format.
//!
//! `Id` is the 32-byte identifier shared by assets, transactions and
//! blockchains, displayed as CB58. `Address` is the 20-byte Hash160 of a
//! compressed public key; it displays as hex and formats as a bech32
//! string prefixed by a chain alias, e.g. `X-avax1...`.

use std::fmt;
use std::str::FromStr;

use bech32::{Bech32, Hrp};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::cb58::{cb58_decode, cb58_encode};
use crate::hash::hash160;
use crate::PrimitivesError;

/// Size of an `Id` in bytes.
pub const ID_LEN: usize = 32;

/// Size of an `Address` in bytes.
pub const ADDRESS_LEN: usize = 20;

// ---------------------------------------------------------------------------
// Id
// ---------------------------------------------------------------------------

/// A 32-byte asset, transaction or blockchain identifier.
///
/// Ordering is plain byte order, which is the order the network expects
/// when identifiers are sorted inside a transaction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Id([u8; ID_LEN]);

impl Id {
    /// The all-zero identifier. As a blockchain ID it names the platform chain.
    pub const ZERO: Id = Id([0u8; ID_LEN]);

    /// Create an `Id` from a raw 32-byte array.
    pub const fn new(bytes: [u8; ID_LEN]) -> Self {
        Id(bytes)
    }

    /// Create an `Id` from a byte slice.
    ///
    /// # Arguments
    /// * `bytes` - A slice that must be exactly 32 bytes.
    ///
    /// # Returns
    /// `Ok(Id)` if the slice is 32 bytes, or `InvalidLength` otherwise.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        let arr: [u8; ID_LEN] = bytes.try_into().map_err(|_| PrimitivesError::InvalidLength {
            expected: ID_LEN,
            got: bytes.len(),
        })?;
        Ok(Id(arr))
    }

    /// Parse an `Id` from its CB58 string form.
    pub fn from_cb58(s: &str) -> Result<Self, PrimitivesError> {
        Self::from_bytes(&cb58_decode(s)?)
    }

    /// Encode the `Id` as CB58.
    pub fn to_cb58(&self) -> String {
        cb58_encode(&self.0)
    }

    /// Access the internal byte array.
    pub fn as_bytes(&self) -> &[u8; ID_LEN] {
        &self.0
    }

    /// Whether every byte is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ID_LEN]
    }
}

impl From<[u8; ID_LEN]> for Id {
    fn from(bytes: [u8; ID_LEN]) -> Self {
        Id(bytes)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_cb58())
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.to_cb58())
    }
}

impl FromStr for Id {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Id::from_cb58(s)
    }
}

/// Serialize as a CB58 string in JSON.
impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_cb58())
    }
}

/// Deserialize from a CB58 string in JSON.
impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Id::from_cb58(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A 20-byte short address: RIPEMD-160(SHA-256(compressed public key)).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// Create an `Address` from a raw 20-byte array.
    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Address(bytes)
    }

    /// Create an `Address` from a byte slice.
    ///
    /// # Returns
    /// `Ok(Address)` if the slice is 20 bytes, or `InvalidLength` otherwise.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        let arr: [u8; ADDRESS_LEN] =
            bytes.try_into().map_err(|_| PrimitivesError::InvalidLength {
                expected: ADDRESS_LEN,
                got: bytes.len(),
            })?;
        Ok(Address(arr))
    }

    /// Derive the address owned by a SEC1 compressed public key.
    pub fn from_public_key_bytes(compressed: &[u8]) -> Self {
        Address(hash160(compressed))
    }

    /// Parse a 40-character hex string.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        Self::from_bytes(&hex::decode(hex_str)?)
    }

    /// Access the internal byte array.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Encode as a bare bech32 string (`<hrp>1...`) without a chain alias.
    ///
    /// # Arguments
    /// * `hrp` - Human-readable part, e.g. `avax`, `fuji` or `local`.
    pub fn to_bech32(&self, hrp: &str) -> Result<String, PrimitivesError> {
        let hrp = Hrp::parse(hrp).map_err(|e| PrimitivesError::InvalidAddress(e.to_string()))?;
        bech32::encode::<Bech32>(hrp, &self.0)
            .map_err(|e| PrimitivesError::InvalidAddress(e.to_string()))
    }

    /// Decode a bare bech32 string, returning the human-readable part and the address.
    pub fn from_bech32(s: &str) -> Result<(String, Self), PrimitivesError> {
        let (hrp, data) =
            bech32::decode(s).map_err(|e| PrimitivesError::InvalidAddress(e.to_string()))?;
        Ok((hrp.as_str().to_string(), Self::from_bytes(&data)?))
    }
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Address(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", hex::encode(self.0))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Format an address as `<chain>-<bech32>`, e.g. `X-avax1...`.
///
/// # Arguments
/// * `chain` - Chain alias such as `X`.
/// * `hrp` - Human-readable part of the network.
/// * `address` - The 20-byte address.
pub fn format_address(chain: &str, hrp: &str, address: &Address) -> Result<String, PrimitivesError> {
    Ok(format!("{}-{}", chain, address.to_bech32(hrp)?))
}

/// A bech32 address string split into its parts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedAddress {
    /// Chain alias before the dash, e.g. `X`.
    pub chain: String,
    /// Human-readable part, e.g. `avax`.
    pub hrp: String,
    /// The decoded 20-byte address.
    pub address: Address,
}

/// Parse a `<chain>-<bech32>` address string.
///
/// # Returns
/// The chain alias, the human-readable part and the address, or
/// `InvalidAddress` if the string has no chain alias or bad bech32.
pub fn parse_address(s: &str) -> Result<ParsedAddress, PrimitivesError> {
    let (chain, rest) = s
        .split_once('-')
        .ok_or_else(|| PrimitivesError::InvalidAddress(format!("missing chain alias in {}", s)))?;
    if chain.is_empty() {
        return Err(PrimitivesError::InvalidAddress(format!("empty chain alias in {}", s)));
    }
    let (hrp, address) = Address::from_bech32(rest)?;
    Ok(ParsedAddress {
        chain: chain.to_string(),
        hrp,
        address,
    })
}

//! Base58 and CB58 encoding.
//!
//! Raw Base58 uses the Bitcoin alphabet and carries no checksum; it is the
//! string form of UTXO IDs. CB58 appends the last four bytes of
//! SHA-256(payload) before Base58 encoding and is the string form of
//! asset, transaction and blockchain IDs, private keys and serialized
//! transactions.

use crate::hash::sha256;
use crate::PrimitivesError;

/// Length of the CB58 checksum in bytes.
pub const CHECKSUM_LEN: usize = 4;

/// Encode a byte slice to a Base58 string.
///
/// # Arguments
/// * `data` - The bytes to encode.
///
/// # Returns
/// A Base58-encoded string. Leading zero bytes become leading '1's.
pub fn encode(data: &[u8]) -> String {
    bs58::encode(data).with_alphabet(bs58::Alphabet::BITCOIN).into_string()
}

/// Decode a Base58 string to a byte vector.
///
/// # Arguments
/// * `s` - The Base58 string to decode.
///
/// # Returns
/// `Ok(Vec<u8>)` on success, or an error for invalid characters.
pub fn decode(s: &str) -> Result<Vec<u8>, PrimitivesError> {
    bs58::decode(s)
        .with_alphabet(bs58::Alphabet::BITCOIN)
        .into_vec()
        .map_err(|e| PrimitivesError::InvalidBase58(e.to_string()))
}

/// Compute the four-byte CB58 checksum of a payload.
fn checksum(payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let digest = sha256(payload);
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&digest[digest.len() - CHECKSUM_LEN..]);
    out
}

/// Encode a payload as CB58: `Base58(payload || checksum)`.
///
/// # Arguments
/// * `payload` - The bytes to encode.
///
/// # Returns
/// The CB58 string.
pub fn cb58_encode(payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(payload.len() + CHECKSUM_LEN);
    data.extend_from_slice(payload);
    data.extend_from_slice(&checksum(payload));
    encode(&data)
}

/// Decode a CB58 string, verifying and stripping the checksum.
///
/// # Arguments
/// * `s` - The CB58 string.
///
/// # Returns
/// The payload without checksum, `ChecksumMismatch` if the trailing four
/// bytes do not match, or `InvalidBase58` for malformed input.
pub fn cb58_decode(s: &str) -> Result<Vec<u8>, PrimitivesError> {
    let decoded = decode(s)?;
    if decoded.len() < CHECKSUM_LEN {
        return Err(PrimitivesError::InvalidBase58(
            "data too short for checksum".to_string(),
        ));
    }
    let (payload, check) = decoded.split_at(decoded.len() - CHECKSUM_LEN);
    if check != checksum(payload) {
        return Err(PrimitivesError::ChecksumMismatch);
    }
    Ok(payload.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base58_known_values() {
        assert_eq!(encode(&[]), "");
        assert_eq!(encode(&[0]), "1");
        assert_eq!(encode(&[0, 0, 0, 0]), "1111");
        assert_eq!(encode(&[255, 255, 255, 255]), "7YXq9G");
        assert_eq!(decode("111233QC4").unwrap(), hex::decode("000000287FB4CD").unwrap());
    }

    #[test]
    fn test_base58_decode_invalid_character() {
        assert!(decode("0OIl").is_err());
    }

    #[test]
    fn test_cb58_empty_payload() {
        assert_eq!(cb58_encode(&[]), "45PJLL");
        assert!(cb58_decode("45PJLL").unwrap().is_empty());
    }

    #[test]
    fn test_cb58_zero_id() {
        // The platform chain ID is 32 zero bytes.
        let zero = [0u8; 32];
        assert_eq!(cb58_encode(&zero), "11111111111111111111111111111111LpoYY");
        assert_eq!(
            cb58_decode("11111111111111111111111111111111LpoYY").unwrap(),
            zero.to_vec()
        );
    }

    #[test]
    fn test_cb58_short_payload() {
        assert_eq!(cb58_encode(&[0, 1, 2, 3]), "13DV5cZ86B");
        assert_eq!(cb58_decode("13DV5cZ86B").unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_cb58_bad_checksum() {
        let mut encoded = cb58_encode(&[0x80, 0x01, 0x02, 0x03]);
        let last = encoded.pop().unwrap();
        encoded.push(if last == '1' { '2' } else { '1' });
        assert!(matches!(
            cb58_decode(&encoded),
            Err(PrimitivesError::ChecksumMismatch)
        ));
    }

    #[test]
    fn test_cb58_too_short() {
        assert!(matches!(
            cb58_decode("1"),
            Err(PrimitivesError::InvalidBase58(_))
        ));
    }
}

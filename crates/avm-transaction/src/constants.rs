//! Codec versions and the numeric type tags of each.
//!
//! Codec 0 and codec 1 number the same logical kinds in disjoint ranges.
//! Codec 1 groups tags by feature extension: SECP kinds start at 65536 and
//! NFT kinds at 131072. Transaction type IDs are shared by both codecs.

use crate::error::{Result, TransactionError};

/// Identifier of the SECP256k1 feature extension.
pub const SECP_FX_ID: u32 = 0;

/// Identifier of the NFT feature extension.
pub const NFT_FX_ID: u32 = 1;

/// Maximum length of an asset name in bytes.
pub const ASSET_NAME_MAX_LEN: usize = 128;

/// Maximum length of an asset symbol in bytes.
pub const ASSET_SYMBOL_MAX_LEN: usize = 4;

/// Maximum number of decimal places of an asset.
pub const MAX_DENOMINATION: u8 = 32;

/// Codec version prefixed to transactions and UTXOs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum CodecId {
    #[default]
    Zero,
    One,
}

impl CodecId {
    /// The 2-byte wire value.
    pub fn as_u16(self) -> u16 {
        match self {
            CodecId::Zero => 0,
            CodecId::One => 1,
        }
    }
}

impl TryFrom<u16> for CodecId {
    type Error = TransactionError;

    fn try_from(value: u16) -> Result<Self> {
        match value {
            0 => Ok(CodecId::Zero),
            1 => Ok(CodecId::One),
            other => Err(TransactionError::CodecId(other)),
        }
    }
}

/// Logical kind of a tagged input, output, operation or credential.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    SecpTransferInput,
    SecpMintOutput,
    SecpTransferOutput,
    SecpMintOperation,
    SecpCredential,
    NftMintOutput,
    NftTransferOutput,
    NftMintOperation,
    NftTransferOperation,
    NftCredential,
}

const ALL_KINDS: [TypeKind; 10] = [
    TypeKind::SecpTransferInput,
    TypeKind::SecpMintOutput,
    TypeKind::SecpTransferOutput,
    TypeKind::SecpMintOperation,
    TypeKind::SecpCredential,
    TypeKind::NftMintOutput,
    TypeKind::NftTransferOutput,
    TypeKind::NftMintOperation,
    TypeKind::NftTransferOperation,
    TypeKind::NftCredential,
];

impl TypeKind {
    /// The numeric tag of this kind under `codec`.
    pub fn type_id(self, codec: CodecId) -> u32 {
        let (zero, one) = match self {
            TypeKind::SecpTransferInput => (5, 65536),
            TypeKind::SecpMintOutput => (6, 65537),
            TypeKind::SecpTransferOutput => (7, 65538),
            TypeKind::SecpMintOperation => (8, 65539),
            TypeKind::SecpCredential => (9, 65540),
            TypeKind::NftMintOutput => (10, 131072),
            TypeKind::NftTransferOutput => (11, 131073),
            TypeKind::NftMintOperation => (12, 131074),
            TypeKind::NftTransferOperation => (13, 131075),
            TypeKind::NftCredential => (14, 131076),
        };
        match codec {
            CodecId::Zero => zero,
            CodecId::One => one,
        }
    }

    /// Look up the kind for a tag under `codec`.
    ///
    /// # Returns
    /// The kind, or `UnknownTypeId` if `codec` defines no such tag.
    pub fn from_type_id(type_id: u32, codec: CodecId) -> Result<Self> {
        ALL_KINDS
            .iter()
            .copied()
            .find(|k| k.type_id(codec) == type_id)
            .ok_or(TransactionError::UnknownTypeId {
                type_id,
                codec: codec.as_u16(),
            })
    }

    /// The feature extension this kind belongs to.
    pub fn fx_id(self) -> u32 {
        match self {
            TypeKind::SecpTransferInput
            | TypeKind::SecpMintOutput
            | TypeKind::SecpTransferOutput
            | TypeKind::SecpMintOperation
            | TypeKind::SecpCredential => SECP_FX_ID,
            _ => NFT_FX_ID,
        }
    }

    pub(crate) fn unexpected(type_id: u32, codec: CodecId) -> TransactionError {
        TransactionError::UnknownTypeId {
            type_id,
            codec: codec.as_u16(),
        }
    }
}

/// Logical kind of a transaction body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TxKind {
    Base,
    CreateAsset,
    Operation,
    Import,
    Export,
}

impl TxKind {
    /// The numeric tag of this transaction kind. Identical in both codecs.
    pub fn type_id(self, _codec: CodecId) -> u32 {
        match self {
            TxKind::Base => 0,
            TxKind::CreateAsset => 1,
            TxKind::Operation => 2,
            TxKind::Import => 3,
            TxKind::Export => 4,
        }
    }

    /// Look up a transaction kind by tag.
    pub fn from_type_id(type_id: u32, codec: CodecId) -> Result<Self> {
        match type_id {
            0 => Ok(TxKind::Base),
            1 => Ok(TxKind::CreateAsset),
            2 => Ok(TxKind::Operation),
            3 => Ok(TxKind::Import),
            4 => Ok(TxKind::Export),
            _ => Err(TypeKind::unexpected(type_id, codec)),
        }
    }
}

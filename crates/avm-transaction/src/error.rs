use avm_primitives::Address;

/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// A codec ID other than 0 or 1 was supplied or decoded.
    #[error("codec id {0} is not supported, expected 0 or 1")]
    CodecId(u16),
    /// A type tag is not defined for the codec in use.
    #[error("unknown type id {type_id} for codec {codec}")]
    UnknownTypeId { type_id: u32, codec: u16 },
    /// An import or export was serialized without its counterpart chain.
    #[error("chain id missing: {0}")]
    ChainId(String),
    /// More signers were requested than there are owner addresses.
    #[error("threshold {threshold} exceeds {addresses} addresses")]
    Threshold { threshold: u32, addresses: usize },
    /// The UTXO set cannot cover the requested amounts and fees.
    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),
    /// An owner address could not be located in an output.
    #[error("address error: {0}")]
    Address(String),
    /// A referenced UTXO is not in the set.
    #[error("utxo not found: {0}")]
    UtxoNotFound(String),
    /// A referenced UTXO carries a different kind of output than required.
    #[error("unexpected output type: {0}")]
    OutputType(String),
    /// The key source holds no key for an address a signature slot names.
    #[error("no key for address {0}")]
    MissingKey(Address),
    /// A spend amount was zero or otherwise unusable.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    /// An asset name, symbol or denomination is outside its limits.
    #[error("invalid asset field: {0}")]
    InvalidAssetField(String),
    /// Malformed bytes that are not a plain bounds failure.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// A network configuration could not be loaded.
    #[error("config error: {0}")]
    Config(String),
    /// An underlying primitives error (forwarded from `avm-primitives`).
    #[error("primitives error: {0}")]
    Primitives(#[from] avm_primitives::PrimitivesError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TransactionError>;

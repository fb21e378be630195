//! Transaction bodies, unsigned envelopes and signed transactions.
//!
//! A [`Transaction`] is one of the five signable kinds, each embedding a
//! [`BaseTx`] by value. [`UnsignedTx`] prefixes the body with the codec ID
//! and type tag; [`Tx`] appends one credential per signed input or
//! operation.

pub mod base;
pub mod create_asset;
pub mod export;
pub mod genesis_asset;
pub mod import;
pub mod operation;

use avm_primitives::cb58::{cb58_decode, cb58_encode};
use avm_primitives::hash::sha256;
use avm_primitives::util::{AvmReader, AvmWriter};
use avm_primitives::{Id, KeySource};

use crate::constants::{CodecId, TxKind};
use crate::credential::Credential;
use crate::error::{Result, TransactionError};
use crate::input::TransferableInput;
use crate::output::TransferableOutput;

pub use base::BaseTx;
pub use create_asset::CreateAssetTx;
pub use export::ExportTx;
pub use genesis_asset::GenesisAsset;
pub use import::ImportTx;
pub use operation::OperationTx;

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// Any signable transaction body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transaction {
    Base(BaseTx),
    CreateAsset(CreateAssetTx),
    Operation(OperationTx),
    Import(ImportTx),
    Export(ExportTx),
}

impl Transaction {
    pub fn kind(&self) -> TxKind {
        match self {
            Transaction::Base(_) => TxKind::Base,
            Transaction::CreateAsset(_) => TxKind::CreateAsset,
            Transaction::Operation(_) => TxKind::Operation,
            Transaction::Import(_) => TxKind::Import,
            Transaction::Export(_) => TxKind::Export,
        }
    }

    /// The shared base fields.
    pub fn base(&self) -> &BaseTx {
        match self {
            Transaction::Base(tx) => tx,
            Transaction::CreateAsset(tx) => &tx.base,
            Transaction::Operation(tx) => &tx.base,
            Transaction::Import(tx) => &tx.base,
            Transaction::Export(tx) => &tx.base,
        }
    }

    pub fn base_mut(&mut self) -> &mut BaseTx {
        match self {
            Transaction::Base(tx) => tx,
            Transaction::CreateAsset(tx) => &mut tx.base,
            Transaction::Operation(tx) => &mut tx.base,
            Transaction::Import(tx) => &mut tx.base,
            Transaction::Export(tx) => &mut tx.base,
        }
    }

    pub fn codec_id(&self) -> CodecId {
        self.base().codec_id()
    }

    /// Switch codec version; every nested tag follows.
    ///
    /// # Returns
    /// `CodecId` error unless `id` is 0 or 1.
    pub fn set_codec_id(&mut self, id: u16) -> Result<()> {
        self.base_mut().set_codec_id(id)
    }

    /// The transaction's type tag under its codec.
    pub fn type_id(&self) -> u32 {
        self.kind().type_id(self.codec_id())
    }

    /// Serialize the body (no codec or type prefix).
    ///
    /// # Returns
    /// `ChainId` error for an import or export whose counterpart chain is unset.
    pub fn write_to(&self, w: &mut AvmWriter) -> Result<()> {
        match self {
            Transaction::Base(tx) => tx.write_to(w),
            Transaction::CreateAsset(tx) => tx.write_to(w),
            Transaction::Operation(tx) => tx.write_to(w),
            Transaction::Import(tx) => tx.write_to(w)?,
            Transaction::Export(tx) => tx.write_to(w)?,
        }
        Ok(())
    }

    /// The body bytes alone, without the codec and type prefix.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut w = AvmWriter::new();
        self.write_to(&mut w)?;
        Ok(w.into_bytes())
    }

    /// Deserialize the body of a transaction of kind `kind`.
    pub fn read_from(r: &mut AvmReader, kind: TxKind, codec: CodecId) -> Result<Self> {
        Ok(match kind {
            TxKind::Base => Transaction::Base(BaseTx::read_from(r, codec)?),
            TxKind::CreateAsset => Transaction::CreateAsset(CreateAssetTx::read_from(r, codec)?),
            TxKind::Operation => Transaction::Operation(OperationTx::read_from(r, codec)?),
            TxKind::Import => Transaction::Import(ImportTx::read_from(r, codec)?),
            TxKind::Export => Transaction::Export(ExportTx::read_from(r, codec)?),
        })
    }

    /// Produce credentials for `msg`.
    ///
    /// Base inputs come first in canonical order, followed by imported
    /// inputs or operations in canonical order.
    pub fn sign(&self, msg: &[u8], keys: &dyn KeySource) -> Result<Vec<Credential>> {
        match self {
            Transaction::Operation(tx) => tx.sign(msg, keys),
            Transaction::Import(tx) => tx.sign(msg, keys),
            other => other.base().sign_inputs(msg, keys),
        }
    }

    fn all_inputs(&self) -> impl Iterator<Item = &TransferableInput> {
        let extra: &[TransferableInput] = match self {
            Transaction::Import(tx) => &tx.import_ins,
            _ => &[],
        };
        self.base().ins.iter().chain(extra.iter())
    }

    fn all_outputs(&self) -> impl Iterator<Item = &TransferableOutput> {
        let extra: &[TransferableOutput] = match self {
            Transaction::Export(tx) => &tx.export_outs,
            _ => &[],
        };
        self.base().outs.iter().chain(extra.iter())
    }
}

impl From<BaseTx> for Transaction {
    fn from(tx: BaseTx) -> Self {
        Transaction::Base(tx)
    }
}

impl From<CreateAssetTx> for Transaction {
    fn from(tx: CreateAssetTx) -> Self {
        Transaction::CreateAsset(tx)
    }
}

impl From<OperationTx> for Transaction {
    fn from(tx: OperationTx) -> Self {
        Transaction::Operation(tx)
    }
}

impl From<ImportTx> for Transaction {
    fn from(tx: ImportTx) -> Self {
        Transaction::Import(tx)
    }
}

impl From<ExportTx> for Transaction {
    fn from(tx: ExportTx) -> Self {
        Transaction::Export(tx)
    }
}

// ---------------------------------------------------------------------------
// UnsignedTx
// ---------------------------------------------------------------------------

/// A transaction body with its codec and type prefix, ready to sign.
///
/// Wire: codecID(2) typeID(4) body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnsignedTx {
    pub transaction: Transaction,
}

impl UnsignedTx {
    pub fn new(transaction: impl Into<Transaction>) -> Self {
        UnsignedTx {
            transaction: transaction.into(),
        }
    }

    pub(crate) fn write_to(&self, w: &mut AvmWriter) -> Result<()> {
        w.write_u16_be(self.transaction.codec_id().as_u16());
        w.write_u32_be(self.transaction.type_id());
        self.transaction.write_to(w)
    }

    pub(crate) fn read_from(r: &mut AvmReader) -> Result<Self> {
        let codec = CodecId::try_from(r.read_u16_be()?)?;
        let kind = TxKind::from_type_id(r.read_u32_be()?, codec)?;
        Ok(UnsignedTx {
            transaction: Transaction::read_from(r, kind, codec)?,
        })
    }

    /// Serialize to bytes. Repeated calls yield identical bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut w = AvmWriter::new();
        self.write_to(&mut w)?;
        Ok(w.into_bytes())
    }

    /// Parse an unsigned transaction, rejecting trailing bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut r = AvmReader::new(bytes);
        let tx = Self::read_from(&mut r)?;
        if r.remaining() != 0 {
            return Err(TransactionError::Serialization(format!(
                "trailing {} bytes after unsigned transaction",
                r.remaining()
            )));
        }
        Ok(tx)
    }

    /// The digest every credential signs: SHA-256 of the unsigned bytes.
    pub fn signing_digest(&self) -> Result<[u8; 32]> {
        Ok(sha256(&self.to_bytes()?))
    }

    /// Sign with keys resolved through `keys`.
    ///
    /// # Returns
    /// The signed transaction, or `MissingKey` if any signature slot names
    /// an address `keys` does not hold.
    pub fn sign(&self, keys: &dyn KeySource) -> Result<Tx> {
        let digest = self.signing_digest()?;
        let credentials = self.transaction.sign(&digest, keys)?;
        Ok(Tx::new(self.clone(), credentials))
    }

    /// Sum of input amounts of `asset_id`, imported inputs included.
    pub fn input_total(&self, asset_id: &Id) -> u64 {
        self.transaction
            .all_inputs()
            .filter(|i| &i.asset_id == asset_id)
            .map(|i| i.input.amount)
            .sum()
    }

    /// Sum of output amounts of `asset_id`, exported outputs included.
    pub fn output_total(&self, asset_id: &Id) -> u64 {
        self.transaction
            .all_outputs()
            .filter(|o| &o.asset_id == asset_id)
            .filter_map(|o| o.output.amount())
            .sum()
    }

    /// Amount of `asset_id` consumed but not paid out, i.e. the fee burned.
    pub fn burn(&self, asset_id: &Id) -> u64 {
        self.input_total(asset_id).saturating_sub(self.output_total(asset_id))
    }
}

// ---------------------------------------------------------------------------
// Tx
// ---------------------------------------------------------------------------

/// A signed transaction.
///
/// Wire: unsigned bytes, credentialCount(4), then each credential.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tx {
    pub unsigned: UnsignedTx,
    pub credentials: Vec<Credential>,
}

impl Tx {
    pub fn new(unsigned: UnsignedTx, credentials: Vec<Credential>) -> Self {
        Tx {
            unsigned,
            credentials,
        }
    }

    pub(crate) fn write_to(&self, w: &mut AvmWriter) -> Result<()> {
        let codec = self.unsigned.transaction.codec_id();
        self.unsigned.write_to(w)?;
        w.write_u32_be(self.credentials.len() as u32);
        for cred in &self.credentials {
            cred.write_to(w, codec);
        }
        Ok(())
    }

    pub(crate) fn read_from(r: &mut AvmReader) -> Result<Self> {
        let unsigned = UnsignedTx::read_from(r)?;
        let codec = unsigned.transaction.codec_id();
        let count = r.read_u32_be()? as usize;
        let mut credentials = Vec::with_capacity(count.min(r.remaining() / 8));
        for _ in 0..count {
            credentials.push(Credential::read_from(r, codec)?);
        }
        Ok(Tx {
            unsigned,
            credentials,
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut w = AvmWriter::new();
        self.write_to(&mut w)?;
        Ok(w.into_bytes())
    }

    /// Parse a signed transaction, rejecting trailing bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut r = AvmReader::new(bytes);
        let tx = Self::read_from(&mut r)?;
        if r.remaining() != 0 {
            return Err(TransactionError::Serialization(format!(
                "trailing {} bytes after transaction",
                r.remaining()
            )));
        }
        Ok(tx)
    }

    /// The transaction ID: SHA-256 of the signed bytes.
    pub fn id(&self) -> Result<Id> {
        Ok(Id::new(sha256(&self.to_bytes()?)))
    }

    /// CB58 string form, as accepted by node APIs.
    pub fn to_cb58_string(&self) -> Result<String> {
        Ok(cb58_encode(&self.to_bytes()?))
    }

    pub fn from_cb58_string(s: &str) -> Result<Self> {
        Self::from_bytes(&cb58_decode(s)?)
    }

    pub fn to_hex(&self) -> Result<String> {
        Ok(hex::encode(self.to_bytes()?))
    }

    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| TransactionError::Serialization(format!("invalid hex: {}", e)))?;
        Self::from_bytes(&bytes)
    }
}

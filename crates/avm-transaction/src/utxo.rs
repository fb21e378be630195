//! Unspent outputs as returned by a node.

use avm_primitives::cb58::{cb58_decode, cb58_encode};
use avm_primitives::util::{AvmReader, AvmWriter};
use avm_primitives::Id;

use crate::constants::CodecId;
use crate::error::{Result, TransactionError};
use crate::operation::UtxoId;
use crate::output::Output;

/// An unspent output together with its identity and asset.
///
/// # Wire format
///
/// | Field       | Size          |
/// |-------------|---------------|
/// | codecID     | 2 bytes (BE)  |
/// | txID        | 32 bytes      |
/// | outputIndex | 4 bytes (BE)  |
/// | assetID     | 32 bytes      |
/// | typeID      | 4 bytes (BE)  |
/// | output body | variable      |
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Utxo {
    pub codec_id: CodecId,
    pub utxo_id: UtxoId,
    pub asset_id: Id,
    pub output: Output,
}

impl Utxo {
    pub fn new(tx_id: Id, output_index: u32, asset_id: Id, output: impl Into<Output>) -> Self {
        Utxo {
            codec_id: CodecId::Zero,
            utxo_id: UtxoId::new(tx_id, output_index),
            asset_id,
            output: output.into(),
        }
    }

    pub fn tx_id(&self) -> &Id {
        &self.utxo_id.tx_id
    }

    pub fn output_index(&self) -> u32 {
        self.utxo_id.output_index
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut w = AvmWriter::with_capacity(128);
        w.write_u16_be(self.codec_id.as_u16());
        self.utxo_id.write_to(&mut w);
        w.write_bytes(self.asset_id.as_bytes());
        self.output.write_to(&mut w, self.codec_id);
        w.into_bytes()
    }

    /// Decode a UTXO, rejecting unknown codecs and trailing bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut r = AvmReader::new(bytes);
        let codec_id = CodecId::try_from(r.read_u16_be()?)?;
        let utxo_id = UtxoId::read_from(&mut r)?;
        let asset_id = Id::new(r.read_array()?);
        let output = Output::read_from(&mut r, codec_id)?;
        if r.remaining() != 0 {
            return Err(TransactionError::Serialization(format!(
                "trailing {} bytes after utxo",
                r.remaining()
            )));
        }
        Ok(Utxo {
            codec_id,
            utxo_id,
            asset_id,
            output,
        })
    }

    /// CB58 form, the encoding node APIs return UTXOs in.
    pub fn to_cb58_string(&self) -> String {
        cb58_encode(&self.to_bytes())
    }

    pub fn from_cb58_string(s: &str) -> Result<Self> {
        Self::from_bytes(&cb58_decode(s)?)
    }
}

//! Inputs spending earlier outputs.
//!
//! # Wire format
//!
//! | Field          | Size                        |
//! |----------------|-----------------------------|
//! | txID           | 32 bytes                    |
//! | outputIndex    | 4 bytes (BE)                |
//! | assetID        | 32 bytes                    |
//! | typeID         | 4 bytes (BE)                |
//! | amount         | 8 bytes (BE)                |
//! | sigIdx count   | 4 bytes (BE)                |
//! | sigIdx         | 4 bytes (BE) each           |

use avm_primitives::util::{AvmReader, AvmWriter};
use avm_primitives::{Address, Id};

use crate::constants::{CodecId, TypeKind};
use crate::credential::{read_sig_idxs, write_sig_idxs, SigIdx};
use crate::error::Result;
use crate::operation::UtxoId;

/// Spends a [`crate::output::SecpTransferOutput`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SecpTransferInput {
    pub amount: u64,
    sig_idxs: Vec<SigIdx>,
}

impl SecpTransferInput {
    pub fn new(amount: u64) -> Self {
        SecpTransferInput {
            amount,
            sig_idxs: Vec::new(),
        }
    }

    /// Append a signature slot. Slots are signed in the order they are added.
    pub fn add_signature_idx(&mut self, address_index: u32, address: Address) {
        self.sig_idxs.push(SigIdx::new(address_index, address));
    }

    pub fn sig_idxs(&self) -> &[SigIdx] {
        &self.sig_idxs
    }

    pub fn kind(&self) -> TypeKind {
        TypeKind::SecpTransferInput
    }

    fn write_body(&self, w: &mut AvmWriter) {
        w.write_u64_be(self.amount);
        write_sig_idxs(w, &self.sig_idxs);
    }

    fn read_body(r: &mut AvmReader) -> Result<Self> {
        let amount = r.read_u64_be()?;
        let sig_idxs = read_sig_idxs(r)?;
        Ok(SecpTransferInput { amount, sig_idxs })
    }
}

/// An input together with the UTXO it consumes and that UTXO's asset.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TransferableInput {
    pub utxo_id: UtxoId,
    pub asset_id: Id,
    pub input: SecpTransferInput,
}

impl TransferableInput {
    pub fn new(tx_id: Id, output_index: u32, asset_id: Id, input: SecpTransferInput) -> Self {
        TransferableInput {
            utxo_id: UtxoId::new(tx_id, output_index),
            asset_id,
            input,
        }
    }

    pub fn write_to(&self, w: &mut AvmWriter, codec: CodecId) {
        self.utxo_id.write_to(w);
        w.write_bytes(self.asset_id.as_bytes());
        w.write_u32_be(self.input.kind().type_id(codec));
        self.input.write_body(w);
    }

    /// Deserialize a transferable input.
    ///
    /// # Returns
    /// `UnknownTypeId` unless the tag is the SECP transfer input of `codec`.
    pub fn read_from(r: &mut AvmReader, codec: CodecId) -> Result<Self> {
        let utxo_id = UtxoId::read_from(r)?;
        let asset_id = Id::new(r.read_array()?);
        let type_id = r.read_u32_be()?;
        if TypeKind::from_type_id(type_id, codec)? != TypeKind::SecpTransferInput {
            return Err(TypeKind::unexpected(type_id, codec));
        }
        let input = SecpTransferInput::read_body(r)?;
        Ok(TransferableInput {
            utxo_id,
            asset_id,
            input,
        })
    }

    pub fn to_bytes(&self, codec: CodecId) -> Vec<u8> {
        let mut w = AvmWriter::new();
        self.write_to(&mut w, codec);
        w.into_bytes()
    }
}

/// Sort inputs into canonical order: by the consumed UTXO's `(txID, outputIndex)`.
pub fn sort_transferable_inputs(ins: &mut [TransferableInput]) {
    ins.sort_by(|a, b| a.utxo_id.cmp(&b.utxo_id));
}

/// Write `count(4)` followed by the inputs in canonical order.
pub(crate) fn write_sorted_inputs(w: &mut AvmWriter, ins: &[TransferableInput], codec: CodecId) {
    w.write_u32_be(ins.len() as u32);
    for input in sorted_refs(ins) {
        input.write_to(w, codec);
    }
}

/// References to `ins` in canonical order, the order signatures are produced in.
pub(crate) fn sorted_refs(ins: &[TransferableInput]) -> Vec<&TransferableInput> {
    let mut refs: Vec<&TransferableInput> = ins.iter().collect();
    refs.sort_by(|a, b| a.utxo_id.cmp(&b.utxo_id));
    refs
}

pub(crate) fn read_inputs(r: &mut AvmReader, codec: CodecId) -> Result<Vec<TransferableInput>> {
    let count = r.read_u32_be()? as usize;
    let mut ins = Vec::with_capacity(count.min(r.remaining() / 84));
    for _ in 0..count {
        ins.push(TransferableInput::read_from(r, codec)?);
    }
    Ok(ins)
}

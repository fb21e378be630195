//! The fields every transaction shares.

use avm_primitives::util::{AvmReader, AvmWriter};
use avm_primitives::{Id, KeySource};

use crate::constants::CodecId;
use crate::credential::{Credential, CredentialKind};
use crate::error::Result;
use crate::input::{read_inputs, sort_transferable_inputs, sorted_refs, write_sorted_inputs, TransferableInput};
use crate::output::{read_outputs, sort_transferable_outputs, write_sorted_outputs, TransferableOutput};

/// A plain transfer, and the leading fields of every other transaction kind.
///
/// # Wire format
///
/// | Field        | Size                       |
/// |--------------|----------------------------|
/// | networkID    | 4 bytes (BE)               |
/// | blockchainID | 32 bytes                   |
/// | output count | 4 bytes (BE)               |
/// | outputs      | variable, sorted by bytes  |
/// | input count  | 4 bytes (BE)               |
/// | inputs       | variable, sorted by UTXO   |
/// | memo length  | 4 bytes (BE)               |
/// | memo         | variable                   |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseTx {
    codec_id: CodecId,
    pub network_id: u32,
    pub blockchain_id: Id,
    pub outs: Vec<TransferableOutput>,
    pub ins: Vec<TransferableInput>,
    pub memo: Vec<u8>,
}

impl BaseTx {
    /// Create a base transaction under codec 0.
    ///
    /// Outputs and inputs are stored in canonical order so that a decoded
    /// copy compares equal to the original.
    pub fn new(
        network_id: u32,
        blockchain_id: Id,
        outs: Vec<TransferableOutput>,
        ins: Vec<TransferableInput>,
        memo: Vec<u8>,
    ) -> Self {
        let mut tx = BaseTx {
            codec_id: CodecId::Zero,
            network_id,
            blockchain_id,
            outs,
            ins,
            memo,
        };
        tx.canonicalize();
        tx
    }

    pub fn codec_id(&self) -> CodecId {
        self.codec_id
    }

    /// Switch codec version.
    ///
    /// # Returns
    /// `CodecId` error unless `id` is 0 or 1.
    pub fn set_codec_id(&mut self, id: u16) -> Result<()> {
        self.codec_id = CodecId::try_from(id)?;
        Ok(())
    }

    pub(crate) fn with_codec(mut self, codec_id: CodecId) -> Self {
        self.codec_id = codec_id;
        self
    }

    /// Re-sort outputs and inputs after direct field edits.
    pub fn canonicalize(&mut self) {
        sort_transferable_outputs(&mut self.outs, self.codec_id);
        sort_transferable_inputs(&mut self.ins);
    }

    pub(crate) fn write_to(&self, w: &mut AvmWriter) {
        w.write_u32_be(self.network_id);
        w.write_bytes(self.blockchain_id.as_bytes());
        write_sorted_outputs(w, &self.outs, self.codec_id);
        write_sorted_inputs(w, &self.ins, self.codec_id);
        w.write_u32_prefixed(&self.memo);
    }

    pub(crate) fn read_from(r: &mut AvmReader, codec_id: CodecId) -> Result<Self> {
        let network_id = r.read_u32_be()?;
        let blockchain_id = Id::new(r.read_array()?);
        let outs = read_outputs(r, codec_id)?;
        let ins = read_inputs(r, codec_id)?;
        let memo = r.read_u32_prefixed()?.to_vec();
        Ok(BaseTx {
            codec_id,
            network_id,
            blockchain_id,
            outs,
            ins,
            memo,
        })
    }

    /// One SECP credential per input, inputs taken in canonical order.
    pub(crate) fn sign_inputs(&self, msg: &[u8], keys: &dyn KeySource) -> Result<Vec<Credential>> {
        sign_inputs(&self.ins, msg, keys)
    }
}

pub(crate) fn sign_inputs(
    ins: &[TransferableInput],
    msg: &[u8],
    keys: &dyn KeySource,
) -> Result<Vec<Credential>> {
    sorted_refs(ins)
        .into_iter()
        .map(|input| Credential::sign_slots(CredentialKind::Secp, input.input.sig_idxs(), msg, keys))
        .collect()
}

//! Operations on mint authorities and NFTs.

use avm_primitives::util::{AvmReader, AvmWriter};
use avm_primitives::KeySource;

use crate::constants::CodecId;
use crate::credential::Credential;
use crate::error::Result;
use crate::operation::{read_operations, sorted_refs, write_sorted_operations, TransferableOperation};
use crate::tx::base::BaseTx;

/// Base fields plus a list of operations.
///
/// Wire: base fields, opCount(4), operations sorted by their bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperationTx {
    pub base: BaseTx,
    pub ops: Vec<TransferableOperation>,
}

impl OperationTx {
    pub fn new(base: BaseTx, ops: Vec<TransferableOperation>) -> Self {
        let codec = base.codec_id();
        let mut tx = OperationTx { base, ops };
        tx.ops.sort_by_cached_key(|op| op.to_bytes(codec));
        tx
    }

    pub(crate) fn write_to(&self, w: &mut AvmWriter) {
        self.base.write_to(w);
        write_sorted_operations(w, &self.ops, self.base.codec_id());
    }

    pub(crate) fn read_from(r: &mut AvmReader, codec: CodecId) -> Result<Self> {
        let base = BaseTx::read_from(r, codec)?;
        let ops = read_operations(r, codec)?;
        Ok(OperationTx { base, ops })
    }

    /// Base input credentials first, then one per operation in canonical order.
    pub(crate) fn sign(&self, msg: &[u8], keys: &dyn KeySource) -> Result<Vec<Credential>> {
        let mut creds = self.base.sign_inputs(msg, keys)?;
        for op in sorted_refs(&self.ops, self.base.codec_id()) {
            creds.push(Credential::sign_slots(
                op.operation.credential_kind(),
                op.operation.sig_idxs(),
                msg,
                keys,
            )?);
        }
        Ok(creds)
    }
}

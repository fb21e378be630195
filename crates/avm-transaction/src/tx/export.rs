//! Exports to another chain's shared memory.

use avm_primitives::util::{AvmReader, AvmWriter};
use avm_primitives::Id;

use crate::constants::CodecId;
use crate::error::{Result, TransactionError};
use crate::output::{read_outputs, sort_transferable_outputs, write_sorted_outputs, TransferableOutput};
use crate::tx::base::BaseTx;

/// Base fields plus outputs placed in `destination_chain`'s shared memory.
///
/// Wire: base fields, destinationChain(32), outCount(4), outputs sorted by bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportTx {
    pub base: BaseTx,
    pub destination_chain: Option<Id>,
    pub export_outs: Vec<TransferableOutput>,
}

impl ExportTx {
    /// Create the transaction. A missing destination is only reported when serializing.
    pub fn new(
        base: BaseTx,
        destination_chain: Option<Id>,
        export_outs: Vec<TransferableOutput>,
    ) -> Self {
        let mut export_outs = export_outs;
        sort_transferable_outputs(&mut export_outs, base.codec_id());
        ExportTx {
            base,
            destination_chain,
            export_outs,
        }
    }

    pub(crate) fn write_to(&self, w: &mut AvmWriter) -> Result<()> {
        let destination = self.destination_chain.ok_or_else(|| {
            TransactionError::ChainId("export transaction has no destination chain".to_string())
        })?;
        self.base.write_to(w);
        w.write_bytes(destination.as_bytes());
        write_sorted_outputs(w, &self.export_outs, self.base.codec_id());
        Ok(())
    }

    pub(crate) fn read_from(r: &mut AvmReader, codec: CodecId) -> Result<Self> {
        let base = BaseTx::read_from(r, codec)?;
        let destination = Id::new(r.read_array()?);
        let export_outs = read_outputs(r, codec)?;
        Ok(ExportTx {
            base,
            destination_chain: Some(destination),
            export_outs,
        })
    }
}

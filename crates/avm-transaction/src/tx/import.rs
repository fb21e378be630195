//! Imports from another chain's shared memory.

use avm_primitives::util::{AvmReader, AvmWriter};
use avm_primitives::{Id, KeySource};

use crate::constants::CodecId;
use crate::credential::Credential;
use crate::error::{Result, TransactionError};
use crate::input::{read_inputs, sort_transferable_inputs, write_sorted_inputs, TransferableInput};
use crate::tx::base::{sign_inputs, BaseTx};

/// Base fields plus inputs consuming UTXOs exported by `source_chain`.
///
/// Wire: base fields, sourceChain(32), inCount(4), inputs sorted by UTXO.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportTx {
    pub base: BaseTx,
    pub source_chain: Option<Id>,
    pub import_ins: Vec<TransferableInput>,
}

impl ImportTx {
    /// Create the transaction. A missing source chain is only reported when serializing.
    pub fn new(base: BaseTx, source_chain: Option<Id>, import_ins: Vec<TransferableInput>) -> Self {
        let mut import_ins = import_ins;
        sort_transferable_inputs(&mut import_ins);
        ImportTx {
            base,
            source_chain,
            import_ins,
        }
    }

    pub(crate) fn write_to(&self, w: &mut AvmWriter) -> Result<()> {
        let source_chain = self.source_chain.ok_or_else(|| {
            TransactionError::ChainId("import transaction has no source chain".to_string())
        })?;
        self.base.write_to(w);
        w.write_bytes(source_chain.as_bytes());
        write_sorted_inputs(w, &self.import_ins, self.base.codec_id());
        Ok(())
    }

    pub(crate) fn read_from(r: &mut AvmReader, codec: CodecId) -> Result<Self> {
        let base = BaseTx::read_from(r, codec)?;
        let source_chain = Id::new(r.read_array()?);
        let import_ins = read_inputs(r, codec)?;
        Ok(ImportTx {
            base,
            source_chain: Some(source_chain),
            import_ins,
        })
    }

    /// Base input credentials first, then one per imported input.
    pub(crate) fn sign(&self, msg: &[u8], keys: &dyn KeySource) -> Result<Vec<Credential>> {
        let mut creds = self.base.sign_inputs(msg, keys)?;
        creds.extend(sign_inputs(&self.import_ins, msg, keys)?);
        Ok(creds)
    }
}

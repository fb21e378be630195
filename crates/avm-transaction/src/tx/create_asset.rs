//! Asset creation.

use avm_primitives::util::{AvmReader, AvmWriter};
use tracing::warn;

use crate::constants::{CodecId, MAX_DENOMINATION};
use crate::error::{Result, TransactionError};
use crate::initial_states::InitialStates;
use crate::tx::base::BaseTx;

/// Creates a new asset with a name, symbol, denomination and initial outputs.
///
/// Wire: base fields, nameLen(2) name, symbolLen(2) symbol,
/// denomination(1), initial states.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateAssetTx {
    pub base: BaseTx,
    pub name: String,
    pub symbol: String,
    pub denomination: u8,
    pub initial_states: InitialStates,
}

impl CreateAssetTx {
    /// Create the transaction.
    ///
    /// A denomination above 32 leaves every asset field empty instead of
    /// failing; the resulting transaction carries only the base fields.
    pub fn new(
        base: BaseTx,
        name: String,
        symbol: String,
        denomination: u8,
        initial_states: InitialStates,
    ) -> Self {
        if denomination > MAX_DENOMINATION {
            warn!(denomination, "denomination out of range, asset fields left empty");
            return CreateAssetTx {
                base,
                name: String::new(),
                symbol: String::new(),
                denomination: 0,
                initial_states: InitialStates::new(),
            };
        }
        CreateAssetTx {
            base,
            name,
            symbol,
            denomination,
            initial_states,
        }
    }

    pub(crate) fn write_to(&self, w: &mut AvmWriter) {
        self.base.write_to(w);
        self.write_asset_fields(w, self.base.codec_id());
    }

    pub(crate) fn write_asset_fields(&self, w: &mut AvmWriter, codec: CodecId) {
        w.write_u16_prefixed(self.name.as_bytes());
        w.write_u16_prefixed(self.symbol.as_bytes());
        w.write_u8(self.denomination);
        self.initial_states.write_to(w, codec);
    }

    pub(crate) fn read_from(r: &mut AvmReader, codec: CodecId) -> Result<Self> {
        let base = BaseTx::read_from(r, codec)?;
        Self::read_asset_fields(r, base, codec)
    }

    pub(crate) fn read_asset_fields(r: &mut AvmReader, base: BaseTx, codec: CodecId) -> Result<Self> {
        let name = read_string(r)?;
        let symbol = read_string(r)?;
        let denomination = r.read_u8()?;
        let initial_states = InitialStates::read_from(r, codec)?;
        Ok(CreateAssetTx {
            base,
            name,
            symbol,
            denomination,
            initial_states,
        })
    }
}

fn read_string(r: &mut AvmReader) -> Result<String> {
    let bytes = r.read_u16_prefixed()?;
    String::from_utf8(bytes.to_vec()).map_err(|e| TransactionError::Serialization(e.to_string()))
}

//! Assets declared in a chain's genesis data.

use avm_primitives::util::{AvmReader, AvmWriter};
use avm_primitives::Id;

use crate::constants::CodecId;
use crate::error::{Result, TransactionError};
use crate::initial_states::InitialStates;
use crate::tx::base::BaseTx;
use crate::tx::create_asset::CreateAssetTx;

/// A [`CreateAssetTx`] with an alias, a zero blockchain ID and no inputs
/// or outputs. It is never signed.
///
/// Wire: aliasLen(2) alias, networkID(4), 32 zero bytes, outCount=0(4),
/// inCount=0(4), memoLen(4) memo, then the asset fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenesisAsset {
    pub asset_alias: String,
    pub create_asset: CreateAssetTx,
}

impl GenesisAsset {
    pub fn new(
        asset_alias: String,
        network_id: u32,
        memo: Vec<u8>,
        name: String,
        symbol: String,
        denomination: u8,
        initial_states: InitialStates,
    ) -> Self {
        let base = BaseTx::new(network_id, Id::ZERO, Vec::new(), Vec::new(), memo);
        GenesisAsset {
            asset_alias,
            create_asset: CreateAssetTx::new(base, name, symbol, denomination, initial_states),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut w = AvmWriter::new();
        w.write_u16_prefixed(self.asset_alias.as_bytes());
        self.create_asset.write_to(&mut w);
        w.into_bytes()
    }

    /// Decode a genesis asset. The blockchain ID, outputs and inputs must be empty.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut r = AvmReader::new(bytes);
        let alias = r.read_u16_prefixed()?;
        let asset_alias = String::from_utf8(alias.to_vec())
            .map_err(|e| TransactionError::Serialization(e.to_string()))?;
        let create_asset = CreateAssetTx::read_from(&mut r, CodecId::Zero)?;
        let base = &create_asset.base;
        if !base.blockchain_id.is_zero() || !base.outs.is_empty() || !base.ins.is_empty() {
            return Err(TransactionError::Serialization(
                "genesis asset must not carry a blockchain id, inputs or outputs".to_string(),
            ));
        }
        if r.remaining() != 0 {
            return Err(TransactionError::Serialization(format!(
                "trailing {} bytes after genesis asset",
                r.remaining()
            )));
        }
        Ok(GenesisAsset {
            asset_alias,
            create_asset,
        })
    }
}

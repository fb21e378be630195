/// AVM SDK - Transaction model, UTXO selection and signing.
///
/// Provides the tagged input/output/operation types of both codec
/// versions, the five signable transaction kinds with their binary
/// encoding, an insertion-ordered UTXO set with deterministic coin
/// selection and transaction builders, and DAG vertices.

pub mod constants;
pub mod network;
pub mod credential;
pub mod output;
pub mod input;
pub mod operation;
pub mod initial_states;
pub mod tx;
pub mod utxo;
pub mod asset_amount;
pub mod utxo_set;
pub mod vertex;

mod error;
pub use error::{Result, TransactionError};
pub use constants::{CodecId, TxKind, TypeKind};
pub use network::{BuildContext, NetworkConfig};
pub use credential::{Credential, CredentialKind, SigIdx};
pub use output::{Output, OutputOwners, TransferableOutput};
pub use input::{SecpTransferInput, TransferableInput};
pub use operation::{Operation, TransferableOperation, UtxoId};
pub use initial_states::InitialStates;
pub use tx::{BaseTx, CreateAssetTx, ExportTx, GenesisAsset, ImportTx, OperationTx, Transaction, Tx, UnsignedTx};
pub use utxo::Utxo;
pub use asset_amount::{AssetAmount, AssetAmountDestination};
pub use utxo_set::{MinterSet, SpendOptions, UtxoSet};
pub use vertex::Vertex;

#[cfg(test)]
mod tests;

//! UTXO references and operations.
//!
//! Operations consume UTXOs that are not plain amounts: mint authorities
//! and NFTs. A [`TransferableOperation`] names the asset, the UTXOs it
//! consumes and the operation to apply.

use std::fmt;
use std::str::FromStr;

use avm_primitives::cb58;
use avm_primitives::util::{AvmReader, AvmWriter};
use avm_primitives::{Address, Id, PrimitivesError};

use crate::constants::{CodecId, TypeKind};
use crate::credential::{read_sig_idxs, write_sig_idxs, CredentialKind, SigIdx};
use crate::error::{Result, TransactionError};
use crate::output::{NftTransferOutput, OutputOwners, SecpMintOutput, SecpTransferOutput};

// ---------------------------------------------------------------------------
// UtxoId
// ---------------------------------------------------------------------------

/// Identity of a UTXO: the producing transaction and the output's index in it.
///
/// Displays as plain Base58 (no checksum) of the 36 bytes `txID || outputIndex`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UtxoId {
    pub tx_id: Id,
    pub output_index: u32,
}

impl UtxoId {
    pub fn new(tx_id: Id, output_index: u32) -> Self {
        UtxoId { tx_id, output_index }
    }

    pub fn to_bytes(&self) -> [u8; 36] {
        let mut out = [0u8; 36];
        out[..32].copy_from_slice(self.tx_id.as_bytes());
        out[32..].copy_from_slice(&self.output_index.to_be_bytes());
        out
    }

    pub(crate) fn write_to(&self, w: &mut AvmWriter) {
        w.write_bytes(&self.to_bytes());
    }

    pub(crate) fn read_from(r: &mut AvmReader) -> Result<Self> {
        let tx_id = Id::new(r.read_array()?);
        let output_index = r.read_u32_be()?;
        Ok(UtxoId { tx_id, output_index })
    }
}

impl fmt::Display for UtxoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&cb58::encode(&self.to_bytes()))
    }
}

impl FromStr for UtxoId {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = cb58::decode(s)?;
        if bytes.len() != 36 {
            return Err(PrimitivesError::InvalidLength {
                expected: 36,
                got: bytes.len(),
            }
            .into());
        }
        UtxoId::read_from(&mut AvmReader::new(&bytes))
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Spend a mint authority to mint fungible units and re-create the authority.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecpMintOperation {
    sig_idxs: Vec<SigIdx>,
    pub mint_output: SecpMintOutput,
    pub transfer_output: SecpTransferOutput,
}

impl SecpMintOperation {
    pub fn new(mint_output: SecpMintOutput, transfer_output: SecpTransferOutput) -> Self {
        SecpMintOperation {
            sig_idxs: Vec::new(),
            mint_output,
            transfer_output,
        }
    }
}

/// Spend an NFT mint authority to create a token for each owner group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NftMintOperation {
    sig_idxs: Vec<SigIdx>,
    pub group_id: u32,
    pub payload: Vec<u8>,
    pub owners: Vec<OutputOwners>,
}

impl NftMintOperation {
    pub fn new(group_id: u32, payload: Vec<u8>, owners: Vec<OutputOwners>) -> Self {
        NftMintOperation {
            sig_idxs: Vec::new(),
            group_id,
            payload,
            owners,
        }
    }
}

/// Move an NFT to new owners.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NftTransferOperation {
    sig_idxs: Vec<SigIdx>,
    pub output: NftTransferOutput,
}

impl NftTransferOperation {
    pub fn new(output: NftTransferOutput) -> Self {
        NftTransferOperation {
            sig_idxs: Vec::new(),
            output,
        }
    }
}

/// Any operation, selected on the wire by its type tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    SecpMint(SecpMintOperation),
    NftMint(NftMintOperation),
    NftTransfer(NftTransferOperation),
}

impl Operation {
    pub fn kind(&self) -> TypeKind {
        match self {
            Operation::SecpMint(_) => TypeKind::SecpMintOperation,
            Operation::NftMint(_) => TypeKind::NftMintOperation,
            Operation::NftTransfer(_) => TypeKind::NftTransferOperation,
        }
    }

    /// The credential kind that secures this operation.
    pub fn credential_kind(&self) -> CredentialKind {
        match self {
            Operation::SecpMint(_) => CredentialKind::Secp,
            _ => CredentialKind::Nft,
        }
    }

    pub fn sig_idxs(&self) -> &[SigIdx] {
        match self {
            Operation::SecpMint(op) => &op.sig_idxs,
            Operation::NftMint(op) => &op.sig_idxs,
            Operation::NftTransfer(op) => &op.sig_idxs,
        }
    }

    /// Append a signature slot. Slots are signed in the order they are added.
    pub fn add_signature_idx(&mut self, address_index: u32, address: Address) {
        let slot = SigIdx::new(address_index, address);
        match self {
            Operation::SecpMint(op) => op.sig_idxs.push(slot),
            Operation::NftMint(op) => op.sig_idxs.push(slot),
            Operation::NftTransfer(op) => op.sig_idxs.push(slot),
        }
    }

    fn write_body(&self, w: &mut AvmWriter) {
        write_sig_idxs(w, self.sig_idxs());
        match self {
            Operation::SecpMint(op) => {
                op.mint_output.owners.write_to(w);
                w.write_u64_be(op.transfer_output.amount);
                op.transfer_output.owners.write_to(w);
            }
            Operation::NftMint(op) => {
                w.write_u32_be(op.group_id);
                w.write_u32_prefixed(&op.payload);
                w.write_u32_be(op.owners.len() as u32);
                for owners in &op.owners {
                    owners.write_to(w);
                }
            }
            Operation::NftTransfer(op) => op.output.write_body(w),
        }
    }

    fn read_body(r: &mut AvmReader, kind: TypeKind, type_id: u32, codec: CodecId) -> Result<Self> {
        let sig_idxs = read_sig_idxs(r)?;
        match kind {
            TypeKind::SecpMintOperation => {
                let mint_output = SecpMintOutput::new(OutputOwners::read_from(r)?);
                let amount = r.read_u64_be()?;
                let transfer_output = SecpTransferOutput::new(amount, OutputOwners::read_from(r)?);
                Ok(Operation::SecpMint(SecpMintOperation {
                    sig_idxs,
                    mint_output,
                    transfer_output,
                }))
            }
            TypeKind::NftMintOperation => {
                let group_id = r.read_u32_be()?;
                let payload = r.read_u32_prefixed()?.to_vec();
                let count = r.read_u32_be()? as usize;
                let mut owners = Vec::with_capacity(count.min(r.remaining() / 16));
                for _ in 0..count {
                    owners.push(OutputOwners::read_from(r)?);
                }
                Ok(Operation::NftMint(NftMintOperation {
                    sig_idxs,
                    group_id,
                    payload,
                    owners,
                }))
            }
            TypeKind::NftTransferOperation => Ok(Operation::NftTransfer(NftTransferOperation {
                sig_idxs,
                output: NftTransferOutput::read_body(r)?,
            })),
            _ => Err(TypeKind::unexpected(type_id, codec)),
        }
    }
}

// ---------------------------------------------------------------------------
// TransferableOperation
// ---------------------------------------------------------------------------

/// An operation on specific UTXOs of one asset.
///
/// Wire: assetID(32) utxoIDCount(4) utxoIDs(36 each, sorted) typeID(4) body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferableOperation {
    pub asset_id: Id,
    pub utxo_ids: Vec<UtxoId>,
    pub operation: Operation,
}

impl TransferableOperation {
    /// Create an operation; UTXO IDs are sorted into canonical order.
    pub fn new(asset_id: Id, utxo_ids: Vec<UtxoId>, operation: Operation) -> Self {
        let mut utxo_ids = utxo_ids;
        utxo_ids.sort();
        TransferableOperation {
            asset_id,
            utxo_ids,
            operation,
        }
    }

    pub fn write_to(&self, w: &mut AvmWriter, codec: CodecId) {
        w.write_bytes(self.asset_id.as_bytes());
        let mut ids = self.utxo_ids.clone();
        ids.sort();
        w.write_u32_be(ids.len() as u32);
        for id in &ids {
            id.write_to(w);
        }
        w.write_u32_be(self.operation.kind().type_id(codec));
        self.operation.write_body(w);
    }

    pub fn read_from(r: &mut AvmReader, codec: CodecId) -> Result<Self> {
        let asset_id = Id::new(r.read_array()?);
        let count = r.read_u32_be()? as usize;
        let mut utxo_ids = Vec::with_capacity(count.min(r.remaining() / 36));
        for _ in 0..count {
            utxo_ids.push(UtxoId::read_from(r)?);
        }
        let type_id = r.read_u32_be()?;
        let kind = TypeKind::from_type_id(type_id, codec)?;
        let operation = Operation::read_body(r, kind, type_id, codec)?;
        Ok(TransferableOperation {
            asset_id,
            utxo_ids,
            operation,
        })
    }

    pub fn to_bytes(&self, codec: CodecId) -> Vec<u8> {
        let mut w = AvmWriter::new();
        self.write_to(&mut w, codec);
        w.into_bytes()
    }
}

/// References to `ops` in canonical order: by their encoded bytes.
pub(crate) fn sorted_refs(ops: &[TransferableOperation], codec: CodecId) -> Vec<&TransferableOperation> {
    let mut refs: Vec<(Vec<u8>, &TransferableOperation)> =
        ops.iter().map(|op| (op.to_bytes(codec), op)).collect();
    refs.sort_by(|a, b| a.0.cmp(&b.0));
    refs.into_iter().map(|(_, op)| op).collect()
}

pub(crate) fn write_sorted_operations(w: &mut AvmWriter, ops: &[TransferableOperation], codec: CodecId) {
    w.write_u32_be(ops.len() as u32);
    for op in sorted_refs(ops, codec) {
        op.write_to(w, codec);
    }
}

pub(crate) fn read_operations(r: &mut AvmReader, codec: CodecId) -> Result<Vec<TransferableOperation>> {
    let count = r.read_u32_be()? as usize;
    let mut ops = Vec::with_capacity(count.min(r.remaining() / 44));
    for _ in 0..count {
        ops.push(TransferableOperation::read_from(r, codec)?);
    }
    Ok(ops)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owners(b: u8) -> OutputOwners {
        OutputOwners::new(vec![Address::new([b; 20])], 0, 1).unwrap()
    }

    #[test]
    fn test_utxo_id_string() {
        let id = UtxoId::new(Id::ZERO, 1);
        let s = id.to_string();
        assert_eq!(s, cb58::encode(&id.to_bytes()));
        assert_eq!(s.parse::<UtxoId>().unwrap(), id);
        assert!("111".parse::<UtxoId>().is_err());
    }

    #[test]
    fn test_secp_mint_operation_roundtrip() {
        let mut op = Operation::SecpMint(SecpMintOperation::new(
            SecpMintOutput::new(owners(1)),
            SecpTransferOutput::new(42, owners(2)),
        ));
        op.add_signature_idx(0, Address::new([1; 20]));
        let xfer = TransferableOperation::new(
            Id::new([5; 32]),
            vec![UtxoId::new(Id::new([9; 32]), 1), UtxoId::new(Id::new([8; 32]), 0)],
            op,
        );
        assert_eq!(xfer.utxo_ids[0].tx_id, Id::new([8; 32]));

        let bytes = xfer.to_bytes(CodecId::Zero);
        // assetID + count + 2 utxo ids, then the tag.
        assert_eq!(&bytes[32 + 4 + 72..32 + 4 + 72 + 4], &[0, 0, 0, 8]);
        let back = TransferableOperation::read_from(&mut AvmReader::new(&bytes), CodecId::Zero).unwrap();
        assert_eq!(back.to_bytes(CodecId::Zero), bytes);
        assert_eq!(back.operation.credential_kind(), CredentialKind::Secp);
    }

    #[test]
    fn test_nft_operations_roundtrip() {
        let ops = vec![
            Operation::NftMint(NftMintOperation::new(3, b"hello".to_vec(), vec![owners(1), owners(2)])),
            Operation::NftTransfer(NftTransferOperation::new(NftTransferOutput::new(
                3,
                b"hello".to_vec(),
                owners(4),
            ))),
        ];
        for op in ops {
            let xfer = TransferableOperation::new(Id::ZERO, vec![UtxoId::new(Id::ZERO, 0)], op);
            for codec in [CodecId::Zero, CodecId::One] {
                let bytes = xfer.to_bytes(codec);
                let back = TransferableOperation::read_from(&mut AvmReader::new(&bytes), codec).unwrap();
                assert_eq!(back.to_bytes(codec), bytes);
                assert_eq!(back.operation.credential_kind(), CredentialKind::Nft);
            }
        }
    }

    #[test]
    fn test_output_tag_is_not_an_operation() {
        let xfer = TransferableOperation::new(
            Id::ZERO,
            vec![],
            Operation::NftTransfer(NftTransferOperation::new(NftTransferOutput::new(
                0,
                vec![],
                owners(1),
            ))),
        );
        let mut bytes = xfer.to_bytes(CodecId::Zero);
        // Overwrite the tag with the NFT transfer *output* tag.
        bytes[36..40].copy_from_slice(&11u32.to_be_bytes());
        assert!(matches!(
            TransferableOperation::read_from(&mut AvmReader::new(&bytes), CodecId::Zero),
            Err(TransactionError::UnknownTypeId { type_id: 11, .. })
        ));
    }
}

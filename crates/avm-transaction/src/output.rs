//! Outputs and their ownership conditions.
//!
//! Every output kind embeds an [`OutputOwners`]: a locktime, a signature
//! threshold and a sorted list of owner addresses. Only
//! [`SecpTransferOutput`] carries an amount, so it is the only kind coin
//! selection can spend.
//!
//! # Wire format
//!
//! | Kind                 | Body                                              |
//! |----------------------|---------------------------------------------------|
//! | OutputOwners         | locktime(8) threshold(4) count(4) addresses(20 ea)|
//! | SecpTransferOutput   | amount(8) owners                                  |
//! | SecpMintOutput       | owners                                            |
//! | NftTransferOutput    | groupID(4) payloadLen(4) payload owners           |
//! | NftMintOutput        | groupID(4) owners                                 |
//! | TransferableOutput   | assetID(32) typeID(4) body                        |

use avm_primitives::ids::ADDRESS_LEN;
use avm_primitives::util::{AvmReader, AvmWriter};
use avm_primitives::{Address, Id};

use crate::constants::{CodecId, TypeKind};
use crate::error::{Result, TransactionError};

// ---------------------------------------------------------------------------
// OutputOwners
// ---------------------------------------------------------------------------

/// Who may spend an output, and from when.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct OutputOwners {
    locktime: u64,
    threshold: u32,
    addresses: Vec<Address>,
}

impl OutputOwners {
    /// Create owners, sorting the addresses into canonical order.
    ///
    /// # Arguments
    /// * `addresses` - Owner addresses, in any order.
    /// * `locktime` - Unix time before which the output cannot be spent.
    /// * `threshold` - Number of owner signatures required.
    ///
    /// # Returns
    /// `Threshold` if more signers are required than there are addresses.
    pub fn new(addresses: Vec<Address>, locktime: u64, threshold: u32) -> Result<Self> {
        if threshold as usize > addresses.len() {
            return Err(TransactionError::Threshold {
                threshold,
                addresses: addresses.len(),
            });
        }
        let mut addresses = addresses;
        addresses.sort();
        Ok(OutputOwners {
            locktime,
            threshold,
            addresses,
        })
    }

    pub fn locktime(&self) -> u64 {
        self.locktime
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    /// Position of `address` in the owner list.
    pub fn address_index(&self, address: &Address) -> Option<u32> {
        self.addresses.iter().position(|a| a == address).map(|i| i as u32)
    }

    /// Whether `address` is one of the owners.
    pub fn owned_by(&self, address: &Address) -> bool {
        self.addresses.contains(address)
    }

    /// Owners among `candidates` that can sign at `as_of`, up to the threshold.
    ///
    /// Returns nothing while the output is still locked (`as_of <= locktime`).
    /// Otherwise owners are taken in owner-list order.
    pub fn get_spenders(&self, candidates: &[Address], as_of: u64) -> Vec<Address> {
        if as_of <= self.locktime {
            return Vec::new();
        }
        self.addresses
            .iter()
            .filter(|a| candidates.contains(a))
            .take(self.threshold as usize)
            .copied()
            .collect()
    }

    /// Whether `candidates` can satisfy the threshold at `as_of`.
    pub fn meets_threshold(&self, candidates: &[Address], as_of: u64) -> bool {
        self.get_spenders(candidates, as_of).len() >= self.threshold as usize
    }

    pub(crate) fn write_to(&self, w: &mut AvmWriter) {
        w.write_u64_be(self.locktime);
        w.write_u32_be(self.threshold);
        w.write_u32_be(self.addresses.len() as u32);
        for a in &self.addresses {
            w.write_bytes(a.as_bytes());
        }
    }

    pub(crate) fn read_from(r: &mut AvmReader) -> Result<Self> {
        let locktime = r.read_u64_be()?;
        let threshold = r.read_u32_be()?;
        let count = r.read_u32_be()? as usize;
        let mut addresses = Vec::with_capacity(count.min(r.remaining() / ADDRESS_LEN));
        for _ in 0..count {
            addresses.push(Address::new(r.read_array()?));
        }
        if threshold as usize > addresses.len() {
            return Err(TransactionError::Threshold {
                threshold,
                addresses: addresses.len(),
            });
        }
        // Decoded order is kept as-is so the bytes round-trip.
        Ok(OutputOwners {
            locktime,
            threshold,
            addresses,
        })
    }
}

// ---------------------------------------------------------------------------
// Output kinds
// ---------------------------------------------------------------------------

/// A fungible amount of an asset.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SecpTransferOutput {
    pub amount: u64,
    pub owners: OutputOwners,
}

impl SecpTransferOutput {
    pub fn new(amount: u64, owners: OutputOwners) -> Self {
        SecpTransferOutput { amount, owners }
    }
}

/// Authority to mint more of a fungible asset.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SecpMintOutput {
    pub owners: OutputOwners,
}

impl SecpMintOutput {
    pub fn new(owners: OutputOwners) -> Self {
        SecpMintOutput { owners }
    }
}

/// One non-fungible token of a group.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NftTransferOutput {
    pub group_id: u32,
    pub payload: Vec<u8>,
    pub owners: OutputOwners,
}

impl NftTransferOutput {
    pub fn new(group_id: u32, payload: Vec<u8>, owners: OutputOwners) -> Self {
        NftTransferOutput {
            group_id,
            payload,
            owners,
        }
    }

    pub(crate) fn write_body(&self, w: &mut AvmWriter) {
        w.write_u32_be(self.group_id);
        w.write_u32_prefixed(&self.payload);
        self.owners.write_to(w);
    }

    pub(crate) fn read_body(r: &mut AvmReader) -> Result<Self> {
        let group_id = r.read_u32_be()?;
        let payload = r.read_u32_prefixed()?.to_vec();
        let owners = OutputOwners::read_from(r)?;
        Ok(NftTransferOutput {
            group_id,
            payload,
            owners,
        })
    }
}

/// Authority to mint tokens of one NFT group.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NftMintOutput {
    pub group_id: u32,
    pub owners: OutputOwners,
}

impl NftMintOutput {
    pub fn new(group_id: u32, owners: OutputOwners) -> Self {
        NftMintOutput { group_id, owners }
    }
}

/// Any output, selected on the wire by its type tag.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Output {
    SecpTransfer(SecpTransferOutput),
    SecpMint(SecpMintOutput),
    NftTransfer(NftTransferOutput),
    NftMint(NftMintOutput),
}

impl Output {
    pub fn kind(&self) -> TypeKind {
        match self {
            Output::SecpTransfer(_) => TypeKind::SecpTransferOutput,
            Output::SecpMint(_) => TypeKind::SecpMintOutput,
            Output::NftTransfer(_) => TypeKind::NftTransferOutput,
            Output::NftMint(_) => TypeKind::NftMintOutput,
        }
    }

    pub fn type_id(&self, codec: CodecId) -> u32 {
        self.kind().type_id(codec)
    }

    pub fn fx_id(&self) -> u32 {
        self.kind().fx_id()
    }

    pub fn owners(&self) -> &OutputOwners {
        match self {
            Output::SecpTransfer(o) => &o.owners,
            Output::SecpMint(o) => &o.owners,
            Output::NftTransfer(o) => &o.owners,
            Output::NftMint(o) => &o.owners,
        }
    }

    /// The amount, for the outputs that carry one.
    pub fn amount(&self) -> Option<u64> {
        match self {
            Output::SecpTransfer(o) => Some(o.amount),
            _ => None,
        }
    }

    pub(crate) fn write_body(&self, w: &mut AvmWriter) {
        match self {
            Output::SecpTransfer(o) => {
                w.write_u64_be(o.amount);
                o.owners.write_to(w);
            }
            Output::SecpMint(o) => o.owners.write_to(w),
            Output::NftTransfer(o) => o.write_body(w),
            Output::NftMint(o) => {
                w.write_u32_be(o.group_id);
                o.owners.write_to(w);
            }
        }
    }

    /// Serialize as `typeID(4) body`.
    pub fn write_to(&self, w: &mut AvmWriter, codec: CodecId) {
        w.write_u32_be(self.type_id(codec));
        self.write_body(w);
    }

    /// Deserialize a tagged output, dispatching on the type ID.
    ///
    /// # Returns
    /// `UnknownTypeId` if the tag is not an output kind under `codec`.
    pub fn read_from(r: &mut AvmReader, codec: CodecId) -> Result<Self> {
        let type_id = r.read_u32_be()?;
        match TypeKind::from_type_id(type_id, codec)? {
            TypeKind::SecpTransferOutput => {
                let amount = r.read_u64_be()?;
                let owners = OutputOwners::read_from(r)?;
                Ok(Output::SecpTransfer(SecpTransferOutput { amount, owners }))
            }
            TypeKind::SecpMintOutput => Ok(Output::SecpMint(SecpMintOutput {
                owners: OutputOwners::read_from(r)?,
            })),
            TypeKind::NftTransferOutput => Ok(Output::NftTransfer(NftTransferOutput::read_body(r)?)),
            TypeKind::NftMintOutput => {
                let group_id = r.read_u32_be()?;
                let owners = OutputOwners::read_from(r)?;
                Ok(Output::NftMint(NftMintOutput { group_id, owners }))
            }
            _ => Err(TypeKind::unexpected(type_id, codec)),
        }
    }

    /// Tagged bytes, the sort key among outputs of the same asset.
    pub fn to_bytes(&self, codec: CodecId) -> Vec<u8> {
        let mut w = AvmWriter::new();
        self.write_to(&mut w, codec);
        w.into_bytes()
    }
}

impl From<SecpTransferOutput> for Output {
    fn from(o: SecpTransferOutput) -> Self {
        Output::SecpTransfer(o)
    }
}

impl From<SecpMintOutput> for Output {
    fn from(o: SecpMintOutput) -> Self {
        Output::SecpMint(o)
    }
}

impl From<NftTransferOutput> for Output {
    fn from(o: NftTransferOutput) -> Self {
        Output::NftTransfer(o)
    }
}

impl From<NftMintOutput> for Output {
    fn from(o: NftMintOutput) -> Self {
        Output::NftMint(o)
    }
}

// ---------------------------------------------------------------------------
// TransferableOutput
// ---------------------------------------------------------------------------

/// An output paired with the asset it holds.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TransferableOutput {
    pub asset_id: Id,
    pub output: Output,
}

impl TransferableOutput {
    pub fn new(asset_id: Id, output: impl Into<Output>) -> Self {
        TransferableOutput {
            asset_id,
            output: output.into(),
        }
    }

    pub fn write_to(&self, w: &mut AvmWriter, codec: CodecId) {
        w.write_bytes(self.asset_id.as_bytes());
        self.output.write_to(w, codec);
    }

    pub fn read_from(r: &mut AvmReader, codec: CodecId) -> Result<Self> {
        let asset_id = Id::new(r.read_array()?);
        let output = Output::read_from(r, codec)?;
        Ok(TransferableOutput { asset_id, output })
    }

    pub fn to_bytes(&self, codec: CodecId) -> Vec<u8> {
        let mut w = AvmWriter::new();
        self.write_to(&mut w, codec);
        w.into_bytes()
    }
}

/// Sort outputs into the order the network requires: by their encoded bytes.
pub fn sort_transferable_outputs(outs: &mut [TransferableOutput], codec: CodecId) {
    outs.sort_by_cached_key(|o| o.to_bytes(codec));
}

/// Write `count(4)` followed by the outputs in canonical order.
pub(crate) fn write_sorted_outputs(w: &mut AvmWriter, outs: &[TransferableOutput], codec: CodecId) {
    let mut encoded: Vec<Vec<u8>> = outs.iter().map(|o| o.to_bytes(codec)).collect();
    encoded.sort();
    w.write_u32_be(encoded.len() as u32);
    for bytes in &encoded {
        w.write_bytes(bytes);
    }
}

pub(crate) fn read_outputs(r: &mut AvmReader, codec: CodecId) -> Result<Vec<TransferableOutput>> {
    let count = r.read_u32_be()? as usize;
    let mut outs = Vec::with_capacity(count.min(r.remaining() / 36));
    for _ in 0..count {
        outs.push(TransferableOutput::read_from(r, codec)?);
    }
    Ok(outs)
}

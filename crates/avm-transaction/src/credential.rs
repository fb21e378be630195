//! Signature slots and credentials.
//!
//! An input (or operation) lists `SigIdx` slots; each names a position in
//! the owner list of the output being spent. The matching credential holds
//! one signature per slot, in the same order.

use avm_primitives::ec::signature::{RecoverableSignature, SIGNATURE_LEN};
use avm_primitives::util::{AvmReader, AvmWriter};
use avm_primitives::{Address, KeySource};

use crate::constants::{CodecId, TypeKind};
use crate::error::{Result, TransactionError};

/// A signature slot: the index of an owner address plus the address itself.
///
/// Only the index goes on the wire. The address is local bookkeeping that
/// lets the signer find the right key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SigIdx {
    pub address_index: u32,
    pub source: Address,
}

impl SigIdx {
    pub fn new(address_index: u32, source: Address) -> Self {
        SigIdx { address_index, source }
    }
}

/// Write `count(4)` followed by each slot's index.
pub(crate) fn write_sig_idxs(w: &mut AvmWriter, sig_idxs: &[SigIdx]) {
    w.write_u32_be(sig_idxs.len() as u32);
    for s in sig_idxs {
        w.write_u32_be(s.address_index);
    }
}

/// Read slots written by [`write_sig_idxs`]. Source addresses are unknown after decoding.
pub(crate) fn read_sig_idxs(r: &mut AvmReader) -> Result<Vec<SigIdx>> {
    let count = r.read_u32_be()? as usize;
    let mut out = Vec::with_capacity(count.min(r.remaining() / 4));
    for _ in 0..count {
        out.push(SigIdx::new(r.read_u32_be()?, Address::default()));
    }
    Ok(out)
}

/// Which feature extension a credential belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CredentialKind {
    Secp,
    Nft,
}

impl CredentialKind {
    fn type_kind(self) -> TypeKind {
        match self {
            CredentialKind::Secp => TypeKind::SecpCredential,
            CredentialKind::Nft => TypeKind::NftCredential,
        }
    }
}

/// Ordered signatures securing one input or operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credential {
    pub kind: CredentialKind,
    pub signatures: Vec<RecoverableSignature>,
}

impl Credential {
    pub fn new(kind: CredentialKind) -> Self {
        Credential {
            kind,
            signatures: Vec::new(),
        }
    }

    /// Sign `msg` once per slot, resolving each slot's address through `keys`.
    ///
    /// # Returns
    /// The filled credential, or `MissingKey` for the first slot whose
    /// address `keys` cannot resolve.
    pub fn sign_slots(
        kind: CredentialKind,
        sig_idxs: &[SigIdx],
        msg: &[u8],
        keys: &dyn KeySource,
    ) -> Result<Self> {
        let mut cred = Credential::new(kind);
        for slot in sig_idxs {
            let pair = keys
                .get_key(&slot.source)
                .ok_or(TransactionError::MissingKey(slot.source))?;
            cred.signatures.push(pair.sign(msg)?);
        }
        Ok(cred)
    }

    /// The numeric tag of this credential under `codec`.
    pub fn type_id(&self, codec: CodecId) -> u32 {
        self.kind.type_kind().type_id(codec)
    }

    /// Serialize as `typeID(4) count(4) signatures(65 each)`.
    pub fn write_to(&self, w: &mut AvmWriter, codec: CodecId) {
        w.write_u32_be(self.type_id(codec));
        w.write_u32_be(self.signatures.len() as u32);
        for sig in &self.signatures {
            w.write_bytes(sig.as_bytes());
        }
    }

    /// Deserialize a tagged credential.
    pub fn read_from(r: &mut AvmReader, codec: CodecId) -> Result<Self> {
        let type_id = r.read_u32_be()?;
        let kind = match TypeKind::from_type_id(type_id, codec)? {
            TypeKind::SecpCredential => CredentialKind::Secp,
            TypeKind::NftCredential => CredentialKind::Nft,
            _ => return Err(TypeKind::unexpected(type_id, codec)),
        };
        let count = r.read_u32_be()? as usize;
        let mut signatures = Vec::with_capacity(count.min(r.remaining() / SIGNATURE_LEN));
        for _ in 0..count {
            signatures.push(RecoverableSignature::from_bytes(r.read_bytes(SIGNATURE_LEN)?)?);
        }
        Ok(Credential { kind, signatures })
    }
}

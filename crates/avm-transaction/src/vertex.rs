//! DAG vertices batching transactions for consensus.
//!
//! # Wire format
//!
//! | Field            | Size                              |
//! |------------------|-----------------------------------|
//! | codecID          | 2 bytes (BE)                      |
//! | blockchainID     | 32 bytes                          |
//! | height           | 8 bytes (BE)                      |
//! | epoch            | 4 bytes (BE, signed)              |
//! | parent count     | 4 bytes (BE)                      |
//! | parent IDs       | 32 bytes each                     |
//! | tx count         | 4 bytes (BE)                      |
//! | txs              | size(4) + signed tx bytes, each   |
//! | restriction count| 4 bytes (BE)                      |
//! | restrictions     | 32 bytes each                     |
//!
//! The restriction section is only read back when more than four bytes
//! follow the transactions. A buffer that ends at the transactions, or
//! right after the restriction count, decodes without restrictions.

use avm_primitives::hash::sha256;
use avm_primitives::util::{AvmReader, AvmWriter};
use avm_primitives::Id;

use crate::constants::CodecId;
use crate::error::Result;
use crate::tx::Tx;

/// A vertex of the transaction DAG.
///
/// `network_id` is not part of the encoding; decoders supply it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vertex {
    pub codec_id: CodecId,
    pub network_id: u32,
    pub blockchain_id: Id,
    pub height: u64,
    pub epoch: i32,
    pub parent_ids: Vec<Id>,
    pub txs: Vec<Tx>,
    pub restrictions: Vec<Id>,
}

impl Vertex {
    pub fn new(
        network_id: u32,
        blockchain_id: Id,
        height: u64,
        epoch: i32,
        parent_ids: Vec<Id>,
        txs: Vec<Tx>,
        restrictions: Vec<Id>,
    ) -> Self {
        Vertex {
            codec_id: CodecId::Zero,
            network_id,
            blockchain_id,
            height,
            epoch,
            parent_ids,
            txs,
            restrictions,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut w = AvmWriter::new();
        w.write_u16_be(self.codec_id.as_u16());
        w.write_bytes(self.blockchain_id.as_bytes());
        w.write_u64_be(self.height);
        w.write_i32_be(self.epoch);
        w.write_u32_be(self.parent_ids.len() as u32);
        for parent in &self.parent_ids {
            w.write_bytes(parent.as_bytes());
        }
        w.write_u32_be(self.txs.len() as u32);
        // Every tx carries its own size. With one tx this is the same as
        // reading "count, then skip 8 bytes"; with more it is not.
        for tx in &self.txs {
            w.write_u32_prefixed(&tx.to_bytes()?);
        }
        w.write_u32_be(self.restrictions.len() as u32);
        for id in &self.restrictions {
            w.write_bytes(id.as_bytes());
        }
        Ok(w.into_bytes())
    }

    /// Decode a vertex belonging to network `network_id`.
    pub fn from_bytes(network_id: u32, bytes: &[u8]) -> Result<Self> {
        let mut r = AvmReader::new(bytes);
        let codec_id = CodecId::try_from(r.read_u16_be()?)?;
        let blockchain_id = Id::new(r.read_array()?);
        let height = r.read_u64_be()?;
        let epoch = r.read_i32_be()?;
        let parent_ids = read_ids(&mut r)?;

        let tx_count = r.read_u32_be()? as usize;
        let mut txs = Vec::with_capacity(tx_count.min(r.remaining() / 4));
        for _ in 0..tx_count {
            txs.push(Tx::from_bytes(r.read_u32_prefixed()?)?);
        }

        let restrictions = if r.remaining() > 4 {
            read_ids(&mut r)?
        } else {
            Vec::new()
        };

        Ok(Vertex {
            codec_id,
            network_id,
            blockchain_id,
            height,
            epoch,
            parent_ids,
            txs,
            restrictions,
        })
    }

    /// SHA-256 of the encoded vertex.
    pub fn id(&self) -> Result<Id> {
        Ok(Id::new(sha256(&self.to_bytes()?)))
    }
}

fn read_ids(r: &mut AvmReader) -> Result<Vec<Id>> {
    let count = r.read_u32_be()? as usize;
    let mut ids = Vec::with_capacity(count.min(r.remaining() / 32));
    for _ in 0..count {
        ids.push(Id::new(r.read_array()?));
    }
    Ok(ids)
}

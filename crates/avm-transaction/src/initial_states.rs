//! Outputs an asset starts with, grouped by feature extension.
//!
//! Wire: fxCount(4), then for each fx in ascending ID order: fxID(4)
//! outputCount(4) and the tagged outputs sorted by their bytes.

use std::collections::BTreeMap;

use avm_primitives::util::{AvmReader, AvmWriter};

use crate::constants::CodecId;
use crate::error::{Result, TransactionError};
use crate::output::Output;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InitialStates {
    states: BTreeMap<u32, Vec<Output>>,
}

impl InitialStates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an output under its own feature extension.
    ///
    /// Each group is kept in canonical byte order, so a decoded copy
    /// compares equal to the original.
    pub fn add_output(&mut self, output: impl Into<Output>) {
        let output = output.into();
        let fx_id = output.fx_id();
        insert_sorted(self.states.entry(fx_id).or_default(), output);
    }

    /// Outputs registered for `fx_id`.
    pub fn outputs(&self, fx_id: u32) -> &[Output] {
        self.states.get(&fx_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn write_to(&self, w: &mut AvmWriter, codec: CodecId) {
        w.write_u32_be(self.states.len() as u32);
        for (fx_id, outputs) in &self.states {
            w.write_u32_be(*fx_id);
            w.write_u32_be(outputs.len() as u32);
            for output in outputs {
                w.write_bytes(&output.to_bytes(codec));
            }
        }
    }

    pub fn read_from(r: &mut AvmReader, codec: CodecId) -> Result<Self> {
        let fx_count = r.read_u32_be()?;
        let mut states = BTreeMap::new();
        for _ in 0..fx_count {
            let fx_id = r.read_u32_be()?;
            if states.contains_key(&fx_id) {
                return Err(TransactionError::Serialization(format!(
                    "duplicate initial state for fx {fx_id}"
                )));
            }
            let count = r.read_u32_be()? as usize;
            let mut outputs = Vec::with_capacity(count.min(r.remaining() / 20));
            for _ in 0..count {
                insert_sorted(&mut outputs, Output::read_from(r, codec)?);
            }
            states.insert(fx_id, outputs);
        }
        Ok(InitialStates { states })
    }
}

// Both codecs number the output tags in the same relative order, so codec 0
// bytes order a group the same way either codec writes it.
fn insert_sorted(outputs: &mut Vec<Output>, output: Output) {
    let key = output.to_bytes(CodecId::Zero);
    let pos = outputs.partition_point(|o| o.to_bytes(CodecId::Zero) <= key);
    outputs.insert(pos, output);
}

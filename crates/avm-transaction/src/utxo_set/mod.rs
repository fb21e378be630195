//! An insertion-ordered UTXO set and the coin selector that spends from it.
//!
//! The set keeps every UTXO keyed by [`UtxoId`] in the order it was
//! added, plus an index from owner address to the UTXOs it owns and their
//! locktimes. Selection walks the UTXOs in insertion order, so the order
//! UTXOs are added decides which ones a transaction spends.

mod builder;

pub use builder::{MinterSet, SpendOptions};

use avm_primitives::{Address, Id};
use indexmap::{IndexMap, IndexSet};
use tracing::{debug, trace};

use crate::asset_amount::AssetAmountDestination;
use crate::error::{Result, TransactionError};
use crate::input::{SecpTransferInput, TransferableInput};
use crate::operation::UtxoId;
use crate::output::{Output, OutputOwners, SecpTransferOutput, TransferableOutput};
use crate::utxo::Utxo;

/// A working set of UTXOs owned by one or more addresses.
#[derive(Clone, Debug, Default)]
pub struct UtxoSet {
    utxos: IndexMap<UtxoId, Utxo>,
    address_utxos: IndexMap<Address, IndexMap<UtxoId, u64>>,
}

impl UtxoSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.utxos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utxos.is_empty()
    }

    // -----------------------------------------------------------------------
    // Membership
    // -----------------------------------------------------------------------

    /// Add a UTXO.
    ///
    /// An existing entry keeps its position; it is only replaced when
    /// `overwrite` is set.
    ///
    /// # Returns
    /// Whether the UTXO was stored.
    pub fn add(&mut self, utxo: Utxo, overwrite: bool) -> bool {
        let id = utxo.utxo_id;
        if !overwrite && self.utxos.contains_key(&id) {
            debug!(utxo = %id, "utxo already present, not overwriting");
            return false;
        }
        if let Some(old) = self.utxos.get(&id) {
            let stale: Vec<Address> = old
                .output
                .owners()
                .addresses()
                .iter()
                .filter(|a| !utxo.output.owners().owned_by(a))
                .copied()
                .collect();
            self.unindex(&id, &stale);
        }
        let owners = utxo.output.owners();
        for address in owners.addresses() {
            self.address_utxos
                .entry(*address)
                .or_default()
                .insert(id, owners.locktime());
        }
        self.utxos.insert(id, utxo);
        true
    }

    /// Add many UTXOs, returning the IDs of those stored.
    pub fn add_array(&mut self, utxos: impl IntoIterator<Item = Utxo>, overwrite: bool) -> Vec<UtxoId> {
        utxos
            .into_iter()
            .filter_map(|utxo| {
                let id = utxo.utxo_id;
                self.add(utxo, overwrite).then_some(id)
            })
            .collect()
    }

    /// Add a UTXO given in the CB58 form node APIs return.
    pub fn add_cb58(&mut self, encoded: &str, overwrite: bool) -> Result<bool> {
        Ok(self.add(Utxo::from_cb58_string(encoded)?, overwrite))
    }

    /// Remove a UTXO, keeping the order of the rest.
    pub fn remove(&mut self, utxo_id: &UtxoId) -> Option<Utxo> {
        let utxo = self.utxos.shift_remove(utxo_id)?;
        self.unindex(utxo_id, utxo.output.owners().addresses());
        Some(utxo)
    }

    /// Remove many UTXOs, returning those that were present.
    pub fn remove_array(&mut self, utxo_ids: &[UtxoId]) -> Vec<Utxo> {
        utxo_ids.iter().filter_map(|id| self.remove(id)).collect()
    }

    fn unindex(&mut self, utxo_id: &UtxoId, addresses: &[Address]) {
        for address in addresses {
            if let Some(ids) = self.address_utxos.get_mut(address) {
                ids.shift_remove(utxo_id);
                if ids.is_empty() {
                    self.address_utxos.shift_remove(address);
                }
            }
        }
    }

    pub fn includes(&self, utxo_id: &UtxoId) -> bool {
        self.utxos.contains_key(utxo_id)
    }

    pub fn get_utxo(&self, utxo_id: &UtxoId) -> Option<&Utxo> {
        self.utxos.get(utxo_id)
    }

    /// All UTXOs in insertion order, or only those named in `filter`
    /// (in filter order, unknown IDs skipped).
    pub fn get_all_utxos(&self, filter: Option<&[UtxoId]>) -> Vec<&Utxo> {
        match filter {
            Some(ids) => ids.iter().filter_map(|id| self.utxos.get(id)).collect(),
            None => self.utxos.values().collect(),
        }
    }

    /// IDs of the UTXOs owned by any of `addresses`, or of every UTXO.
    ///
    /// With `spendable` set, only UTXOs whose locktime has passed at
    /// `as_of` (`as_of > locktime`) are returned.
    pub fn get_utxo_ids(&self, addresses: Option<&[Address]>, spendable: bool, as_of: u64) -> Vec<UtxoId> {
        let Some(addresses) = addresses else {
            return self.utxos.keys().copied().collect();
        };
        let mut ids: IndexSet<UtxoId> = IndexSet::new();
        for address in addresses {
            let Some(owned) = self.address_utxos.get(address) else {
                continue;
            };
            for (id, locktime) in owned {
                if !spendable || as_of > *locktime {
                    ids.insert(*id);
                }
            }
        }
        ids.into_iter().collect()
    }

    /// Every address that owns at least one UTXO.
    pub fn get_addresses(&self) -> Vec<Address> {
        self.address_utxos.keys().copied().collect()
    }

    /// Spendable balance of `asset_id` held by `addresses` at `as_of`.
    pub fn get_balance(&self, addresses: &[Address], asset_id: &Id, as_of: u64) -> u64 {
        self.get_utxo_ids(Some(addresses), true, as_of)
            .iter()
            .filter_map(|id| self.utxos.get(id))
            .filter(|u| &u.asset_id == asset_id)
            .filter_map(|u| u.output.amount())
            .sum()
    }

    /// Distinct assets held, optionally only by `addresses`.
    pub fn get_asset_ids(&self, addresses: Option<&[Address]>) -> Vec<Id> {
        let ids = self.get_utxo_ids(addresses, false, 0);
        let assets: IndexSet<Id> = ids
            .iter()
            .filter_map(|id| self.utxos.get(id))
            .map(|u| u.asset_id)
            .collect();
        assets.into_iter().collect()
    }

    // -----------------------------------------------------------------------
    // Set algebra
    // -----------------------------------------------------------------------

    fn from_utxos<'a>(utxos: impl IntoIterator<Item = &'a Utxo>) -> Self {
        let mut set = UtxoSet::new();
        for utxo in utxos {
            set.add(utxo.clone(), false);
        }
        set
    }

    /// UTXOs in either set; entries of `self` come first.
    pub fn union(&self, other: &UtxoSet) -> UtxoSet {
        Self::from_utxos(self.utxos.values().chain(other.utxos.values()))
    }

    /// UTXOs in both sets, in the order of `self`.
    pub fn intersection(&self, other: &UtxoSet) -> UtxoSet {
        Self::from_utxos(self.utxos.values().filter(|u| other.includes(&u.utxo_id)))
    }

    /// UTXOs of `self` that are not in `other`.
    pub fn difference(&self, other: &UtxoSet) -> UtxoSet {
        Self::from_utxos(self.utxos.values().filter(|u| !other.includes(&u.utxo_id)))
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    /// Gather enough UTXOs to cover every requirement in `aad`.
    ///
    /// UTXOs are visited in insertion order until every asset is covered.
    /// A UTXO is skipped when its asset is not requested or already
    /// covered, when its output carries no amount, or when the senders
    /// cannot meet its threshold at `as_of`. Each spent UTXO becomes an
    /// input whose signature slots name the senders that will sign.
    ///
    /// Once covered, each asset gets a payment output of its requested
    /// amount to the destinations (with `locktime` and `threshold`) and a
    /// change output to the change addresses for any excess.
    ///
    /// The set itself is never modified.
    ///
    /// # Returns
    /// The filled accumulator, `InsufficientFunds` if the set cannot cover
    /// the requirements, or `Address` if a spender is missing from an
    /// output's owners.
    pub fn get_minimum_spendable(
        &self,
        mut aad: AssetAmountDestination,
        as_of: u64,
        locktime: u64,
        threshold: u32,
    ) -> Result<AssetAmountDestination> {
        for utxo in self.utxos.values() {
            if aad.can_complete() {
                break;
            }
            let id = utxo.utxo_id;
            let finished = match aad.asset_amount(&utxo.asset_id) {
                None => {
                    trace!(utxo = %id, "skipping utxo, asset not requested");
                    continue;
                }
                Some(am) => am.is_finished(),
            };
            if finished {
                trace!(utxo = %id, "skipping utxo, asset already covered");
                continue;
            }
            let Output::SecpTransfer(out) = &utxo.output else {
                trace!(utxo = %id, kind = ?utxo.output.kind(), "skipping utxo without an amount");
                continue;
            };
            if !out.owners.meets_threshold(aad.senders(), as_of) {
                trace!(utxo = %id, "skipping utxo, senders cannot spend it yet");
                continue;
            }

            let mut input = SecpTransferInput::new(out.amount);
            for spender in out.owners.get_spenders(aad.senders(), as_of) {
                let idx = out.owners.address_index(&spender).ok_or_else(|| {
                    TransactionError::Address(format!("{} does not own utxo {}", spender, id))
                })?;
                input.add_signature_idx(idx, spender);
            }
            if let Some(am) = aad.asset_amount_mut(&utxo.asset_id) {
                am.spend_amount(out.amount);
            }
            aad.add_input(TransferableInput::new(id.tx_id, id.output_index, utxo.asset_id, input));
        }

        if !aad.can_complete() {
            let short: Vec<String> = aad
                .amounts()
                .filter(|am| !am.is_finished())
                .map(|am| {
                    format!(
                        "{} needs {} has {}",
                        am.asset_id(),
                        am.amount().saturating_add(am.burn()),
                        am.spent()
                    )
                })
                .collect();
            debug!(shortfall = ?short, "coin selection failed");
            return Err(TransactionError::InsufficientFunds(short.join(", ")));
        }

        let mut payments = Vec::new();
        let mut changes = Vec::new();
        for am in aad.amounts() {
            if am.amount() > 0 {
                let owners = OutputOwners::new(aad.destinations().to_vec(), locktime, threshold)?;
                payments.push(TransferableOutput::new(
                    *am.asset_id(),
                    SecpTransferOutput::new(am.amount(), owners),
                ));
            }
            if am.change() > 0 {
                let owners = OutputOwners::new(aad.change_addresses().to_vec(), 0, 1)?;
                changes.push(TransferableOutput::new(
                    *am.asset_id(),
                    SecpTransferOutput::new(am.change(), owners),
                ));
            }
        }
        for out in payments {
            aad.add_output(out);
        }
        for out in changes {
            aad.add_change(out);
        }
        debug!(
            inputs = aad.inputs().len(),
            outputs = aad.outputs().len(),
            change = aad.change_outputs().len(),
            "coin selection complete"
        );
        Ok(aad)
    }
}

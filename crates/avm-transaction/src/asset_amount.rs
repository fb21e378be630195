//! Running totals for coin selection.
//!
//! A builder describes what it needs as an [`AssetAmountDestination`]: one
//! [`AssetAmount`] per asset plus the sender, destination and change
//! addresses. Selection consumes the accumulator and hands it back filled
//! with inputs, payment outputs and change outputs.

use avm_primitives::{Address, Id};
use indexmap::IndexMap;

use crate::input::TransferableInput;
use crate::output::TransferableOutput;

/// How much of one asset a transaction pays out and burns, and how much
/// selection has gathered so far.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetAmount {
    asset_id: Id,
    amount: u64,
    burn: u64,
    spent: u64,
    change: u64,
    finished: bool,
}

impl AssetAmount {
    pub fn new(asset_id: Id, amount: u64, burn: u64) -> Self {
        AssetAmount {
            asset_id,
            amount,
            burn,
            spent: 0,
            change: 0,
            finished: false,
        }
    }

    pub fn asset_id(&self) -> &Id {
        &self.asset_id
    }

    /// Amount paid to the destinations.
    pub fn amount(&self) -> u64 {
        self.amount
    }

    /// Amount burned as a fee.
    pub fn burn(&self) -> u64 {
        self.burn
    }

    pub fn spent(&self) -> u64 {
        self.spent
    }

    /// Excess gathered over `amount + burn`. Zero until finished.
    pub fn change(&self) -> u64 {
        self.change
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Record `amt` as gathered.
    ///
    /// # Returns
    /// Whether the requirement is now covered.
    pub fn spend_amount(&mut self, amt: u64) -> bool {
        self.spent = self.spent.saturating_add(amt);
        let total = self.amount.saturating_add(self.burn);
        if self.spent >= total {
            self.change = self.spent - total;
            self.finished = true;
        }
        self.finished
    }
}

/// Everything one selection run needs and produces.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssetAmountDestination {
    amounts: IndexMap<Id, AssetAmount>,
    destinations: Vec<Address>,
    senders: Vec<Address>,
    change_addresses: Vec<Address>,
    inputs: Vec<TransferableInput>,
    outputs: Vec<TransferableOutput>,
    change: Vec<TransferableOutput>,
}

impl AssetAmountDestination {
    /// # Arguments
    /// * `destinations` - Owners of the payment outputs.
    /// * `senders` - Addresses whose UTXOs may be spent.
    /// * `change_addresses` - Owners of the change outputs.
    pub fn new(destinations: Vec<Address>, senders: Vec<Address>, change_addresses: Vec<Address>) -> Self {
        AssetAmountDestination {
            destinations,
            senders,
            change_addresses,
            ..Default::default()
        }
    }

    /// Require `amount` of `asset_id` for the destinations plus `burn` as fee.
    /// A second call for the same asset replaces the first.
    pub fn add_asset_amount(&mut self, asset_id: Id, amount: u64, burn: u64) {
        self.amounts.insert(asset_id, AssetAmount::new(asset_id, amount, burn));
    }

    pub fn asset_exists(&self, asset_id: &Id) -> bool {
        self.amounts.contains_key(asset_id)
    }

    pub fn asset_amount(&self, asset_id: &Id) -> Option<&AssetAmount> {
        self.amounts.get(asset_id)
    }

    pub(crate) fn asset_amount_mut(&mut self, asset_id: &Id) -> Option<&mut AssetAmount> {
        self.amounts.get_mut(asset_id)
    }

    /// Requirements in the order they were added.
    pub fn amounts(&self) -> impl Iterator<Item = &AssetAmount> {
        self.amounts.values()
    }

    pub fn destinations(&self) -> &[Address] {
        &self.destinations
    }

    pub fn senders(&self) -> &[Address] {
        &self.senders
    }

    pub fn change_addresses(&self) -> &[Address] {
        &self.change_addresses
    }

    pub fn add_input(&mut self, input: TransferableInput) {
        self.inputs.push(input);
    }

    pub fn add_output(&mut self, output: TransferableOutput) {
        self.outputs.push(output);
    }

    pub fn add_change(&mut self, output: TransferableOutput) {
        self.change.push(output);
    }

    pub fn inputs(&self) -> &[TransferableInput] {
        &self.inputs
    }

    /// Payment outputs.
    pub fn outputs(&self) -> &[TransferableOutput] {
        &self.outputs
    }

    pub fn change_outputs(&self) -> &[TransferableOutput] {
        &self.change
    }

    /// Payment outputs followed by change outputs.
    pub fn all_outputs(&self) -> Vec<TransferableOutput> {
        self.outputs.iter().chain(self.change.iter()).cloned().collect()
    }

    /// Whether every requirement is covered.
    pub fn can_complete(&self) -> bool {
        self.amounts.values().all(AssetAmount::is_finished)
    }

    /// Take the selected inputs, payment outputs and change outputs.
    pub fn into_parts(self) -> (Vec<TransferableInput>, Vec<TransferableOutput>, Vec<TransferableOutput>) {
        (self.inputs, self.outputs, self.change)
    }
}

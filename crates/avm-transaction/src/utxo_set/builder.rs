//! Transaction builders.
//!
//! Each builder turns a high-level request into an [`UnsignedTx`] by
//! running coin selection over the set and wiring the result into the
//! right transaction kind. Builders never modify the set; callers remove
//! spent UTXOs once the transaction is accepted.

use avm_primitives::{Address, Id};
use tracing::debug;

use super::UtxoSet;
use crate::asset_amount::AssetAmountDestination;
use crate::constants::{ASSET_NAME_MAX_LEN, ASSET_SYMBOL_MAX_LEN};
use crate::error::{Result, TransactionError};
use crate::initial_states::InitialStates;
use crate::input::{SecpTransferInput, TransferableInput};
use crate::network::{BuildContext, NetworkConfig};
use crate::operation::{
    NftMintOperation, NftTransferOperation, Operation, SecpMintOperation, TransferableOperation, UtxoId,
};
use crate::output::{
    NftMintOutput, NftTransferOutput, Output, OutputOwners, SecpMintOutput, SecpTransferOutput, TransferableOutput,
};
use crate::tx::{BaseTx, CreateAssetTx, ExportTx, ImportTx, OperationTx, UnsignedTx};
use crate::utxo::Utxo;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Fee, memo and ownership settings shared by every builder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpendOptions {
    /// Amount of the fee asset burned.
    pub fee: u64,
    /// Asset the fee is paid in. Builders that move a single asset default to it.
    pub fee_asset_id: Option<Id>,
    pub memo: Vec<u8>,
    /// Unix time at which locktimes are evaluated.
    pub as_of: u64,
    /// Locktime of the payment outputs.
    pub locktime: u64,
    /// Signature threshold of the payment outputs.
    pub threshold: u32,
}

impl Default for SpendOptions {
    fn default() -> Self {
        SpendOptions {
            fee: 0,
            fee_asset_id: None,
            memo: Vec::new(),
            as_of: unix_now(),
            locktime: 0,
            threshold: 1,
        }
    }
}

impl SpendOptions {
    /// Options paying the network's standard transfer fee in its native asset.
    pub fn from_config(config: &NetworkConfig) -> Self {
        SpendOptions {
            fee: config.tx_fee,
            fee_asset_id: Some(config.avax_asset_id),
            ..Default::default()
        }
    }

    pub fn with_fee(mut self, fee: u64) -> Self {
        self.fee = fee;
        self
    }

    pub fn with_memo(mut self, memo: impl Into<Vec<u8>>) -> Self {
        self.memo = memo.into();
        self
    }

    pub fn with_as_of(mut self, as_of: u64) -> Self {
        self.as_of = as_of;
        self
    }

    pub fn with_locktime(mut self, locktime: u64) -> Self {
        self.locktime = locktime;
        self
    }

    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.threshold = threshold;
        self
    }

    /// The fee asset, if a fee is due at all.
    fn fee_leg(&self) -> Option<Id> {
        if self.fee > 0 {
            self.fee_asset_id
        } else {
            None
        }
    }
}

fn unix_now() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

/// A group of addresses allowed to mint one NFT group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MinterSet {
    threshold: u32,
    minters: Vec<Address>,
}

impl MinterSet {
    /// # Returns
    /// `Threshold` if `threshold` exceeds the number of minters.
    pub fn new(threshold: u32, minters: Vec<Address>) -> Result<Self> {
        if threshold as usize > minters.len() {
            return Err(TransactionError::Threshold {
                threshold,
                addresses: minters.len(),
            });
        }
        Ok(MinterSet { threshold, minters })
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn minters(&self) -> &[Address] {
        &self.minters
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

fn or_default<'a>(addresses: &'a [Address], fallback: &'a [Address]) -> &'a [Address] {
    if addresses.is_empty() {
        fallback
    } else {
        addresses
    }
}

fn base_tx(ctx: &BuildContext, outs: Vec<TransferableOutput>, ins: Vec<TransferableInput>, memo: &[u8]) -> BaseTx {
    let mut base = BaseTx::new(ctx.network_id, ctx.blockchain_id, outs, ins, memo.to_vec()).with_codec(ctx.codec_id);
    base.canonicalize();
    base
}

/// Fill `op`'s signature slots with the senders that can spend `owners` at `as_of`.
fn add_operation_signers(op: &mut Operation, owners: &OutputOwners, from: &[Address], as_of: u64) -> Result<()> {
    for spender in owners.get_spenders(from, as_of) {
        let idx = owners
            .address_index(&spender)
            .ok_or_else(|| TransactionError::Address(format!("{} is not an owner", spender)))?;
        op.add_signature_idx(idx, spender);
    }
    Ok(())
}

fn check_asset_fields(name: &str, symbol: &str) -> Result<()> {
    if name.len() > ASSET_NAME_MAX_LEN {
        return Err(TransactionError::InvalidAssetField(format!(
            "name is {} bytes, at most {} allowed",
            name.len(),
            ASSET_NAME_MAX_LEN
        )));
    }
    if symbol.len() > ASSET_SYMBOL_MAX_LEN {
        return Err(TransactionError::InvalidAssetField(format!(
            "symbol is {} bytes, at most {} allowed",
            symbol.len(),
            ASSET_SYMBOL_MAX_LEN
        )));
    }
    Ok(())
}

impl UtxoSet {
    /// Select UTXOs paying only the fee, with change back to `change`.
    fn select_fee(
        &self,
        from: &[Address],
        change: &[Address],
        opts: &SpendOptions,
    ) -> Result<(Vec<TransferableInput>, Vec<TransferableOutput>)> {
        let Some(fee_asset) = opts.fee_leg() else {
            return Ok((Vec::new(), Vec::new()));
        };
        let mut aad = AssetAmountDestination::new(from.to_vec(), from.to_vec(), or_default(change, from).to_vec());
        aad.add_asset_amount(fee_asset, 0, opts.fee);
        let aad = self.get_minimum_spendable(aad, opts.as_of, 0, 1)?;
        let outs = aad.all_outputs();
        let (ins, _, _) = aad.into_parts();
        Ok((ins, outs))
    }

    fn mint_utxo(&self, utxo_id: &UtxoId) -> Result<&Utxo> {
        self.get_utxo(utxo_id)
            .ok_or_else(|| TransactionError::UtxoNotFound(utxo_id.to_string()))
    }

    /// Send `amount` of `asset_id` to `to`.
    ///
    /// # Arguments
    /// * `to` - Owners of the payment output.
    /// * `from` - Addresses whose UTXOs may be spent.
    /// * `change` - Owners of any change; empty means `from`.
    /// * `opts` - Fee, memo, `as_of`, and the payment output's locktime and threshold.
    ///   The fee asset defaults to `asset_id`.
    ///
    /// # Returns
    /// `Threshold` if the threshold exceeds `to.len()`, `InvalidAmount` for a
    /// zero amount, or `InsufficientFunds` from selection.
    #[allow(clippy::too_many_arguments)]
    pub fn build_base_tx(
        &self,
        ctx: &BuildContext,
        amount: u64,
        asset_id: Id,
        to: &[Address],
        from: &[Address],
        change: &[Address],
        opts: &SpendOptions,
    ) -> Result<UnsignedTx> {
        if opts.threshold as usize > to.len() {
            return Err(TransactionError::Threshold {
                threshold: opts.threshold,
                addresses: to.len(),
            });
        }
        if amount == 0 {
            return Err(TransactionError::InvalidAmount("cannot send zero".to_string()));
        }
        let aad = self.select_payment(amount, asset_id, to, from, change, opts)?;
        let outs = aad.all_outputs();
        let (ins, _, _) = aad.into_parts();
        debug!(asset = %asset_id, amount, inputs = ins.len(), "built base tx");
        Ok(UnsignedTx::new(base_tx(ctx, outs, ins, &opts.memo)))
    }

    fn select_payment(
        &self,
        amount: u64,
        asset_id: Id,
        to: &[Address],
        from: &[Address],
        change: &[Address],
        opts: &SpendOptions,
    ) -> Result<AssetAmountDestination> {
        let fee_asset = opts.fee_asset_id.unwrap_or(asset_id);
        let mut aad = AssetAmountDestination::new(to.to_vec(), from.to_vec(), or_default(change, from).to_vec());
        if fee_asset == asset_id {
            aad.add_asset_amount(asset_id, amount, opts.fee);
        } else {
            aad.add_asset_amount(asset_id, amount, 0);
            if opts.fee > 0 {
                aad.add_asset_amount(fee_asset, 0, opts.fee);
            }
        }
        self.get_minimum_spendable(aad, opts.as_of, opts.locktime, opts.threshold)
    }

    /// Create a new asset.
    ///
    /// `mint_outputs` are added to the SECP entry of `initial_states`. The
    /// fee is paid from `from`, with change to `change` (or `from`).
    ///
    /// # Returns
    /// `InvalidAssetField` if the name or symbol is too long.
    #[allow(clippy::too_many_arguments)]
    pub fn build_create_asset_tx(
        &self,
        ctx: &BuildContext,
        from: &[Address],
        change: &[Address],
        initial_states: InitialStates,
        name: &str,
        symbol: &str,
        denomination: u8,
        mint_outputs: Vec<SecpMintOutput>,
        opts: &SpendOptions,
    ) -> Result<UnsignedTx> {
        check_asset_fields(name, symbol)?;
        let (ins, outs) = self.select_fee(from, change, opts)?;
        let mut initial_states = initial_states;
        for out in mint_outputs {
            initial_states.add_output(out);
        }
        let base = base_tx(ctx, outs, ins, &opts.memo);
        let tx = CreateAssetTx::new(base, name.to_string(), symbol.to_string(), denomination, initial_states);
        debug!(asset_name = name, symbol, denomination, "built create asset tx");
        Ok(UnsignedTx::new(tx))
    }

    /// Spend the mint authority in `mint_utxo_id` to mint `transfer_output`,
    /// re-issuing the authority as `mint_owner`.
    ///
    /// # Returns
    /// `UtxoNotFound` if the UTXO is not in the set, or `OutputType` if it
    /// does not hold a SECP mint output.
    #[allow(clippy::too_many_arguments)]
    pub fn build_secp_mint_tx(
        &self,
        ctx: &BuildContext,
        mint_owner: SecpMintOutput,
        transfer_output: SecpTransferOutput,
        from: &[Address],
        change: &[Address],
        mint_utxo_id: &UtxoId,
        opts: &SpendOptions,
    ) -> Result<UnsignedTx> {
        let (ins, outs) = self.select_fee(from, change, opts)?;
        let utxo = self.mint_utxo(mint_utxo_id)?;
        let Output::SecpMint(authority) = &utxo.output else {
            return Err(TransactionError::OutputType(format!(
                "utxo {} holds {:?}, not a SECP mint output",
                mint_utxo_id,
                utxo.output.kind()
            )));
        };
        let mut op = Operation::SecpMint(SecpMintOperation::new(mint_owner, transfer_output));
        add_operation_signers(&mut op, &authority.owners, from, opts.as_of)?;
        let ops = vec![TransferableOperation::new(utxo.asset_id, vec![*mint_utxo_id], op)];
        let base = base_tx(ctx, outs, ins, &opts.memo);
        debug!(utxo = %mint_utxo_id, "built secp mint tx");
        Ok(UnsignedTx::new(OperationTx::new(base, ops)))
    }

    /// Create an NFT asset with one mint authority per minter set.
    ///
    /// Set `i` receives group ID `i`. The authorities use `opts.locktime`.
    #[allow(clippy::too_many_arguments)]
    pub fn build_create_nft_asset_tx(
        &self,
        ctx: &BuildContext,
        from: &[Address],
        change: &[Address],
        minter_sets: &[MinterSet],
        name: &str,
        symbol: &str,
        opts: &SpendOptions,
    ) -> Result<UnsignedTx> {
        check_asset_fields(name, symbol)?;
        let mut initial_states = InitialStates::new();
        for (group_id, set) in minter_sets.iter().enumerate() {
            let owners = OutputOwners::new(set.minters().to_vec(), opts.locktime, set.threshold())?;
            initial_states.add_output(NftMintOutput::new(group_id as u32, owners));
        }
        let (ins, outs) = self.select_fee(from, change, opts)?;
        let base = base_tx(ctx, outs, ins, &opts.memo);
        debug!(asset_name = name, groups = minter_sets.len(), "built create nft asset tx");
        Ok(UnsignedTx::new(CreateAssetTx::new(
            base,
            name.to_string(),
            symbol.to_string(),
            0,
            initial_states,
        )))
    }

    /// Mint NFTs of `group_id` carrying `payload`, one per entry of `owners`,
    /// using each NFT mint authority in `utxo_ids`.
    ///
    /// # Returns
    /// `UtxoNotFound` for an unknown UTXO, or `OutputType` if one does not
    /// hold an NFT mint output.
    #[allow(clippy::too_many_arguments)]
    pub fn build_create_nft_mint_tx(
        &self,
        ctx: &BuildContext,
        owners: Vec<OutputOwners>,
        from: &[Address],
        change: &[Address],
        utxo_ids: &[UtxoId],
        group_id: u32,
        payload: Vec<u8>,
        opts: &SpendOptions,
    ) -> Result<UnsignedTx> {
        let (ins, outs) = self.select_fee(from, change, opts)?;
        let mut ops = Vec::with_capacity(utxo_ids.len());
        for utxo_id in utxo_ids {
            let utxo = self.mint_utxo(utxo_id)?;
            let Output::NftMint(authority) = &utxo.output else {
                return Err(TransactionError::OutputType(format!(
                    "utxo {} holds {:?}, not an NFT mint output",
                    utxo_id,
                    utxo.output.kind()
                )));
            };
            let mut op = Operation::NftMint(NftMintOperation::new(group_id, payload.clone(), owners.clone()));
            add_operation_signers(&mut op, &authority.owners, from, opts.as_of)?;
            ops.push(TransferableOperation::new(utxo.asset_id, vec![*utxo_id], op));
        }
        let base = base_tx(ctx, outs, ins, &opts.memo);
        debug!(group_id, mints = ops.len(), "built nft mint tx");
        Ok(UnsignedTx::new(OperationTx::new(base, ops)))
    }

    /// Move the NFTs in `utxo_ids` to `to`, keeping group and payload.
    ///
    /// The new outputs use `opts.locktime` and `opts.threshold`.
    pub fn build_nft_transfer_tx(
        &self,
        ctx: &BuildContext,
        to: &[Address],
        from: &[Address],
        change: &[Address],
        utxo_ids: &[UtxoId],
        opts: &SpendOptions,
    ) -> Result<UnsignedTx> {
        let (ins, outs) = self.select_fee(from, change, opts)?;
        let mut ops = Vec::with_capacity(utxo_ids.len());
        for utxo_id in utxo_ids {
            let utxo = self.mint_utxo(utxo_id)?;
            let Output::NftTransfer(nft) = &utxo.output else {
                return Err(TransactionError::OutputType(format!(
                    "utxo {} holds {:?}, not an NFT transfer output",
                    utxo_id,
                    utxo.output.kind()
                )));
            };
            let owners = OutputOwners::new(to.to_vec(), opts.locktime, opts.threshold)?;
            let outbound = NftTransferOutput::new(nft.group_id, nft.payload.clone(), owners);
            let mut op = Operation::NftTransfer(NftTransferOperation::new(outbound));
            add_operation_signers(&mut op, &nft.owners, from, opts.as_of)?;
            ops.push(TransferableOperation::new(utxo.asset_id, vec![*utxo_id], op));
        }
        let base = base_tx(ctx, outs, ins, &opts.memo);
        debug!(transfers = ops.len(), "built nft transfer tx");
        Ok(UnsignedTx::new(OperationTx::new(base, ops)))
    }

    /// Import `atomics` exported to this chain from `source_chain`.
    ///
    /// Every atomic UTXO becomes an imported input signed by its own owners.
    /// Fee-asset atomics pay the fee first; whatever each atomic has left
    /// is paid to `to`. Any fee the atomics cannot cover is selected from
    /// this set and appended to the base inputs and outputs, with change to
    /// `change` (or `from`).
    ///
    /// # Returns
    /// `OutputType` if an atomic UTXO carries no amount.
    #[allow(clippy::too_many_arguments)]
    pub fn build_import_tx(
        &self,
        ctx: &BuildContext,
        to: &[Address],
        from: &[Address],
        change: &[Address],
        atomics: &[Utxo],
        source_chain: Option<Id>,
        opts: &SpendOptions,
    ) -> Result<UnsignedTx> {
        let fee_asset = opts.fee_leg();
        let mut fee_paid = 0u64;
        let mut import_ins = Vec::with_capacity(atomics.len());
        let mut outs = Vec::new();

        for atomic in atomics {
            let Output::SecpTransfer(out) = &atomic.output else {
                return Err(TransactionError::OutputType(format!(
                    "atomic utxo {} holds {:?}, not a SECP transfer output",
                    atomic.utxo_id,
                    atomic.output.kind()
                )));
            };
            let mut left = out.amount;
            if fee_asset == Some(atomic.asset_id) && fee_paid < opts.fee {
                let take = left.min(opts.fee - fee_paid);
                fee_paid += take;
                left -= take;
            }

            let mut input = SecpTransferInput::new(out.amount);
            let owners = out.owners.addresses();
            for spender in out.owners.get_spenders(owners, opts.as_of) {
                let idx = out.owners.address_index(&spender).ok_or_else(|| {
                    TransactionError::Address(format!("{} does not own utxo {}", spender, atomic.utxo_id))
                })?;
                input.add_signature_idx(idx, spender);
            }
            import_ins.push(TransferableInput::new(
                atomic.utxo_id.tx_id,
                atomic.utxo_id.output_index,
                atomic.asset_id,
                input,
            ));

            if left > 0 {
                let owners = OutputOwners::new(to.to_vec(), opts.locktime, opts.threshold)?;
                outs.push(TransferableOutput::new(atomic.asset_id, SecpTransferOutput::new(left, owners)));
            }
        }

        let mut ins = Vec::new();
        let fee_remaining = opts.fee.saturating_sub(fee_paid);
        if let Some(fee_asset) = fee_asset.filter(|_| fee_remaining > 0) {
            let mut aad = AssetAmountDestination::new(to.to_vec(), from.to_vec(), or_default(change, from).to_vec());
            aad.add_asset_amount(fee_asset, 0, fee_remaining);
            let aad = self.get_minimum_spendable(aad, opts.as_of, opts.locktime, opts.threshold)?;
            outs.extend(aad.all_outputs());
            let (selected, _, _) = aad.into_parts();
            ins.extend(selected);
        }

        let base = base_tx(ctx, outs, ins, &opts.memo);
        debug!(imported = import_ins.len(), fee_paid, fee_remaining, "built import tx");
        Ok(UnsignedTx::new(ImportTx::new(base, source_chain, import_ins)))
    }

    /// Export `amount` of `asset_id` to `to` on `destination_chain`.
    ///
    /// Payment outputs go to the exported outputs; change stays on this
    /// chain. A missing destination means the platform chain (all zeros).
    ///
    /// # Returns
    /// `InvalidAmount` for a zero amount, or `InsufficientFunds`.
    #[allow(clippy::too_many_arguments)]
    pub fn build_export_tx(
        &self,
        ctx: &BuildContext,
        amount: u64,
        asset_id: Id,
        to: &[Address],
        from: &[Address],
        change: &[Address],
        destination_chain: Option<Id>,
        opts: &SpendOptions,
    ) -> Result<UnsignedTx> {
        if amount == 0 {
            return Err(TransactionError::InvalidAmount("cannot export zero".to_string()));
        }
        let aad = self.select_payment(amount, asset_id, to, from, change, opts)?;
        let (ins, export_outs, change_outs) = aad.into_parts();
        let base = base_tx(ctx, change_outs, ins, &opts.memo);
        let destination = destination_chain.unwrap_or(Id::ZERO);
        debug!(asset = %asset_id, amount, destination = %destination, "built export tx");
        Ok(UnsignedTx::new(ExportTx::new(base, Some(destination), export_outs)))
    }
}

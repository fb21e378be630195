//! Tests for the avm-transaction crate.
//!
//! Cross-module scenarios: byte-exact base transaction encoding, coin
//! selection totals and failure, signing alignment, codec fencing across
//! every transaction kind, the builders, genesis assets and vertices.

use avm_primitives::util::{AvmReader, AvmWriter};
use avm_primitives::{Address, Id, KeyChain, KeySource};

use crate::asset_amount::AssetAmountDestination;
use crate::constants::{CodecId, NFT_FX_ID, SECP_FX_ID};
use crate::credential::CredentialKind;
use crate::error::TransactionError;
use crate::initial_states::InitialStates;
use crate::input::{SecpTransferInput, TransferableInput};
use crate::network::{BuildContext, LOCAL_ID};
use crate::operation::{Operation, SecpMintOperation, TransferableOperation, UtxoId};
use crate::output::{
    NftMintOutput, NftTransferOutput, Output, OutputOwners, SecpMintOutput, SecpTransferOutput, TransferableOutput,
};
use crate::tx::{BaseTx, CreateAssetTx, ExportTx, GenesisAsset, ImportTx, OperationTx, Transaction, Tx, UnsignedTx};
use crate::utxo::Utxo;
use crate::utxo_set::{MinterSet, SpendOptions, UtxoSet};
use crate::vertex::Vertex;

// -----------------------------------------------------------------------
// Fixtures
// -----------------------------------------------------------------------

const EWOQ: &str = "PrivateKey-ewoqjP7PxY4yr3iLTpLisriqt94hdyDFNgchSxGGztUrTXtNN";

const ASSET_X: Id = Id::new([0xaa; 32]);
const AVAX: Id = Id::new([0xbb; 32]);

fn addr(b: u8) -> Address {
    Address::new([b; 20])
}

fn ctx() -> BuildContext {
    BuildContext::new(LOCAL_ID, Id::new([0x42; 32]))
}

fn opts() -> SpendOptions {
    SpendOptions::default().with_as_of(1_000)
}

fn owners(addresses: &[Address], threshold: u32) -> OutputOwners {
    OutputOwners::new(addresses.to_vec(), 0, threshold).unwrap()
}

fn amount_utxo(tx: u8, asset: Id, amount: u64, owner: &[Address]) -> Utxo {
    Utxo::new(
        Id::new([tx; 32]),
        0,
        asset,
        SecpTransferOutput::new(amount, owners(owner, 1)),
    )
}

fn keychain() -> (KeyChain, Address) {
    let mut kc = KeyChain::new("local", "X");
    let a = kc.import_key(EWOQ).unwrap();
    (kc, a)
}

fn base_of(tx: &UnsignedTx) -> &BaseTx {
    tx.transaction.base()
}

// -----------------------------------------------------------------------
// Encoding
// -----------------------------------------------------------------------

#[test]
fn test_base_tx_exact_bytes() {
    let out = TransferableOutput::new(ASSET_X, SecpTransferOutput::new(1000, owners(&[addr(1)], 1)));
    let tx = BaseTx::new(1, Id::ZERO, vec![out.clone()], vec![], vec![]);

    let mut w = AvmWriter::new();
    tx.write_to(&mut w);
    let bytes = w.into_bytes();

    let mut expected = hex::decode("00000001").unwrap();
    expected.extend_from_slice(&[0u8; 32]);
    expected.extend_from_slice(&hex::decode("00000001").unwrap());
    expected.extend_from_slice(&out.to_bytes(CodecId::Zero));
    expected.extend_from_slice(&hex::decode("0000000000000000").unwrap());
    assert_eq!(bytes, expected);

    let back = BaseTx::read_from(&mut AvmReader::new(&bytes), CodecId::Zero).unwrap();
    assert_eq!(back, tx);
}

#[test]
fn test_unsigned_prefix_and_idempotence() {
    let out = TransferableOutput::new(ASSET_X, SecpTransferOutput::new(1, owners(&[addr(1)], 1)));
    let unsigned = UnsignedTx::new(BaseTx::new(1, Id::ZERO, vec![out], vec![], b"memo".to_vec()));
    let first = unsigned.to_bytes().unwrap();
    assert_eq!(first, unsigned.to_bytes().unwrap());
    assert_eq!(&first[..6], &[0, 0, 0, 0, 0, 0]);
    assert_eq!(&first[6..], unsigned.transaction.to_bytes().unwrap().as_slice());
    assert_eq!(UnsignedTx::from_bytes(&first).unwrap(), unsigned);

    let mut trailing = first.clone();
    trailing.push(0);
    assert!(matches!(
        UnsignedTx::from_bytes(&trailing),
        Err(TransactionError::Serialization(_))
    ));
}

#[test]
fn test_unknown_tx_type_rejected() {
    let mut bytes = vec![0, 0];
    bytes.extend_from_slice(&9u32.to_be_bytes());
    assert!(matches!(
        UnsignedTx::from_bytes(&bytes),
        Err(TransactionError::UnknownTypeId { type_id: 9, codec: 0 })
    ));
    assert!(matches!(
        UnsignedTx::from_bytes(&[0, 2, 0, 0, 0, 0]),
        Err(TransactionError::CodecId(2))
    ));
}

#[test]
fn test_output_order_does_not_change_bytes() {
    let a = TransferableOutput::new(ASSET_X, SecpTransferOutput::new(5, owners(&[addr(1)], 1)));
    let b = TransferableOutput::new(AVAX, SecpTransferOutput::new(3, owners(&[addr(2)], 1)));
    let c = TransferableOutput::new(ASSET_X, SecpTransferOutput::new(4, owners(&[addr(3)], 1)));
    let one = UnsignedTx::new(BaseTx::new(1, Id::ZERO, vec![a.clone(), b.clone(), c.clone()], vec![], vec![]));
    let two = UnsignedTx::new(BaseTx::new(1, Id::ZERO, vec![c, a, b], vec![], vec![]));
    assert_eq!(one.to_bytes().unwrap(), two.to_bytes().unwrap());
    assert_eq!(one, two);
}

// -----------------------------------------------------------------------
// Coin selection
// -----------------------------------------------------------------------

#[test]
fn test_selection_sixty_of_hundred() {
    let mut set = UtxoSet::new();
    set.add(amount_utxo(1, ASSET_X, 100, &[addr(1)]), false);

    let mut aad = AssetAmountDestination::new(vec![addr(2)], vec![addr(1)], vec![addr(3)]);
    aad.add_asset_amount(ASSET_X, 60, 0);
    let aad = set.get_minimum_spendable(aad, 1, 0, 1).unwrap();

    assert_eq!(aad.inputs().len(), 1);
    assert_eq!(aad.outputs().len(), 1);
    assert_eq!(aad.change_outputs().len(), 1);

    let pay = &aad.outputs()[0];
    assert_eq!(pay.asset_id, ASSET_X);
    assert_eq!(pay.output.amount(), Some(60));
    assert_eq!(pay.output.owners().addresses(), &[addr(2)]);

    let change = &aad.change_outputs()[0];
    assert_eq!(change.asset_id, ASSET_X);
    assert_eq!(change.output.amount(), Some(40));
    assert_eq!(change.output.owners().addresses(), &[addr(3)]);
}

#[test]
fn test_selection_skips_non_amount_outputs() {
    let mut set = UtxoSet::new();
    set.add(
        Utxo::new(Id::new([1; 32]), 0, ASSET_X, SecpMintOutput::new(owners(&[addr(1)], 1))),
        false,
    );
    set.add(amount_utxo(2, ASSET_X, 10, &[addr(1)]), false);
    let mut aad = AssetAmountDestination::new(vec![addr(2)], vec![addr(1)], vec![addr(1)]);
    aad.add_asset_amount(ASSET_X, 10, 0);
    let aad = set.get_minimum_spendable(aad, 1, 0, 1).unwrap();
    assert_eq!(aad.inputs().len(), 1);
    assert_eq!(aad.inputs()[0].utxo_id.tx_id, Id::new([2; 32]));
    assert!(aad.change_outputs().is_empty());
}

#[test]
fn test_build_base_tx_totals_same_fee_asset() {
    let a = addr(1);
    let mut set = UtxoSet::new();
    set.add(amount_utxo(1, ASSET_X, 30, &[a]), false);
    set.add(amount_utxo(2, ASSET_X, 50, &[a]), false);
    set.add(amount_utxo(3, ASSET_X, 40, &[a]), false);

    let unsigned = set
        .build_base_tx(&ctx(), 70, ASSET_X, &[addr(9)], &[a], &[], &opts().with_fee(5))
        .unwrap();
    let base = base_of(&unsigned);
    assert_eq!(base.ins.len(), 2);
    assert_eq!(unsigned.input_total(&ASSET_X), 80);
    assert_eq!(unsigned.output_total(&ASSET_X), 75);
    assert_eq!(unsigned.burn(&ASSET_X), 5);
    // Change defaults to the senders.
    let paid: u64 = base
        .outs
        .iter()
        .filter(|o| o.output.owners().addresses() == [addr(9)])
        .filter_map(|o| o.output.amount())
        .sum();
    assert_eq!(paid, 70);
    assert_eq!(base.network_id, LOCAL_ID);
}

#[test]
fn test_build_base_tx_payee_gets_exact_amount() {
    let me = addr(1);
    let payee = addr(2);
    let mut set = UtxoSet::new();
    set.add(amount_utxo(1, ASSET_X, 100, &[me]), false);

    let unsigned = set
        .build_base_tx(&ctx(), 60, ASSET_X, &[payee], &[me], &[], &opts())
        .unwrap();
    let received = |owner: Address| -> u64 {
        base_of(&unsigned)
            .outs
            .iter()
            .filter(|o| o.output.owners().addresses() == [owner])
            .filter_map(|o| o.output.amount())
            .sum()
    };
    assert_eq!(received(payee), 60);
    assert_eq!(received(me), 40);
}

#[test]
fn test_build_base_tx_exact_has_no_change() {
    let a = addr(1);
    let mut set = UtxoSet::new();
    set.add(amount_utxo(1, ASSET_X, 75, &[a]), false);
    let unsigned = set
        .build_base_tx(&ctx(), 70, ASSET_X, &[addr(9)], &[a], &[a], &opts().with_fee(5))
        .unwrap();
    assert_eq!(base_of(&unsigned).outs.len(), 1);
}

#[test]
fn test_build_base_tx_separate_fee_asset() {
    let a = addr(1);
    let mut set = UtxoSet::new();
    set.add(amount_utxo(1, ASSET_X, 100, &[a]), false);
    set.add(amount_utxo(2, AVAX, 10, &[a]), false);
    let mut o = opts().with_fee(3);
    o.fee_asset_id = Some(AVAX);

    let unsigned = set
        .build_base_tx(&ctx(), 60, ASSET_X, &[addr(9)], &[a], &[addr(8)], &o)
        .unwrap();
    assert_eq!(base_of(&unsigned).ins.len(), 2);
    assert_eq!(base_of(&unsigned).outs.len(), 3);
    assert_eq!(unsigned.burn(&ASSET_X), 0);
    assert_eq!(unsigned.burn(&AVAX), 3);
    assert_eq!(unsigned.output_total(&AVAX), 7);
}

#[test]
fn test_build_base_tx_rejects_bad_requests() {
    let set = UtxoSet::new();
    assert!(matches!(
        set.build_base_tx(&ctx(), 0, ASSET_X, &[addr(9)], &[addr(1)], &[], &opts()),
        Err(TransactionError::InvalidAmount(_))
    ));
    assert!(matches!(
        set.build_base_tx(&ctx(), 5, ASSET_X, &[addr(9)], &[addr(1)], &[], &opts().with_threshold(2)),
        Err(TransactionError::Threshold { threshold: 2, addresses: 1 })
    ));
}

#[test]
fn test_insufficient_funds_leaves_set_untouched() {
    let a = addr(1);
    let mut set = UtxoSet::new();
    set.add(amount_utxo(1, ASSET_X, 30, &[a]), false);
    set.add(amount_utxo(2, ASSET_X, 20, &[a]), false);
    let before: Vec<Utxo> = set.get_all_utxos(None).into_iter().cloned().collect();

    let res = set.build_base_tx(&ctx(), 50, ASSET_X, &[addr(9)], &[a], &[], &opts().with_fee(1));
    assert!(matches!(res, Err(TransactionError::InsufficientFunds(_))));

    let after: Vec<Utxo> = set.get_all_utxos(None).into_iter().cloned().collect();
    assert_eq!(before, after);
}

#[test]
fn test_locked_utxo_not_selected() {
    let a = addr(1);
    let mut set = UtxoSet::new();
    set.add(
        Utxo::new(
            Id::new([1; 32]),
            0,
            ASSET_X,
            SecpTransferOutput::new(100, OutputOwners::new(vec![a], 5_000, 1).unwrap()),
        ),
        false,
    );
    let res = set.build_base_tx(&ctx(), 10, ASSET_X, &[addr(9)], &[a], &[], &opts());
    assert!(matches!(res, Err(TransactionError::InsufficientFunds(_))));
    let ok = set.build_base_tx(&ctx(), 10, ASSET_X, &[addr(9)], &[a], &[], &opts().with_as_of(5_001));
    assert!(ok.is_ok());
}

// -----------------------------------------------------------------------
// Signing
// -----------------------------------------------------------------------

#[test]
fn test_signatures_align_with_sig_idxs() {
    let (mut kc, a) = keychain();
    let b = kc.make_key();
    let mut set = UtxoSet::new();
    // One 2-of-2 output and one single-owner output.
    set.add(
        Utxo::new(Id::new([1; 32]), 0, ASSET_X, SecpTransferOutput::new(40, owners(&[a, b], 2))),
        false,
    );
    set.add(amount_utxo(2, ASSET_X, 40, &[b]), false);

    let unsigned = set
        .build_base_tx(&ctx(), 70, ASSET_X, &[addr(9)], &[a, b], &[a], &opts())
        .unwrap();
    let tx = unsigned.sign(&kc).unwrap();
    let digest = unsigned.signing_digest().unwrap();

    let mut ins: Vec<&TransferableInput> = base_of(&unsigned).ins.iter().collect();
    ins.sort_by(|x, y| x.utxo_id.cmp(&y.utxo_id));
    assert_eq!(tx.credentials.len(), ins.len());
    for (cred, input) in tx.credentials.iter().zip(ins) {
        assert_eq!(cred.kind, CredentialKind::Secp);
        assert_eq!(cred.signatures.len(), input.input.sig_idxs().len());
        for (sig, slot) in cred.signatures.iter().zip(input.input.sig_idxs()) {
            let pub_key = sig.recover(&digest).unwrap();
            assert_eq!(pub_key.address(), slot.source);
            let pair = kc.get_key(&slot.source).unwrap();
            assert!(pair.verify(&digest, sig, &pub_key));
        }
    }
    assert_eq!(tx.credentials[0].signatures.len(), 2);
}

#[test]
fn test_missing_key_is_an_error() {
    let (kc, a) = keychain();
    let stranger = addr(0x77);
    let mut set = UtxoSet::new();
    set.add(amount_utxo(1, ASSET_X, 10, &[stranger]), false);
    let unsigned = set
        .build_base_tx(&ctx(), 10, ASSET_X, &[a], &[stranger], &[], &opts())
        .unwrap();
    assert!(matches!(
        unsigned.sign(&kc),
        Err(TransactionError::MissingKey(missing)) if missing == stranger
    ));
}

#[test]
fn test_signed_tx_roundtrip_and_id() {
    let (kc, a) = keychain();
    let mut set = UtxoSet::new();
    set.add(amount_utxo(1, ASSET_X, 10, &[a]), false);
    set.add(amount_utxo(2, ASSET_X, 10, &[a]), false);
    let tx = set
        .build_base_tx(&ctx(), 15, ASSET_X, &[addr(9)], &[a], &[], &opts().with_memo(b"hi".to_vec()))
        .unwrap()
        .sign(&kc)
        .unwrap();

    let bytes = tx.to_bytes().unwrap();
    let back = Tx::from_bytes(&bytes).unwrap();
    assert_eq!(back.to_bytes().unwrap(), bytes);
    assert_eq!(back.credentials, tx.credentials);
    assert_eq!(back.id().unwrap(), tx.id().unwrap());

    let s = tx.to_cb58_string().unwrap();
    assert_eq!(Tx::from_cb58_string(&s).unwrap().to_bytes().unwrap(), bytes);
    assert_eq!(Tx::from_hex(&tx.to_hex().unwrap()).unwrap().to_bytes().unwrap(), bytes);
}

// -----------------------------------------------------------------------
// Codec fencing
// -----------------------------------------------------------------------

fn every_kind() -> Vec<Transaction> {
    let out = TransferableOutput::new(ASSET_X, SecpTransferOutput::new(7, owners(&[addr(1)], 1)));
    let mut input = SecpTransferInput::new(7);
    input.add_signature_idx(0, addr(1));
    let xin = TransferableInput::new(Id::new([3; 32]), 1, ASSET_X, input);
    let base = || BaseTx::new(5, Id::new([4; 32]), vec![out.clone()], vec![xin.clone()], b"m".to_vec());

    let mut states = InitialStates::new();
    states.add_output(SecpMintOutput::new(owners(&[addr(2)], 1)));
    let mut op = Operation::SecpMint(SecpMintOperation::new(
        SecpMintOutput::new(owners(&[addr(2)], 1)),
        SecpTransferOutput::new(9, owners(&[addr(3)], 1)),
    ));
    op.add_signature_idx(0, addr(2));
    let top = TransferableOperation::new(ASSET_X, vec![UtxoId::new(Id::new([6; 32]), 0)], op);

    vec![
        base().into(),
        CreateAssetTx::new(base(), "Coin".to_string(), "CN".to_string(), 9, states).into(),
        OperationTx::new(base(), vec![top]).into(),
        ImportTx::new(base(), Some(Id::new([7; 32])), vec![xin.clone()]).into(),
        ExportTx::new(base(), Some(Id::ZERO), vec![out.clone()]).into(),
    ]
}

#[test]
fn test_codec_fencing_every_kind() {
    for mut tx in every_kind() {
        for bad in [2u16, 3, u16::MAX] {
            assert!(matches!(tx.set_codec_id(bad), Err(TransactionError::CodecId(v)) if v == bad));
        }
        assert_eq!(tx.codec_id(), CodecId::Zero);
    }
}

#[test]
fn test_every_kind_roundtrips_under_both_codecs() {
    for codec in [0u16, 1] {
        for mut tx in every_kind() {
            tx.set_codec_id(codec).unwrap();
            let unsigned = UnsignedTx::new(tx);
            let bytes = unsigned.to_bytes().unwrap();
            assert_eq!(&bytes[..2], &codec.to_be_bytes());
            let back = UnsignedTx::from_bytes(&bytes).unwrap();
            assert_eq!(back.transaction.kind(), unsigned.transaction.kind());
            assert_eq!(back.transaction.codec_id().as_u16(), codec);
            assert_eq!(back.to_bytes().unwrap(), bytes);
        }
    }
}

#[test]
fn test_codec_one_bytes_rejected_as_codec_zero() {
    let mut tx = every_kind().remove(0);
    tx.set_codec_id(1).unwrap();
    let mut bytes = UnsignedTx::new(tx).to_bytes().unwrap();
    bytes[1] = 0;
    assert!(matches!(
        UnsignedTx::from_bytes(&bytes),
        Err(TransactionError::UnknownTypeId { codec: 0, .. })
    ));
}

#[test]
fn test_missing_chain_ids() {
    let base = BaseTx::new(1, Id::ZERO, vec![], vec![], vec![]);
    let import = UnsignedTx::new(ImportTx::new(base.clone(), None, vec![]));
    assert!(matches!(import.to_bytes(), Err(TransactionError::ChainId(_))));
    let export = UnsignedTx::new(ExportTx::new(base, None, vec![]));
    assert!(matches!(export.to_bytes(), Err(TransactionError::ChainId(_))));
}

// -----------------------------------------------------------------------
// Asset and operation builders
// -----------------------------------------------------------------------

#[test]
fn test_create_asset_tx() {
    let a = addr(1);
    let mut set = UtxoSet::new();
    set.add(amount_utxo(1, AVAX, 20, &[a]), false);
    let mut o = opts().with_fee(10);
    o.fee_asset_id = Some(AVAX);

    let mut states = InitialStates::new();
    states.add_output(SecpTransferOutput::new(1_000, owners(&[a], 1)));
    let unsigned = set
        .build_create_asset_tx(
            &ctx(),
            &[a],
            &[],
            states,
            "Token",
            "TKN",
            2,
            vec![SecpMintOutput::new(owners(&[a], 1))],
            &o,
        )
        .unwrap();
    let Transaction::CreateAsset(tx) = &unsigned.transaction else {
        panic!("expected a create asset tx");
    };
    assert_eq!(tx.name, "Token");
    assert_eq!(tx.denomination, 2);
    assert_eq!(tx.initial_states.outputs(SECP_FX_ID).len(), 2);
    assert_eq!(unsigned.burn(&AVAX), 10);
    assert_eq!(tx.base.outs[0].output.owners().addresses(), &[a]);

    let bytes = unsigned.to_bytes().unwrap();
    let decoded = UnsignedTx::from_bytes(&bytes).unwrap();
    assert_eq!(decoded.to_bytes().unwrap(), bytes);
    let Transaction::CreateAsset(back) = &decoded.transaction else {
        panic!("expected a create asset tx");
    };
    assert_eq!(back.initial_states, tx.initial_states);
}

#[test]
fn test_create_asset_field_limits() {
    let set = UtxoSet::new();
    let long_name = "n".repeat(129);
    for (name, symbol) in [(long_name.as_str(), "OK"), ("Fine", "TOOLONG")] {
        let res = set.build_create_asset_tx(
            &ctx(),
            &[addr(1)],
            &[],
            InitialStates::new(),
            name,
            symbol,
            0,
            vec![],
            &opts(),
        );
        assert!(matches!(res, Err(TransactionError::InvalidAssetField(_))));
    }
}

#[test]
fn test_out_of_range_denomination_falls_back() {
    let mut states = InitialStates::new();
    states.add_output(SecpMintOutput::new(owners(&[addr(1)], 1)));
    let tx = CreateAssetTx::new(
        BaseTx::new(1, Id::ZERO, vec![], vec![], vec![]),
        "Name".to_string(),
        "SYM".to_string(),
        33,
        states,
    );
    assert!(tx.name.is_empty());
    assert!(tx.symbol.is_empty());
    assert_eq!(tx.denomination, 0);
    assert!(tx.initial_states.is_empty());
}

#[test]
fn test_secp_mint_tx() {
    let (kc, a) = keychain();
    let mint_id = UtxoId::new(Id::new([5; 32]), 1);
    let mut set = UtxoSet::new();
    set.add(
        Utxo::new(mint_id.tx_id, 1, ASSET_X, SecpMintOutput::new(owners(&[addr(0x10), a], 1))),
        false,
    );
    set.add(amount_utxo(1, AVAX, 5, &[a]), false);
    let mut o = opts().with_fee(1);
    o.fee_asset_id = Some(AVAX);

    let unsigned = set
        .build_secp_mint_tx(
            &ctx(),
            SecpMintOutput::new(owners(&[a], 1)),
            SecpTransferOutput::new(500, owners(&[addr(9)], 1)),
            &[a],
            &[],
            &mint_id,
            &o,
        )
        .unwrap();
    let Transaction::Operation(tx) = &unsigned.transaction else {
        panic!("expected an operation tx");
    };
    assert_eq!(tx.ops.len(), 1);
    assert_eq!(tx.ops[0].utxo_ids, vec![mint_id]);
    let slots = tx.ops[0].operation.sig_idxs();
    let expected_idx = owners(&[addr(0x10), a], 1).address_index(&a).unwrap();
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].address_index, expected_idx);

    let signed = unsigned.sign(&kc).unwrap();
    assert_eq!(signed.credentials.len(), 2);
    assert!(signed.credentials.iter().all(|c| c.kind == CredentialKind::Secp));
}

#[test]
fn test_secp_mint_tx_lookup_errors() {
    let mut set = UtxoSet::new();
    set.add(amount_utxo(1, ASSET_X, 5, &[addr(1)]), false);
    let build = |id: UtxoId| {
        set.build_secp_mint_tx(
            &ctx(),
            SecpMintOutput::new(owners(&[addr(1)], 1)),
            SecpTransferOutput::new(1, owners(&[addr(1)], 1)),
            &[addr(1)],
            &[],
            &id,
            &opts(),
        )
    };
    assert!(matches!(
        build(UtxoId::new(Id::new([9; 32]), 0)),
        Err(TransactionError::UtxoNotFound(_))
    ));
    assert!(matches!(
        build(UtxoId::new(Id::new([1; 32]), 0)),
        Err(TransactionError::OutputType(_))
    ));
}

#[test]
fn test_nft_asset_mint_and_transfer() {
    let (kc, a) = keychain();
    let set = UtxoSet::new();
    let sets = vec![
        MinterSet::new(1, vec![a]).unwrap(),
        MinterSet::new(1, vec![a, addr(3)]).unwrap(),
    ];
    let create = set
        .build_create_nft_asset_tx(&ctx(), &[a], &[], &sets, "Art", "ART", &opts())
        .unwrap();
    let Transaction::CreateAsset(tx) = &create.transaction else {
        panic!("expected a create asset tx");
    };
    assert_eq!(tx.denomination, 0);
    let groups: Vec<u32> = tx
        .initial_states
        .outputs(NFT_FX_ID)
        .iter()
        .map(|o| match o {
            Output::NftMint(m) => m.group_id,
            other => panic!("unexpected output {:?}", other),
        })
        .collect();
    assert_eq!(groups, vec![0, 1]);

    // Mint from the group 0 authority.
    let asset = Id::new([0xcc; 32]);
    let mint_id = UtxoId::new(Id::new([0x21; 32]), 0);
    let mut set = UtxoSet::new();
    set.add(
        Utxo::new(mint_id.tx_id, 0, asset, NftMintOutput::new(0, owners(&[a], 1))),
        false,
    );
    let mint = set
        .build_create_nft_mint_tx(
            &ctx(),
            vec![owners(&[addr(9)], 1)],
            &[a],
            &[],
            &[mint_id],
            0,
            b"hello".to_vec(),
            &opts(),
        )
        .unwrap();
    let signed = mint.sign(&kc).unwrap();
    assert_eq!(signed.credentials.len(), 1);
    assert_eq!(signed.credentials[0].kind, CredentialKind::Nft);
    assert_eq!(signed.credentials[0].signatures.len(), 1);

    // Transfer an NFT.
    let nft_id = UtxoId::new(Id::new([0x22; 32]), 3);
    set.add(
        Utxo::new(nft_id.tx_id, 3, asset, NftTransferOutput::new(0, b"hello".to_vec(), owners(&[a], 1))),
        false,
    );
    let transfer = set
        .build_nft_transfer_tx(&ctx(), &[addr(9)], &[a], &[], &[nft_id], &opts())
        .unwrap();
    let Transaction::Operation(tx) = &transfer.transaction else {
        panic!("expected an operation tx");
    };
    let Operation::NftTransfer(op) = &tx.ops[0].operation else {
        panic!("expected an nft transfer");
    };
    assert_eq!(op.output.payload, b"hello");
    assert_eq!(op.output.owners.addresses(), &[addr(9)]);
    assert_eq!(tx.ops[0].utxo_ids, vec![nft_id]);

    // The mint authority is not an NFT.
    assert!(matches!(
        set.build_nft_transfer_tx(&ctx(), &[addr(9)], &[a], &[], &[mint_id], &opts()),
        Err(TransactionError::OutputType(_))
    ));
    assert!(matches!(
        set.build_create_nft_mint_tx(&ctx(), vec![], &[a], &[], &[nft_id], 0, vec![], &opts()),
        Err(TransactionError::OutputType(_))
    ));
}

// -----------------------------------------------------------------------
// Import and export
// -----------------------------------------------------------------------

#[test]
fn test_import_pays_fee_from_atomics() {
    let (kc, a) = keychain();
    let set = UtxoSet::new();
    let atomics = vec![amount_utxo(1, AVAX, 10, &[a]), amount_utxo(2, ASSET_X, 5, &[a])];
    let mut o = opts().with_fee(3);
    o.fee_asset_id = Some(AVAX);

    let unsigned = set
        .build_import_tx(&ctx(), &[addr(9)], &[a], &[], &atomics, Some(Id::new([0x55; 32])), &o)
        .unwrap();
    let Transaction::Import(tx) = &unsigned.transaction else {
        panic!("expected an import tx");
    };
    assert_eq!(tx.import_ins.len(), 2);
    assert!(tx.base.ins.is_empty());
    assert_eq!(unsigned.output_total(&AVAX), 7);
    assert_eq!(unsigned.output_total(&ASSET_X), 5);
    assert_eq!(unsigned.burn(&AVAX), 3);

    let signed = unsigned.sign(&kc).unwrap();
    assert_eq!(signed.credentials.len(), 2);
}

#[test]
fn test_import_selects_remaining_fee_locally() {
    let a = addr(1);
    let mut set = UtxoSet::new();
    set.add(amount_utxo(7, AVAX, 10, &[a]), false);
    let atomics = vec![amount_utxo(2, ASSET_X, 5, &[a])];
    let mut o = opts().with_fee(3);
    o.fee_asset_id = Some(AVAX);

    let unsigned = set
        .build_import_tx(&ctx(), &[addr(9)], &[a], &[a], &atomics, Some(Id::new([0x55; 32])), &o)
        .unwrap();
    let Transaction::Import(tx) = &unsigned.transaction else {
        panic!("expected an import tx");
    };
    assert_eq!(tx.base.ins.len(), 1);
    // The imported amount and the fee change are both kept.
    assert_eq!(tx.base.outs.len(), 2);
    assert_eq!(unsigned.output_total(&ASSET_X), 5);
    assert_eq!(unsigned.burn(&AVAX), 3);
}

#[test]
fn test_import_fee_change_returns_to_senders() {
    let a = addr(1);
    let mut set = UtxoSet::new();
    set.add(amount_utxo(7, AVAX, 10, &[a]), false);
    let atomics = vec![amount_utxo(2, ASSET_X, 5, &[a])];
    let mut o = opts().with_fee(3);
    o.fee_asset_id = Some(AVAX);

    let unsigned = set
        .build_import_tx(&ctx(), &[addr(9)], &[a], &[], &atomics, Some(Id::new([0x55; 32])), &o)
        .unwrap();
    let fee_change = base_of(&unsigned)
        .outs
        .iter()
        .find(|o| o.asset_id == AVAX)
        .unwrap();
    assert_eq!(fee_change.output.amount(), Some(7));
    assert_eq!(fee_change.output.owners().addresses(), &[a]);
}

#[test]
fn test_import_rejects_non_amount_atomic() {
    let set = UtxoSet::new();
    let atomics = vec![Utxo::new(Id::new([1; 32]), 0, ASSET_X, SecpMintOutput::new(owners(&[addr(1)], 1)))];
    assert!(matches!(
        set.build_import_tx(&ctx(), &[addr(9)], &[addr(1)], &[], &atomics, Some(Id::ZERO), &opts()),
        Err(TransactionError::OutputType(_))
    ));
}

#[test]
fn test_export_splits_payment_and_change() {
    let a = addr(1);
    let mut set = UtxoSet::new();
    set.add(amount_utxo(1, ASSET_X, 100, &[a]), false);
    let unsigned = set
        .build_export_tx(&ctx(), 60, ASSET_X, &[addr(9)], &[a], &[a], None, &opts().with_fee(1))
        .unwrap();
    let Transaction::Export(tx) = &unsigned.transaction else {
        panic!("expected an export tx");
    };
    assert_eq!(tx.destination_chain, Some(Id::ZERO));
    assert_eq!(tx.export_outs.len(), 1);
    assert_eq!(tx.export_outs[0].output.amount(), Some(60));
    assert_eq!(tx.base.outs.len(), 1);
    assert_eq!(tx.base.outs[0].output.amount(), Some(39));
    assert_eq!(unsigned.burn(&ASSET_X), 1);

    let unsigned = set
        .build_export_tx(&ctx(), 60, ASSET_X, &[addr(9)], &[a], &[], None, &opts())
        .unwrap();
    let Transaction::Export(tx) = &unsigned.transaction else {
        panic!("expected an export tx");
    };
    assert_eq!(tx.export_outs[0].output.amount(), Some(60));
    assert_eq!(tx.base.outs[0].output.owners().addresses(), &[a]);
    assert_eq!(tx.base.outs[0].output.amount(), Some(40));

    assert!(matches!(
        set.build_export_tx(&ctx(), 0, ASSET_X, &[addr(9)], &[a], &[a], None, &opts()),
        Err(TransactionError::InvalidAmount(_))
    ));
}

// -----------------------------------------------------------------------
// Genesis assets and vertices
// -----------------------------------------------------------------------

#[test]
fn test_genesis_asset_roundtrip() {
    let mut states = InitialStates::new();
    states.add_output(SecpTransferOutput::new(1_000_000, owners(&[addr(1)], 1)));
    let genesis = GenesisAsset::new(
        "asset1".to_string(),
        LOCAL_ID,
        b"genesis".to_vec(),
        "Asset One".to_string(),
        "ONE".to_string(),
        9,
        states,
    );
    let bytes = genesis.to_bytes();
    assert_eq!(&bytes[..2], &[0, 6]);
    assert_eq!(&bytes[8..12], &LOCAL_ID.to_be_bytes());
    assert_eq!(&bytes[12..44], &[0u8; 32]);
    assert_eq!(GenesisAsset::from_bytes(&bytes).unwrap(), genesis);
}

#[test]
fn test_genesis_asset_rejects_blockchain_id() {
    let genesis = GenesisAsset {
        asset_alias: "x".to_string(),
        create_asset: CreateAssetTx::new(
            BaseTx::new(1, Id::new([1; 32]), vec![], vec![], vec![]),
            "X".to_string(),
            "X".to_string(),
            0,
            InitialStates::new(),
        ),
    };
    assert!(matches!(
        GenesisAsset::from_bytes(&genesis.to_bytes()),
        Err(TransactionError::Serialization(_))
    ));
}

fn simple_tx(amount: u64) -> Tx {
    let out = TransferableOutput::new(ASSET_X, SecpTransferOutput::new(amount, owners(&[addr(1)], 1)));
    Tx::new(UnsignedTx::new(BaseTx::new(LOCAL_ID, Id::ZERO, vec![out], vec![], vec![])), vec![])
}

#[test]
fn test_vertex_roundtrip() {
    let vertex = Vertex::new(
        LOCAL_ID,
        Id::new([2; 32]),
        7,
        -1,
        vec![Id::new([3; 32]), Id::new([4; 32])],
        vec![simple_tx(1), simple_tx(2)],
        vec![Id::new([5; 32])],
    );
    let bytes = vertex.to_bytes().unwrap();
    assert_eq!(&bytes[42..46], &(-1i32).to_be_bytes());
    let back = Vertex::from_bytes(LOCAL_ID, &bytes).unwrap();
    assert_eq!(back, vertex);
    assert_eq!(back.id().unwrap(), vertex.id().unwrap());
}

#[test]
fn test_vertex_restrictions_are_optional() {
    let vertex = Vertex::new(LOCAL_ID, Id::ZERO, 0, 0, vec![], vec![simple_tx(1)], vec![]);
    let bytes = vertex.to_bytes().unwrap();
    // Empty restriction count round-trips to no restrictions.
    assert_eq!(Vertex::from_bytes(LOCAL_ID, &bytes).unwrap(), vertex);
    // So does a buffer that stops right after the transactions.
    let short = &bytes[..bytes.len() - 4];
    assert_eq!(Vertex::from_bytes(LOCAL_ID, short).unwrap(), vertex);
}

#[test]
fn test_vertex_with_signed_tx() {
    let (kc, a) = keychain();
    let mut set = UtxoSet::new();
    set.add(amount_utxo(1, ASSET_X, 10, &[a]), false);
    let tx = set
        .build_base_tx(&ctx(), 4, ASSET_X, &[addr(9)], &[a], &[], &opts())
        .unwrap()
        .sign(&kc)
        .unwrap();
    let vertex = Vertex::new(LOCAL_ID, Id::ZERO, 1, 0, vec![Id::new([1; 32])], vec![tx], vec![]);
    let bytes = vertex.to_bytes().unwrap();
    let back = Vertex::from_bytes(LOCAL_ID, &bytes).unwrap();
    assert_eq!(back.to_bytes().unwrap(), bytes);
    assert_eq!(back.txs[0].credentials, vertex.txs[0].credentials);
}

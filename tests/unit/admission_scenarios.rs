//! Admission Scenario Tests
//!
//! Drives `identify_admissible_outputs` with serialised envelopes the way the
//! overlay framework does, covering issuance, split, merge, over-spend, burn
//! and metadata pinning.

use btms_overlay::engine::{BtmsTopicManager, TopicManager};
use btms_overlay::types::{AdmissionDecision, TokenFields};

use crate::common::{
    envelope, outpoint, plain_script, raw_push_drop, token_script, transaction, Mint, ALICE, BOB,
};

fn decide(bytes: &[u8], previous_coins: &[u32]) -> AdmissionDecision {
    BtmsTopicManager::default().identify_admissible_outputs(bytes, previous_coins)
}

fn decision(outputs_to_admit: &[u32], coins_to_retain: &[u32]) -> AdmissionDecision {
    AdmissionDecision {
        outputs_to_admit: outputs_to_admit.to_vec(),
        coins_to_retain: coins_to_retain.to_vec(),
    }
}

/// Spend `mint`'s output 0 into `amounts` of its asset
fn transfer(mint: &Mint, amounts: &[u64]) -> Vec<u8> {
    let outputs = amounts
        .iter()
        .map(|&amount| token_script(&TokenFields::transfer(&mint.asset_id, amount, None), BOB))
        .collect();
    let tx = transaction(&[mint.outpoint()], outputs);
    envelope(&[&mint.tx], &tx)
}

#[test]
fn test_issuance_admitted() {
    let mint = Mint::new(100, None, ALICE);
    let bytes = envelope(&[], &mint.tx);
    assert_eq!(decide(&bytes, &[]), decision(&[0], &[]));
}

#[test]
fn test_issuance_with_fractional_amount_rejected() {
    let tx = transaction(&[], vec![raw_push_drop(&[b"ISSUE", b"1.5"], ALICE)]);
    assert_eq!(decide(&envelope(&[], &tx), &[]), decision(&[], &[]));
}

#[test]
fn test_issuance_to_non_point_key_rejected() {
    let not_a_point = "05".repeat(33);
    let tx = transaction(&[], vec![raw_push_drop(&[b"ISSUE", b"100"], &not_a_point)]);
    assert_eq!(decide(&envelope(&[], &tx), &[]), decision(&[], &[]));
}

#[test]
fn test_transfer_to_non_point_key_rejected() {
    let mint = Mint::new(100, None, ALICE);
    let not_a_point = "05".repeat(33);
    let spend = transaction(
        &[mint.outpoint()],
        vec![
            raw_push_drop(&[mint.asset_id.as_bytes(), b"40"], &not_a_point),
            token_script(&TokenFields::transfer(&mint.asset_id, 60, None), BOB),
        ],
    );
    assert_eq!(
        decide(&envelope(&[&mint.tx], &spend), &[0]),
        decision(&[1], &[0])
    );
}

#[test]
fn test_issuance_amount_ceiling() {
    let largest = (i64::MAX as u64).to_string();
    let tx = transaction(&[], vec![raw_push_drop(&[b"ISSUE", largest.as_bytes()], ALICE)]);
    assert_eq!(decide(&envelope(&[], &tx), &[]), decision(&[0], &[]));

    for over in ["9223372036854775808", "10000000000000000000"] {
        let tx = transaction(&[], vec![raw_push_drop(&[b"ISSUE", over.as_bytes()], ALICE)]);
        assert_eq!(decide(&envelope(&[], &tx), &[]), decision(&[], &[]), "amount {}", over);
    }
}

#[test]
fn test_malformed_amounts_rejected_everywhere() {
    let mint = Mint::new(100, None, ALICE);
    let malformed: [&[u8]; 7] = [b"-5", b"+5", b"0", b"1e3", b"", b" 5", b"0x10"];
    for amount in malformed {
        let issuance = transaction(&[], vec![raw_push_drop(&[b"ISSUE", amount], ALICE)]);
        assert_eq!(decide(&envelope(&[], &issuance), &[]), decision(&[], &[]));

        let spend = transaction(
            &[mint.outpoint()],
            vec![raw_push_drop(&[mint.asset_id.as_bytes(), amount], BOB)],
        );
        assert_eq!(
            decide(&envelope(&[&mint.tx], &spend), &[0]),
            decision(&[], &[]),
            "amount {:?}",
            String::from_utf8_lossy(amount)
        );
    }
}

#[test]
fn test_split() {
    let mint = Mint::new(100, None, ALICE);
    assert_eq!(decide(&transfer(&mint, &[75, 25]), &[0]), decision(&[0, 1], &[0]));
}

#[test]
fn test_over_spend_truncates() {
    let mint = Mint::new(100, None, ALICE);
    assert_eq!(decide(&transfer(&mint, &[75, 35]), &[0]), decision(&[0], &[0]));
}

#[test]
fn test_rejected_output_still_counts_toward_total() {
    let mint = Mint::new(100, None, ALICE);
    // 75 fits, 75+35 does not, and 75+35+25 still does not
    assert_eq!(
        decide(&transfer(&mint, &[75, 35, 25]), &[0]),
        decision(&[0], &[0])
    );
}

#[test]
fn test_exact_spend_and_single_overflow() {
    let mint = Mint::new(100, None, ALICE);
    assert_eq!(decide(&transfer(&mint, &[100]), &[0]), decision(&[0], &[0]));
    assert_eq!(decide(&transfer(&mint, &[101]), &[0]), decision(&[], &[]));
}

#[test]
fn test_merge_two_coins_of_one_asset() {
    let mint = Mint::new(100, None, ALICE);
    let split_tx = transaction(
        &[mint.outpoint()],
        vec![
            token_script(&TokenFields::transfer(&mint.asset_id, 60, None), ALICE),
            token_script(&TokenFields::transfer(&mint.asset_id, 40, None), ALICE),
        ],
    );
    let split_txid = split_tx.compute_txid();

    let merge_tx = transaction(
        &[outpoint(split_txid, 0), outpoint(split_txid, 1)],
        vec![token_script(&TokenFields::transfer(&mint.asset_id, 100, None), BOB)],
    );
    let bytes = envelope(&[&mint.tx, &split_tx], &merge_tx);
    assert_eq!(decide(&bytes, &[0, 1]), decision(&[0], &[0, 1]));

    // Only the 40 coin declared as previously admitted
    assert_eq!(decide(&bytes, &[1]), decision(&[], &[]));
}

#[test]
fn test_burn_of_two_assets() {
    let first = Mint::new(100, None, ALICE);
    let second = Mint::new(7, None, BOB);
    let burn = transaction(
        &[first.outpoint(), second.outpoint()],
        vec![plain_script()],
    );
    let bytes = envelope(&[&first.tx, &second.tx], &burn);
    assert_eq!(decide(&bytes, &[0, 1]), decision(&[], &[]));
}

#[test]
fn test_partial_burn_retains_only_carried_asset() {
    let first = Mint::new(100, None, ALICE);
    let second = Mint::new(7, None, BOB);
    let tx = transaction(
        &[first.outpoint(), second.outpoint()],
        vec![token_script(&TokenFields::transfer(&first.asset_id, 10, None), BOB)],
    );
    let bytes = envelope(&[&first.tx, &second.tx], &tx);
    let result = decide(&bytes, &[0, 1]);
    assert_eq!(result, decision(&[0], &[0]));
    assert_eq!(result.coins_removed(&[0, 1]), vec![1]);
}

#[test]
fn test_transfer_of_unspent_asset_rejected() {
    let mint = Mint::new(100, None, ALICE);
    let other = Mint::new(50, None, BOB);
    // Spends `other` but claims `mint`'s asset
    let tx = transaction(
        &[other.outpoint()],
        vec![token_script(&TokenFields::transfer(&mint.asset_id, 10, None), BOB)],
    );
    let bytes = envelope(&[&other.tx], &tx);
    assert_eq!(decide(&bytes, &[0]), decision(&[], &[]));
}

#[test]
fn test_issuance_alongside_transfer_is_independent() {
    let mint = Mint::new(100, None, ALICE);
    let tx = transaction(
        &[mint.outpoint()],
        vec![
            token_script(&TokenFields::issuance(1_000_000, None), BOB),
            token_script(&TokenFields::transfer(&mint.asset_id, 100, None), BOB),
        ],
    );
    let bytes = envelope(&[&mint.tx], &tx);
    assert_eq!(decide(&bytes, &[0]), decision(&[0, 1], &[0]));
}

#[test]
fn test_metadata_pinning() {
    let mint = Mint::new(100, Some("gold"), ALICE);
    let outputs = vec![
        token_script(&TokenFields::transfer(&mint.asset_id, 10, Some("gold")), BOB),
        token_script(&TokenFields::transfer(&mint.asset_id, 10, Some("silver")), BOB),
        token_script(&TokenFields::transfer(&mint.asset_id, 10, None), BOB),
    ];
    let tx = transaction(&[mint.outpoint()], outputs);
    let bytes = envelope(&[&mint.tx], &tx);
    assert_eq!(decide(&bytes, &[0]), decision(&[0], &[0]));
}

#[test]
fn test_signed_issuance_then_unsigned_transfer() {
    let mint = Mint::from_fields(
        &TokenFields::issuance(100, None).with_signature(vec![0x30; 65]),
        ALICE,
    );
    assert_eq!(decide(&envelope(&[], &mint.tx), &[]), decision(&[0], &[]));

    // The 65-byte field was a signature, so the asset has no metadata
    let tx = transaction(
        &[mint.outpoint()],
        vec![token_script(&TokenFields::transfer(&mint.asset_id, 100, None), BOB)],
    );
    assert_eq!(
        decide(&envelope(&[&mint.tx], &tx), &[0]),
        decision(&[0], &[0])
    );
}

#[test]
fn test_field_count_boundary() {
    let too_few = transaction(&[], vec![raw_push_drop(&[b"ISSUE"], ALICE)]);
    assert_eq!(decide(&envelope(&[], &too_few), &[]), decision(&[], &[]));

    let too_many = transaction(
        &[],
        vec![raw_push_drop(&[b"ISSUE", b"5", b"meta", &[1; 64], b"extra"], ALICE)],
    );
    assert_eq!(decide(&envelope(&[], &too_many), &[]), decision(&[], &[]));

    let four = transaction(
        &[],
        vec![raw_push_drop(&[b"ISSUE", b"5", b"meta", &[1; 64]], ALICE)],
    );
    assert_eq!(decide(&envelope(&[], &four), &[]), decision(&[0], &[]));
}

#[test]
fn test_non_token_prior_coin_ignored() {
    let funding = transaction(&[], vec![plain_script()]);
    let mint = Mint::new(5, None, ALICE);
    let tx = transaction(
        &[outpoint(funding.compute_txid(), 0), mint.outpoint()],
        vec![token_script(&TokenFields::transfer(&mint.asset_id, 5, None), BOB)],
    );
    let bytes = envelope(&[&funding, &mint.tx], &tx);
    assert_eq!(decide(&bytes, &[0, 1]), decision(&[0], &[1]));
}

#[test]
fn test_fail_closed() {
    let mint = Mint::new(100, None, ALICE);
    let tx = transaction(
        &[mint.outpoint()],
        vec![token_script(&TokenFields::transfer(&mint.asset_id, 100, None), BOB)],
    );

    // Source transaction missing from the envelope
    assert_eq!(decide(&envelope(&[], &tx), &[0]), decision(&[], &[]));

    // Previous coin index beyond the inputs
    let bytes = envelope(&[&mint.tx], &tx);
    assert_eq!(decide(&bytes, &[0, 3]), decision(&[], &[]));

    // Unparsable envelope
    assert_eq!(decide(&bytes[..bytes.len() - 3], &[0]), decision(&[], &[]));
    assert_eq!(decide(&[], &[]), decision(&[], &[]));
}

#[test]
fn test_conservation_holds_across_splits() {
    let mint = Mint::new(1_000, None, ALICE);
    let splits: [&[u64]; 5] = [
        &[500, 500],
        &[999, 2],
        &[1, 1, 1, 997],
        &[400, 700, 600],
        &[1_001],
    ];

    for amounts in splits {
        let result = decide(&transfer(&mint, amounts), &[0]);
        let admitted: u64 = result
            .outputs_to_admit
            .iter()
            .map(|&i| amounts[i as usize])
            .sum();
        assert!(admitted <= 1_000, "{:?} admitted {}", amounts, admitted);
        assert_eq!(result.coins_to_retain.is_empty(), result.outputs_to_admit.is_empty());
    }
}

#[test]
fn test_stateless_across_calls() {
    let mint = Mint::new(100, None, ALICE);
    let bytes = transfer(&mint, &[100]);
    let manager = BtmsTopicManager::default();
    for _ in 0..3 {
        assert_eq!(
            manager.identify_admissible_outputs(&bytes, &[0]),
            decision(&[0], &[0])
        );
    }
}

#[test]
fn test_previous_coins_reported_ascending() {
    let first = Mint::new(10, None, ALICE);
    let second = Mint::new(20, None, ALICE);
    let tx = transaction(
        &[first.outpoint(), second.outpoint()],
        vec![
            token_script(&TokenFields::transfer(&second.asset_id, 20, None), BOB),
            token_script(&TokenFields::transfer(&first.asset_id, 10, None), BOB),
        ],
    );
    let bytes = envelope(&[&first.tx, &second.tx], &tx);
    assert_eq!(decide(&bytes, &[1, 0]), decision(&[0, 1], &[0, 1]));
}

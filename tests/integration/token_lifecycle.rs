//! Token Lifecycle Tests
//!
//! Mint, split, transfer and burn an asset, feeding every admission decision
//! into the lookup service the way the overlay framework would.

use anyhow::Result;
use bitcoin::Transaction;
use btms_overlay::cli::commands::submit::apply_decision;
use btms_overlay::cli::{Cli, Commands};
use btms_overlay::database::{Database, IndexStore};
use btms_overlay::engine::{BtmsTopicManager, TopicManager};
use btms_overlay::lookup::{include_in_history, BtmsLookupService, LookupService};
use btms_overlay::types::{AdmissionDecision, LookupQuestion, TokenFields};
use clap::Parser;
use serde_json::json;

use crate::common::database::TestDatabase;
use crate::common::{
    envelope, outpoint, plain_script, raw_push_drop, token_script, transaction, ALICE, BOB,
};

/// Framework stand-in: admit, then report admissions and spends
struct Overlay {
    manager: BtmsTopicManager,
    service: BtmsLookupService<Database>,
}

impl Overlay {
    fn new(db: Database) -> Self {
        Self {
            manager: BtmsTopicManager::default(),
            service: BtmsLookupService::new(db),
        }
    }

    fn submit(
        &self,
        ancestors: &[&Transaction],
        tx: &Transaction,
        previous_coins: &[u32],
    ) -> Result<AdmissionDecision> {
        let bytes = envelope(ancestors, tx);
        let decision = self.manager.identify_admissible_outputs(&bytes, previous_coins);
        apply_decision(&self.service, "tm_btms", tx, &decision, previous_coins)?;
        Ok(decision)
    }

    fn holdings(&self, owner: &str) -> Result<Vec<(String, u32)>> {
        let answer = self.service.lookup(&LookupQuestion {
            service: "ls_btms".to_string(),
            query: json!({ "ownerKey": owner, "sortOrder": "asc" }),
        })?;
        Ok(answer
            .outputs()
            .iter()
            .map(|o| (o.txid.clone(), o.output_index))
            .collect())
    }
}

#[test]
fn test_mint_split_transfer_burn() -> Result<()> {
    let test_db = TestDatabase::new()?;
    let overlay = Overlay::new(test_db.db);

    // Mint 100 to Alice
    let mint = transaction(&[], vec![token_script(&TokenFields::issuance(100, Some("gold")), ALICE)]);
    let mint_txid = mint.compute_txid();
    let asset_id = format!("{}.0", mint_txid);
    assert_eq!(overlay.submit(&[], &mint, &[])?.outputs_to_admit, vec![0]);
    assert_eq!(overlay.holdings(ALICE)?, vec![(mint_txid.to_string(), 0)]);

    // Alice pays Bob 30 and keeps 70
    let split = transaction(
        &[outpoint(mint_txid, 0)],
        vec![
            token_script(&TokenFields::transfer(&asset_id, 30, Some("gold")), BOB),
            token_script(&TokenFields::transfer(&asset_id, 70, Some("gold")), ALICE),
        ],
    );
    let split_txid = split.compute_txid();
    let decision = overlay.submit(&[&mint], &split, &[0])?;
    assert_eq!(decision.outputs_to_admit, vec![0, 1]);
    assert_eq!(decision.coins_to_retain, vec![0]);
    assert_eq!(overlay.holdings(ALICE)?, vec![(split_txid.to_string(), 1)]);
    assert_eq!(overlay.holdings(BOB)?, vec![(split_txid.to_string(), 0)]);

    // Bob tries to pay out 31 from his 30: rejected, nothing indexed for it
    let overdraw = transaction(
        &[outpoint(split_txid, 0)],
        vec![token_script(&TokenFields::transfer(&asset_id, 31, Some("gold")), ALICE)],
    );
    let decision = overlay.submit(&[&mint, &split], &overdraw, &[0])?;
    assert!(decision.is_empty());
    assert_eq!(decision.coins_removed(&[0]), vec![0]);

    // Alice burns her 70
    let burn = transaction(&[outpoint(split_txid, 1)], vec![plain_script()]);
    assert!(overlay.submit(&[&mint, &split], &burn, &[0])?.is_empty());
    assert!(overlay.holdings(ALICE)?.is_empty());

    // Everything left of the asset: nothing, Bob's coin was spent by the overdraw
    let remaining = overlay.service.lookup(&LookupQuestion {
        service: "ls_btms".to_string(),
        query: json!({ "assetId": asset_id }),
    })?;
    assert!(remaining.outputs().is_empty());
    assert_eq!(overlay.service.store().count()?, 0);
    Ok(())
}

#[test]
fn test_history_selector_follows_one_asset() -> Result<()> {
    let test_db = TestDatabase::new()?;
    let overlay = Overlay::new(test_db.db);

    let gold = transaction(&[], vec![token_script(&TokenFields::issuance(10, None), ALICE)]);
    let silver = transaction(&[], vec![token_script(&TokenFields::issuance(20, None), ALICE)]);
    let gold_id = format!("{}.0", gold.compute_txid());
    let silver_id = format!("{}.0", silver.compute_txid());
    overlay.submit(&[], &gold, &[])?;
    overlay.submit(&[], &silver, &[])?;

    // One transaction moves both assets
    let swap = transaction(
        &[outpoint(gold.compute_txid(), 0), outpoint(silver.compute_txid(), 0)],
        vec![
            token_script(&TokenFields::transfer(&gold_id, 10, None), BOB),
            token_script(&TokenFields::transfer(&silver_id, 20, None), BOB),
        ],
    );
    let decision = overlay.submit(&[&gold, &silver], &swap, &[0, 1])?;
    assert_eq!(decision.outputs_to_admit, vec![0, 1]);

    let answer = overlay.service.lookup(&LookupQuestion {
        service: "ls_btms".to_string(),
        query: json!({ "assetId": gold_id, "history": true }),
    })?;
    assert_eq!(answer.outputs().len(), 1);
    let selector = answer.outputs()[0].history.clone().unwrap();
    assert_eq!(selector.asset_id, gold_id);

    // Walking back from the swap, only gold outputs stay in the proof
    let swap_beef = envelope(&[&gold, &silver], &swap);
    assert!(include_in_history(&swap_beef, 0, &selector.asset_id));
    assert!(!include_in_history(&swap_beef, 1, &selector.asset_id));

    let gold_beef = envelope(&[], &gold);
    let silver_beef = envelope(&[], &silver);
    assert!(include_in_history(&gold_beef, 0, &selector.asset_id));
    assert!(!include_in_history(&silver_beef, 0, &selector.asset_id));
    Ok(())
}

#[test]
fn test_every_admitted_output_is_indexable() -> Result<()> {
    let test_db = TestDatabase::new()?;
    let overlay = Overlay::new(test_db.db);

    let not_a_point = "05".repeat(33);
    let largest = (i64::MAX as u64).to_string();
    let mint = transaction(
        &[],
        vec![
            raw_push_drop(&[b"ISSUE", b"100"], &not_a_point),
            raw_push_drop(&[b"ISSUE", b"10000000000000000000"], ALICE),
            raw_push_drop(&[b"ISSUE", largest.as_bytes()], ALICE),
        ],
    );
    let decision = overlay.submit(&[], &mint, &[])?;
    assert_eq!(decision.outputs_to_admit, vec![2]);

    let record = overlay
        .service
        .store()
        .find_by_outpoint(&mint.compute_txid().to_string(), 2)?
        .expect("largest issuance indexed");
    assert_eq!(record.amount, i64::MAX as u64);
    assert_eq!(overlay.service.store().count()?, 1);
    Ok(())
}

#[test]
fn test_cli_arguments_parse() {
    let cli = Cli::try_parse_from([
        "btms-overlay",
        "submit",
        "--beef",
        "tx.beef",
        "--previous-coins",
        "0,2",
        "--encoding",
        "hex",
    ])
    .unwrap();
    match cli.command {
        Commands::Submit(command) => assert_eq!(command.previous_coins, vec![0, 2]),
        _ => panic!("expected submit"),
    }

    let cli = Cli::try_parse_from(["btms-overlay", "lookup", "--sort", "asc", "--history"]).unwrap();
    assert!(matches!(cli.command, Commands::Lookup(ref c) if c.history));

    assert!(Cli::try_parse_from(["btms-overlay", "lookup", "--sort", "sideways"]).is_err());
}

use crate::beef::Beef;
use crate::cli::commands::{load_config, open_database, print_json, read_envelope, EnvelopeEncoding};
use crate::database::IndexStore;
use crate::engine::BtmsTopicManager;
use crate::errors::AppResult;
use crate::logging::TracingLogger;
use crate::lookup::{BtmsLookupService, LookupService};
use crate::types::{AdmissionDecision, OutputAdmittedPayload, OutputSpentPayload};
use bitcoin::Transaction;
use clap::Args;
use serde_json::json;
use std::path::PathBuf;
use tracing::info;

/// Admit an envelope and apply the decision to the index
///
/// Plays the overlay framework's part: admitted outputs are reported to the
/// lookup service, then every spent previous coin is reported as spent.
#[derive(Args)]
pub struct SubmitCommand {
    /// Path to the BEEF envelope
    #[arg(long)]
    pub beef: PathBuf,

    /// Input indices that spend previously admitted coins
    #[arg(long, value_delimiter = ',')]
    pub previous_coins: Vec<u32>,

    /// Envelope file encoding
    #[arg(long, value_enum, default_value_t = EnvelopeEncoding::Binary)]
    pub encoding: EnvelopeEncoding,

    /// Database path (overrides config.toml and env vars)
    #[arg(long)]
    pub database_path: Option<PathBuf>,
}

impl SubmitCommand {
    pub fn run(&self) -> AppResult<()> {
        let config = load_config()?;
        let database = open_database(self.database_path.as_ref(), &config)?;
        let service = BtmsLookupService::from_config(database, &config);
        let manager = BtmsTopicManager::new(
            &config.overlay.topic_name,
            TracingLogger::shared("topic_manager"),
        );

        let bytes = read_envelope(&self.beef, self.encoding)?;
        let beef = Beef::from_bytes(&bytes)?;
        let (tx, txid) = beef.anchor()?;
        let txid_hex = txid.to_string();

        let decision = manager.admit(&beef, &self.previous_coins);

        apply_decision(
            &service,
            &config.overlay.topic_name,
            tx,
            &decision,
            &self.previous_coins,
        )?;

        info!(
            "Submitted {}: {} outputs indexed, {} records in index",
            txid_hex,
            decision.outputs_to_admit.len(),
            service.store().count()?
        );

        print_json(&json!({
            "txid": txid_hex,
            "outputsToAdmit": decision.outputs_to_admit,
            "coinsToRetain": decision.coins_to_retain,
            "coinsRemoved": decision.coins_removed(&self.previous_coins),
        }))
    }
}

/// Report an admission decision for `tx` to the lookup service
///
/// Admissions go first so that a failed insert leaves the spent inputs indexed.
pub fn apply_decision(
    service: &impl LookupService,
    topic: &str,
    tx: &Transaction,
    decision: &AdmissionDecision,
    previous_coins: &[u32],
) -> AppResult<()> {
    let txid = tx.compute_txid().to_string();

    for &output_index in &decision.outputs_to_admit {
        let Some(output) = tx.output.get(output_index as usize) else {
            continue;
        };
        service.output_admitted_by_topic(&OutputAdmittedPayload::LockingScript {
            topic: topic.to_string(),
            txid: txid.clone(),
            output_index,
            locking_script: output.script_pubkey.clone(),
        })?;
    }

    for &input_index in previous_coins {
        let Some(input) = tx.input.get(input_index as usize) else {
            continue;
        };
        service.output_spent(&OutputSpentPayload {
            topic: topic.to_string(),
            txid: input.previous_output.txid.to_string(),
            output_index: input.previous_output.vout,
        })?;
    }
    Ok(())
}

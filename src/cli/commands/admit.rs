use crate::beef::Beef;
use crate::cli::commands::{print_json, read_envelope, EnvelopeEncoding};
use crate::engine::BtmsTopicManager;
use crate::errors::AppResult;
use clap::Args;
use serde_json::json;
use std::path::PathBuf;
use tracing::info;

/// Evaluate admission for an envelope without touching the index
#[derive(Args)]
pub struct AdmitCommand {
    /// Path to the BEEF envelope
    #[arg(long)]
    pub beef: PathBuf,

    /// Input indices that spend previously admitted coins
    #[arg(long, value_delimiter = ',')]
    pub previous_coins: Vec<u32>,

    /// Envelope file encoding
    #[arg(long, value_enum, default_value_t = EnvelopeEncoding::Binary)]
    pub encoding: EnvelopeEncoding,
}

impl AdmitCommand {
    pub fn run(&self) -> AppResult<()> {
        let bytes = read_envelope(&self.beef, self.encoding)?;
        let beef = Beef::from_bytes(&bytes)?;
        let (_, txid) = beef.anchor()?;
        info!("Evaluating admission for {}", txid);

        let decision = BtmsTopicManager::default().admit(&beef, &self.previous_coins);
        print_json(&json!({
            "txid": txid.to_string(),
            "outputsToAdmit": decision.outputs_to_admit,
            "coinsToRetain": decision.coins_to_retain,
            "coinsRemoved": decision.coins_removed(&self.previous_coins),
        }))
    }
}

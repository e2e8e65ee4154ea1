//! Admission engine
//!
//! Decides, for one candidate transaction, which outputs become BTMS tokens
//! and which previously-admitted inputs live on in those outputs. The decision
//! is a pure function of the envelope and the caller's list of previous coins.
//!
//! ## Rules
//!
//! 1. Spent coins that decode as tokens credit a per-asset allowance.
//! 2. Issuance outputs are admitted whenever they decode.
//! 3. Transfer outputs draw on the allowance in output order and must repeat
//!    the asset's metadata exactly.
//! 4. A spent coin is retained when an admitted output carries its asset id.
//!
//! Any error while evaluating yields an empty decision.

pub mod conservation;

pub use conservation::{ConservationLedger, Rejection};

use crate::beef::Beef;
use crate::codec;
use crate::errors::{AppError, AppResult};
use crate::logging::{EventLogger, TracingLogger};
use crate::types::{AdmissionDecision, DecodedToken, ServiceMetadata};
use std::collections::HashSet;
use std::sync::Arc;

pub const DEFAULT_TOPIC_NAME: &str = "tm_btms";

/// Overlay topic manager contract
pub trait TopicManager {
    /// Evaluate a serialised envelope whose anchor is the candidate transaction
    fn identify_admissible_outputs(&self, beef: &[u8], previous_coins: &[u32])
        -> AdmissionDecision;

    fn documentation(&self) -> String;

    fn metadata(&self) -> ServiceMetadata;
}

/// BTMS admission rules
pub struct BtmsTopicManager {
    topic_name: String,
    logger: Arc<dyn EventLogger>,
}

impl Default for BtmsTopicManager {
    fn default() -> Self {
        Self::new(DEFAULT_TOPIC_NAME, TracingLogger::shared("topic_manager"))
    }
}

/// A spent coin that decoded as a token
struct PriorCoin {
    input_index: u32,
    asset_id: String,
}

impl BtmsTopicManager {
    pub fn new(topic_name: &str, logger: Arc<dyn EventLogger>) -> Self {
        Self {
            topic_name: topic_name.to_string(),
            logger,
        }
    }

    pub fn topic_name(&self) -> &str {
        &self.topic_name
    }

    /// Decide admission for the envelope's anchor transaction
    pub fn admit(&self, beef: &Beef, previous_coins: &[u32]) -> AdmissionDecision {
        match self.evaluate(beef, previous_coins) {
            Ok(decision) => decision,
            Err(e) => {
                self.logger
                    .warn(&format!("Admission failed closed, nothing admitted: {}", e));
                AdmissionDecision::empty()
            }
        }
    }

    fn evaluate(&self, beef: &Beef, previous_coins: &[u32]) -> AppResult<AdmissionDecision> {
        let (tx, txid) = beef.anchor()?;
        let txid = txid.to_string();

        let mut previous: Vec<u32> = previous_coins.to_vec();
        previous.sort_unstable();
        previous.dedup();

        let mut ledger = ConservationLedger::default();
        let mut prior_coins = Vec::new();
        for input_index in previous {
            let source = beef.resolve_source_output(tx, input_index)?;
            let outpoint = tx.input[input_index as usize].previous_output;

            let token = match codec::decode(&source.script_pubkey) {
                Ok(token) => token,
                Err(e) => {
                    self.logger.info(&format!(
                        "Ignoring previous coin at input {} ({}): {}",
                        input_index, outpoint, e
                    ));
                    continue;
                }
            };

            let asset_id = token.canonical_asset_id(&outpoint.txid.to_string(), outpoint.vout);
            ledger.credit(&asset_id, token.amount(), token.metadata())?;
            prior_coins.push(PriorCoin {
                input_index,
                asset_id,
            });
        }

        let mut outputs_to_admit = Vec::new();
        let mut admitted_assets = HashSet::new();
        for (index, output) in tx.output.iter().enumerate() {
            let output_index = u32::try_from(index)
                .map_err(|_| AppError::InvalidData(format!("output index {} exceeds u32", index)))?;

            let token = match codec::decode(&output.script_pubkey) {
                Ok(token) => token,
                Err(_) => continue,
            };

            match &token {
                DecodedToken::Issuance { amount, .. } => {
                    self.logger.info(&format!(
                        "Admitting issuance {}.{} of {}",
                        txid, output_index, amount
                    ));
                }
                DecodedToken::Transfer {
                    asset_id,
                    amount,
                    metadata,
                    ..
                } => {
                    if let Err(rejection) = ledger.claim(asset_id, *amount, metadata.as_deref()) {
                        self.logger.info(&format!(
                            "Rejecting output {} of {} for asset {}: {}",
                            output_index, txid, asset_id, rejection
                        ));
                        continue;
                    }
                }
            }

            admitted_assets.insert(token.raw_asset_id().to_string());
            outputs_to_admit.push(output_index);
        }

        let coins_to_retain: Vec<u32> = prior_coins
            .iter()
            .filter(|coin| admitted_assets.contains(&coin.asset_id))
            .map(|coin| coin.input_index)
            .collect();

        self.logger.info(&format!(
            "Transaction {}: admitted {} outputs, retained {} of {} previous coins",
            txid,
            outputs_to_admit.len(),
            coins_to_retain.len(),
            previous_coins.len()
        ));

        Ok(AdmissionDecision {
            outputs_to_admit,
            coins_to_retain,
        })
    }
}

impl TopicManager for BtmsTopicManager {
    fn identify_admissible_outputs(
        &self,
        beef: &[u8],
        previous_coins: &[u32],
    ) -> AdmissionDecision {
        match Beef::from_bytes(beef) {
            Ok(beef) => self.admit(&beef, previous_coins),
            Err(e) => {
                self.logger
                    .warn(&format!("Admission failed closed, unreadable BEEF: {}", e));
                AdmissionDecision::empty()
            }
        }
    }

    fn documentation(&self) -> String {
        TOPIC_DOCUMENTATION.to_string()
    }

    fn metadata(&self) -> ServiceMetadata {
        ServiceMetadata {
            name: "BTMS Topic Manager".to_string(),
            short_description: "Basic Token Management System fungible tokens".to_string(),
        }
    }
}

const TOPIC_DOCUMENTATION: &str = r#"# BTMS Topic Manager

Admits push-drop token outputs of the form
`<owner key> OP_CHECKSIG <asset id> <amount> [<metadata>] [<signature>] OP_DROP...`.

- An asset id of `ISSUE` mints a new asset whose id becomes `<txid>.<output index>`.
- Any other asset id must be carried by coins this transaction spends. The sum of
  outputs per asset may not exceed the sum of spent coins, and every output must
  repeat the asset's metadata exactly.
- Amounts are positive base-10 integers.
- Spent coins whose asset reappears in an admitted output are retained; the rest
  are burned.
"#;

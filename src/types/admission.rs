//! Admission decision types

use serde::{Deserialize, Serialize};

/// Outcome of evaluating one candidate transaction
///
/// Both lists are ascending and duplicate-free. `coins_to_retain` is always a
/// subset of the previous coins handed to the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionDecision {
    pub outputs_to_admit: Vec<u32>,
    pub coins_to_retain: Vec<u32>,
}

impl AdmissionDecision {
    /// Nothing admitted, nothing retained
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs_to_admit.is_empty() && self.coins_to_retain.is_empty()
    }

    /// Previous coins that were spent without being carried forward (burned)
    pub fn coins_removed(&self, previous_coins: &[u32]) -> Vec<u32> {
        let mut removed: Vec<u32> = previous_coins
            .iter()
            .copied()
            .filter(|coin| !self.coins_to_retain.contains(coin))
            .collect();
        removed.sort_unstable();
        removed.dedup();
        removed
    }
}

/// Name and short description advertised by a topic manager or lookup service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceMetadata {
    pub name: String,
    pub short_description: String,
}

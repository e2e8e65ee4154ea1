//! Lookup service wire types
//!
//! Queries arrive as loosely-typed JSON from the overlay framework and are
//! validated into `LookupQuery` before touching the index.

use crate::types::record::SortOrder;
use bitcoin::ScriptBuf;
use serde::{Deserialize, Serialize};

/// A question addressed to a named lookup service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupQuestion {
    pub service: String,
    #[serde(default)]
    pub query: serde_json::Value,
}

/// Validated query body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LookupQuery {
    pub asset_id: Option<String>,
    pub owner_key: Option<String>,
    pub limit: Option<u32>,
    pub skip: Option<u32>,
    pub sort_order: Option<SortOrder>,
    pub history: Option<bool>,
}

/// Restricts ancestor proofs to outputs of one asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySelector {
    pub asset_id: String,
}

/// One outpoint returned by a lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupFormula {
    pub txid: String,
    pub output_index: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<HistorySelector>,
}

/// Lookup result handed back to the framework
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "outputs", rename_all = "kebab-case")]
pub enum LookupAnswer {
    OutputList(Vec<LookupFormula>),
}

impl LookupAnswer {
    pub fn outputs(&self) -> &[LookupFormula] {
        match self {
            LookupAnswer::OutputList(outputs) => outputs,
        }
    }
}

/// Admission notification delivered by the framework
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputAdmittedPayload {
    /// Only the admitted output's locking script is supplied
    LockingScript {
        topic: String,
        txid: String,
        output_index: u32,
        locking_script: ScriptBuf,
    },
    /// The whole transaction is supplied as Atomic BEEF
    WholeTx {
        topic: String,
        atomic_beef: Vec<u8>,
        output_index: u32,
    },
}

impl OutputAdmittedPayload {
    pub fn mode(&self) -> &'static str {
        match self {
            OutputAdmittedPayload::LockingScript { .. } => "locking-script",
            OutputAdmittedPayload::WholeTx { .. } => "whole-tx",
        }
    }

    pub fn topic(&self) -> &str {
        match self {
            OutputAdmittedPayload::LockingScript { topic, .. }
            | OutputAdmittedPayload::WholeTx { topic, .. } => topic,
        }
    }
}

/// Spend notification delivered by the framework
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSpentPayload {
    pub topic: String,
    pub txid: String,
    pub output_index: u32,
}

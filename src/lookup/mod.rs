//! Lookup service
//!
//! Maintains the index of unspent BTMS tokens from the overlay framework's
//! admission and spend events, and answers queries against it.
//!
//! Admission is the one place where a token that fails to decode is an error:
//! the topic manager only admits outputs that decode, so a failure here means
//! the framework and the index disagree.

pub mod history;
pub mod query;

pub use history::include_in_history;
pub use query::{resolve_query, ResolvedQuery};

use crate::codec;
use crate::config::{AppConfig, LookupConfig};
use crate::database::IndexStore;
use crate::engine::DEFAULT_TOPIC_NAME;
use crate::errors::{AppResult, LookupError};
use crate::logging::{EventLogger, TracingLogger};
use crate::types::{
    HistorySelector, LookupAnswer, LookupFormula, LookupQuestion, OutputAdmittedPayload,
    OutputSpentPayload, ServiceMetadata, TokenRecord,
};
use crate::utils::time::now_millis;
use bitcoin::Script;
use std::sync::Arc;

pub const DEFAULT_LOOKUP_SERVICE_NAME: &str = "ls_btms";

/// Overlay lookup service contract
pub trait LookupService {
    /// An output was admitted to a topic
    fn output_admitted_by_topic(&self, payload: &OutputAdmittedPayload) -> AppResult<()>;

    /// A previously admitted output was spent
    fn output_spent(&self, payload: &OutputSpentPayload) -> AppResult<()>;

    /// The framework dropped an outpoint from every topic
    fn output_evicted(&self, txid: &str, output_index: u32) -> AppResult<()>;

    fn lookup(&self, question: &LookupQuestion) -> AppResult<LookupAnswer>;

    fn documentation(&self) -> String;

    fn metadata(&self) -> ServiceMetadata;
}

/// Index maintainer and query front-end for BTMS tokens
pub struct BtmsLookupService<S: IndexStore> {
    store: S,
    topic_name: String,
    service_name: String,
    limits: LookupConfig,
    logger: Arc<dyn EventLogger>,
}

impl<S: IndexStore> BtmsLookupService<S> {
    /// Service with the default topic, service name and paging limits
    pub fn new(store: S) -> Self {
        Self {
            store,
            topic_name: DEFAULT_TOPIC_NAME.to_string(),
            service_name: DEFAULT_LOOKUP_SERVICE_NAME.to_string(),
            limits: LookupConfig::default(),
            logger: TracingLogger::shared("lookup_service"),
        }
    }

    pub fn from_config(store: S, config: &AppConfig) -> Self {
        Self::new(store)
            .with_names(&config.overlay.topic_name, &config.overlay.lookup_service_name)
            .with_limits(config.lookup)
    }

    pub fn with_names(mut self, topic_name: &str, service_name: &str) -> Self {
        self.topic_name = topic_name.to_string();
        self.service_name = service_name.to_string();
        self
    }

    pub fn with_limits(mut self, limits: LookupConfig) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn EventLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn index_output(&self, txid: &str, output_index: u32, script: &Script) -> AppResult<()> {
        let token = codec::decode(script).map_err(|e| {
            self.logger.error(&format!(
                "Admitted output {}.{} is not a valid token: {}",
                txid, output_index, e
            ));
            e
        })?;
        let owner_key = codec::extract_owner_key(script)?;

        let record = TokenRecord {
            txid: txid.to_string(),
            output_index,
            asset_id: token.canonical_asset_id(txid, output_index),
            amount: token.amount(),
            owner_key,
            metadata: token.metadata().map(str::to_string),
            created_at: now_millis(),
        };
        self.store.insert(&record)?;

        self.logger.info(&format!(
            "Indexed {} holding {} of {}",
            record.outpoint(),
            record.amount,
            record.asset_id
        ));
        Ok(())
    }
}

impl<S: IndexStore> LookupService for BtmsLookupService<S> {
    fn output_admitted_by_topic(&self, payload: &OutputAdmittedPayload) -> AppResult<()> {
        let OutputAdmittedPayload::LockingScript {
            topic,
            txid,
            output_index,
            locking_script,
        } = payload
        else {
            return Err(LookupError::InvalidPayloadMode(payload.mode().to_string()).into());
        };

        if topic != &self.topic_name {
            return Ok(());
        }
        self.index_output(txid, *output_index, locking_script)
    }

    fn output_spent(&self, payload: &OutputSpentPayload) -> AppResult<()> {
        if payload.topic != self.topic_name {
            return Ok(());
        }
        if self
            .store
            .delete_by_outpoint(&payload.txid, payload.output_index)?
        {
            self.logger.info(&format!(
                "Removed spent token {}.{}",
                payload.txid, payload.output_index
            ));
        }
        Ok(())
    }

    fn output_evicted(&self, txid: &str, output_index: u32) -> AppResult<()> {
        if self.store.delete_by_outpoint(txid, output_index)? {
            self.logger
                .info(&format!("Evicted token {}.{}", txid, output_index));
        }
        Ok(())
    }

    fn lookup(&self, question: &LookupQuestion) -> AppResult<LookupAnswer> {
        if question.service != self.service_name {
            return Err(LookupError::UnsupportedService {
                service: question.service.clone(),
                expected: self.service_name.clone(),
            }
            .into());
        }

        let resolved = resolve_query(&question.query, &self.limits)?;
        let records = self.store.find_by_filter(&resolved.filter, resolved.page)?;

        let outputs = records
            .into_iter()
            .map(|record| LookupFormula {
                history: resolved.history.then(|| HistorySelector {
                    asset_id: record.asset_id.clone(),
                }),
                txid: record.txid,
                output_index: record.output_index,
            })
            .collect();
        Ok(LookupAnswer::OutputList(outputs))
    }

    fn documentation(&self) -> String {
        LOOKUP_DOCUMENTATION.to_string()
    }

    fn metadata(&self) -> ServiceMetadata {
        ServiceMetadata {
            name: "BTMS Lookup Service".to_string(),
            short_description: "Find unspent BTMS tokens by asset and owner".to_string(),
        }
    }
}

const LOOKUP_DOCUMENTATION: &str = r#"# BTMS Lookup Service

Query with a JSON object; every field is optional.

| Field       | Meaning                                             |
|-------------|-----------------------------------------------------|
| `assetId`   | Only tokens of this asset (`<txid>.<output index>`) |
| `ownerKey`  | Only tokens locked to this hex public key           |
| `limit`     | Page size, default 50                               |
| `skip`      | Results to skip, default 0                          |
| `sortOrder` | `asc` or `desc` by admission time, default `desc`   |
| `history`   | Attach an asset-scoped history selector             |

Filters combine with AND. The answer is a list of outpoints.
"#;

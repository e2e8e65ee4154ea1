use crate::cli::commands::{load_config, open_database, print_json};
use crate::errors::AppResult;
use crate::lookup::{BtmsLookupService, LookupService};
use crate::types::{LookupQuestion, SortOrder};
use clap::Args;
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Query the token index
#[derive(Args)]
pub struct LookupCommand {
    /// Only tokens of this asset id
    #[arg(long)]
    pub asset_id: Option<String>,

    /// Only tokens locked to this hex public key
    #[arg(long)]
    pub owner_key: Option<String>,

    /// Page size
    #[arg(long)]
    pub limit: Option<u32>,

    /// Results to skip
    #[arg(long)]
    pub skip: Option<u32>,

    /// Sort by admission time (asc or desc)
    #[arg(long)]
    pub sort: Option<SortOrder>,

    /// Attach history selectors to each result
    #[arg(long)]
    pub history: bool,

    /// Database path (overrides config.toml and env vars)
    #[arg(long)]
    pub database_path: Option<PathBuf>,
}

impl LookupCommand {
    pub fn run(&self) -> AppResult<()> {
        let config = load_config()?;
        let database = open_database(self.database_path.as_ref(), &config)?;
        let service = BtmsLookupService::from_config(database, &config);

        let answer = service.lookup(&LookupQuestion {
            service: config.overlay.lookup_service_name.clone(),
            query: self.query(),
        })?;
        print_json(&answer)
    }

    fn query(&self) -> Value {
        let mut query = Map::new();
        if let Some(asset_id) = &self.asset_id {
            query.insert("assetId".to_string(), Value::from(asset_id.as_str()));
        }
        if let Some(owner_key) = &self.owner_key {
            query.insert("ownerKey".to_string(), Value::from(owner_key.as_str()));
        }
        if let Some(limit) = self.limit {
            query.insert("limit".to_string(), Value::from(limit));
        }
        if let Some(skip) = self.skip {
            query.insert("skip".to_string(), Value::from(skip));
        }
        if let Some(sort) = self.sort {
            query.insert("sortOrder".to_string(), Value::from(sort.to_string()));
        }
        if self.history {
            query.insert("history".to_string(), Value::Bool(true));
        }
        Value::Object(query)
    }
}

use crate::cli::commands::{load_config, open_database};
use crate::errors::AppResult;
use clap::Args;
use std::path::PathBuf;

/// Summarise the token index
#[derive(Args)]
pub struct StatsCommand {
    /// Database path (overrides config.toml and env vars)
    #[arg(long)]
    pub database_path: Option<PathBuf>,
}

impl StatsCommand {
    pub fn run(&self) -> AppResult<()> {
        let config = load_config()?;
        let database = open_database(self.database_path.as_ref(), &config)?;
        let stats = database.index_stats()?;

        println!("=== INDEX SUMMARY ===");
        println!("Unspent token outputs: {}", stats.total_records);
        println!("Distinct assets: {}", stats.distinct_assets);
        println!("Distinct owners: {}", stats.distinct_owners);
        Ok(())
    }
}

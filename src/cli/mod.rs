use crate::config::AppConfig;
use crate::errors::AppResult;
use crate::logging::init_tracing;
use clap::{Parser, Subcommand};

pub mod commands;

/// BTMS Overlay Node
#[derive(Parser)]
#[command(name = "btms-overlay")]
#[command(about = "BTMS token admission rules and unspent-token index")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Decode a token locking script (hex)
    Decode(commands::decode::DecodeCommand),
    /// Build a token locking script
    Encode(commands::encode::EncodeCommand),
    /// Evaluate admission for a BEEF envelope
    Admit(commands::admit::AdmitCommand),
    /// Admit a BEEF envelope and update the index
    Submit(commands::submit::SubmitCommand),
    /// Query the token index
    Lookup(commands::lookup::LookupCommand),
    /// Describe a BEEF envelope
    InspectBeef(commands::inspect_beef::InspectBeefCommand),
    /// Summarise the token index
    Stats(commands::stats::StatsCommand),
}

pub fn run() -> AppResult<()> {
    // Uses RUST_LOG when set, otherwise the configured filter
    init_tracing(&AppConfig::get_defaults().logging.filter);

    let cli = Cli::parse();

    match cli.command {
        Commands::Decode(command) => command.run(),
        Commands::Encode(command) => command.run(),
        Commands::Admit(command) => command.run(),
        Commands::Submit(command) => command.run(),
        Commands::Lookup(command) => command.run(),
        Commands::InspectBeef(command) => command.run(),
        Commands::Stats(command) => command.run(),
    }
}

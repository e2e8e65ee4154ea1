pub mod admit;
pub mod decode;
pub mod encode;
pub mod inspect_beef;
pub mod lookup;
pub mod stats;
pub mod submit;

use crate::config::AppConfig;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::ValueEnum;
use std::path::{Path, PathBuf};
use tracing::info;

/// How an envelope file is encoded on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum EnvelopeEncoding {
    #[default]
    Binary,
    Hex,
    Base64,
}

/// Read envelope bytes from `path`
pub fn read_envelope(path: &Path, encoding: EnvelopeEncoding) -> AppResult<Vec<u8>> {
    let bytes = std::fs::read(path)?;
    let decoded = match encoding {
        EnvelopeEncoding::Binary => bytes,
        EnvelopeEncoding::Hex => hex::decode(text_contents(&bytes)?)?,
        EnvelopeEncoding::Base64 => STANDARD.decode(text_contents(&bytes)?)?,
    };
    info!("Read {} envelope bytes from {}", decoded.len(), path.display());
    Ok(decoded)
}

fn text_contents(bytes: &[u8]) -> AppResult<String> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| AppError::InvalidData(format!("Envelope file is not text: {}", e)))?;
    Ok(text.split_whitespace().collect())
}

/// Load configuration, turning failures into a config error
pub fn load_config() -> AppResult<AppConfig> {
    AppConfig::load().map_err(|e| AppError::Config(format!("Failed to load configuration: {}", e)))
}

/// Open the index at the CLI override or the configured path
pub fn open_database(override_path: Option<&PathBuf>, config: &AppConfig) -> AppResult<Database> {
    let path = override_path.unwrap_or(&config.database.path);
    Database::new(&path.to_string_lossy())
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: serde::Serialize>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

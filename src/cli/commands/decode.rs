use crate::cli::commands::print_json;
use crate::codec;
use crate::errors::AppResult;
use bitcoin::ScriptBuf;
use clap::Args;
use serde_json::json;

/// Decode a token locking script
#[derive(Args)]
pub struct DecodeCommand {
    /// Locking script as hex
    pub script: String,
}

impl DecodeCommand {
    pub fn run(&self) -> AppResult<()> {
        let script = ScriptBuf::from_bytes(hex::decode(self.script.trim())?);
        let token = codec::decode(&script)?;
        let owner_key = codec::extract_owner_key(&script)?;

        print_json(&json!({
            "token": token,
            "ownerKey": owner_key,
        }))
    }
}

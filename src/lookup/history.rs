//! History selector
//!
//! When a lookup asks for history, the framework walks each returned output's
//! ancestry and keeps only ancestors for which `include_in_history` holds, so
//! the proof chain never wanders into outputs of another asset.

use crate::beef::Beef;
use crate::codec;
use crate::errors::{AppResult, BeefError};
use tracing::debug;

/// Whether output `output_index` of the envelope's anchor carries `target_asset_id`
///
/// Any failure to parse, resolve or decode answers `false`.
pub fn include_in_history(beef: &[u8], output_index: u32, target_asset_id: &str) -> bool {
    match asset_id_of(beef, output_index) {
        Ok(asset_id) => asset_id == target_asset_id,
        Err(e) => {
            debug!("Excluding output {} from history: {}", output_index, e);
            false
        }
    }
}

fn asset_id_of(beef: &[u8], output_index: u32) -> AppResult<String> {
    let beef = Beef::from_bytes(beef)?;
    let (tx, txid) = beef.anchor()?;
    let output = tx
        .output
        .get(output_index as usize)
        .ok_or_else(|| BeefError::OutputOutOfRange {
            txid: txid.to_string(),
            index: output_index,
        })?;
    let token = codec::decode(&output.script_pubkey)?;
    Ok(token.canonical_asset_id(&txid.to_string(), output_index))
}

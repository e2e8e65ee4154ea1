//! Token field rules on top of the push-drop template
//!
//! Field layout:
//! 0. asset id, or the issuance marker
//! 1. amount as base-10 digits
//! 2. metadata, or a trailing signature when it is the last field and 64/65 bytes long
//! 3. signature

use crate::codec::push_drop;
use crate::errors::{TokenError, TokenResult};
use crate::types::{DecodedToken, TokenFields, ISSUANCE_MARKER};
use bitcoin::script::{Script, ScriptBuf};
use bitcoin::secp256k1::PublicKey;

pub const MIN_FIELDS: usize = 2;
pub const MAX_FIELDS: usize = 4;

/// Largest amount a single output may carry; the index stores amounts as signed 64-bit
pub const MAX_AMOUNT: u64 = i64::MAX as u64;

/// Byte lengths that make a trailing third field a signature rather than metadata
pub const SIGNATURE_LENGTHS: [usize; 2] = [64, 65];

/// Decode a token output script
pub fn decode(script: &Script) -> TokenResult<DecodedToken> {
    let push_drop = push_drop::decode(script)?;
    validate_public_key(&push_drop.locking_key)?;
    let fields = push_drop.fields;

    if !(MIN_FIELDS..=MAX_FIELDS).contains(&fields.len()) {
        return Err(TokenError::InvalidFieldCount(fields.len()));
    }

    let asset_id = utf8_field(&fields[0], 0)?;
    let amount = parse_amount(&fields[1])?;

    let (metadata, has_signature) = match fields.len() {
        2 => (None, false),
        3 if is_signature_length(&fields[2]) => (None, true),
        3 => (Some(utf8_field(&fields[2], 2)?), false),
        _ => (Some(utf8_field(&fields[2], 2)?), true),
    };

    if asset_id == ISSUANCE_MARKER {
        Ok(DecodedToken::Issuance {
            amount,
            metadata,
            has_signature,
        })
    } else {
        Ok(DecodedToken::Transfer {
            asset_id,
            amount,
            metadata,
            has_signature,
        })
    }
}

/// Permanent identity of the asset carried by an output
///
/// Issuance outputs take the identity of their own outpoint; every other value
/// of field zero is already canonical.
pub fn canonical_asset_id(field_zero: &str, txid: &str, output_index: u32) -> String {
    if field_zero == ISSUANCE_MARKER {
        format!("{}.{}", txid, output_index)
    } else {
        field_zero.to_string()
    }
}

/// Hex-encoded public key from the spending-authorization clause
pub fn extract_owner_key(script: &Script) -> TokenResult<String> {
    let key = push_drop::locking_key(script)?;
    validate_public_key(&key)?;
    Ok(hex::encode(key))
}

/// Build a token output script locked to `owner_key`
pub fn encode(fields: &TokenFields, owner_key: &[u8]) -> TokenResult<ScriptBuf> {
    validate_public_key(owner_key)?;
    parse_amount(fields.amount.as_bytes())?;

    let pushes = fields.to_pushes();
    if let Some(metadata) = &fields.metadata {
        if fields.signature.is_none() && is_signature_length(metadata.as_bytes()) {
            // Would be read back as a signature
            return Err(TokenError::NotPushDrop(format!(
                "metadata of {} bytes is ambiguous without a signature field",
                metadata.len()
            )));
        }
    }
    push_drop::lock(owner_key, &pushes)
}

/// Parse a positive base-10 amount with no sign, point or whitespace, at most [`MAX_AMOUNT`]
pub fn parse_amount(bytes: &[u8]) -> TokenResult<u64> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| TokenError::InvalidAmount(hex::encode(bytes)))?;

    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TokenError::InvalidAmount(text.to_string()));
    }

    match text.parse::<u64>() {
        Ok(amount) if (1..=MAX_AMOUNT).contains(&amount) => Ok(amount),
        _ => Err(TokenError::InvalidAmount(text.to_string())),
    }
}

fn is_signature_length(field: &[u8]) -> bool {
    SIGNATURE_LENGTHS.contains(&field.len())
}

fn utf8_field(bytes: &[u8], index: usize) -> TokenResult<String> {
    String::from_utf8(bytes.to_vec()).map_err(|_| TokenError::InvalidEncoding { index })
}

fn validate_public_key(key: &[u8]) -> TokenResult<()> {
    PublicKey::from_slice(key)
        .map(|_| ())
        .map_err(|e| TokenError::InvalidOwnerKey(format!("{}: {}", hex::encode(key), e)))
}

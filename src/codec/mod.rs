//! Token codec
//!
//! Pure functions over script bytes: push-drop template handling, token field
//! decoding and asset identifier canonicalisation. The admission engine and
//! the lookup service both decode through here so they agree on what a token is.

pub mod push_drop;
pub mod token;

pub use token::{canonical_asset_id, decode, encode, extract_owner_key, parse_amount, MAX_AMOUNT};

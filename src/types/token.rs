//! Decoded token types
//!
//! A token script decodes into exactly one of two shapes: an issuance, which
//! mints a new asset whose identity is the issuing outpoint, or a transfer of an
//! existing asset. Anything else is the error side of the decoder.

use serde::{Deserialize, Serialize};

/// Field-zero literal marking an output that mints a new asset
pub const ISSUANCE_MARKER: &str = "ISSUE";

/// A successfully decoded token output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecodedToken {
    /// Field zero is the issuance marker
    Issuance {
        amount: u64,
        metadata: Option<String>,
        has_signature: bool,
    },
    /// Field zero names an existing asset
    Transfer {
        asset_id: String,
        amount: u64,
        metadata: Option<String>,
        has_signature: bool,
    },
}

impl DecodedToken {
    pub fn amount(&self) -> u64 {
        match self {
            DecodedToken::Issuance { amount, .. } | DecodedToken::Transfer { amount, .. } => {
                *amount
            }
        }
    }

    pub fn metadata(&self) -> Option<&str> {
        match self {
            DecodedToken::Issuance { metadata, .. } | DecodedToken::Transfer { metadata, .. } => {
                metadata.as_deref()
            }
        }
    }

    pub fn has_signature(&self) -> bool {
        match self {
            DecodedToken::Issuance { has_signature, .. }
            | DecodedToken::Transfer { has_signature, .. } => *has_signature,
        }
    }

    pub fn is_issuance(&self) -> bool {
        matches!(self, DecodedToken::Issuance { .. })
    }

    /// Field zero exactly as it appears in the script
    pub fn raw_asset_id(&self) -> &str {
        match self {
            DecodedToken::Issuance { .. } => ISSUANCE_MARKER,
            DecodedToken::Transfer { asset_id, .. } => asset_id,
        }
    }

    /// Permanent asset identity for this output once its outpoint is known
    pub fn canonical_asset_id(&self, txid: &str, output_index: u32) -> String {
        crate::codec::canonical_asset_id(self.raw_asset_id(), txid, output_index)
    }
}

/// Token fields prior to encoding
///
/// `signature` is carried as raw bytes and always written as the last push.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenFields {
    pub asset_id: String,
    pub amount: String,
    pub metadata: Option<String>,
    pub signature: Option<Vec<u8>>,
}

impl TokenFields {
    /// Fields for a new asset
    pub fn issuance(amount: u64, metadata: Option<&str>) -> Self {
        Self {
            asset_id: ISSUANCE_MARKER.to_string(),
            amount: amount.to_string(),
            metadata: metadata.map(str::to_string),
            signature: None,
        }
    }

    /// Fields moving units of an existing asset
    pub fn transfer(asset_id: &str, amount: u64, metadata: Option<&str>) -> Self {
        Self {
            asset_id: asset_id.to_string(),
            amount: amount.to_string(),
            metadata: metadata.map(str::to_string),
            signature: None,
        }
    }

    pub fn with_signature(mut self, signature: Vec<u8>) -> Self {
        self.signature = Some(signature);
        self
    }

    /// Ordered push payloads
    pub fn to_pushes(&self) -> Vec<Vec<u8>> {
        let mut pushes = vec![
            self.asset_id.as_bytes().to_vec(),
            self.amount.as_bytes().to_vec(),
        ];
        if let Some(metadata) = &self.metadata {
            pushes.push(metadata.as_bytes().to_vec());
        }
        if let Some(signature) = &self.signature {
            pushes.push(signature.clone());
        }
        pushes
    }
}

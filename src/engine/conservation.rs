//! Per-run conservation ledger
//!
//! Built from the previously-admitted coins a transaction spends, then drawn
//! down by its transfer outputs in output order.

use crate::errors::{AppError, AppResult};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetAllowance {
    pub max_spendable: u64,
    /// Metadata every output of this asset must repeat exactly
    pub required_metadata: Option<String>,
    /// Running total of this transaction's outputs, including rejected ones
    pub claimed: u64,
}

/// Why a transfer output was not admitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    UnknownAsset,
    ExceedsInputs { claimed: u64, max_spendable: u64 },
    MetadataMismatch,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::UnknownAsset => write!(f, "asset not present among spent coins"),
            Rejection::ExceedsInputs {
                claimed,
                max_spendable,
            } => write!(
                f,
                "outputs claim {} but spent coins hold {}",
                claimed, max_spendable
            ),
            Rejection::MetadataMismatch => write!(f, "metadata differs from the asset's"),
        }
    }
}

#[derive(Debug, Default)]
pub struct ConservationLedger {
    assets: HashMap<String, AssetAllowance>,
}

impl ConservationLedger {
    /// Record a spent coin; the first coin seen for an asset pins its metadata
    pub fn credit(&mut self, asset_id: &str, amount: u64, metadata: Option<&str>) -> AppResult<()> {
        match self.assets.get_mut(asset_id) {
            Some(allowance) => {
                allowance.max_spendable = allowance
                    .max_spendable
                    .checked_add(amount)
                    .ok_or_else(|| AppError::AmountOverflow {
                        asset_id: asset_id.to_string(),
                    })?;
            }
            None => {
                self.assets.insert(
                    asset_id.to_string(),
                    AssetAllowance {
                        max_spendable: amount,
                        required_metadata: metadata.map(str::to_string),
                        claimed: 0,
                    },
                );
            }
        }
        Ok(())
    }

    /// Claim `amount` of `asset_id` for one output
    ///
    /// The amount counts toward the running total before any check, so a
    /// rejected output still consumes capacity for later outputs.
    pub fn claim(
        &mut self,
        asset_id: &str,
        amount: u64,
        metadata: Option<&str>,
    ) -> Result<(), Rejection> {
        let allowance = self
            .assets
            .get_mut(asset_id)
            .ok_or(Rejection::UnknownAsset)?;

        allowance.claimed = match allowance.claimed.checked_add(amount) {
            Some(total) => total,
            None => {
                allowance.claimed = u64::MAX;
                return Err(Rejection::ExceedsInputs {
                    claimed: u64::MAX,
                    max_spendable: allowance.max_spendable,
                });
            }
        };
        if allowance.claimed > allowance.max_spendable {
            return Err(Rejection::ExceedsInputs {
                claimed: allowance.claimed,
                max_spendable: allowance.max_spendable,
            });
        }

        if allowance.required_metadata.as_deref() != metadata {
            return Err(Rejection::MetadataMismatch);
        }

        Ok(())
    }

    pub fn allowance(&self, asset_id: &str) -> Option<&AssetAllowance> {
        self.assets.get(asset_id)
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

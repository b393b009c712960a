//! Protocol-wide parameters bounding tier configurations.
//!
//! These fields are designed to be serialized into host configuration
//! storage; the two rate constants are part of the fixed-point encoding and
//! are deliberately not host-adjustable.

use crate::errors::{EngineError, Result};
use serde::{Deserialize, Serialize};

/// Fixed-point scale for boosting rates. A rate of `RATE_FACTOR` means 1.0x.
pub const RATE_FACTOR: u64 = 100;

/// Upper bound for a tier's boosting rate (100.0x).
pub const MAX_RATE_FACTOR: u64 = 10_000;

/// Global parameters every tier configuration is validated against.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolParams {
    /// Ceiling on items ever issued across all tiers. Burns do not free
    /// capacity; the cap is checked against lifetime issuance.
    pub max_supply: u64,
    /// Upper bound for a tier's nonzero per-wallet cap.
    pub max_wallet_limit: u64,
    /// Lower bound for a tier's boosting interval, in seconds.
    pub min_boost_interval_secs: u64,
    /// Upper bound for a tier's boosting interval, in seconds.
    pub max_boost_interval_secs: u64,
    /// Window past an item's boost-end during which its reward remains
    /// queryable before dropping to zero, in seconds.
    pub grace_threshold_secs: u64,
}

impl Default for ProtocolParams {
    fn default() -> Self {
        Self {
            max_supply: 1_000_000,
            max_wallet_limit: 10_000,
            min_boost_interval_secs: 60,
            // 365 days
            max_boost_interval_secs: 31_536_000,
            grace_threshold_secs: 3_600,
        }
    }
}

impl ProtocolParams {
    /// Reject incoherent parameter sets before an engine is built on them.
    pub fn validate(&self) -> Result<()> {
        if self.max_supply == 0 {
            return Err(EngineError::InvalidParameter {
                field: "max_supply",
                reason: "must be nonzero".into(),
            });
        }
        if self.min_boost_interval_secs == 0 {
            return Err(EngineError::InvalidParameter {
                field: "min_boost_interval_secs",
                reason: "must be nonzero".into(),
            });
        }
        if self.max_boost_interval_secs < self.min_boost_interval_secs {
            return Err(EngineError::InvalidParameter {
                field: "max_boost_interval_secs",
                reason: format!(
                    "must be >= min_boost_interval_secs ({})",
                    self.min_boost_interval_secs
                ),
            });
        }
        if self.grace_threshold_secs == 0 {
            return Err(EngineError::InvalidParameter {
                field: "grace_threshold_secs",
                reason: "must be nonzero".into(),
            });
        }
        Ok(())
    }
}

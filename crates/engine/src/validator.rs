//! Stateless validation of candidate tier configurations.
//!
//! Runs before a tier is committed. Checks execute in a fixed precedence
//! order and the first failing check is the reported reason; no partial
//! state is written on any path.

use crate::env::TokenProbe;
use crate::errors::{EngineError, Result};
use crate::params::{ProtocolParams, MAX_RATE_FACTOR, RATE_FACTOR};
use crate::types::TierSpec;
use std::collections::HashSet;

/// Validate a candidate tier spec against the protocol parameters, the set
/// of already-committed tier names, and the host's token probe.
pub fn validate_tier_spec(
    spec: &TierSpec,
    params: &ProtocolParams,
    existing_names: &HashSet<String>,
    probe: &dyn TokenProbe,
) -> Result<()> {
    // 1. A token currency must answer the probe; native (None) always valid.
    if let Some(currency) = &spec.currency {
        if !probe.probe(currency) {
            return Err(EngineError::TokenProbeFailed {
                currency: currency.to_string(),
            });
        }
    }

    // 2.
    if spec.unit_price == 0 {
        return Err(EngineError::ZeroUnitPrice);
    }

    // 3. Zero means unlimited and is always accepted here.
    if spec.wallet_limit != 0 && spec.wallet_limit > params.max_wallet_limit {
        return Err(EngineError::WalletLimitTooHigh {
            limit: spec.wallet_limit,
            max: params.max_wallet_limit,
        });
    }

    // 4.
    if spec.boost_interval_secs < params.min_boost_interval_secs
        || spec.boost_interval_secs > params.max_boost_interval_secs
    {
        return Err(EngineError::BoostIntervalOutOfRange {
            interval_secs: spec.boost_interval_secs,
            min_secs: params.min_boost_interval_secs,
            max_secs: params.max_boost_interval_secs,
        });
    }

    // 5.
    if spec.boost_rate < RATE_FACTOR || spec.boost_rate > MAX_RATE_FACTOR {
        return Err(EngineError::BoostRateOutOfRange {
            rate: spec.boost_rate,
            min: RATE_FACTOR,
            max: MAX_RATE_FACTOR,
        });
    }

    // 6. Check 4 already guarantees a nonzero interval, so reset >= interval
    // implies reset is nonzero; both conditions stay explicit anyway.
    if spec.boost_reset_secs == 0 || spec.boost_reset_secs < spec.boost_interval_secs {
        return Err(EngineError::ResetBelowInterval {
            reset_secs: spec.boost_reset_secs,
            interval_secs: spec.boost_interval_secs,
        });
    }

    // 7. Floor division at each step, matching the accrual arithmetic.
    let capacity = (spec.boost_reset_secs / spec.boost_interval_secs)
        .checked_mul(spec.wallet_limit)
        .ok_or(EngineError::AmountOverflow)?;
    if capacity > params.max_supply {
        return Err(EngineError::TierCapacityOverflow {
            capacity,
            max_supply: params.max_supply,
        });
    }

    // 8. Exact byte match; "Gold" and "gold" are distinct names.
    if existing_names.contains(&spec.name) {
        return Err(EngineError::DuplicateTierName {
            name: spec.name.clone(),
        });
    }

    Ok(())
}

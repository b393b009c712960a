//! Pure reward-accrual arithmetic.
//!
//! Reward is a fresh read-time computation over an item's frozen mint
//! record and its tier's boosting parameters; nothing here touches state.
//!
//! Accrual is anchored to the mint timestamp, not to any reset boundary:
//! `boost_reset_secs` only positions `boost_ends_at` (and feeds the tier
//! capacity check at validation time). This matches the observed reference
//! behavior; see DESIGN.md.

use crate::params::{ProtocolParams, RATE_FACTOR};
use crate::types::{ItemRecord, TierConfig};
use boostpass_types::{Amount, Timestamp};

/// Accrued reward for one item at `now`.
///
/// Zero once `now` is strictly past `boost_ends_at` plus the grace
/// threshold. Otherwise the reward is
/// `floor(elapsed / interval) * rate / RATE_FACTOR` with floor division at
/// both steps. The two-stage floor is load-bearing: fusing it into
/// `elapsed * rate / (interval * RATE_FACTOR)` produces different results
/// and must not be done.
pub fn reward_for_record(
    record: &ItemRecord,
    tier: &TierConfig,
    params: &ProtocolParams,
    now: Timestamp,
) -> Amount {
    let decay_deadline = record
        .boost_ends_at
        .saturating_add(params.grace_threshold_secs);
    if now > decay_deadline {
        return 0;
    }

    // Committed tiers always carry a rate >= RATE_FACTOR; the zero guard
    // covers records restored from a foreign snapshot.
    if tier.boost_rate == 0 || tier.boost_interval_secs == 0 {
        return 0;
    }

    let elapsed = now.saturating_sub(record.minted_at);
    let full_intervals = elapsed / tier.boost_interval_secs;

    (full_intervals as Amount) * (tier.boost_rate as Amount) / (RATE_FACTOR as Amount)
}

//! Data model for tiers, items, and the engine's read models.

use boostpass_types::{Address, Amount, ItemId, Quantity, TierId, Timestamp};
use serde::{Deserialize, Serialize};

/// Candidate tier configuration submitted to `add_tier`.
///
/// Validated against [`crate::params::ProtocolParams`] before being
/// committed; never stored as-is.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierSpec {
    /// Payment currency. `None` means the host's native currency; `Some`
    /// references a fungible-token contract that must answer the probe.
    pub currency: Option<Address>,
    /// Display name, globally unique across all tiers (exact byte match).
    pub name: String,
    /// Opaque metadata reference resolved by the host.
    pub metadata_ref: String,
    /// Price per item in base currency units. Must be nonzero.
    pub unit_price: Amount,
    /// Cumulative cap per wallet within this tier. Zero means unlimited.
    pub wallet_limit: u64,
    /// Boosting interval in seconds.
    pub boost_interval_secs: u64,
    /// Boosting rate on the `RATE_FACTOR` fixed-point scale.
    pub boost_rate: u64,
    /// Boost reset interval in seconds; positions each item's boost end.
    pub boost_reset_secs: u64,
}

/// A committed tier: the spec fields plus identity, lifecycle flag, and
/// running totals. Never deleted; ids are sequential and never reused.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierConfig {
    pub id: TierId,
    pub currency: Option<Address>,
    pub name: String,
    pub metadata_ref: String,
    pub unit_price: Amount,
    pub wallet_limit: u64,
    pub boost_interval_secs: u64,
    pub boost_rate: u64,
    pub boost_reset_secs: u64,
    /// Items minted in this tier so far.
    pub total_minted: u64,
    /// Value collected by this tier so far, in its own currency.
    pub total_collected: Amount,
    /// False at creation; flipped by `start_tier` / `set_tier_status`.
    pub active: bool,
}

impl TierConfig {
    pub(crate) fn from_spec(id: TierId, spec: TierSpec) -> Self {
        Self {
            id,
            currency: spec.currency,
            name: spec.name,
            metadata_ref: spec.metadata_ref,
            unit_price: spec.unit_price,
            wallet_limit: spec.wallet_limit,
            boost_interval_secs: spec.boost_interval_secs,
            boost_rate: spec.boost_rate,
            boost_reset_secs: spec.boost_reset_secs,
            total_minted: 0,
            total_collected: 0,
            active: false,
        }
    }
}

/// Per-item record written atomically with issuance.
///
/// Timestamps are frozen at mint time; later tier edits never touch them.
/// Only `valid` changes afterwards, flipping to false on burn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub tier_id: TierId,
    pub minted_at: Timestamp,
    /// `minted_at + boost_reset_secs`, snapshotted from the tier at mint.
    pub boost_ends_at: Timestamp,
    pub valid: bool,
}

/// Aggregate success notification for one mint call (one per call, not one
/// per item).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintReceipt {
    pub tier_id: TierId,
    pub minter: Address,
    pub first_item_id: ItemId,
    pub last_item_id: ItemId,
    pub quantity: Quantity,
    pub total_cost: Amount,
}

/// Read model of the engine's supply position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyInfo {
    pub total_issued: u64,
    pub max_supply: u64,
    pub remaining_supply: u64,
    /// Native currency held by the engine and withdrawable by the owner.
    pub native_collected: Amount,
}

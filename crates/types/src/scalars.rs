//! Scalar type aliases and identifier constants.
//!
//! Monetary amounts are expressed in indivisible base currency units and use
//! `u128` so that `unit_price * quantity` products cannot overflow in
//! practice. Timestamps are UNIX seconds.

/// Identifier of a committed tier. Assigned sequentially, never reused.
pub type TierId = u64;

/// Identifier of an issued item. Assigned sequentially, never reused.
pub type ItemId = u64;

/// Monetary amount in base currency units.
pub type Amount = u128;

/// UNIX timestamp in seconds.
pub type Timestamp = u64;

/// Number of items in a single mint request.
pub type Quantity = u64;

/// Tier ids start at 1; zero is reserved as an invalid sentinel.
pub const FIRST_TIER_ID: TierId = 1;

/// Item ids start at 1; zero is reserved as an invalid sentinel.
pub const FIRST_ITEM_ID: ItemId = 1;

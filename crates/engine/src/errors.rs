//! Error taxonomy for the issuance engine.
//!
//! Every failure condition surfaces as a distinct, named variant carrying
//! the observed values. Errors are fatal to the enclosing operation; no
//! partial state is ever left behind.

use crate::ledger::LedgerError;
use boostpass_types::{Amount, ItemId, TierId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    // --- tier configuration validation ---
    #[error("token probe failed for currency {currency}")]
    TokenProbeFailed { currency: String },

    #[error("unit price must be nonzero")]
    ZeroUnitPrice,

    #[error("wallet limit {limit} exceeds maximum {max}")]
    WalletLimitTooHigh { limit: u64, max: u64 },

    #[error("boost interval {interval_secs}s outside allowed range [{min_secs}s, {max_secs}s]")]
    BoostIntervalOutOfRange {
        interval_secs: u64,
        min_secs: u64,
        max_secs: u64,
    },

    #[error("boost rate {rate} outside allowed range [{min}, {max}]")]
    BoostRateOutOfRange { rate: u64, min: u64, max: u64 },

    #[error("boost reset interval {reset_secs}s below boosting interval {interval_secs}s")]
    ResetBelowInterval {
        reset_secs: u64,
        interval_secs: u64,
    },

    #[error("tier capacity {capacity} exceeds maximum supply {max_supply}")]
    TierCapacityOverflow { capacity: u64, max_supply: u64 },

    #[error("tier name already exists: {name}")]
    DuplicateTierName { name: String },

    #[error("invalid parameter {field}: {reason}")]
    InvalidParameter {
        field: &'static str,
        reason: String,
    },

    // --- input validation ---
    #[error("quantity must be nonzero")]
    ZeroQuantity,

    #[error("amount arithmetic overflow")]
    AmountOverflow,

    // --- state preconditions ---
    #[error("tier not found: {tier_id}")]
    TierNotFound { tier_id: TierId },

    #[error("tier not active: {tier_id}")]
    TierNotActive { tier_id: TierId },

    #[error("tier already started: {tier_id}")]
    TierAlreadyStarted { tier_id: TierId },

    #[error("engine is paused")]
    EnginePaused,

    #[error("supply cap reached: issued={issued}, requested={requested}, cap={cap}")]
    SupplyCapReached {
        issued: u64,
        requested: u64,
        cap: u64,
    },

    #[error("wallet cap reached for tier {tier_id}: minted={minted}, requested={requested}, limit={limit}")]
    WalletCapReached {
        tier_id: TierId,
        minted: u64,
        requested: u64,
        limit: u64,
    },

    #[error("nothing to withdraw")]
    NothingToWithdraw,

    // --- payment ---
    #[error("wrong native payment: expected {expected}, got {actual}")]
    WrongPayment { expected: Amount, actual: Amount },

    #[error("token-priced tier must not receive native payment (got {actual})")]
    UnexpectedNativePayment { actual: Amount },

    #[error("token payment failed: {0}")]
    PaymentFailed(#[from] LedgerError),

    // --- authorization ---
    #[error("caller is not the engine owner")]
    Unauthorized,

    #[error("automated callers may not mint")]
    AutomatedCaller,

    #[error("re-entrant call rejected")]
    ReentrantCall,

    // --- integrity ---
    #[error("unknown item: {item_id}")]
    UnknownItem { item_id: ItemId },

    #[error("caller does not own item {item_id}")]
    NotItemOwner { item_id: ItemId },

    #[error("transfers are not allowed")]
    TransfersDisabled,
}

pub type Result<T> = std::result::Result<T, EngineError>;

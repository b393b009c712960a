//! BoostPass — tier-based pay-to-mint issuance with boosting rewards.
//!
//! An embeddable engine for issuing non-transferable collectible passes:
//! administrators define priced tiers, wallets mint against per-wallet and
//! global supply caps, and each item accrues a time-based "boost" reward
//! until its frozen boost-end passes. All external collaborators (time,
//! caller classification, token probing, the fungible-token ledger, and
//! the base ownership ledger) are injected capabilities, so the engine is
//! deterministic and fully testable in-process.

pub mod collection;
pub mod engine;
pub mod env;
pub mod errors;
pub mod ledger;
pub mod ownership;
pub mod params;
pub mod registry;
pub mod rewards;
pub mod types;
pub mod validator;

pub use collection::{CollectionLedger, InMemoryCollectionLedger};
pub use engine::{EngineEnv, EngineState, MintEngine};
pub use env::{
    AcceptAllTokens, AllowAllCallers, CallerClassifier, Clock, ManualClock, ProgramDirectory,
    StaticTokenProbe, SystemClock, TokenProbe,
};
pub use errors::{EngineError, Result};
pub use ledger::{InMemoryTokenLedger, LedgerError, MockTokenLedger, TokenLedger, TransferCall};
pub use ownership::OwnershipIndex;
pub use params::{ProtocolParams, MAX_RATE_FACTOR, RATE_FACTOR};
pub use registry::TierRegistry;
pub use rewards::reward_for_record;
pub use types::{ItemRecord, MintReceipt, SupplyInfo, TierConfig, TierSpec};
pub use validator::validate_tier_spec;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

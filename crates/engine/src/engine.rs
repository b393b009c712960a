//! The mint engine: admission control, atomic state transitions, and the
//! administrative surface.
//!
//! All mutable state lives in one [`EngineState`] behind a single
//! `RwLock`. Mutators follow validate -> external call -> commit: external
//! calls (token ledger, collection ledger, probe) run with the lock
//! released but the entry flag held, and every write lands in one locked
//! section after the last fallible step, so any failure aborts with zero
//! partial writes. The entry flag is the call-depth guard: a callback into
//! any guarded mutator during an in-flight mutation fails with
//! `ReentrantCall` instead of deadlocking.

use crate::collection::CollectionLedger;
use crate::env::{CallerClassifier, Clock, TokenProbe};
use crate::errors::{EngineError, Result};
use crate::ledger::TokenLedger;
use crate::ownership::OwnershipIndex;
use crate::params::ProtocolParams;
use crate::registry::TierRegistry;
use crate::rewards::reward_for_record;
use crate::types::{ItemRecord, MintReceipt, SupplyInfo, TierConfig, TierSpec};
use crate::validator::validate_tier_spec;
use boostpass_types::{Address, Amount, ItemId, Quantity, TierId};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{info, warn};

/// Injected environment: everything the engine cannot decide for itself.
#[derive(Clone)]
pub struct EngineEnv {
    pub clock: Arc<dyn Clock>,
    pub classifier: Arc<dyn CallerClassifier>,
    pub token_probe: Arc<dyn TokenProbe>,
    pub token_ledger: Arc<dyn TokenLedger>,
    pub collection: Arc<dyn CollectionLedger>,
}

/// The whole owned store. Serializable so a host can persist and restore
/// it; the entry flag is transient and never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineState {
    registry: TierRegistry,
    items: BTreeMap<ItemId, ItemRecord>,
    wallet_minted: BTreeMap<TierId, HashMap<Address, u64>>,
    index: OwnershipIndex,
    total_issued: u64,
    native_balance: Amount,
    paused: bool,
    #[serde(skip)]
    entered: bool,
}

/// RAII guard for the call-depth flag. Dropping it (on success or on any
/// early error return) re-opens the mutating surface.
struct EntryPermit<'a> {
    state: &'a RwLock<EngineState>,
}

impl Drop for EntryPermit<'_> {
    fn drop(&mut self) {
        self.state.write().entered = false;
    }
}

pub struct MintEngine {
    owner: Address,
    /// Account that receives token pulls and funds rescues.
    treasury: Address,
    params: ProtocolParams,
    env: EngineEnv,
    state: RwLock<EngineState>,
}

impl MintEngine {
    pub fn new(
        owner: Address,
        treasury: Address,
        params: ProtocolParams,
        env: EngineEnv,
    ) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            owner,
            treasury,
            params,
            env,
            state: RwLock::new(EngineState::default()),
        })
    }

    /// Rebuild an engine around a previously persisted store.
    pub fn from_snapshot(
        owner: Address,
        treasury: Address,
        params: ProtocolParams,
        env: EngineEnv,
        mut snapshot: EngineState,
    ) -> Result<Self> {
        params.validate()?;
        snapshot.entered = false;
        Ok(Self {
            owner,
            treasury,
            params,
            env,
            state: RwLock::new(snapshot),
        })
    }

    /// Copy of the committed store, suitable for persistence.
    pub fn snapshot(&self) -> EngineState {
        let mut snapshot = self.state.read().clone();
        snapshot.entered = false;
        snapshot
    }

    fn enter(&self) -> Result<EntryPermit<'_>> {
        let mut state = self.state.write();
        if state.entered {
            return Err(EngineError::ReentrantCall);
        }
        state.entered = true;
        drop(state);
        Ok(EntryPermit { state: &self.state })
    }

    fn require_owner(&self, caller: &Address) -> Result<()> {
        if *caller != self.owner {
            return Err(EngineError::Unauthorized);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Administrative surface
    // ------------------------------------------------------------------

    /// Validate and commit a new tier. The tier is stored inactive; it
    /// starts selling only after `start_tier`.
    pub fn add_tier(&self, caller: &Address, spec: TierSpec) -> Result<TierId> {
        self.require_owner(caller)?;
        let _permit = self.enter()?;

        let names = self.state.read().registry.names().clone();
        // The probe is an external call; runs with no lock held.
        validate_tier_spec(&spec, &self.params, &names, self.env.token_probe.as_ref())?;

        let name = spec.name.clone();
        let tier_id = self.state.write().registry.add(spec);
        info!(tier_id, name = %name, "tier added");
        Ok(tier_id)
    }

    /// One-shot activation; re-starting an active tier is rejected.
    pub fn start_tier(&self, caller: &Address, tier_id: TierId) -> Result<()> {
        self.require_owner(caller)?;
        let _permit = self.enter()?;

        self.state.write().registry.start(tier_id)?;
        info!(tier_id, "tier started");
        Ok(())
    }

    /// Direct status write, repeatable in both directions.
    pub fn set_tier_status(&self, caller: &Address, tier_id: TierId, active: bool) -> Result<()> {
        self.require_owner(caller)?;
        let _permit = self.enter()?;

        self.state.write().registry.set_status(tier_id, active)?;
        info!(tier_id, active, "tier status set");
        Ok(())
    }

    /// Global pause of the mint path. Administrative, rescue, burn, and
    /// read operations are unaffected.
    pub fn pause(&self, caller: &Address) -> Result<()> {
        self.require_owner(caller)?;
        let _permit = self.enter()?;

        self.state.write().paused = true;
        warn!("engine paused");
        Ok(())
    }

    pub fn unpause(&self, caller: &Address) -> Result<()> {
        self.require_owner(caller)?;
        let _permit = self.enter()?;

        self.state.write().paused = false;
        info!("engine unpaused");
        Ok(())
    }

    /// Drain the engine's native balance to the owner. Returns the drained
    /// amount; the host performs the actual native payout.
    pub fn withdraw(&self, caller: &Address) -> Result<Amount> {
        self.require_owner(caller)?;
        let _permit = self.enter()?;

        let mut state = self.state.write();
        if state.native_balance == 0 {
            return Err(EngineError::NothingToWithdraw);
        }
        let amount = state.native_balance;
        state.native_balance = 0;
        drop(state);

        info!(amount, "native balance withdrawn");
        Ok(amount)
    }

    /// Push stray tokens from the treasury account to the owner. Works
    /// while paused; holds no engine state.
    pub fn rescue_tokens(&self, caller: &Address, token: &Address, amount: Amount) -> Result<()> {
        self.require_owner(caller)?;
        let _permit = self.enter()?;

        self.env
            .token_ledger
            .transfer(token, &self.treasury, &self.owner, amount)?;
        info!(token = %token, amount, "tokens rescued");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Public surface
    // ------------------------------------------------------------------

    /// Mint `quantity` items of a tier for `caller`, paying `payment` in
    /// native currency (must be zero for token-priced tiers).
    ///
    /// Preconditions run in a fixed order, each with its own error; side
    /// effects are all-or-nothing. The per-wallet cap is checked after
    /// payment collection, matching the reference ordering; a token pull
    /// that precedes a cap failure is returned in full before the error
    /// surfaces.
    pub fn mint(
        &self,
        caller: &Address,
        tier_id: TierId,
        quantity: Quantity,
        payment: Amount,
    ) -> Result<MintReceipt> {
        let _permit = self.enter()?;

        if !self.env.classifier.is_external(caller) {
            return Err(EngineError::AutomatedCaller);
        }

        // Admission snapshot of the tier; nothing can change underneath us
        // while the entry flag is held.
        let (currency, unit_price, wallet_limit, boost_reset_secs) = {
            let state = self.state.read();
            if state.paused {
                return Err(EngineError::EnginePaused);
            }
            let tier = state.registry.get(tier_id)?;
            if quantity == 0 {
                return Err(EngineError::ZeroQuantity);
            }
            if !tier.active {
                return Err(EngineError::TierNotActive { tier_id });
            }
            let issued_after = state
                .total_issued
                .checked_add(quantity)
                .ok_or(EngineError::AmountOverflow)?;
            if issued_after > self.params.max_supply {
                return Err(EngineError::SupplyCapReached {
                    issued: state.total_issued,
                    requested: quantity,
                    cap: self.params.max_supply,
                });
            }
            (
                tier.currency,
                tier.unit_price,
                tier.wallet_limit,
                tier.boost_reset_secs,
            )
        };

        let cost = unit_price
            .checked_mul(quantity as Amount)
            .ok_or(EngineError::AmountOverflow)?;

        // Payment: exact native amount, or an exact token pull with zero
        // native value. Pulled before item records exist so a failed
        // transfer never mints.
        match &currency {
            None => {
                if payment != cost {
                    return Err(EngineError::WrongPayment {
                        expected: cost,
                        actual: payment,
                    });
                }
            }
            Some(token) => {
                if payment != 0 {
                    return Err(EngineError::UnexpectedNativePayment { actual: payment });
                }
                self.env
                    .token_ledger
                    .transfer(token, caller, &self.treasury, cost)?;
            }
        }

        // Wallet cap, deliberately evaluated after payment collection.
        if wallet_limit != 0 {
            let minted = self.wallet_minted(tier_id, caller);
            if minted.saturating_add(quantity) > wallet_limit {
                if let Some(token) = &currency {
                    self.refund(token, caller, cost)?;
                }
                return Err(EngineError::WalletCapReached {
                    tier_id,
                    minted,
                    requested: quantity,
                    limit: wallet_limit,
                });
            }
        }

        let first_item_id = match self.env.collection.mint_sequential(caller, quantity) {
            Ok(first) => first,
            Err(err) => {
                if let Some(token) = &currency {
                    self.refund(token, caller, cost)?;
                }
                return Err(err);
            }
        };
        let last_item_id = first_item_id + quantity - 1;

        // Commit. Every write below this point is infallible.
        let minted_at = self.env.clock.now();
        let boost_ends_at = minted_at.saturating_add(boost_reset_secs);
        {
            let mut state = self.state.write();
            for id in first_item_id..=last_item_id {
                state.items.insert(
                    id,
                    ItemRecord {
                        tier_id,
                        minted_at,
                        boost_ends_at,
                        valid: true,
                    },
                );
            }

            let tier = state.registry.get_mut(tier_id)?;
            tier.total_minted = tier.total_minted.saturating_add(quantity);
            tier.total_collected = tier.total_collected.saturating_add(cost);

            let counter = state
                .wallet_minted
                .entry(tier_id)
                .or_default()
                .entry(*caller)
                .or_default();
            *counter = counter.saturating_add(quantity);

            state.total_issued = state.total_issued.saturating_add(quantity);
            if currency.is_none() {
                state.native_balance = state.native_balance.saturating_add(payment);
            }
            state
                .index
                .on_transfer(None, Some(caller), tier_id, first_item_id, quantity);
        }

        info!(
            tier_id,
            minter = %caller,
            first_item_id,
            last_item_id,
            quantity,
            cost,
            "minted"
        );

        Ok(MintReceipt {
            tier_id,
            minter: *caller,
            first_item_id,
            last_item_id,
            quantity,
            total_cost: cost,
        })
    }

    /// Return a token pull after a late precondition failure so the whole
    /// call nets to zero. Under serialized execution the treasury just
    /// received these funds; a ledger that rejects the return anyway
    /// surfaces as `PaymentFailed`.
    fn refund(&self, token: &Address, caller: &Address, cost: Amount) -> Result<()> {
        self.env
            .token_ledger
            .transfer(token, &self.treasury, caller, cost)?;
        Ok(())
    }

    /// Owner-initiated burn. Retires the item id for good: the record is
    /// marked invalid, both indexes drop the id, and supply capacity is
    /// not freed.
    pub fn burn(&self, caller: &Address, item_id: ItemId) -> Result<()> {
        let _permit = self.enter()?;

        let tier_id = {
            let state = self.state.read();
            let record = state
                .items
                .get(&item_id)
                .filter(|record| record.valid)
                .ok_or(EngineError::UnknownItem { item_id })?;
            record.tier_id
        };

        // Ownership is checked by the base ledger.
        self.env.collection.burn(caller, item_id)?;

        {
            let mut state = self.state.write();
            if let Some(record) = state.items.get_mut(&item_id) {
                record.valid = false;
            }
            state
                .index
                .on_transfer(Some(caller), None, tier_id, item_id, 1);
        }

        info!(item_id, owner = %caller, "item burned");
        Ok(())
    }

    /// Items are non-transferable once minted; every transfer attempt
    /// fails with the same fixed signal and touches no state.
    pub fn transfer_item(
        &self,
        _from: &Address,
        _to: &Address,
        _item_id: ItemId,
    ) -> Result<()> {
        Err(EngineError::TransfersDisabled)
    }

    /// Unsolicited native payment. Credited to the withdrawable balance
    /// and logged; no other state change.
    pub fn receive_native(&self, from: &Address, amount: Amount) -> Result<()> {
        let _permit = self.enter()?;

        let mut state = self.state.write();
        state.native_balance = state.native_balance.saturating_add(amount);
        drop(state);

        info!(from = %from, amount, "unsolicited native payment received");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Read-only queries
    // ------------------------------------------------------------------

    /// Any assigned tier, active or not.
    pub fn tier(&self, tier_id: TierId) -> Result<TierConfig> {
        self.state.read().registry.get(tier_id).cloned()
    }

    /// Admission-path read: fails `TierNotActive` for known-but-paused
    /// tiers, `TierNotFound` for unknown ids.
    pub fn active_tier(&self, tier_id: TierId) -> Result<TierConfig> {
        self.state.read().registry.get_active(tier_id).cloned()
    }

    pub fn tier_count(&self) -> usize {
        self.state.read().registry.len()
    }

    pub fn tiers(&self) -> Vec<TierConfig> {
        self.state.read().registry.iter().cloned().collect()
    }

    /// The frozen mint record of an item, including burned ones (their
    /// `valid` flag is false).
    pub fn item(&self, item_id: ItemId) -> Result<ItemRecord> {
        self.state
            .read()
            .items
            .get(&item_id)
            .cloned()
            .ok_or(EngineError::UnknownItem { item_id })
    }

    pub fn exists(&self, item_id: ItemId) -> bool {
        self.env.collection.exists(item_id)
    }

    pub fn owner_of(&self, item_id: ItemId) -> Result<Address> {
        self.env.collection.owner_of(item_id)
    }

    pub fn items_of_owner(&self, owner: &Address) -> Vec<ItemId> {
        self.state.read().index.items_of_owner(owner)
    }

    pub fn items_of_tier(&self, tier_id: TierId) -> Vec<ItemId> {
        self.state.read().index.items_of_tier(tier_id)
    }

    /// Cumulative quantity `owner` has minted in `tier_id`. Monotone; never
    /// reset, not even by burns.
    pub fn wallet_minted(&self, tier_id: TierId, owner: &Address) -> u64 {
        self.state
            .read()
            .wallet_minted
            .get(&tier_id)
            .and_then(|counters| counters.get(owner))
            .copied()
            .unwrap_or(0)
    }

    /// Accrued reward of one live item at the current time.
    pub fn reward_of(&self, item_id: ItemId) -> Result<Amount> {
        let state = self.state.read();
        let record = state
            .items
            .get(&item_id)
            .filter(|record| record.valid)
            .ok_or(EngineError::UnknownItem { item_id })?;
        let tier = state.registry.get(record.tier_id)?;
        Ok(reward_for_record(
            record,
            tier,
            &self.params,
            self.env.clock.now(),
        ))
    }

    /// Fresh linear sum over the owner's indexed holdings; never cached.
    pub fn total_reward_of(&self, owner: &Address) -> Amount {
        let state = self.state.read();
        let now = self.env.clock.now();
        let mut total: Amount = 0;
        for item_id in state.index.items_of_owner(owner) {
            if let Some(record) = state.items.get(&item_id) {
                if let Ok(tier) = state.registry.get(record.tier_id) {
                    total =
                        total.saturating_add(reward_for_record(record, tier, &self.params, now));
                }
            }
        }
        total
    }

    pub fn supply_info(&self) -> SupplyInfo {
        let state = self.state.read();
        SupplyInfo {
            total_issued: state.total_issued,
            max_supply: self.params.max_supply,
            remaining_supply: self.params.max_supply.saturating_sub(state.total_issued),
            native_collected: state.native_balance,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.state.read().paused
    }

    pub fn params(&self) -> &ProtocolParams {
        &self.params
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn treasury(&self) -> Address {
        self.treasury
    }
}

//! Tier registry: the sole writer of tier definitions.
//!
//! Ids are dense (1..=len), assigned sequentially, and never reused or
//! deleted, so "zero or out of range" and "not found" coincide. "Not
//! found" and "not active" stay distinct, separately signaled conditions.

use crate::errors::{EngineError, Result};
use crate::types::{TierConfig, TierSpec};
use boostpass_types::{TierId, FIRST_TIER_ID};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierRegistry {
    tiers: BTreeMap<TierId, TierConfig>,
    names: HashSet<String>,
    next_id: TierId,
}

impl TierRegistry {
    pub fn new() -> Self {
        Self {
            tiers: BTreeMap::new(),
            names: HashSet::new(),
            next_id: FIRST_TIER_ID,
        }
    }

    /// Commit a pre-validated spec. Assigns the next sequential id, stores
    /// the tier inactive with zeroed totals, and records its name as taken.
    pub fn add(&mut self, spec: TierSpec) -> TierId {
        let id = self.next_id;
        self.next_id += 1;
        self.names.insert(spec.name.clone());
        self.tiers.insert(id, TierConfig::from_spec(id, spec));
        id
    }

    /// One-shot activation of a freshly added tier. Re-starting an
    /// already-active tier is rejected; use `set_status` to re-activate a
    /// paused one.
    pub fn start(&mut self, tier_id: TierId) -> Result<()> {
        let tier = self
            .tiers
            .get_mut(&tier_id)
            .ok_or(EngineError::TierNotFound { tier_id })?;
        if tier.active {
            return Err(EngineError::TierAlreadyStarted { tier_id });
        }
        tier.active = true;
        Ok(())
    }

    /// Direct flag write, repeatable in both directions. Never fails for
    /// "already in that state".
    pub fn set_status(&mut self, tier_id: TierId, active: bool) -> Result<()> {
        let tier = self
            .tiers
            .get_mut(&tier_id)
            .ok_or(EngineError::TierNotFound { tier_id })?;
        tier.active = active;
        Ok(())
    }

    /// Serve any assigned tier, active or not. Reading an inactive tier's
    /// configuration is allowed at the query layer; only the mint path
    /// refuses inactive tiers.
    pub fn get(&self, tier_id: TierId) -> Result<&TierConfig> {
        self.tiers
            .get(&tier_id)
            .ok_or(EngineError::TierNotFound { tier_id })
    }

    /// Admission-path read: unknown and inactive tiers fail with distinct
    /// signals.
    pub fn get_active(&self, tier_id: TierId) -> Result<&TierConfig> {
        let tier = self.get(tier_id)?;
        if !tier.active {
            return Err(EngineError::TierNotActive { tier_id });
        }
        Ok(tier)
    }

    pub(crate) fn get_mut(&mut self, tier_id: TierId) -> Result<&mut TierConfig> {
        self.tiers
            .get_mut(&tier_id)
            .ok_or(EngineError::TierNotFound { tier_id })
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn names(&self) -> &HashSet<String> {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TierConfig> {
        self.tiers.values()
    }
}

impl Default for TierRegistry {
    fn default() -> Self {
        Self::new()
    }
}

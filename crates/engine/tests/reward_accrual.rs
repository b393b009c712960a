//! Reward accrual observed through the engine's read surface, driven by a
//! manual clock.

use boostpass_engine::*;
use boostpass_types::Address;
use std::sync::Arc;

fn addr(byte: u8) -> Address {
    Address([byte; 32])
}

const OWNER: u8 = 1;
const ALICE: u8 = 10;

struct Harness {
    engine: MintEngine,
    clock: Arc<ManualClock>,
}

fn harness() -> Harness {
    let clock = Arc::new(ManualClock::new(1_000_000));
    let env = EngineEnv {
        clock: clock.clone(),
        classifier: Arc::new(AllowAllCallers),
        token_probe: Arc::new(AcceptAllTokens),
        token_ledger: Arc::new(InMemoryTokenLedger::new()),
        collection: Arc::new(InMemoryCollectionLedger::new()),
    };
    let engine = MintEngine::new(
        addr(OWNER),
        addr(2),
        ProtocolParams::default(),
        env,
    )
    .unwrap();
    Harness { engine, clock }
}

/// interval 60s, rate 150 (1.5x), reset one day
fn boosted_spec(name: &str, rate: u64) -> TierSpec {
    TierSpec {
        currency: None,
        name: name.into(),
        metadata_ref: String::new(),
        unit_price: 100,
        wallet_limit: 0,
        boost_interval_secs: 60,
        boost_rate: rate,
        boost_reset_secs: 86_400,
    }
}

fn open_tier(h: &Harness, spec: TierSpec) -> u64 {
    let id = h.engine.add_tier(&addr(OWNER), spec).unwrap();
    h.engine.start_tier(&addr(OWNER), id).unwrap();
    id
}

#[test]
fn reward_steps_at_interval_boundaries() {
    let h = harness();
    let id = open_tier(&h, boosted_spec("Gold", 150));
    let receipt = h.engine.mint(&addr(ALICE), id, 1, 100).unwrap();
    let item = receipt.first_item_id;

    h.clock.advance(59);
    assert_eq!(h.engine.reward_of(item).unwrap(), 0);

    h.clock.advance(1); // T + 60
    assert_eq!(h.engine.reward_of(item).unwrap(), 1);

    h.clock.advance(59); // T + 119
    assert_eq!(h.engine.reward_of(item).unwrap(), 1);

    h.clock.advance(1); // T + 120: floor(2 * 150 / 100) = 3
    assert_eq!(h.engine.reward_of(item).unwrap(), 3);
}

#[test]
fn reward_is_zero_past_boost_end_plus_grace() {
    let h = harness();
    let id = open_tier(&h, boosted_spec("Gold", 150));
    let receipt = h.engine.mint(&addr(ALICE), id, 1, 100).unwrap();
    let item = receipt.first_item_id;
    let grace = h.engine.params().grace_threshold_secs;

    // Still queryable at the boundary, gone one second later.
    h.clock.advance(86_400 + grace);
    assert!(h.engine.reward_of(item).unwrap() > 0);
    h.clock.advance(1);
    assert_eq!(h.engine.reward_of(item).unwrap(), 0);
}

#[test]
fn identical_queries_are_deterministic_and_caller_independent() {
    let h = harness();
    let id = open_tier(&h, boosted_spec("Gold", 150));
    let receipt = h.engine.mint(&addr(ALICE), id, 1, 100).unwrap();

    h.clock.advance(600);
    let first = h.engine.reward_of(receipt.first_item_id).unwrap();
    for _ in 0..100 {
        assert_eq!(h.engine.reward_of(receipt.first_item_id).unwrap(), first);
    }
}

#[test]
fn total_reward_sums_across_tiers_and_holdings() {
    let h = harness();
    let gold = open_tier(&h, boosted_spec("Gold", 150));
    let plain = open_tier(&h, boosted_spec("Plain", 100));

    h.engine.mint(&addr(ALICE), gold, 2, 200).unwrap();
    h.engine.mint(&addr(ALICE), plain, 1, 100).unwrap();

    h.clock.advance(120);
    // Gold: floor(2*150/100) = 3 each; Plain: 2.
    assert_eq!(h.engine.total_reward_of(&addr(ALICE)), 3 + 3 + 2);

    // An empty wallet always totals zero.
    assert_eq!(h.engine.total_reward_of(&addr(42)), 0);
}

#[test]
fn burned_items_stop_contributing() {
    let h = harness();
    let id = open_tier(&h, boosted_spec("Gold", 150));
    let receipt = h.engine.mint(&addr(ALICE), id, 2, 200).unwrap();

    h.clock.advance(120);
    let before = h.engine.total_reward_of(&addr(ALICE));
    h.engine.burn(&addr(ALICE), receipt.first_item_id).unwrap();
    assert_eq!(h.engine.total_reward_of(&addr(ALICE)), before / 2);
}

#[test]
fn boost_end_is_frozen_at_mint_time() {
    let h = harness();
    let id = open_tier(&h, boosted_spec("Gold", 150));

    let early = h.engine.mint(&addr(ALICE), id, 1, 100).unwrap();
    h.clock.advance(1_000);
    let late = h.engine.mint(&addr(ALICE), id, 1, 100).unwrap();

    let early_record = h.engine.item(early.first_item_id).unwrap();
    let late_record = h.engine.item(late.first_item_id).unwrap();
    assert_eq!(
        late_record.boost_ends_at - early_record.boost_ends_at,
        1_000
    );
    assert_eq!(
        early_record.boost_ends_at,
        early_record.minted_at + 86_400
    );
}

#[test]
fn unknown_item_reward_fails() {
    let h = harness();
    assert!(matches!(
        h.engine.reward_of(123).unwrap_err(),
        EngineError::UnknownItem { item_id: 123 }
    ));
}

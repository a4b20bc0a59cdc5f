//! Daily minigame allowances across users, games and the wider economy.

mod common;

use chrono::Utc;
use lamoland::game::allowance;
use lamoland::game::errors::GameError;
use lamoland::game::ledger;
use lamoland::game::types::{GameRules, GAME_FEEDING_TIME, GAME_JACKALOAF_JUMP};

#[test]
fn quotas_are_tracked_per_game() {
    let (_dir, store) = common::open_store();
    let rules = GameRules::default();
    common::register(&store, "alice");

    for _ in 0..rules.daily_plays {
        allowance::award(&store, "alice", GAME_FEEDING_TIME, 10, &rules).expect("award");
    }
    // Feeding time is exhausted but the jump still has its own plays.
    let err = allowance::award(&store, "alice", GAME_FEEDING_TIME, 10, &rules).unwrap_err();
    match err {
        GameError::AllowanceExhausted => {}
        other => panic!("Expected AllowanceExhausted, got: {:?}", other),
    }
    let outcome =
        allowance::award(&store, "alice", GAME_JACKALOAF_JUMP, 10, &rules).expect("other game");
    assert_eq!(outcome.plays_left, rules.daily_plays - 1);
}

#[test]
fn quotas_are_tracked_per_user() {
    let (_dir, store) = common::open_store();
    let rules = GameRules::default();
    common::register(&store, "alice");
    common::register(&store, "bobby");

    for _ in 0..rules.daily_plays {
        allowance::award(&store, "alice", GAME_JACKALOAF_JUMP, 10, &rules).expect("award");
    }
    assert!(allowance::award(&store, "alice", GAME_JACKALOAF_JUMP, 10, &rules).is_err());

    let outcome =
        allowance::award(&store, "bobby", GAME_JACKALOAF_JUMP, 10, &rules).expect("bobby plays");
    assert_eq!(outcome.plays_left, rules.daily_plays - 1);
    assert_eq!(outcome.balance, 1010);
}

#[test]
fn banked_scores_spend_like_any_other_coin() {
    let (_dir, store) = common::open_store();
    let rules = GameRules::default();
    common::register(&store, "alice");

    allowance::award(&store, "alice", GAME_JACKALOAF_JUMP, 40, &rules).expect("award");
    // Star Hoodie costs 150; 1040 covers it.
    let outcome = ledger::purchase_item(&store, "alice", 30).expect("purchase");
    assert_eq!(outcome.balance, 1040 - 150);
}

#[test]
fn missing_slots_are_backfilled_on_reset() {
    let (_dir, store) = common::open_store();
    let rules = GameRules::default();
    common::register(&store, "alice");

    // Simulate an account created before a game existed.
    let mut user = store.get_user("alice").expect("user");
    user.minigames.retain(|a| a.game != GAME_FEEDING_TIME);
    store.put_user(user).expect("strip slot");

    let games = allowance::reset_if_new_day(&store, "alice", &rules).expect("reset");
    let feeding = games
        .iter()
        .find(|a| a.game == GAME_FEEDING_TIME)
        .expect("slot restored");
    assert_eq!(feeding.plays_left, rules.daily_plays);
    assert_eq!(feeding.last_played, Utc::now().date_naive());
}

#[test]
fn a_stripped_slot_does_not_block_awards() {
    let (_dir, store) = common::open_store();
    let rules = GameRules::default();
    common::register(&store, "alice");

    let mut user = store.get_user("alice").expect("user");
    user.minigames.clear();
    store.put_user(user).expect("strip slots");

    let outcome =
        allowance::award(&store, "alice", GAME_FEEDING_TIME, 15, &rules).expect("award");
    assert_eq!(outcome.balance, 1015);
    assert_eq!(outcome.plays_left, rules.daily_plays - 1);
}

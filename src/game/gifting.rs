//! Gifting throttle: validated coin transfers between users.
//!
//! Validation runs in a fixed order and the first failing check wins with
//! no mutation: positive amount, per-gift cap, recipient exists, recipient
//! differs from sender, sufficient balance, cooldown elapsed. On success
//! the debit, the credit and the sender's cooldown stamp are one commit.

use chrono::{DateTime, Duration, Utc};
use log::info;

use crate::game::errors::GameError;
use crate::game::storage::{abort, tx_get_user, tx_put_user, GameStore};
use crate::game::types::GameRules;
use crate::logutil::escape_log;
use crate::metrics;

/// Sender-side cooldown view for the gifting page.
#[derive(Debug, Clone)]
pub struct GiftState {
    pub can_gift: bool,
    pub remaining_minutes: i64,
    pub last_gift_at: Option<DateTime<Utc>>,
}

fn remaining_minutes(elapsed_deficit: Duration) -> i64 {
    // Round up so "30 seconds left" never displays as zero.
    (elapsed_deficit.num_seconds() + 59) / 60
}

/// What the gifting page shows before any attempt: whether the sender may
/// gift right now, and how long until the cooldown clears.
pub fn gift_state(
    store: &GameStore,
    sender: &str,
    rules: &GameRules,
) -> Result<GiftState, GameError> {
    let user = store.get_user(sender)?;
    let cooldown = Duration::hours(rules.gift_cooldown_hours);
    let state = match user.last_gift_at {
        Some(last) => {
            let elapsed = Utc::now() - last;
            if elapsed < cooldown {
                GiftState {
                    can_gift: false,
                    remaining_minutes: remaining_minutes(cooldown - elapsed),
                    last_gift_at: Some(last),
                }
            } else {
                GiftState {
                    can_gift: true,
                    remaining_minutes: 0,
                    last_gift_at: Some(last),
                }
            }
        }
        None => GiftState {
            can_gift: true,
            remaining_minutes: 0,
            last_gift_at: None,
        },
    };
    Ok(state)
}

/// Send `amount` coins to another user. Returns the sender's new balance.
pub fn send_gift(
    store: &GameStore,
    sender: &str,
    recipient: &str,
    amount: i64,
    rules: &GameRules,
) -> Result<i64, GameError> {
    if amount <= 0 {
        return Err(GameError::Validation(
            "Gift amount must be a positive number.".to_string(),
        ));
    }
    if amount > rules.gift_cap {
        return Err(GameError::Validation(format!(
            "Gifts are capped at {} Lamocoins.",
            rules.gift_cap
        )));
    }

    let now = Utc::now();
    let cooldown = Duration::hours(rules.gift_cooldown_hours);
    let sender_name = sender.to_string();
    let recipient_name = recipient.to_string();

    let balance = store.commit_with_retry("send_gift", |tx| {
        let mut recipient_user = tx_get_user(tx, &recipient_name)?;
        if recipient_user
            .username
            .eq_ignore_ascii_case(&sender_name)
        {
            return Err(abort(GameError::Validation(
                "You cannot gift yourself.".to_string(),
            )));
        }
        let mut sender_user = tx_get_user(tx, &sender_name)?;
        if sender_user.balance < amount {
            return Err(abort(GameError::InsufficientBalance));
        }
        if let Some(last) = sender_user.last_gift_at {
            let elapsed = now - last;
            if elapsed < cooldown {
                return Err(abort(GameError::CooldownActive {
                    remaining_minutes: remaining_minutes(cooldown - elapsed),
                }));
            }
        }

        sender_user.balance -= amount;
        sender_user.last_gift_at = Some(now);
        sender_user.touch();
        recipient_user.balance += amount;
        recipient_user.touch();
        tx_put_user(tx, &sender_user)?;
        tx_put_user(tx, &recipient_user)?;
        Ok(sender_user.balance)
    })?;

    metrics::record_gift();
    info!(
        "{} gifted {} to {}",
        escape_log(sender),
        amount,
        escape_log(recipient)
    );
    Ok(balance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::ledger::register_user;
    use crate::game::storage::GameStoreBuilder;
    use tempfile::TempDir;

    fn setup() -> (TempDir, GameStore) {
        let dir = TempDir::new().expect("tempdir");
        let store = GameStoreBuilder::new(dir.path()).open().expect("store");
        register_user(&store, "alice", "hunter22", &GameRules::default()).expect("alice");
        register_user(&store, "bobby", "hunter22", &GameRules::default()).expect("bobby");
        (dir, store)
    }

    fn balances(store: &GameStore) -> (i64, i64) {
        (
            store.get_user("alice").expect("alice").balance,
            store.get_user("bobby").expect("bobby").balance,
        )
    }

    #[test]
    fn invalid_gifts_mutate_no_balances() {
        let (_dir, store) = setup();
        let rules = GameRules::default();

        assert!(matches!(
            send_gift(&store, "alice", "bobby", 0, &rules),
            Err(GameError::Validation(_))
        ));
        assert!(matches!(
            send_gift(&store, "alice", "bobby", -5, &rules),
            Err(GameError::Validation(_))
        ));
        assert!(matches!(
            send_gift(&store, "alice", "bobby", 150, &rules),
            Err(GameError::Validation(_))
        ));
        assert!(matches!(
            send_gift(&store, "alice", "nobody99", 50, &rules),
            Err(GameError::NotFound(_))
        ));
        assert!(matches!(
            send_gift(&store, "alice", "alice", 50, &rules),
            Err(GameError::Validation(_))
        ));

        assert_eq!(balances(&store), (1000, 1000));
    }

    #[test]
    fn insufficient_balance_blocks_the_gift() {
        let (_dir, store) = setup();
        let mut alice = store.get_user("alice").expect("alice");
        alice.balance = 20;
        store.put_user(alice).expect("put");

        assert!(matches!(
            send_gift(&store, "alice", "bobby", 50, &GameRules::default()),
            Err(GameError::InsufficientBalance)
        ));
        assert_eq!(balances(&store), (20, 1000));
    }

    #[test]
    fn successful_gift_moves_coins_and_stamps_cooldown() {
        let (_dir, store) = setup();
        let rules = GameRules::default();

        // The cap itself is allowed.
        let balance = send_gift(&store, "alice", "bobby", 100, &rules).expect("gift");
        assert_eq!(balance, 900);
        assert_eq!(balances(&store), (900, 1100));

        let alice = store.get_user("alice").expect("alice");
        assert!(alice.last_gift_at.is_some());

        let state = gift_state(&store, "alice", &rules).expect("state");
        assert!(!state.can_gift);
        assert!(state.remaining_minutes > 0);
    }

    #[test]
    fn second_gift_within_cooldown_is_rejected() {
        let (_dir, store) = setup();
        let rules = GameRules::default();

        send_gift(&store, "alice", "bobby", 50, &rules).expect("first gift");
        let result = send_gift(&store, "alice", "bobby", 50, &rules);
        assert!(matches!(result, Err(GameError::CooldownActive { .. })));
        assert_eq!(balances(&store), (950, 1050));
    }

    #[test]
    fn cooldown_expires_after_the_configured_hours() {
        let (_dir, store) = setup();
        let rules = GameRules::default();

        send_gift(&store, "alice", "bobby", 50, &rules).expect("first gift");
        let mut alice = store.get_user("alice").expect("alice");
        alice.last_gift_at = Some(Utc::now() - Duration::hours(5));
        store.put_user(alice).expect("put");

        let state = gift_state(&store, "alice", &rules).expect("state");
        assert!(state.can_gift);

        send_gift(&store, "alice", "bobby", 50, &rules).expect("second gift");
        assert_eq!(balances(&store), (900, 1100));
    }
}

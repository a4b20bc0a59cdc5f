//! Daily minigame allowance gate.
//!
//! Each user carries, per minigame, a remaining-plays counter and a
//! last-played calendar date. The date rollover is folded into [`award`]
//! itself: a stale date resets the counter before the play is gated, so the
//! counter can never stay pinned at zero across days. A separate
//! [`reset_if_new_day`] exists so the minigames page can show fresh
//! counters without spending a play.

use chrono::{NaiveDate, Utc};
use log::info;

use crate::game::errors::GameError;
use crate::game::storage::{abort, tx_get_user, tx_put_user, GameStore};
use crate::game::types::{GameRules, MinigameAllowance, UserRecord, KNOWN_GAMES};
use crate::logutil::escape_log;
use crate::metrics;

/// Result of a successful award.
#[derive(Debug, Clone)]
pub struct AwardOutcome {
    pub balance: i64,
    pub plays_left: u32,
}

fn is_known_game(game: &str) -> bool {
    KNOWN_GAMES.contains(&game)
}

/// Roll one allowance forward to `today`, restoring the daily maximum if
/// the stored date is stale. Returns true when anything changed.
fn roll_allowance(allowance: &mut MinigameAllowance, today: NaiveDate, rules: &GameRules) -> bool {
    if allowance.last_played != today {
        allowance.last_played = today;
        allowance.plays_left = rules.daily_plays;
        true
    } else {
        false
    }
}

/// Make sure every known game has an allowance slot on the record, for
/// accounts that predate a game's introduction.
fn ensure_slots(user: &mut UserRecord, today: NaiveDate, rules: &GameRules) {
    for game in KNOWN_GAMES {
        if user.allowance(game).is_none() {
            user.minigames.push(MinigameAllowance {
                game: game.to_string(),
                last_played: today,
                plays_left: rules.daily_plays,
            });
        }
    }
}

/// Bank a minigame score: rolls the date forward if needed, spends one play
/// and credits the score to the balance, all in one commit.
pub fn award(
    store: &GameStore,
    username: &str,
    game: &str,
    score: i64,
    rules: &GameRules,
) -> Result<AwardOutcome, GameError> {
    if !is_known_game(game) {
        return Err(GameError::NotFound(format!("minigame: {}", game)));
    }
    if score < 0 {
        return Err(GameError::Validation(
            "Score must be a non-negative integer.".to_string(),
        ));
    }

    let today = Utc::now().date_naive();
    let outcome = store.commit_with_retry("award", |tx| {
        let mut user = tx_get_user(tx, username)?;
        ensure_slots(&mut user, today, rules);
        let allowance = user
            .allowance_mut(game)
            .ok_or_else(|| abort(GameError::Internal(format!("missing allowance: {}", game))))?;
        roll_allowance(allowance, today, rules);
        if allowance.plays_left == 0 {
            return Err(abort(GameError::AllowanceExhausted));
        }
        allowance.plays_left -= 1;
        allowance.last_played = today;
        let plays_left = allowance.plays_left;
        user.balance += score;
        user.touch();
        tx_put_user(tx, &user)?;
        Ok(AwardOutcome {
            balance: user.balance,
            plays_left,
        })
    })?;

    metrics::record_allowance_award();
    info!(
        "{} banked {} from {} ({} plays left today)",
        escape_log(username),
        score,
        game,
        outcome.plays_left
    );
    Ok(outcome)
}

/// Refresh all of a user's allowances for a new day. No-op when every date
/// is already current. Returns the (possibly refreshed) allowance list for
/// display.
pub fn reset_if_new_day(
    store: &GameStore,
    username: &str,
    rules: &GameRules,
) -> Result<Vec<MinigameAllowance>, GameError> {
    let today = Utc::now().date_naive();

    let current = store.get_user(username)?;
    let stale = current.minigames.iter().any(|a| a.last_played != today)
        || KNOWN_GAMES.iter().any(|g| current.allowance(g).is_none());
    if !stale {
        return Ok(current.minigames);
    }

    store.commit_with_retry("reset_allowances", |tx| {
        let mut user = tx_get_user(tx, username)?;
        ensure_slots(&mut user, today, rules);
        let mut changed = false;
        for allowance in &mut user.minigames {
            changed |= roll_allowance(allowance, today, rules);
        }
        if changed {
            user.touch();
        }
        tx_put_user(tx, &user)?;
        Ok(user.minigames)
    })
}

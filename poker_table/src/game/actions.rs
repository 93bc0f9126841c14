//! Applying a player's action to the board.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    entities::{Board, Chips, PlayerAction},
    rules,
};

/// Errors a player can cause by sending an action the table won't accept.
/// The table logs them and asks the same player again.
#[derive(Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum UserError {
    #[error("can't check facing a bet of {to_call}")]
    CannotCheck { to_call: Chips },
    #[error("invalid action")]
    InvalidAction,
    #[error("illegal bet of {amount}, {to_call} needed to call")]
    InvalidBet { amount: Chips, to_call: Chips },
    #[error("not your turn")]
    OutOfTurnAction,
}

/// Apply `action` for the active player and return the resulting board.
///
/// Only the acting player's entry and `steps_in_round` change. Betting
/// more than the stack goes all-in; betting less than the amount to call
/// is only allowed all-in. A bet above the highest live bet is a raise and
/// restarts the street's step count.
///
/// # Errors
///
/// Returns a [`UserError`] if the action isn't legal right now. The board
/// is left untouched.
pub fn apply_action(action: &PlayerAction, board: &Board) -> Result<Board, UserError> {
    let id = board.active_player.ok_or(UserError::OutOfTurnAction)?;
    let live_max = rules::live_max_bet(board);
    let mut next = board.clone();
    let steps = next.steps_in_round;
    let player = next.player_mut(id);
    let to_call = live_max.saturating_sub(player.bet);

    match *action {
        PlayerAction::Bet(amount) => {
            let amount = amount.min(player.stack);
            let all_in = amount == player.stack;
            if amount < to_call && !all_in {
                return Err(UserError::InvalidBet { amount, to_call });
            }
            player.stack -= amount;
            player.bet += amount;
            let raised = player.bet > live_max;
            let keeps_acting = player.stack > 0;
            next.steps_in_round = match (raised, keeps_acting) {
                (true, true) => 1,
                (true, false) => 0,
                (false, true) => steps + 1,
                // An all-in call leaves the players that can act unchanged.
                (false, false) => steps,
            };
        }
        PlayerAction::Check => {
            if to_call > 0 {
                return Err(UserError::CannotCheck { to_call });
            }
            next.steps_in_round = steps + 1;
        }
        PlayerAction::Fold => {
            player.in_hand = false;
        }
        PlayerAction::Quit => {
            // The whole stack is forfeited to the pot.
            player.in_hand = false;
            player.bet += player.stack;
            player.stack = 0;
        }
        PlayerAction::Ok => return Err(UserError::InvalidAction),
    }
    Ok(next)
}

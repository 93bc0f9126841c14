//! The table's game loop.
//!
//! A single task owns the canonical board. It publishes snapshots through
//! the seats' mailboxes, reads the active player's action straight off
//! that player's connection, and runs the pure rules in between.

use log::{debug, info, warn};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::{collections::BTreeMap, sync::Arc};
use tokio::io::AsyncRead;

use super::seat::Seat;
use crate::{
    game::{
        actions,
        entities::{Board, Chips, Player, PlayerAction, SeatId},
        functional, rules,
        settings::TableSettings,
    },
    net::utils,
};

/// How a table ended.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TableOutcome {
    /// The last player with chips. `None` only if every stack went to zero.
    pub winner: Option<Player>,
    pub hands_played: u32,
}

/// A full table, ready to play until one player is left.
pub struct Table<R> {
    board: Board,
    dealer: SeatId,
    seats: BTreeMap<SeatId, Seat<R>>,
    rng: StdRng,
}

impl<R> Table<R>
where
    R: AsyncRead + Unpin + Send,
{
    /// Seat every connection and deal the first hand with seat 0 on the
    /// button.
    ///
    /// # Panics
    ///
    /// Panics if fewer than two seats are given or seat ids don't match
    /// their position in `seats`.
    #[must_use]
    pub fn new(settings: &TableSettings, seats: Vec<Seat<R>>) -> Self {
        assert!(seats.len() >= 2, "need 2+ seats to start a table");
        let names = seats.iter().map(|seat| seat.name.clone()).collect();
        let seats: BTreeMap<SeatId, Seat<R>> = seats
            .into_iter()
            .enumerate()
            .map(|(id, seat)| {
                assert_eq!(seat.id(), id, "seat ids must follow connection order");
                (id, seat)
            })
            .collect();

        let mut rng = settings
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        let seated = Board::seat_players(
            names,
            settings.starting_stack,
            settings.blinds(),
            settings.turn_timer_secs,
        );
        let dealer = 0;
        let board = rules::deal(rng.random(), dealer, &seated);
        Self {
            board,
            dealer,
            seats,
            rng,
        }
    }

    /// The current canonical board.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Play hands until a single player holds every chip.
    pub async fn run(mut self) -> TableOutcome {
        info!(
            "table of {} starting with blinds {}",
            self.board.player_count, self.board.blinds
        );
        self.log_hand_start();
        loop {
            if rules::round_complete(&self.board) {
                if self.finish_hand().await {
                    return self.terminate().await;
                }
                continue;
            }

            self.publish(true).await;
            let Some(id) = self.board.active_player else {
                unreachable!("betting round without an active player");
            };
            let action = self.read_action(id).await;
            let candidate = match actions::apply_action(&action, &self.board) {
                Ok(candidate) => candidate,
                Err(error) => {
                    warn!("{} {action} rejected: {error}", self.board.player(id).name);
                    continue;
                }
            };
            debug!("{} {action}", self.board.player(id).name);
            let mut patched = rules::patch_active_player(&candidate, &self.board);
            patched.current_bet = rules::max_bet(&patched);
            self.board = patched;
            self.seats
                .retain(|id, _| self.board.players.contains_key(id));

            if rules::round_complete(&self.board) {
                continue;
            }
            if rules::street_complete(&self.board) {
                self.board = rules::advance_street(&self.board, self.dealer);
                debug!("dealing the {}", self.board.street);
            } else {
                self.board.active_player = Some(rules::next_eligible(&self.board, id));
            }
        }
    }

    /// Publish the board to every connected seat.
    async fn publish(&self, hide: bool) {
        let board = Arc::new(self.board.clone());
        for seat in self.seats.values() {
            if let Err(error) = seat.mailbox.publish(hide, Arc::clone(&board)).await {
                debug!("{error}");
            }
        }
    }

    /// Read the next action from `id`. A seat that can't produce one quits.
    async fn read_action(&mut self, id: SeatId) -> PlayerAction {
        let Some(seat) = self.seats.get_mut(&id) else {
            warn!("seat {id} has no connection, treating as a quit");
            return PlayerAction::Quit;
        };
        match utils::read_prefixed(&mut seat.reader).await {
            Ok(action) => action,
            Err(error) => {
                warn!("{}: {error}, treating as a quit", seat.name);
                PlayerAction::Quit
            }
        }
    }

    /// Run the showdown, show everyone the result, and either deal the next
    /// hand or report that the game is over.
    async fn finish_hand(&mut self) -> bool {
        let before: BTreeMap<SeatId, Chips> = self
            .board
            .players
            .values()
            .map(|p| (p.id, p.stack + p.bet))
            .collect();
        let settled = rules::showdown(&self.board, functional::eval);
        for player in settled.players.values() {
            let committed = before.get(&player.id).copied().unwrap_or(0);
            if player.stack > committed {
                info!(
                    "hand #{}: {} wins {}",
                    settled.hand_number,
                    player.name,
                    player.stack - committed
                );
            }
        }
        self.board = rules::eliminate(&settled);
        for player in settled.players.values() {
            if !self.board.players.contains_key(&player.id) {
                info!("{} is out", player.name);
            }
        }

        // Busted seats get the result too, but nobody waits on them.
        self.publish(false).await;
        self.seats
            .retain(|id, _| self.board.players.contains_key(id));

        if rules::game_over(&self.board) {
            return true;
        }
        self.await_acknowledgments().await;
        self.dealer = rules::next_dealer(&self.board, self.dealer);
        self.board = rules::deal(self.rng.random(), self.dealer, &self.board);
        self.log_hand_start();
        false
    }

    /// Wait for one message from each remaining seat. Whatever it is counts
    /// as the acknowledgment, and so does a failed read.
    async fn await_acknowledgments(&mut self) {
        for seat in self.seats.values_mut() {
            match utils::read_prefixed::<PlayerAction, _>(&mut seat.reader).await {
                Ok(PlayerAction::Ok) => {}
                Ok(action) => debug!("{} {action} while acknowledging", seat.name),
                Err(error) => debug!("{}: {error} while acknowledging", seat.name),
            }
        }
    }

    /// Close every mailbox and wait for the final snapshots to go out.
    async fn terminate(self) -> TableOutcome {
        let winner = self.board.players.values().find(|p| p.stack > 0).cloned();
        match &winner {
            Some(player) => info!(
                "{} wins the table with {} after {} hands",
                player.name, player.stack, self.board.hand_number
            ),
            None => warn!("table ended with no chips left in play"),
        }
        for seat in self.seats.into_values() {
            let Seat { mailbox, sender, .. } = seat;
            drop(mailbox);
            if let Err(error) = sender.await {
                warn!("sender task failed: {error}");
            }
        }
        TableOutcome {
            winner,
            hands_played: self.board.hand_number,
        }
    }

    fn log_hand_start(&self) {
        info!(
            "hand #{}: {} deals to {} players",
            self.board.hand_number,
            self.board.player(self.dealer).name,
            self.board.player_count
        );
    }
}

//! Per-seat outgoing mailboxes.
//!
//! The game loop publishes canonical boards; each seat's sender task turns
//! them into that seat's view and writes it to the socket. A mailbox holds
//! one snapshot at a time, so the loop can get at most one board ahead of a
//! slow client before `publish` waits.

use log::{debug, warn};
use std::sync::Arc;
use thiserror::Error;
use tokio::{io::AsyncWrite, sync::mpsc};

use crate::{
    game::{
        entities::{Board, SeatId},
        rules,
    },
    net::utils,
};

/// A canonical board together with whether it should be hidden for the
/// recipient.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub hide: bool,
    pub board: Arc<Board>,
}

#[derive(Debug, Error, Eq, PartialEq)]
#[error("mailbox for seat {0} is closed")]
pub struct MailboxClosed(pub SeatId);

/// Publishing half of a seat's mailbox. Dropping it ends the sender task
/// once the last snapshot has been written.
#[derive(Debug)]
pub struct Mailbox {
    seat: SeatId,
    tx: mpsc::Sender<Snapshot>,
}

/// Receiving half of a seat's mailbox.
#[derive(Debug)]
pub struct MailboxReceiver {
    seat: SeatId,
    rx: mpsc::Receiver<Snapshot>,
}

/// Create a single-slot mailbox for `seat`.
#[must_use]
pub fn channel(seat: SeatId) -> (Mailbox, MailboxReceiver) {
    let (tx, rx) = mpsc::channel(1);
    (Mailbox { seat, tx }, MailboxReceiver { seat, rx })
}

impl Mailbox {
    #[must_use]
    pub fn seat(&self) -> SeatId {
        self.seat
    }

    /// Put a board in the mailbox, waiting until the previous one has been
    /// taken.
    ///
    /// # Errors
    ///
    /// Fails if the sender task is gone.
    pub async fn publish(&self, hide: bool, board: Arc<Board>) -> Result<(), MailboxClosed> {
        self.tx
            .send(Snapshot { hide, board })
            .await
            .map_err(|_| MailboxClosed(self.seat))
    }
}

impl MailboxReceiver {
    /// Wait for the next snapshot and return it as this seat should see it.
    /// `None` once the mailbox is closed and drained.
    pub async fn recv(&mut self) -> Option<Board> {
        let snapshot = self.rx.recv().await?;
        let view = if snapshot.hide {
            rules::hide_for_viewer(&snapshot.board, self.seat)
        } else {
            rules::reveal(&snapshot.board)
        };
        Some(view)
    }
}

/// Sender task body: forward every snapshot to `writer` until the mailbox
/// closes or the connection fails.
pub async fn run_sender<W>(mut receiver: MailboxReceiver, mut writer: W)
where
    W: AsyncWrite + Unpin,
{
    let seat = receiver.seat;
    while let Some(view) = receiver.recv().await {
        if let Err(error) = utils::write_prefixed(&mut writer, &view).await {
            warn!("seat {seat}: dropping outgoing snapshots: {error}");
            return;
        }
    }
    debug!("seat {seat}: mailbox closed");
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::{io::duplex, time::timeout};

    use super::*;
    use crate::game::entities::{Blinds, Card, Username};

    fn board() -> Arc<Board> {
        let names = vec![Username::new("alice"), Username::new("bob")];
        let board = Board::seat_players(names, 1000, Blinds { small: 25, big: 50 }, 30);
        Arc::new(rules::deal(7, 0, &board))
    }

    #[tokio::test]
    async fn test_receiver_hides_for_its_seat() {
        let (mailbox, mut receiver) = channel(1);
        let board = board();
        mailbox.publish(true, Arc::clone(&board)).await.unwrap();
        let view = receiver.recv().await.unwrap();
        assert_eq!(view.player(0).hole_cards, [Card::HIDDEN; 2]);
        assert_eq!(view.player(1).hole_cards, board.player(1).hole_cards);
        assert!(view.community_cards.is_empty());
        assert!(!view.need_action);
    }

    #[tokio::test]
    async fn test_receiver_reveals() {
        let (mailbox, mut receiver) = channel(0);
        mailbox.publish(false, board()).await.unwrap();
        let view = receiver.recv().await.unwrap();
        assert!(view.players.values().all(|p| !p.hole_cards[0].is_hidden()));
        assert!(view.need_prompt);
    }

    #[tokio::test]
    async fn test_publish_waits_for_drain() {
        let (mailbox, mut receiver) = channel(0);
        let board = board();
        mailbox.publish(true, Arc::clone(&board)).await.unwrap();

        let second = mailbox.publish(true, Arc::clone(&board));
        tokio::pin!(second);
        assert!(
            timeout(Duration::from_millis(20), &mut second)
                .await
                .is_err()
        );

        receiver.recv().await.unwrap();
        second.await.unwrap();
    }

    #[tokio::test]
    async fn test_publish_to_closed_mailbox() {
        let (mailbox, receiver) = channel(3);
        drop(receiver);
        assert_eq!(
            mailbox.publish(true, board()).await,
            Err(MailboxClosed(3))
        );
    }

    #[tokio::test]
    async fn test_sender_writes_views_then_stops() {
        let (mailbox, receiver) = channel(0);
        let (mut client, server) = duplex(64 * 1024);
        let sender = tokio::spawn(run_sender(receiver, server));

        let board = board();
        mailbox.publish(true, Arc::clone(&board)).await.unwrap();
        mailbox.publish(false, Arc::clone(&board)).await.unwrap();
        drop(mailbox);

        let hidden: Board = utils::read_prefixed(&mut client).await.unwrap();
        assert!(hidden.need_action);
        assert_eq!(hidden.player(1).hole_cards, [Card::HIDDEN; 2]);
        let revealed: Board = utils::read_prefixed(&mut client).await.unwrap();
        assert!(revealed.need_prompt);
        sender.await.unwrap();
    }
}

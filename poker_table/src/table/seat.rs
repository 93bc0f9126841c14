use tokio::{io::AsyncWrite, task::JoinHandle};

use super::mailbox::{self, Mailbox};
use crate::game::entities::{SeatId, Username};

/// A connected client: its name, the half of the connection the game loop
/// reads actions from, and the mailbox feeding the half it writes to.
#[derive(Debug)]
pub struct Seat<R> {
    pub name: Username,
    pub reader: R,
    pub mailbox: Mailbox,
    pub sender: JoinHandle<()>,
}

impl<R> Seat<R> {
    /// Take a seat and spawn the task that writes its snapshots to `writer`.
    pub fn spawn<W>(id: SeatId, name: Username, reader: R, writer: W) -> Self
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (mailbox, receiver) = mailbox::channel(id);
        let sender = tokio::spawn(mailbox::run_sender(receiver, writer));
        Self {
            name,
            reader,
            mailbox,
            sender,
        }
    }

    #[must_use]
    pub fn id(&self) -> SeatId {
        self.mailbox.seat()
    }
}

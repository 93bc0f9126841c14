//! A running table.
//!
//! ## Architecture
//!
//! One task runs the [`Table`] game loop and owns the board. Every seat
//! has a sender task that drains a single-slot [`Mailbox`], hides or
//! reveals each snapshot for its viewer, and writes it to the client.
//! Actions are read by the game loop itself, and only from the seat whose
//! turn it is.
//!
//! ```text
//!   game loop ──publish──▶ mailbox(0) ──▶ sender(0) ──▶ client 0
//!       │      ╰─────────▶ mailbox(1) ──▶ sender(1) ──▶ client 1
//!       ╰◀──────read action──────────────────────────── active client
//! ```

pub mod game_loop;
pub mod mailbox;
pub mod seat;

pub use game_loop::{Table, TableOutcome};
pub use mailbox::{Mailbox, MailboxClosed, Snapshot};
pub use seat::Seat;

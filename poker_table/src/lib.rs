//! # Poker Table
//!
//! A single Texas Hold'em table served over TCP.
//!
//! A fixed number of clients connect and take seats in connection order.
//! Once the table is full, hands are dealt until one player holds every
//! chip. The game state lives in one place, a [`Board`] owned by the
//! table's game loop, and every transition of that board is a pure
//! function in [`game::rules`].
//!
//! ## Core Modules
//!
//! - [`game`]: Board entities, table rules, action validation, and hand
//!   evaluation
//! - [`table`]: The game loop and the per-seat mailboxes
//! - [`net`]: Framing, the server's accept loop, and a test client
//!
//! ## Example
//!
//! ```
//! use poker_table::{
//!     game::{entities::{Blinds, Board, Username}, rules},
//! };
//!
//! let names = vec![Username::new("alice"), Username::new("bob")];
//! let seated = Board::seat_players(names, 1000, Blinds { small: 25, big: 50 }, 30);
//! let board = rules::deal(42, 0, &seated);
//!
//! assert_eq!(board.active_player, Some(0));
//! assert_eq!(board.total_chips(), 2000);
//! ```

/// Networking components for client-server communication.
pub mod net;
pub use net::{client::Client, server, utils};

/// Core game logic and entities.
pub mod game;
pub use game::{
    TableSettings, UserError,
    constants::{self, MAX_SEATS},
    entities::{self, Board, PlayerAction},
    functional, rules,
};

/// The running table.
pub mod table;
pub use table::{Table, TableOutcome};

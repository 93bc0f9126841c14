//! Networking layer for client-server communication.
//!
//! Every message is a little-endian `u32` length followed by a bincode
//! payload. Clients open with a fixed-size name payload and then only
//! ever send [`PlayerAction`](crate::game::entities::PlayerAction)s; the
//! server only ever sends boards.

/// TCP client for connecting to a table.
pub mod client;

/// Error types for framing and serialization.
pub mod errors;

/// Seating clients and running a table over TCP.
pub mod server;

/// Utilities for binary message serialization and framing.
pub mod utils;

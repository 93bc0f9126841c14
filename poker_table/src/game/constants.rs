//! Table-wide constants.

use super::entities::Chips;

/// Maximum number of seats a table can be created with.
pub const MAX_SEATS: usize = 10;

/// Size of the fixed name payload a client sends right after connecting.
pub const NAME_PAYLOAD_LEN: usize = 32;

/// Display names are cut to this many characters.
pub const MAX_NAME_LENGTH: usize = 16;

/// Number of community cards dealt per hand.
pub const NUM_COMMUNITY_CARDS: usize = 5;

/// Seat permutation used as turn order at a four-seat table.
pub const FOUR_SEAT_ORDER: [usize; 4] = [3, 2, 0, 1];

// A player that only ever posts the big blind busts after 20 hands.
pub const DEFAULT_STARTING_STACK: Chips = 1000;
pub const DEFAULT_BIG_BLIND: Chips = DEFAULT_STARTING_STACK / 20;
pub const DEFAULT_SMALL_BLIND: Chips = DEFAULT_BIG_BLIND / 2;

/// Advisory per-turn countdown shown to clients.
pub const DEFAULT_TURN_TIMER_SECS: u32 = 30;

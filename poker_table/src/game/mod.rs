//! Poker game engine.
//!
//! Everything in here is synchronous and free of I/O: the board and its
//! entities, the pure rules that move a board from one state to the next,
//! action validation, and hand evaluation.

pub mod actions;
pub mod constants;
pub mod entities;
pub mod functional;
pub mod rules;
pub mod settings;

pub use actions::{UserError, apply_action};
pub use settings::{ConfigError, TableSettings};

//! Table configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    constants::{
        DEFAULT_BIG_BLIND, DEFAULT_SMALL_BLIND, DEFAULT_STARTING_STACK, DEFAULT_TURN_TIMER_SECS,
        MAX_SEATS,
    },
    entities::{Blinds, Chips},
};

/// Configuration errors.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Value failed validation.
    #[error("invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Settings a table is created with.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TableSettings {
    /// Number of seats; play starts once every seat is taken.
    pub seat_count: usize,
    pub starting_stack: Chips,
    pub small_blind: Chips,
    pub big_blind: Chips,
    /// Advisory countdown sent with every snapshot.
    pub turn_timer_secs: u32,
    /// Fixed seed for reproducible shuffles. A random one is drawn when unset.
    pub seed: Option<u64>,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self::new(2)
    }
}

impl TableSettings {
    #[must_use]
    pub const fn new(seat_count: usize) -> Self {
        Self {
            seat_count,
            starting_stack: DEFAULT_STARTING_STACK,
            small_blind: DEFAULT_SMALL_BLIND,
            big_blind: DEFAULT_BIG_BLIND,
            turn_timer_secs: DEFAULT_TURN_TIMER_SECS,
            seed: None,
        }
    }

    #[must_use]
    pub const fn blinds(&self) -> Blinds {
        Blinds {
            small: self.small_blind,
            big: self.big_blind,
        }
    }

    /// Validate settings before a table is created.
    ///
    /// # Errors
    ///
    /// Returns the first setting that is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.seat_count < 2 || self.seat_count > MAX_SEATS {
            return Err(ConfigError::Invalid {
                var: "seat_count".to_string(),
                reason: format!("must be between 2 and {MAX_SEATS}"),
            });
        }

        if self.small_blind == 0 {
            return Err(ConfigError::Invalid {
                var: "small_blind".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        if self.big_blind <= self.small_blind {
            return Err(ConfigError::Invalid {
                var: "big_blind".to_string(),
                reason: format!("must be greater than small blind ({})", self.small_blind),
            });
        }

        if self.starting_stack < self.big_blind {
            return Err(ConfigError::Invalid {
                var: "starting_stack".to_string(),
                reason: format!("must cover the big blind ({})", self.big_blind),
            });
        }

        // Every chip at the table has to fit in a single stack.
        if Chips::try_from(self.seat_count)
            .ok()
            .and_then(|seats| seats.checked_mul(self.starting_stack))
            .is_none()
        {
            return Err(ConfigError::Invalid {
                var: "starting_stack".to_string(),
                reason: "total chips at the table overflow".to_string(),
            });
        }

        Ok(())
    }
}

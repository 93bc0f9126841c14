//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use poker_table::game::{ConfigError, TableSettings};
use std::net::{IpAddr, Ipv4Addr};

/// Complete server configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Address the listener binds to
    pub host: IpAddr,
    /// Port the listener binds to
    pub port: u16,
    /// Settings for the one table this server runs
    pub table: TableSettings,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// `port` and `seat_count` come from the command line; `host_override`
    /// beats `SERVER_HOST`.
    ///
    /// # Errors
    ///
    /// Returns error if a variable is malformed or the resulting table
    /// settings are invalid.
    pub fn from_env(
        port: u16,
        seat_count: usize,
        host_override: Option<IpAddr>,
    ) -> Result<Self, ConfigError> {
        Self::from_lookup(port, seat_count, host_override, |key| {
            std::env::var(key).ok()
        })
    }

    /// Same as [`ServerConfig::from_env`] but reading variables through
    /// `lookup`.
    ///
    /// # Errors
    ///
    /// See [`ServerConfig::from_env`].
    pub fn from_lookup<F>(
        port: u16,
        seat_count: usize,
        host_override: Option<IpAddr>,
        lookup: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = match host_override {
            Some(host) => host,
            None => parse_required_or(&lookup, "SERVER_HOST", IpAddr::V4(Ipv4Addr::LOCALHOST))?,
        };

        let defaults = TableSettings::new(seat_count);
        let seed = match lookup("TABLE_SEED") {
            Some(v) => Some(v.parse().map_err(|_| ConfigError::Invalid {
                var: "TABLE_SEED".to_string(),
                reason: format!("{v:?} is not a 64-bit unsigned integer"),
            })?),
            None => None,
        };
        let table = TableSettings {
            seat_count,
            starting_stack: parse_env_or(&lookup, "TABLE_STARTING_STACK", defaults.starting_stack),
            small_blind: parse_env_or(&lookup, "TABLE_SMALL_BLIND", defaults.small_blind),
            big_blind: parse_env_or(&lookup, "TABLE_BIG_BLIND", defaults.big_blind),
            turn_timer_secs: parse_env_or(
                &lookup,
                "TABLE_TURN_TIMER_SECS",
                defaults.turn_timer_secs,
            ),
            seed,
        };
        table.validate()?;

        Ok(ServerConfig { host, port, table })
    }
}

/// Helper to parse an environment variable with default fallback
fn parse_env_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Like [`parse_env_or`] but a present, malformed value is an error.
fn parse_required_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(v) => v.parse().map_err(|_| ConfigError::Invalid {
            var: key.to_string(),
            reason: format!("can't parse {v:?}"),
        }),
        None => Ok(default),
    }
}

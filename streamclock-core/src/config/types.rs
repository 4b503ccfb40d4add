//! Configuration type definitions
//!
//! Defaults reproduce the stock device: relay on port 3000, 5 s base
//! backoff capped at 5 min, five attempts before a 5 min cooldown, and a
//! 30 s heartbeat.

use alloc::string::String;

use streamclock_display::FeedLayout;

use crate::link::RetryPolicy;

#[cfg(feature = "serde")]
use serde::Deserialize;

/// Event relay endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ServerConfig {
    /// Relay host name or address
    pub host: String,
    /// Relay TCP port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("relay.local"),
            port: 3000,
        }
    }
}

/// Reconnect and heartbeat timing, all in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LinkTiming {
    /// First retry delay
    pub backoff_base_ms: u32,
    /// Ceiling for any retry delay
    pub backoff_cap_ms: u32,
    /// Doubling stops after this many failures
    pub backoff_max_exponent: u32,
    /// Consecutive failures before the long cooldown
    pub max_attempts: u8,
    /// Pause after `max_attempts` failures
    pub cooldown_ms: u32,
    /// Heartbeat period while connected
    pub heartbeat_interval_ms: u32,
    /// Grace window for a heartbeat acknowledgement
    pub heartbeat_timeout_ms: u32,
    /// Longest a connect attempt may stay pending
    pub connect_timeout_ms: u32,
}

impl Default for LinkTiming {
    fn default() -> Self {
        Self {
            backoff_base_ms: 5_000,
            backoff_cap_ms: 300_000,
            backoff_max_exponent: 5,
            max_attempts: 5,
            cooldown_ms: 300_000,
            heartbeat_interval_ms: 30_000,
            heartbeat_timeout_ms: 10_000,
            connect_timeout_ms: 10_000,
        }
    }
}

impl LinkTiming {
    /// Backoff policy described by these timings
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            base_ms: self.backoff_base_ms,
            cap_ms: self.backoff_cap_ms,
            max_exponent: self.backoff_max_exponent,
        }
    }
}

/// Complete configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StreamConfig {
    pub server: ServerConfig,
    pub link: LinkTiming,
    pub feed: FeedLayout,
}

//! Configuration loading and validation

use core::fmt;

use streamclock_display::LayoutError;

use super::types::{LinkTiming, StreamConfig};

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// TOML parsing failed
    TomlParse,
    /// Relay host is empty
    EmptyHost,
    /// Relay port is zero
    InvalidPort,
    /// A timing value is zero or inconsistent
    InvalidTiming,
    /// Feed layout does not fit its region
    Layout(LayoutError),
}

impl From<LayoutError> for ConfigError {
    fn from(e: LayoutError) -> Self {
        ConfigError::Layout(e)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::TomlParse => f.write_str("invalid TOML configuration"),
            ConfigError::EmptyHost => f.write_str("relay host is empty"),
            ConfigError::InvalidPort => f.write_str("relay port is zero"),
            ConfigError::InvalidTiming => f.write_str("invalid link timing"),
            ConfigError::Layout(e) => write!(f, "feed layout: {}", e),
        }
    }
}

impl LinkTiming {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid = self.backoff_base_ms > 0
            && self.backoff_cap_ms >= self.backoff_base_ms
            && self.max_attempts > 0
            && self.cooldown_ms > 0
            && self.heartbeat_interval_ms > 0
            && self.heartbeat_timeout_ms > 0
            && self.connect_timeout_ms > 0;
        if valid {
            Ok(())
        } else {
            Err(ConfigError::InvalidTiming)
        }
    }
}

impl StreamConfig {
    /// Check every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if self.server.port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        self.link.validate()?;
        self.feed.validate()?;
        Ok(())
    }

    /// Parse and validate a TOML document
    ///
    /// Missing sections and keys keep their defaults.
    #[cfg(feature = "toml")]
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let config: StreamConfig = toml::from_str(input).map_err(|_| {
            warn!("Config TOML parse error");
            ConfigError::TomlParse
        })?;
        config.validate()?;
        debug!(
            "Config loaded: port {}, heartbeat {} ms",
            config.server.port,
            config.link.heartbeat_interval_ms
        );
        Ok(config)
    }
}

//! Configuration types
//!
//! Board-agnostic configuration, loaded from TOML or built from defaults.

pub mod loader;
pub mod types;

pub use loader::ConfigError;
pub use types::*;

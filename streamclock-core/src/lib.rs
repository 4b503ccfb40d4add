//! Board-agnostic core logic for the live-feed desk clock
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Collaborator traits (transport, clock)
//! - Link state machine with backoff, cooldown and heartbeat supervision
//! - Stream controller gluing the link, the decoder and the feed
//! - Configuration type definitions
//!
//! Everything is driven by `StreamController::tick(now_ms)` from the host's
//! cooperative loop. Nothing here blocks or sleeps; all waiting is a
//! timestamp comparison.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

// Must come first so the logging macros are visible to later modules
mod fmt;

pub mod config;
pub mod controller;
pub mod link;
pub mod traits;

pub use config::{ConfigError, LinkTiming, ServerConfig, StreamConfig};
pub use controller::StreamController;
pub use link::{ConnectionManager, ConnectionState, LinkAction, LinkNotice, LinkStep};
pub use traits::{Clock, Transport, TransportError, TransportNotice};

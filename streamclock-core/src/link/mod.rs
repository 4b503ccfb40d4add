//! Link supervision
//!
//! Keeps the relay connection alive: bounded backoff between attempts, a
//! long cooldown after repeated failures, and heartbeat supervision while
//! connected. The manager only decides; the controller executes the
//! returned actions on the transport.

pub mod backoff;
pub mod heartbeat;
pub mod manager;
pub mod state;

pub use backoff::{backoff_delay, RetryPolicy};
pub use heartbeat::{Heartbeat, HeartbeatStatus};
pub use manager::ConnectionManager;
pub use state::{ConnectionState, DisconnectReason, LinkAction, LinkNotice, LinkStep};

//! Collaborator traits
//!
//! These traits define the interface between the link logic and the
//! platform: the network transport and the millisecond clock.

pub mod clock;
pub mod transport;

pub use clock::Clock;
#[cfg(feature = "embassy")]
pub use clock::EmbassyClock;
pub use transport::{Transport, TransportError, TransportNotice};

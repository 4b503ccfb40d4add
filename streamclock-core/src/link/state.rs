//! Link states and step outputs

use heapless::Vec;

/// Most actions or notices a single step can produce
pub const MAX_STEP_ITEMS: usize = 2;

/// Connection states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionState {
    /// No connection; waiting for the retry timer
    Disconnected,
    /// Open issued, waiting for the transport to connect
    Connecting,
    /// Link up, heartbeats running
    Connected,
    /// Too many failures; waiting out the cooldown
    BackingOff,
}

impl ConnectionState {
    /// Check if the transport is open or opening
    pub fn is_active(&self) -> bool {
        matches!(self, ConnectionState::Connecting | ConnectionState::Connected)
    }
}

/// Why a connection attempt or session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisconnectReason {
    /// Transport reported the link down (or failed to open)
    Dropped,
    /// Heartbeat went unacknowledged
    HeartbeatTimeout,
    /// Attempt stayed pending too long
    ConnectTimeout,
}

/// Work the controller must perform on the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkAction {
    Open,
    SendHeartbeat,
    Close,
}

/// User-visible link transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkNotice {
    /// Attempt `attempt` of `max` started
    Connecting { attempt: u8, max: u8 },
    Connected,
    Disconnected(DisconnectReason),
    /// Retry limit reached; next attempt after the cooldown
    GivingUp { retry_in_ms: u32 },
}

/// Output of one manager call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkStep {
    pub actions: Vec<LinkAction, MAX_STEP_ITEMS>,
    pub notices: Vec<LinkNotice, MAX_STEP_ITEMS>,
}

impl LinkStep {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty() && self.notices.is_empty()
    }

    pub(crate) fn act(&mut self, action: LinkAction) {
        if self.actions.push(action).is_err() {
            error!("Link step action overflow");
        }
    }

    pub(crate) fn notify(&mut self, notice: LinkNotice) {
        if self.notices.push(notice).is_err() {
            error!("Link step notice overflow");
        }
    }
}

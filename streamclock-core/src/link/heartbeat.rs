//! Heartbeat supervision
//!
//! While connected a heartbeat goes out every `interval_ms`. Once one is
//! outstanding no further heartbeat is sent; if no acknowledgement
//! arrives within `timeout_ms` of the send, the link is considered dead.

/// Result of a heartbeat check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HeartbeatStatus {
    /// Nothing to do
    Idle,
    /// Send a heartbeat now
    Send,
    /// Outstanding heartbeat was not acknowledged in time
    TimedOut,
}

/// Heartbeat tracker for one connection
#[derive(Debug, Clone)]
pub struct Heartbeat {
    interval_ms: u32,
    timeout_ms: u32,
    /// When the last heartbeat went out (or the link came up)
    last_sent_ms: u32,
    /// When the last acknowledgement arrived
    last_ack_ms: u32,
    /// A heartbeat is awaiting its acknowledgement
    outstanding: bool,
}

impl Heartbeat {
    pub fn new(interval_ms: u32, timeout_ms: u32) -> Self {
        Self {
            interval_ms,
            timeout_ms,
            last_sent_ms: 0,
            last_ack_ms: 0,
            outstanding: false,
        }
    }

    /// Restart tracking for a fresh connection
    pub fn reset(&mut self, now_ms: u32) {
        self.last_sent_ms = now_ms;
        self.last_ack_ms = now_ms;
        self.outstanding = false;
    }

    /// Record an acknowledgement
    pub fn ack(&mut self, now_ms: u32) {
        self.last_ack_ms = now_ms;
        self.outstanding = false;
    }

    /// Check timers
    ///
    /// Returning `Send` marks the heartbeat as sent at `now_ms`.
    pub fn poll(&mut self, now_ms: u32) -> HeartbeatStatus {
        let since_sent = now_ms.wrapping_sub(self.last_sent_ms);
        if self.outstanding {
            if since_sent >= self.timeout_ms {
                return HeartbeatStatus::TimedOut;
            }
            return HeartbeatStatus::Idle;
        }
        if since_sent >= self.interval_ms {
            self.last_sent_ms = now_ms;
            self.outstanding = true;
            return HeartbeatStatus::Send;
        }
        HeartbeatStatus::Idle
    }

    pub fn last_sent_ms(&self) -> u32 {
        self.last_sent_ms
    }

    pub fn last_ack_ms(&self) -> u32 {
        self.last_ack_ms
    }

    pub fn is_outstanding(&self) -> bool {
        self.outstanding
    }
}

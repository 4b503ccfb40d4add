//! Connection manager
//!
//! Owns the connection state and every timer of the relay link. All
//! state changes happen in `tick` or in one of the `on_*` notifications;
//! each returns a `LinkStep` telling the caller what to do next.

use super::backoff::RetryPolicy;
use super::heartbeat::{Heartbeat, HeartbeatStatus};
use super::state::{ConnectionState, DisconnectReason, LinkAction, LinkNotice, LinkStep};
use crate::config::LinkTiming;

/// Pending wait before the next attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RetryTimer {
    since_ms: u32,
    delay_ms: u32,
}

impl RetryTimer {
    fn elapsed(&self, now_ms: u32) -> bool {
        now_ms.wrapping_sub(self.since_ms) >= self.delay_ms
    }

    fn remaining(&self, now_ms: u32) -> u32 {
        self.delay_ms
            .saturating_sub(now_ms.wrapping_sub(self.since_ms))
    }
}

/// Link state machine
#[derive(Debug, Clone)]
pub struct ConnectionManager {
    state: ConnectionState,
    timing: LinkTiming,
    policy: RetryPolicy,
    /// Consecutive failed attempts
    attempt_count: u8,
    /// When the current (or last) attempt was opened
    last_attempt_ms: u32,
    /// `None` means the next tick may open right away
    retry: Option<RetryTimer>,
    heartbeat: Heartbeat,
    shut_down: bool,
}

impl ConnectionManager {
    /// Create a manager; the first `tick` starts the first attempt
    pub fn new(timing: LinkTiming) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            timing,
            policy: timing.retry_policy(),
            attempt_count: 0,
            last_attempt_ms: 0,
            retry: None,
            heartbeat: Heartbeat::new(timing.heartbeat_interval_ms, timing.heartbeat_timeout_ms),
            shut_down: false,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn attempt_count(&self) -> u8 {
        self.attempt_count
    }

    pub fn last_attempt_ms(&self) -> u32 {
        self.last_attempt_ms
    }

    pub fn heartbeat(&self) -> &Heartbeat {
        &self.heartbeat
    }

    pub fn timing(&self) -> &LinkTiming {
        &self.timing
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Time left until the next attempt, if one is scheduled
    pub fn next_attempt_in(&self, now_ms: u32) -> Option<u32> {
        match self.state {
            ConnectionState::Disconnected | ConnectionState::BackingOff if !self.shut_down => {
                Some(self.retry.map_or(0, |timer| timer.remaining(now_ms)))
            }
            _ => None,
        }
    }

    /// Advance timers
    pub fn tick(&mut self, now_ms: u32) -> LinkStep {
        let mut step = LinkStep::new();
        if self.shut_down {
            return step;
        }

        match self.state {
            ConnectionState::Disconnected => {
                if self.retry_elapsed(now_ms) {
                    self.begin_attempt(now_ms, &mut step);
                }
            }
            ConnectionState::BackingOff => {
                if self.retry_elapsed(now_ms) {
                    info!("Link cooldown over");
                    self.attempt_count = 0;
                    self.begin_attempt(now_ms, &mut step);
                }
            }
            ConnectionState::Connecting => {
                if now_ms.wrapping_sub(self.last_attempt_ms) >= self.timing.connect_timeout_ms {
                    step.act(LinkAction::Close);
                    self.fail(now_ms, DisconnectReason::ConnectTimeout, &mut step);
                }
            }
            ConnectionState::Connected => match self.heartbeat.poll(now_ms) {
                HeartbeatStatus::Send => {
                    trace!("Heartbeat sent at {}", now_ms);
                    step.act(LinkAction::SendHeartbeat);
                }
                HeartbeatStatus::TimedOut => {
                    step.act(LinkAction::Close);
                    self.fail(now_ms, DisconnectReason::HeartbeatTimeout, &mut step);
                }
                HeartbeatStatus::Idle => {}
            },
        }

        step
    }

    /// Transport reports the connection is up
    pub fn on_connected(&mut self, now_ms: u32) -> LinkStep {
        let mut step = LinkStep::new();
        if self.shut_down || self.state != ConnectionState::Connecting {
            debug!("Ignoring connect in state {}", self.state);
            return step;
        }

        info!("Link connected after {} failures", self.attempt_count);
        self.state = ConnectionState::Connected;
        self.attempt_count = 0;
        self.retry = None;
        self.heartbeat.reset(now_ms);
        step.notify(LinkNotice::Connected);
        step
    }

    /// Transport reports the connection is down (or the open failed)
    pub fn on_disconnected(&mut self, now_ms: u32) -> LinkStep {
        let mut step = LinkStep::new();
        if self.shut_down || !self.state.is_active() {
            debug!("Ignoring disconnect in state {}", self.state);
            return step;
        }
        self.fail(now_ms, DisconnectReason::Dropped, &mut step);
        step
    }

    /// Relay acknowledged a heartbeat
    pub fn on_heartbeat_ack(&mut self, now_ms: u32) -> LinkStep {
        if !self.shut_down && self.state == ConnectionState::Connected {
            self.heartbeat.ack(now_ms);
        }
        LinkStep::new()
    }

    /// Stop for good
    ///
    /// Cancels pending timers. Every later call is a no-op.
    pub fn shutdown(&mut self) -> LinkStep {
        let mut step = LinkStep::new();
        if self.shut_down {
            return step;
        }
        if self.state.is_active() {
            step.act(LinkAction::Close);
        }
        info!("Link shut down");
        self.shut_down = true;
        self.state = ConnectionState::Disconnected;
        self.retry = None;
        step
    }

    fn retry_elapsed(&self, now_ms: u32) -> bool {
        self.retry.map_or(true, |timer| timer.elapsed(now_ms))
    }

    fn begin_attempt(&mut self, now_ms: u32, step: &mut LinkStep) {
        let attempt = self.attempt_count.saturating_add(1);
        info!("Connecting ({}/{})", attempt, self.timing.max_attempts);
        self.state = ConnectionState::Connecting;
        self.last_attempt_ms = now_ms;
        self.retry = None;
        step.act(LinkAction::Open);
        step.notify(LinkNotice::Connecting {
            attempt,
            max: self.timing.max_attempts,
        });
    }

    fn fail(&mut self, now_ms: u32, reason: DisconnectReason, step: &mut LinkStep) {
        self.attempt_count = self.attempt_count.saturating_add(1);
        warn!("Link down: {} ({} failures)", reason, self.attempt_count);
        step.notify(LinkNotice::Disconnected(reason));

        if self.attempt_count >= self.timing.max_attempts {
            self.state = ConnectionState::BackingOff;
            self.retry = Some(RetryTimer {
                since_ms: now_ms,
                delay_ms: self.timing.cooldown_ms,
            });
            step.notify(LinkNotice::GivingUp {
                retry_in_ms: self.timing.cooldown_ms,
            });
        } else {
            self.state = ConnectionState::Disconnected;
            self.retry = Some(RetryTimer {
                since_ms: now_ms,
                delay_ms: self.policy.delay(u32::from(self.attempt_count) - 1),
            });
        }
    }
}

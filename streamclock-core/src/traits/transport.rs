//! Event relay transport trait

use alloc::vec::Vec;

/// Errors that can occur on the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// No open connection
    NotConnected,
    /// Relay could not be reached
    Unreachable,
    /// Socket or radio failure
    Io,
}

impl core::fmt::Display for TransportError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TransportError::NotConnected => f.write_str("transport not connected"),
            TransportError::Unreachable => f.write_str("relay unreachable"),
            TransportError::Io => f.write_str("transport I/O error"),
        }
    }
}

/// Notification buffered by the transport between ticks
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportNotice {
    /// Connection established
    Connected,
    /// Connection lost or refused
    Disconnected,
    /// Relay answered a heartbeat
    HeartbeatAck,
    /// One complete text message
    Message(Vec<u8>),
}

/// Trait for the message transport to the event relay
///
/// Implementations wrap a WebSocket (or any framed, message-oriented
/// link). None of the methods may block: `open` only starts connecting and
/// the outcome arrives later through `poll`.
pub trait Transport {
    /// Start connecting to the relay
    ///
    /// An `Err` means the attempt failed before it started and is treated
    /// as an immediate disconnect.
    fn open(&mut self, host: &str, port: u16) -> Result<(), TransportError>;

    /// Drop the connection, if any
    fn close(&mut self);

    /// Check if the connection is up
    fn is_connected(&self) -> bool;

    /// Send a heartbeat (ping) to the relay
    fn send_heartbeat(&mut self) -> Result<(), TransportError>;

    /// Take the oldest buffered notification
    fn poll(&mut self) -> Option<TransportNotice>;
}

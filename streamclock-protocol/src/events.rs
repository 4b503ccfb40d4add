//! Live events decoded from the relay

use alloc::string::String;

/// Events pushed by the relay
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Audience events
    /// Chat comment
    Chat { user: String, text: String },
    /// Gift sent to the streamer
    Gift { user: String, gift_name: String },
    /// Like (tap) from a viewer
    Like { user: String },
    /// New follower
    Follow { user: String },

    // Room events
    /// Relay attached to (or detached from) the live room
    RoomStatus {
        connected: bool,
        room_id: Option<String>,
    },
    /// Current viewer count
    ViewerCount { count: u64 },

    // Relay events
    /// Informational notice from the relay itself
    SystemNotice { text: String },
    /// Relay-side error report
    Error { text: String },
}

impl Event {
    /// Wire tag this event is decoded from
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Chat { .. } => "chat",
            Event::Gift { .. } => "gift",
            Event::Like { .. } => "like",
            Event::Follow { .. } => "follow",
            Event::RoomStatus {
                connected: true, ..
            } => "tiktok_connected",
            Event::RoomStatus {
                connected: false, ..
            } => "tiktok_disconnected",
            Event::ViewerCount { .. } => "viewers",
            Event::SystemNotice { .. } => "connection",
            Event::Error { .. } => "error",
        }
    }

    /// Viewer that triggered the event, if any
    pub fn user(&self) -> Option<&str> {
        match self {
            Event::Chat { user, .. }
            | Event::Gift { user, .. }
            | Event::Like { user }
            | Event::Follow { user } => Some(user.as_str()),
            _ => None,
        }
    }

    /// Check if this event comes from audience interaction
    pub fn is_audience_event(&self) -> bool {
        matches!(
            self,
            Event::Chat { .. } | Event::Gift { .. } | Event::Like { .. } | Event::Follow { .. }
        )
    }

    /// Check if this event describes relay or room health
    pub fn is_status_event(&self) -> bool {
        matches!(
            self,
            Event::RoomStatus { .. } | Event::SystemNotice { .. } | Event::Error { .. }
        )
    }
}

//! Message decoding for the relay protocol
//!
//! Message types, keyed by the `type` field:
//! - Audience: `chat`, `gift`, `like`, `follow`
//! - Room: `tiktok_connected`, `tiktok_disconnected`, `viewers`
//! - Relay: `connection`, `error`
//!
//! Missing string fields decode as empty strings. Numeric fields are
//! required.

use alloc::string::{String, ToString};
use core::fmt;

use serde_json::{Map, Value};

use crate::events::Event;

// Message type tags: audience
pub const MSG_CHAT: &str = "chat";
pub const MSG_GIFT: &str = "gift";
pub const MSG_LIKE: &str = "like";
pub const MSG_FOLLOW: &str = "follow";

// Message type tags: room
pub const MSG_ROOM_CONNECTED: &str = "tiktok_connected";
pub const MSG_ROOM_DISCONNECTED: &str = "tiktok_disconnected";
pub const MSG_VIEWERS: &str = "viewers";

// Message type tags: relay
pub const MSG_CONNECTION: &str = "connection";
pub const MSG_ERROR: &str = "error";

/// Notice text used when the relay greets a new client
pub const RELAY_GREETING: &str = "Server ready";

/// Errors that can occur while decoding a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Not a well-formed JSON object, or a required numeric field is missing
    Malformed,
    /// `type` tag missing, not a string, or not one we recognize
    UnknownType,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Malformed => f.write_str("malformed message"),
            DecodeError::UnknownType => f.write_str("unknown message type"),
        }
    }
}

/// Decode one raw relay message into an [`Event`]
pub fn parse(raw: &[u8]) -> Result<Event, DecodeError> {
    let value: Value = serde_json::from_slice(raw).map_err(|_| DecodeError::Malformed)?;
    let object = value.as_object().ok_or(DecodeError::Malformed)?;

    let msg_type = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or(DecodeError::UnknownType)?;

    match msg_type {
        MSG_CHAT => Ok(Event::Chat {
            user: string_field(object, "username"),
            text: string_field(object, "message"),
        }),
        MSG_GIFT => Ok(Event::Gift {
            user: string_field(object, "username"),
            gift_name: string_field(object, "giftName"),
        }),
        MSG_LIKE => Ok(Event::Like {
            user: string_field(object, "username"),
        }),
        MSG_FOLLOW => Ok(Event::Follow {
            user: string_field(object, "username"),
        }),
        MSG_CONNECTION => {
            let text = match object.get("message").and_then(Value::as_str) {
                Some(message) if !message.is_empty() => message.to_string(),
                _ => RELAY_GREETING.to_string(),
            };
            Ok(Event::SystemNotice { text })
        }
        MSG_ROOM_CONNECTED => Ok(Event::RoomStatus {
            connected: true,
            room_id: id_field(object, "roomId"),
        }),
        MSG_ROOM_DISCONNECTED => Ok(Event::RoomStatus {
            connected: false,
            room_id: None,
        }),
        MSG_VIEWERS => {
            let count = object
                .get("count")
                .and_then(Value::as_u64)
                .ok_or(DecodeError::Malformed)?;
            Ok(Event::ViewerCount { count })
        }
        MSG_ERROR => Ok(Event::Error {
            text: string_field(object, "message"),
        }),
        _ => Err(DecodeError::UnknownType),
    }
}

/// Read a string field, treating absent or non-string values as empty
fn string_field(object: &Map<String, Value>, key: &str) -> String {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_default()
}

/// Read an identifier the relay may forward as either a string or a number
fn id_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

//! Live-Event Relay Protocol
//!
//! This crate defines the messages the event relay pushes to the desk clock
//! over its persistent link, and the decoder that turns one raw message into
//! a typed [`Event`].
//!
//! # Protocol Overview
//!
//! Every transport message carries exactly one JSON object with a `type`
//! tag and tag-specific fields:
//! ```text
//! {"type":"chat","username":"alice","message":"hi","timestamp":1700000000}
//! {"type":"gift","username":"bob","giftName":"Rose","giftId":5655}
//! {"type":"viewers","count":42}
//! ```
//!
//! Transport-level framing (WebSocket text frames) belongs to the transport.
//! Decoding is pure and never panics: anything that is not a recognized
//! object comes back as a [`DecodeError`].

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod events;
pub mod messages;

pub use events::Event;
pub use messages::{parse, DecodeError};

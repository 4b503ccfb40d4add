//! Display abstraction traits and the live-feed renderer for Streamclock
//!
//! This crate provides:
//! - `DisplaySurface` trait over the TFT panel (clear, text, outline)
//! - `FeedBuffer`, a fixed-capacity ring of the most recent feed entries
//! - `FeedRenderer`, which lays those entries out inside a fixed region
//! - `GraphicsSurface`, a `DisplaySurface` over any embedded-graphics target
//!
//! # Architecture
//!
//! The feed owns one rectangle of the screen. The clock and face widgets
//! draw elsewhere and never touch it; the renderer never draws outside it.
//!
//! ```text
//! ┌──────────────────────────┐  y = 210
//! │ alice                    │
//! │ Comment: hi              │
//! │ long content wrapped to  │
//! │ at most three lines ...  │
//! │ bob_the_very...          │
//! └──────────────────────────┘  y = 310
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod backend;
pub mod feed;
pub mod graphics;
pub mod layout;
pub mod renderer;

// Re-export key types
pub use backend::{DisplayError, DisplaySurface, Rect};
pub use feed::{ColorTag, FeedBuffer, FeedEntry, FEED_CAPACITY};
pub use graphics::GraphicsSurface;
pub use layout::{FeedLayout, LayoutError};
pub use renderer::FeedRenderer;

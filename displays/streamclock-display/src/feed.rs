//! Feed entry types
//!
//! Provides the fixed-capacity ring that holds the entries currently
//! visible in the feed region.

use alloc::string::String;

/// Number of entries kept in the feed
pub const FEED_CAPACITY: usize = 4;

/// Panel background (RGB565)
pub const BLACK: u16 = 0x0000;

/// Color of an entry's content line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColorTag {
    White,
    Yellow,
    Red,
    Green,
    Blue,
    Magenta,
    Cyan,
}

impl ColorTag {
    /// Raw RGB565 value for the panel
    pub const fn rgb565(self) -> u16 {
        match self {
            ColorTag::White => 0xFFFF,
            ColorTag::Yellow => 0xFFE0,
            ColorTag::Red => 0xF800,
            ColorTag::Green => 0x07E0,
            ColorTag::Blue => 0x001F,
            ColorTag::Magenta => 0xF81F,
            ColorTag::Cyan => 0x07FF,
        }
    }
}

/// One line item of the feed
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FeedEntry {
    pub user: String,
    pub content: String,
    pub color: ColorTag,
}

impl FeedEntry {
    pub fn new(user: impl Into<String>, content: impl Into<String>, color: ColorTag) -> Self {
        Self {
            user: user.into(),
            content: content.into(),
            color,
        }
    }
}

/// Ring buffer of the most recent feed entries
///
/// Holds at most `N` entries. Pushing into a full buffer overwrites the
/// oldest entry. Iteration runs oldest to newest, starting at the write
/// cursor.
#[derive(Debug, Clone)]
pub struct FeedBuffer<const N: usize = FEED_CAPACITY> {
    /// Entry slots, `None` until first written
    slots: [Option<FeedEntry>; N],
    /// Next slot to write
    cursor: usize,
}

impl<const N: usize> Default for FeedBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> FeedBuffer<N> {
    /// Create a new empty buffer
    pub fn new() -> Self {
        Self {
            slots: core::array::from_fn(|_| None),
            cursor: 0,
        }
    }

    /// Insert at the write cursor
    ///
    /// Returns the evicted entry when the buffer was full.
    pub fn push(&mut self, entry: FeedEntry) -> Option<FeedEntry> {
        if N == 0 {
            return Some(entry);
        }
        let evicted = self.slots[self.cursor].replace(entry);
        self.cursor = (self.cursor + 1) % N;
        evicted
    }

    /// Entries from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &FeedEntry> {
        (0..N).filter_map(move |i| self.slots[(self.cursor + i) % N].as_ref())
    }

    /// Most recently inserted entry
    pub fn newest(&self) -> Option<&FeedEntry> {
        if N == 0 {
            return None;
        }
        self.slots[(self.cursor + N - 1) % N].as_ref()
    }

    /// Number of entries held
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Slot the next push writes to
    pub const fn cursor(&self) -> usize {
        self.cursor
    }
}

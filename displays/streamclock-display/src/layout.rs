//! Feed layout parameters and text helpers
//!
//! Lengths are counted in characters, never bytes, so wrapping and
//! truncation cannot split a UTF-8 sequence.

use alloc::borrow::Cow;
use alloc::string::String;

use crate::backend::Rect;

/// Upper bound on wrapped content lines per entry
pub const MAX_WRAPPED_LINES: usize = 8;

/// Suffix appended to truncated usernames
pub const ELLIPSIS: &str = "...";

/// Glyph cell (width, height) in pixels for a text size
///
/// Size 1 uses the 6x10 font, size 2 the 10x20 font.
pub const fn glyph_size(size: u8) -> Option<(u16, u16)> {
    match size {
        1 => Some((6, 10)),
        2 => Some((10, 20)),
        _ => None,
    }
}

/// Layout validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LayoutError {
    /// Text size has no font
    UnsupportedTextSize,
    /// Line height smaller than a glyph
    LineHeightTooSmall,
    /// A full-width line does not fit between the paddings
    LineTooWide,
    /// Region cannot hold a single two-line entry
    RegionTooSmall,
    /// Wrapped line limit is zero or above `MAX_WRAPPED_LINES`
    InvalidWrapLimit,
    /// Truncated username would be longer than the untruncated limit
    InvalidUsernameLimits,
}

impl core::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            LayoutError::UnsupportedTextSize => "unsupported text size",
            LayoutError::LineHeightTooSmall => "line height smaller than glyph height",
            LayoutError::LineTooWide => "line does not fit the feed region",
            LayoutError::RegionTooSmall => "feed region cannot hold one entry",
            LayoutError::InvalidWrapLimit => "invalid wrapped line limit",
            LayoutError::InvalidUsernameLimits => "invalid username truncation limits",
        };
        f.write_str(msg)
    }
}

/// Geometry and text limits of the feed region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FeedLayout {
    /// Feed rectangle, border included
    pub region: Rect,
    /// Gap between the border and the text
    pub padding: u16,
    /// Vertical advance per text line
    pub line_height: u16,
    /// Content longer than this wraps
    pub max_chars_per_line: usize,
    /// Wrapped content is cut after this many lines
    pub max_wrapped_lines: usize,
    /// Usernames longer than this are truncated
    pub max_username_len: usize,
    /// Characters kept from a truncated username
    pub username_keep: usize,
    /// Font scale
    pub text_size: u8,
}

impl Default for FeedLayout {
    fn default() -> Self {
        Self {
            region: Rect::new(5, 210, 230, 100),
            padding: 5,
            line_height: 10,
            max_chars_per_line: 35,
            max_wrapped_lines: 3,
            max_username_len: 15,
            username_keep: 12,
            text_size: 1,
        }
    }
}

impl FeedLayout {
    /// Check that every line the renderer can produce stays in the region
    pub fn validate(&self) -> Result<(), LayoutError> {
        let (glyph_w, glyph_h) =
            glyph_size(self.text_size).ok_or(LayoutError::UnsupportedTextSize)?;

        if self.line_height < glyph_h {
            return Err(LayoutError::LineHeightTooSmall);
        }
        if self.max_wrapped_lines == 0 || self.max_wrapped_lines > MAX_WRAPPED_LINES {
            return Err(LayoutError::InvalidWrapLimit);
        }
        let inner_width = (self.region.width as u32).saturating_sub(2 * self.padding as u32);
        let line_width = u32::try_from(self.max_chars_per_line)
            .ok()
            .and_then(|chars| chars.checked_mul(glyph_w as u32));
        if self.max_chars_per_line == 0 || line_width.map_or(true, |w| w > inner_width) {
            return Err(LayoutError::LineTooWide);
        }
        if self.username_keep.saturating_add(ELLIPSIS.len()) > self.max_username_len
            || self.max_username_len > self.max_chars_per_line
        {
            return Err(LayoutError::InvalidUsernameLimits);
        }
        if self.text_top() + 2 * self.line_height as u32 > self.text_bottom() {
            return Err(LayoutError::RegionTooSmall);
        }
        Ok(())
    }

    /// Left edge of every text line
    pub fn text_left(&self) -> u16 {
        self.region.x.saturating_add(self.padding)
    }

    /// First text row
    pub fn text_top(&self) -> u32 {
        self.region.y as u32 + self.padding as u32
    }

    /// Lowest row a text line may reach (exclusive)
    pub fn text_bottom(&self) -> u32 {
        self.region.bottom().saturating_sub(self.padding as u32)
    }

    /// Interior cleared before each redraw
    pub fn interior(&self) -> Rect {
        self.region.inset(1)
    }

    /// Whether content is drawn as a single line
    pub fn is_short(&self, content: &str) -> bool {
        content.chars().count() <= self.max_chars_per_line
    }

    /// Number of lines long content occupies after wrapping
    pub fn wrapped_line_count(&self, content: &str) -> usize {
        wrap(content, self.max_chars_per_line)
            .take(self.max_wrapped_lines)
            .count()
    }

    /// Username as displayed
    pub fn display_name<'a>(&self, user: &'a str) -> Cow<'a, str> {
        truncate_username(user, self.max_username_len, self.username_keep)
    }
}

/// Shorten a username to `keep` characters plus an ellipsis when it is
/// longer than `max_len`
pub fn truncate_username(user: &str, max_len: usize, keep: usize) -> Cow<'_, str> {
    if user.chars().count() <= max_len {
        return Cow::Borrowed(user);
    }
    let mut short: String = user.chars().take(keep).collect();
    short.push_str(ELLIPSIS);
    Cow::Owned(short)
}

/// Split text into consecutive chunks of at most `width` characters
pub fn wrap(text: &str, width: usize) -> Wrap<'_> {
    Wrap { rest: text, width }
}

/// Iterator returned by [`wrap`]
#[derive(Debug, Clone)]
pub struct Wrap<'a> {
    rest: &'a str,
    width: usize,
}

impl<'a> Iterator for Wrap<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() || self.width == 0 {
            return None;
        }
        let split = self
            .rest
            .char_indices()
            .nth(self.width)
            .map(|(index, _)| index)
            .unwrap_or(self.rest.len());
        let (line, rest) = self.rest.split_at(split);
        self.rest = rest;
        Some(line)
    }
}

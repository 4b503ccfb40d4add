//! Display surface trait
//!
//! Defines the drawing primitives the feed needs from the panel.

/// Display surface errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with display
    Communication,
    /// Invalid coordinates or dimensions
    InvalidCoordinates,
    /// Text size the surface has no font for
    UnsupportedTextSize,
}

impl core::fmt::Display for DisplayError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DisplayError::Communication => f.write_str("display communication error"),
            DisplayError::InvalidCoordinates => f.write_str("invalid display coordinates"),
            DisplayError::UnsupportedTextSize => f.write_str("unsupported text size"),
        }
    }
}

/// Axis-aligned rectangle in panel pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// One past the last column
    pub const fn right(&self) -> u32 {
        self.x as u32 + self.width as u32
    }

    /// One past the last row
    pub const fn bottom(&self) -> u32 {
        self.y as u32 + self.height as u32
    }

    /// Shrink by `by` pixels on every side
    pub fn inset(&self, by: u16) -> Rect {
        Rect {
            x: self.x.saturating_add(by),
            y: self.y.saturating_add(by),
            width: self.width.saturating_sub(by.saturating_mul(2)),
            height: self.height.saturating_sub(by.saturating_mul(2)),
        }
    }

    /// Check whether `other` lies entirely inside this rectangle
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// Display surface trait
///
/// Provides a hardware-agnostic interface for drawing onto the panel.
/// Colors are raw RGB565 values.
pub trait DisplaySurface {
    /// Fill a rectangle with a solid color
    fn clear_region(&mut self, area: Rect, color: u16) -> Result<(), DisplayError>;

    /// Draw text with its top-left corner at (`x`, `y`)
    ///
    /// - `size`: font scale (1 = 6x10 glyphs, 2 = 10x20 glyphs)
    fn draw_text(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        color: u16,
        size: u8,
    ) -> Result<(), DisplayError>;

    /// Draw a one pixel rectangle outline
    fn draw_rect(&mut self, area: Rect, color: u16) -> Result<(), DisplayError>;
}

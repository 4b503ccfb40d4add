//! Feed rendering
//!
//! Lays the feed buffer out inside the feed region.
//!
//! Entries stack top-down from oldest to newest at a fixed line height:
//! - short content: username line, then content line
//! - long content: up to `max_wrapped_lines` wrapped lines, then the
//!   username line if there is room left
//!
//! An entry that does not fit the remaining height ends the pass, so the
//! feed never overlaps its border.

use crate::backend::{DisplayError, DisplaySurface};
use crate::feed::{ColorTag, FeedBuffer, FeedEntry, BLACK, FEED_CAPACITY};
use crate::layout::{wrap, FeedLayout};

/// Username color
const USERNAME_COLOR: ColorTag = ColorTag::Yellow;

/// Border color
const BORDER_COLOR: ColorTag = ColorTag::White;

/// Feed renderer owning the visible entries
pub struct FeedRenderer<const N: usize = FEED_CAPACITY> {
    buffer: FeedBuffer<N>,
    layout: FeedLayout,
    /// Whether the buffer changed since the last render
    dirty: bool,
}

impl<const N: usize> FeedRenderer<N> {
    /// Create a new renderer with an empty feed
    pub fn new(layout: FeedLayout) -> Self {
        Self {
            buffer: FeedBuffer::new(),
            layout,
            dirty: true,
        }
    }

    /// Get the current feed buffer
    pub fn buffer(&self) -> &FeedBuffer<N> {
        &self.buffer
    }

    pub fn layout(&self) -> &FeedLayout {
        &self.layout
    }

    /// Check if the feed needs redrawing
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Draw the region border
    ///
    /// Called once at start-up; `render` never touches the border again.
    pub fn draw_frame<S: DisplaySurface>(&self, surface: &mut S) -> Result<(), DisplayError> {
        surface.draw_rect(self.layout.region, BORDER_COLOR.rgb565())
    }

    /// Insert an entry and redraw the feed
    pub fn push<S: DisplaySurface>(
        &mut self,
        entry: FeedEntry,
        surface: &mut S,
    ) -> Result<(), DisplayError> {
        self.insert(entry);
        self.render(surface).map(|_| ())
    }

    /// Insert an entry without drawing; the next `flush` redraws
    pub fn insert(&mut self, entry: FeedEntry) {
        self.buffer.push(entry);
        self.dirty = true;
    }

    /// Redraw if anything changed since the last render
    pub fn flush<S: DisplaySurface>(&mut self, surface: &mut S) -> Result<(), DisplayError> {
        if self.dirty {
            self.render(surface)?;
        }
        Ok(())
    }

    /// Recompute the visible layout from the buffer
    ///
    /// Returns the number of entries drawn.
    pub fn render<S: DisplaySurface>(&mut self, surface: &mut S) -> Result<usize, DisplayError> {
        let layout = &self.layout;
        surface.clear_region(layout.interior(), BLACK)?;

        let line_height = layout.line_height as u32;
        let bottom = layout.text_bottom();
        let x = layout.text_left();
        let mut y = layout.text_top();
        let mut drawn = 0;

        for entry in self.buffer.iter() {
            let name = layout.display_name(&entry.user);

            if layout.is_short(&entry.content) {
                if y + 2 * line_height > bottom {
                    break;
                }
                draw_line(surface, layout, x, y, &name, USERNAME_COLOR)?;
                y += line_height;
                draw_line(surface, layout, x, y, &entry.content, entry.color)?;
                y += line_height;
            } else {
                let lines = layout.wrapped_line_count(&entry.content) as u32;
                if y + lines * line_height > bottom {
                    break;
                }
                for line in wrap(&entry.content, layout.max_chars_per_line)
                    .take(layout.max_wrapped_lines)
                {
                    draw_line(surface, layout, x, y, line, entry.color)?;
                    y += line_height;
                }
                if y + line_height <= bottom {
                    draw_line(surface, layout, x, y, &name, USERNAME_COLOR)?;
                    y += line_height;
                }
            }
            drawn += 1;
        }

        self.dirty = false;
        Ok(drawn)
    }
}

fn draw_line<S: DisplaySurface>(
    surface: &mut S,
    layout: &FeedLayout,
    x: u16,
    y: u32,
    text: &str,
    color: ColorTag,
) -> Result<(), DisplayError> {
    let y = u16::try_from(y).map_err(|_| DisplayError::InvalidCoordinates)?;
    surface.draw_text(x, y, text, color.rgb565(), layout.text_size)
}

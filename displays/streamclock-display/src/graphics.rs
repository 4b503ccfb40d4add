//! embedded-graphics surface
//!
//! Implements `DisplaySurface` for any `DrawTarget` with RGB565 pixels,
//! so the feed can draw straight into a panel driver or a framebuffer.

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};

use crate::backend::{DisplayError, DisplaySurface, Rect};

/// Surface backed by an embedded-graphics draw target
pub struct GraphicsSurface<D> {
    target: D,
}

impl<D> GraphicsSurface<D> {
    pub fn new(target: D) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &D {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut D {
        &mut self.target
    }

    pub fn into_inner(self) -> D {
        self.target
    }
}

fn color(raw: u16) -> Rgb565 {
    Rgb565::from(RawU16::new(raw))
}

fn rectangle(area: Rect) -> Rectangle {
    Rectangle::new(
        Point::new(area.x.into(), area.y.into()),
        Size::new(area.width.into(), area.height.into()),
    )
}

fn font(size: u8) -> Option<&'static MonoFont<'static>> {
    match size {
        1 => Some(&FONT_6X10),
        2 => Some(&FONT_10X20),
        _ => None,
    }
}

impl<D> DisplaySurface for GraphicsSurface<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    fn clear_region(&mut self, area: Rect, fill: u16) -> Result<(), DisplayError> {
        rectangle(area)
            .into_styled(PrimitiveStyle::with_fill(color(fill)))
            .draw(&mut self.target)
            .map_err(|_| DisplayError::Communication)
    }

    fn draw_text(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        fg: u16,
        size: u8,
    ) -> Result<(), DisplayError> {
        let font = font(size).ok_or(DisplayError::UnsupportedTextSize)?;
        let style = MonoTextStyle::new(font, color(fg));
        Text::with_baseline(text, Point::new(x.into(), y.into()), style, Baseline::Top)
            .draw(&mut self.target)
            .map(|_| ())
            .map_err(|_| DisplayError::Communication)
    }

    fn draw_rect(&mut self, area: Rect, stroke: u16) -> Result<(), DisplayError> {
        rectangle(area)
            .into_styled(PrimitiveStyle::with_stroke(color(stroke), 1))
            .draw(&mut self.target)
            .map_err(|_| DisplayError::Communication)
    }
}

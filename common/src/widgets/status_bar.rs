//! Status bar along the bottom edge.
//!
//! ```text
//! ├────────────────────────────┤ <- separator (muted)
//! │ 2/4                  7/10  │
//! └────────────────────────────┘
//!   page/pages      cursor/total
//! ```
//!
//! Text uses `heapless::String` so a frame allocates nothing for the indicator.

use core::fmt::Write;

use embedded_graphics::{
    mono_font::MonoTextStyle,
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{Line, PrimitiveStyle, Rectangle},
    text::Text,
};
use heapless::String;

use crate::colors::Theme;
use crate::config::STATUS_BAR_HEIGHT;
use crate::styles::{RIGHT_TEXT, ROW_TEXT, STATUS_FONT};

/// Horizontal padding inside the bar.
const PADDING: i32 = 2;

/// Draw the page indicator and cursor position. `cursor` is 0-based.
#[allow(clippy::too_many_arguments)]
pub fn draw_status_bar<D>(
    display: &mut D,
    width: u32,
    height: u32,
    page_index: usize,
    page_count: usize,
    cursor: usize,
    total: usize,
    theme: &Theme,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let top = height.saturating_sub(STATUS_BAR_HEIGHT) as i32;

    Rectangle::new(Point::new(0, top), Size::new(width, STATUS_BAR_HEIGHT))
        .into_styled(PrimitiveStyle::with_fill(theme.background))
        .draw(display)
        .ok();
    Line::new(Point::new(0, top), Point::new(width as i32 - 1, top))
        .into_styled(PrimitiveStyle::with_stroke(theme.muted, 1))
        .draw(display)
        .ok();

    let style = MonoTextStyle::new(STATUS_FONT, theme.foreground);

    let mut page: String<24> = String::new();
    let _ = write!(page, "{}/{}", page_index + 1, page_count.max(1));
    Text::with_text_style(&page, Point::new(PADDING, top + 2), style, ROW_TEXT)
        .draw(display)
        .ok();

    let mut position: String<24> = String::new();
    let shown = if total == 0 { 0 } else { cursor + 1 };
    let _ = write!(position, "{shown}/{total}");
    Text::with_text_style(&position, Point::new(width as i32 - PADDING, top + 2), style, RIGHT_TEXT)
        .draw(display)
        .ok();
}

// =============================================================================
// Unit Tests
// =============================================================================

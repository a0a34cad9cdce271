//! Transient popup shown after an executable entry is activated.

use core::fmt::Write;

use embedded_graphics::{
    mono_font::MonoTextStyle,
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::Text,
};
use heapless::String;

use crate::colors::Theme;
use crate::styles::{CENTERED, POPUP_FONT};

/// Border thickness around the popup body.
const BORDER: u32 = 2;

/// Longest callback name shown before clipping.
const MAX_LABEL: usize = 40;

/// Centered "RUN <callback>" box.
pub fn draw_invoke_popup<D>(
    display: &mut D,
    width: u32,
    height: u32,
    callback: &str,
    theme: &Theme,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let mut label: String<48> = String::new();
    let _ = write!(label, "RUN ");
    for ch in callback.chars().take(MAX_LABEL) {
        if label.push(ch).is_err() {
            break;
        }
    }

    let char_width = POPUP_FONT.character_size.width + POPUP_FONT.character_spacing;
    let text_width = label.chars().count() as u32 * char_width;
    let box_width = (text_width + 8).min(width.saturating_sub(2 * BORDER)).max(1);
    let box_height = (POPUP_FONT.character_size.height + 8).min(height.saturating_sub(2 * BORDER)).max(1);
    let x = (width.saturating_sub(box_width) / 2) as i32;
    let y = (height.saturating_sub(box_height) / 2) as i32;

    Rectangle::new(
        Point::new(x - BORDER as i32, y - BORDER as i32),
        Size::new(box_width + 2 * BORDER, box_height + 2 * BORDER),
    )
    .into_styled(PrimitiveStyle::with_fill(theme.popup))
    .draw(display)
    .ok();

    Rectangle::new(Point::new(x, y), Size::new(box_width, box_height))
        .into_styled(PrimitiveStyle::with_fill(theme.background))
        .draw(display)
        .ok();

    let center = Point::new((width / 2) as i32, y + (box_height / 2) as i32);
    Text::with_text_style(&label, center, MonoTextStyle::new(POPUP_FONT, theme.foreground), CENTERED)
        .draw(display)
        .ok();
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::test_support::FrameBuffer;

    #[test]
    fn test_popup_is_centered_with_border() {
        let theme = Theme::OLED;
        let mut fb = FrameBuffer::new(128, 64);
        draw_invoke_popup(&mut fb, 128, 64, "on_ok", &theme);

        assert!(fb.count(theme.popup) > 0);
        assert!(fb.count(theme.foreground) > 0);
        // Corners untouched
        assert_eq!(fb.at(0, 0), Rgb565::BLACK);
        assert_eq!(fb.at(127, 63), Rgb565::BLACK);
    }

    #[test]
    fn test_long_callback_is_clipped() {
        let theme = Theme::TFT;
        let mut fb = FrameBuffer::new(64, 32);
        draw_invoke_popup(&mut fb, 64, 32, &"x".repeat(200), &theme);
        assert!(fb.count(theme.popup) > 0);
    }
}

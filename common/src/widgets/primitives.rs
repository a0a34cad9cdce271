//! Low-level drawing primitives shared across widgets.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

/// Minimum scrollbar thumb length in pixels.
const MIN_THUMB: u32 = 3;

/// Fill one full-width row behind the selected entry.
pub fn draw_selection_bar<D>(
    display: &mut D,
    y: i32,
    width: u32,
    height: u32,
    color: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    if width == 0 || height == 0 {
        return;
    }
    Rectangle::new(Point::new(0, y), Size::new(width, height))
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(display)
        .ok();
}

/// Horizontal dotted line, one pixel every `step`.
pub fn draw_dotted_line<D>(
    display: &mut D,
    y: i32,
    x0: i32,
    x1: i32,
    step: u32,
    color: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let step = step.max(1) as usize;
    let dots = (x0..x1).step_by(step).map(|x| Pixel(Point::new(x, y), color));
    display.draw_iter(dots).ok();
}

/// Thumb `(offset, length)` within a track of `track_len` pixels.
///
/// The thumb covers `capacity / total` of the track, at least [`MIN_THUMB`] pixels, and
/// its end touches the track end when the window is on the last full page.
pub fn scrollbar_thumb(
    track_len: u32,
    total: usize,
    view_start: usize,
    capacity: usize,
) -> (u32, u32) {
    if total == 0 || capacity >= total {
        return (0, track_len);
    }
    let track = track_len as usize;
    let length = (track * capacity / total).max(MIN_THUMB as usize).min(track);
    let max_start = total - capacity;
    let travel = track - length;
    let offset = travel * view_start.min(max_start) / max_start;
    (offset as u32, length as u32)
}

/// Vertical scrollbar at column `x`, `width` pixels wide.
#[allow(clippy::too_many_arguments)]
pub fn draw_scrollbar<D>(
    display: &mut D,
    x: i32,
    y: i32,
    width: u32,
    track_len: u32,
    total: usize,
    view_start: usize,
    capacity: usize,
    track_color: Rgb565,
    thumb_color: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    if width == 0 || track_len == 0 {
        return;
    }
    Rectangle::new(Point::new(x, y), Size::new(width, track_len))
        .into_styled(PrimitiveStyle::with_fill(track_color))
        .draw(display)
        .ok();

    let (offset, length) = scrollbar_thumb(track_len, total, view_start, capacity);
    Rectangle::new(Point::new(x, y + offset as i32), Size::new(width, length))
        .into_styled(PrimitiveStyle::with_fill(thumb_color))
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
    fn test_thumb_covers_track_when_everything_fits() {
        assert_eq!(scrollbar_thumb(50, 3, 0, 5), (0, 50));
        assert_eq!(scrollbar_thumb(50, 0, 0, 5), (0, 50));
    }

    #[test]
    fn test_thumb_position() {
        // 10 items, 5 visible, 50px track: 25px thumb
        assert_eq!(scrollbar_thumb(50, 10, 0, 5), (0, 25));
        assert_eq!(scrollbar_thumb(50, 10, 5, 5), (25, 25));
        // Stale start past the end pins to the bottom
        assert_eq!(scrollbar_thumb(50, 10, 9, 5), (25, 25));
    }

    #[test]
    fn test_thumb_minimum_length() {
        let (_, length) = scrollbar_thumb(20, 1000, 0, 2);
        assert_eq!(length, MIN_THUMB);
        let (offset, length) = scrollbar_thumb(20, 1000, 998, 2);
        assert_eq!(offset + length, 20);
    }

    #[test]
    fn test_dotted_line_spacing() {
        let mut fb = FrameBuffer::new(10, 2);
        draw_dotted_line(&mut fb, 1, 0, 10, 3, Rgb565::WHITE);
        assert_eq!(fb.count(Rgb565::WHITE), 4);
        assert_eq!(fb.at(3, 1), Rgb565::WHITE);
        assert_eq!(fb.at(4, 1), Rgb565::BLACK);
    }

    #[test]
    fn test_selection_bar_fills_row() {
        let mut fb = FrameBuffer::new(8, 8);
        draw_selection_bar(&mut fb, 2, 8, 3, Rgb565::GREEN);
        assert_eq!(fb.count(Rgb565::GREEN), 24);
        assert_eq!(fb.count_rows(Rgb565::GREEN, 2, 5), 24);
    }
}

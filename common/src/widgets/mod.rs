//! Widget components for the menu preview.
//!
//! All widgets are generic over `DrawTarget<Color = Rgb565>` so the same code paints
//! the off-screen PNG preview, the SDL window and the unit-test framebuffer.

mod menu_list;
mod popups;
mod primitives;
mod status_bar;

pub use menu_list::{MenuFrame, MenuRow, draw_menu, fit_label, text_columns};
pub use popups::draw_invoke_popup;
pub use primitives::{draw_dotted_line, draw_scrollbar, draw_selection_bar, scrollbar_thumb};
pub use status_bar::draw_status_bar;

#[cfg(test)]
pub(crate) mod test_support {
    use embedded_graphics::{Pixel, pixelcolor::Rgb565, prelude::*};

    /// Plain in-memory framebuffer that clips out-of-bounds pixels.
    pub struct FrameBuffer {
        pub size: Size,
        pub pixels: Vec<Rgb565>,
    }

    impl FrameBuffer {
        pub fn new(
            width: u32,
            height: u32,
        ) -> Self {
            Self {
                size: Size::new(width, height),
                pixels: vec![Rgb565::BLACK; (width * height) as usize],
            }
        }

        pub fn at(
            &self,
            x: u32,
            y: u32,
        ) -> Rgb565 {
            self.pixels[(y * self.size.width + x) as usize]
        }

        pub fn count(
            &self,
            color: Rgb565,
        ) -> usize {
            self.pixels.iter().filter(|pixel| **pixel == color).count()
        }

        /// Pixels of `color` inside rows `y0..y1`.
        pub fn count_rows(
            &self,
            color: Rgb565,
            y0: u32,
            y1: u32,
        ) -> usize {
            (y0..y1.min(self.size.height))
                .flat_map(|y| (0..self.size.width).map(move |x| (x, y)))
                .filter(|(x, y)| self.at(*x, *y) == color)
                .count()
        }
    }

    impl OriginDimensions for FrameBuffer {
        fn size(&self) -> Size { self.size }
    }

    impl DrawTarget for FrameBuffer {
        type Color = Rgb565;
        type Error = core::convert::Infallible;

        fn draw_iter<I>(
            &mut self,
            pixels: I,
        ) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(point, color) in pixels {
                if point.x >= 0
                    && point.y >= 0
                    && (point.x as u32) < self.size.width
                    && (point.y as u32) < self.size.height
                {
                    let idx = (point.y as u32 * self.size.width + point.x as u32) as usize;
                    self.pixels[idx] = color;
                }
            }
            Ok(())
        }
    }
}

//! Glyph rasterization into 1-bpp bitmaps.
//!
//! A [`FontBackend`] turns one character into an 8-bit coverage map. The rasterizer
//! thresholds it and packs it into the layout the generated C code reads:
//!
//! ```text
//! width = 10, height = 2, stride = ceil(10 / 8) = 2
//!
//! row 0: [b7 b6 b5 b4 b3 b2 b1 b0] [b7 b6 0 0 0 0 0 0]
//! row 1: [b7 b6 b5 b4 b3 b2 b1 b0] [b7 b6 0 0 0 0 0 0]
//!         x=0                  x=7   x=8 x=9  padding
//! ```
//!
//! Rows are row-major, MSB-first and padded to a whole byte. A pixel is on when its
//! coverage is above mid-gray.
//!
//! Rendering failures never abort an export: the rasterizer returns an empty
//! (0x0) glyph and logs a warning.

use embedded_graphics::{
    Pixel,
    mono_font::MonoTextStyle,
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, Text},
};
use tracing::warn;

use crate::styles::mono_font;

/// Coverage above this value is an "on" pixel.
pub const LUMINANCE_THRESHOLD: u8 = 127;

// =============================================================================
// Coverage
// =============================================================================

/// 8-bit coverage map, row-major, `width * height` bytes.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Coverage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Coverage {
    pub fn blank(
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width * height) as usize],
        }
    }

    #[inline]
    pub fn get(
        &self,
        x: u32,
        y: u32,
    ) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.data.get((y * self.width + x) as usize).copied().unwrap_or(0)
    }

    #[inline]
    pub fn set(
        &mut self,
        x: u32,
        y: u32,
        value: u8,
    ) {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) as usize;
            if let Some(slot) = self.data.get_mut(idx) {
                *slot = value;
            }
        }
    }
}

/// Something that can draw a single character.
///
/// Implementations decide how `family` is interpreted (built-in font name, font file
/// path, ...). Returning `None` means the character cannot be rendered.
pub trait FontBackend {
    fn rasterize(
        &self,
        ch: char,
        family: &str,
        px: u32,
    ) -> Option<Coverage>;
}

// =============================================================================
// Glyph
// =============================================================================

/// One packed 1-bpp glyph.
#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub struct Glyph {
    pub width: u32,
    pub height: u32,
    pub bits: Vec<u8>,
}

impl Glyph {
    /// The degraded result for characters the backend cannot render.
    pub const fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            bits: Vec::new(),
        }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool { self.width == 0 || self.height == 0 }

    /// Bytes per row.
    #[inline]
    pub const fn stride(&self) -> u32 { self.width.div_ceil(8) }

    pub fn pixel(
        &self,
        x: u32,
        y: u32,
    ) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let idx = (y * self.stride() + x / 8) as usize;
        self.bits.get(idx).is_some_and(|byte| byte & (0x80 >> (x % 8)) != 0)
    }
}

/// Threshold and pack a coverage map.
pub fn pack_coverage(coverage: &Coverage) -> Glyph {
    let stride = coverage.width.div_ceil(8);
    let mut bits = vec![0u8; (stride * coverage.height) as usize];
    for y in 0..coverage.height {
        for x in 0..coverage.width {
            if coverage.get(x, y) > LUMINANCE_THRESHOLD {
                let idx = (y * stride + x / 8) as usize;
                if let Some(byte) = bits.get_mut(idx) {
                    *byte |= 0x80 >> (x % 8);
                }
            }
        }
    }
    Glyph {
        width: coverage.width,
        height: coverage.height,
        bits,
    }
}

// =============================================================================
// Glyph Rasterizer
// =============================================================================

/// Renders characters of one family and size through a backend.
pub struct GlyphRasterizer<'a> {
    backend: &'a dyn FontBackend,
    family: String,
    px: u32,
}

impl<'a> GlyphRasterizer<'a> {
    pub fn new(
        backend: &'a dyn FontBackend,
        family: impl Into<String>,
        px: u32,
    ) -> Self {
        Self {
            backend,
            family: family.into(),
            px,
        }
    }

    #[inline]
    pub fn family(&self) -> &str { &self.family }

    #[inline]
    pub const fn px(&self) -> u32 { self.px }

    /// Render one character. Unsupported characters give [`Glyph::empty`].
    pub fn rasterize(
        &self,
        ch: char,
    ) -> Glyph {
        match self.backend.rasterize(ch, &self.family, self.px) {
            Some(coverage) if coverage.data.len() == (coverage.width * coverage.height) as usize => {
                pack_coverage(&coverage)
            }
            Some(_) => {
                warn!(ch = %ch.escape_unicode(), "backend returned a malformed coverage map");
                Glyph::empty()
            }
            None => {
                warn!(ch = %ch.escape_unicode(), family = %self.family, px = self.px, "glyph not renderable");
                Glyph::empty()
            }
        }
    }
}

// =============================================================================
// Built-in Mono Font Backend
// =============================================================================

/// Off-screen binary target that records drawn pixels as full coverage.
pub struct GlyphCanvas {
    coverage: Coverage,
}

impl GlyphCanvas {
    pub fn new(size: Size) -> Self {
        Self {
            coverage: Coverage::blank(size.width, size.height),
        }
    }

    pub fn into_coverage(self) -> Coverage { self.coverage }
}

impl OriginDimensions for GlyphCanvas {
    fn size(&self) -> Size { Size::new(self.coverage.width, self.coverage.height) }
}

impl DrawTarget for GlyphCanvas {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            let value = if color.is_on() { u8::MAX } else { 0 };
            self.coverage.set(point.x as u32, point.y as u32, value);
        }
        Ok(())
    }
}

/// Renders printable ASCII with the built-in bitmap fonts.
///
/// The glyph cell is the font's character size, so every glyph of one font has the
/// same dimensions.
#[derive(Clone, Copy, Default, Debug)]
pub struct MonoFontBackend;

impl FontBackend for MonoFontBackend {
    fn rasterize(
        &self,
        ch: char,
        family: &str,
        px: u32,
    ) -> Option<Coverage> {
        if !(' '..='~').contains(&ch) {
            return None;
        }
        let font = mono_font(family, px);
        let mut canvas = GlyphCanvas::new(font.character_size);
        let mut buf = [0u8; 4];
        let style = MonoTextStyle::new(font, BinaryColor::On);
        Text::with_baseline(ch.encode_utf8(&mut buf), Point::zero(), style, Baseline::Top)
            .draw(&mut canvas)
            .ok()?;
        Some(canvas.into_coverage())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Fills the whole cell, `px/2` wide and `px` tall.
    struct BoxBackend;

    impl FontBackend for BoxBackend {
        fn rasterize(
            &self,
            _ch: char,
            _family: &str,
            px: u32,
        ) -> Option<Coverage> {
            let width = px / 2;
            Some(Coverage {
                width,
                height: px,
                data: vec![255; (width * px) as usize],
            })
        }
    }

    struct NoneBackend;

    impl FontBackend for NoneBackend {
        fn rasterize(
            &self,
            _ch: char,
            _family: &str,
            _px: u32,
        ) -> Option<Coverage> {
            None
        }
    }

    #[test]
    fn test_pack_row_aligned_msb_first() {
        let mut coverage = Coverage::blank(10, 2);
        coverage.set(0, 0, 255);
        coverage.set(9, 0, 200);
        coverage.set(8, 1, 128);
        coverage.set(1, 1, 127);
        let glyph = pack_coverage(&coverage);

        assert_eq!(glyph.stride(), 2);
        assert_eq!(glyph.bits, vec![0b1000_0000, 0b0100_0000, 0b0000_0000, 0b1000_0000]);
        assert!(glyph.pixel(0, 0));
        assert!(glyph.pixel(9, 0));
        assert!(glyph.pixel(8, 1));
        // Exactly mid-gray stays off
        assert!(!glyph.pixel(1, 1));
        assert!(!glyph.pixel(10, 0));
    }

    #[test]
    fn test_stride_for_byte_multiple() {
        let glyph = pack_coverage(&Coverage::blank(16, 3));
        assert_eq!(glyph.stride(), 2);
        assert_eq!(glyph.bits.len(), 6);
    }

    #[test]
    fn test_unrenderable_degrades_to_empty() {
        let rasterizer = GlyphRasterizer::new(&NoneBackend, "any", 12);
        let glyph = rasterizer.rasterize('x');
        assert!(glyph.is_empty());
        assert!(glyph.bits.is_empty());
    }

    #[test]
    fn test_box_backend_is_full() {
        let rasterizer = GlyphRasterizer::new(&BoxBackend, "box", 12);
        let glyph = rasterizer.rasterize('日');
        assert_eq!((glyph.width, glyph.height), (6, 12));
        assert!(glyph.bits.iter().all(|byte| *byte == 0b1111_1100));
    }

    #[test]
    fn test_mono_backend_renders_ascii() {
        let rasterizer = GlyphRasterizer::new(&MonoFontBackend, "mono", 10);
        let glyph = rasterizer.rasterize('A');
        assert_eq!((glyph.width, glyph.height), (6, 10));
        assert!(glyph.bits.iter().any(|byte| *byte != 0));

        let space = rasterizer.rasterize(' ');
        assert_eq!((space.width, space.height), (6, 10));
        assert!(space.bits.iter().all(|byte| *byte == 0));
    }

    #[test]
    fn test_mono_backend_rejects_non_ascii() {
        assert!(MonoFontBackend.rasterize('語', "mono", 10).is_none());
        assert!(MonoFontBackend.rasterize('\n', "mono", 10).is_none());
    }

    #[test]
    fn test_rasterize_is_deterministic() {
        let rasterizer = GlyphRasterizer::new(&MonoFontBackend, "profont", 12);
        assert_eq!(rasterizer.rasterize('Q'), rasterizer.rasterize('Q'));
    }
}

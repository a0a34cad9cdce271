//! Color themes for the menu preview.
//!
//! Each display profile previews in the colors of the panel it stands in for:
//!
//! | Theme | Background | Text | Selection |
//! |-------|------------|------|-----------|
//! | OLED | black | green | green bar, black text |
//! | TFT | blue | white | white bar, blue text |
//! | LCD | light gray | black | black bar, gray text |
//!
//! ## Rgb565 Color Format
//!
//! Rgb565 uses 16 bits per pixel: 5 bits red, 6 bits green, 5 bits blue. This is the
//! framebuffer format the preview draws into and the format most SPI TFT panels take.

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

// =============================================================================
// Standard Colors (from RgbColor trait)
// =============================================================================

pub const BLACK: Rgb565 = Rgb565::BLACK;
pub const WHITE: Rgb565 = Rgb565::WHITE;
pub const GREEN: Rgb565 = Rgb565::GREEN;

// =============================================================================
// Custom Colors
// =============================================================================

/// Panel blue for TFT backgrounds. RGB565: (0, 8, 20).
pub const PANEL_BLUE: Rgb565 = Rgb565::new(0, 8, 20);

/// Reflective LCD background. RGB565: (24, 50, 24).
pub const LIGHT_GRAY: Rgb565 = Rgb565::new(24, 50, 24);

/// Dimmed foreground for scrollbar tracks and dotted filler. RGB565: (8, 16, 8).
pub const GRAY: Rgb565 = Rgb565::new(8, 16, 8);

/// Popup accent. RGB565: (31, 32, 0).
pub const ORANGE: Rgb565 = Rgb565::new(31, 32, 0);

// =============================================================================
// Themes
// =============================================================================

/// Colors used by every menu widget.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Theme {
    pub background: Rgb565,
    pub foreground: Rgb565,
    /// Fill of the selection bar.
    pub highlight: Rgb565,
    /// Text drawn on top of the selection bar.
    pub highlight_text: Rgb565,
    /// Scrollbar track and dotted filler.
    pub muted: Rgb565,
    pub popup: Rgb565,
}

impl Theme {
    /// Monochrome OLED: green on black.
    pub const OLED: Self = Self {
        background: BLACK,
        foreground: GREEN,
        highlight: GREEN,
        highlight_text: BLACK,
        muted: GRAY,
        popup: ORANGE,
    };

    /// Color TFT: white on blue.
    pub const TFT: Self = Self {
        background: PANEL_BLUE,
        foreground: WHITE,
        highlight: WHITE,
        highlight_text: PANEL_BLUE,
        muted: GRAY,
        popup: ORANGE,
    };

    /// Reflective LCD: black on light gray.
    pub const LCD: Self = Self {
        background: LIGHT_GRAY,
        foreground: BLACK,
        highlight: BLACK,
        highlight_text: LIGHT_GRAY,
        muted: GRAY,
        popup: BLACK,
    };
}

impl Default for Theme {
    fn default() -> Self { Self::OLED }
}

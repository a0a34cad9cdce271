//! Display profiles.
//!
//! A profile fixes the framebuffer size, the default menu font size and the preview
//! theme for one class of target panel. Layout numbers are derived from it:
//!
//! ```text
//! ┌──────────────────────────┐  ─┐
//! │ > Settings            >  │   │ line_height = font_px + 2
//! │   About                  │   │
//! │   ...                    │   ├ capacity = (height - reserved) / line_height
//! │                          │   │
//! ├──────────────────────────┤  ─┘
//! │ 1/2               3/7    │  reserved_height (status bar)
//! └──────────────────────────┘
//! ```

use core::fmt;

use crate::colors::Theme;
use crate::viewport;

/// Spacing added under every menu line.
pub const LINE_SPACING: u32 = 2;

/// Status bar height when enabled (status font 10px + spacing).
pub const STATUS_BAR_HEIGHT: u32 = 12;

// =============================================================================
// Screen Kinds
// =============================================================================

/// Target panel class.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub enum ScreenKind {
    /// 128x64 monochrome OLED (SSD1306 / SH1106).
    #[default]
    Oled128x64,
    /// 240x240 color TFT (ST7789).
    Tft240x240,
    /// 320x240 color TFT (ILI9341 / ST7789).
    Tft320x240,
    /// 160x128 reflective LCD (ST7735).
    Lcd160x128,
    /// User-sized panel.
    Custom,
}

impl ScreenKind {
    pub const ALL: [Self; 5] = [Self::Oled128x64, Self::Tft240x240, Self::Tft320x240, Self::Lcd160x128, Self::Custom];

    /// Stable name used in configuration files and on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Oled128x64 => "oled-128x64",
            Self::Tft240x240 => "tft-240x240",
            Self::Tft320x240 => "tft-320x240",
            Self::Lcd160x128 => "lcd-160x128",
            Self::Custom => "custom",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Native resolution.
    pub const fn size(self) -> (u32, u32) {
        match self {
            Self::Oled128x64 => (128, 64),
            Self::Tft240x240 | Self::Custom => (240, 240),
            Self::Tft320x240 => (320, 240),
            Self::Lcd160x128 => (160, 128),
        }
    }

    /// Default menu font size in pixels.
    pub const fn default_font_px(self) -> u32 {
        match self {
            Self::Oled128x64 | Self::Lcd160x128 => 8,
            Self::Tft240x240 | Self::Tft320x240 => 12,
            Self::Custom => 10,
        }
    }

    pub const fn theme(self) -> Theme {
        match self {
            Self::Oled128x64 => Theme::OLED,
            Self::Tft240x240 | Self::Tft320x240 | Self::Custom => Theme::TFT,
            Self::Lcd160x128 => Theme::LCD,
        }
    }
}

impl fmt::Display for ScreenKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Display Profile
// =============================================================================

/// Resolved geometry for one preview.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DisplayProfile {
    pub kind: ScreenKind,
    pub width: u32,
    pub height: u32,
    pub font_px: u32,
    pub status_bar: bool,
    pub theme: Theme,
}

impl DisplayProfile {
    /// Profile with the panel's native size, default font and theme.
    pub const fn new(kind: ScreenKind) -> Self {
        let (width, height) = kind.size();
        Self {
            kind,
            width,
            height,
            font_px: kind.default_font_px(),
            status_bar: true,
            theme: kind.theme(),
        }
    }

    /// Override the size. Only meaningful for [`ScreenKind::Custom`] but accepted for any.
    #[must_use]
    pub const fn with_size(
        mut self,
        width: u32,
        height: u32,
    ) -> Self {
        self.width = if width == 0 { 1 } else { width };
        self.height = if height == 0 { 1 } else { height };
        self
    }

    #[must_use]
    pub const fn with_font_px(
        mut self,
        font_px: u32,
    ) -> Self {
        self.font_px = if font_px == 0 { 1 } else { font_px };
        self
    }

    #[must_use]
    pub const fn with_status_bar(
        mut self,
        status_bar: bool,
    ) -> Self {
        self.status_bar = status_bar;
        self
    }

    #[inline]
    pub const fn line_height(&self) -> u32 { self.font_px.saturating_add(LINE_SPACING) }

    /// Chrome that menu rows may not use. The status bar keeps its own font, so its
    /// strip does not grow with `font_px`.
    #[inline]
    pub const fn reserved_height(&self) -> u32 { if self.status_bar { STATUS_BAR_HEIGHT } else { 0 } }

    /// Number of menu rows that fit. Recompute after any font or chrome change.
    #[inline]
    pub const fn capacity(&self) -> usize { viewport::capacity(self.height, self.reserved_height(), self.line_height()) }
}

impl Default for DisplayProfile {
    fn default() -> Self { Self::new(ScreenKind::default()) }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_names() {
        for kind in ScreenKind::ALL {
            assert_eq!(ScreenKind::parse(kind.name()), Some(kind));
        }
        assert_eq!(ScreenKind::parse(" OLED-128x64 "), Some(ScreenKind::Oled128x64));
        assert_eq!(ScreenKind::parse("vga"), None);
    }

    #[test]
    fn test_oled_capacity() {
        let profile = DisplayProfile::new(ScreenKind::Oled128x64);
        assert_eq!(profile.line_height(), 10);
        // (64 - 12) / 10
        assert_eq!(profile.capacity(), 5);
        assert_eq!(profile.with_status_bar(false).capacity(), 6);
    }

    #[test]
    fn test_capacity_follows_font_size() {
        let profile = DisplayProfile::new(ScreenKind::Tft240x240);
        assert_eq!(profile.capacity(), (240 - 12) / 14);
        assert_eq!(profile.with_font_px(20).capacity(), (240 - 12) / 22);
        // Font taller than the panel still yields one line
        assert_eq!(profile.with_font_px(500).capacity(), 1);
    }

    #[test]
    fn test_status_bar_strip_is_fixed() {
        let profile = DisplayProfile::new(ScreenKind::Tft240x240).with_font_px(20);
        assert_eq!(profile.reserved_height(), STATUS_BAR_HEIGHT);
        assert_eq!(profile.with_font_px(6).reserved_height(), STATUS_BAR_HEIGHT);
        assert_eq!(profile.capacity(), 10);
        assert_eq!(profile.with_status_bar(false).reserved_height(), 0);
    }

    #[test]
    fn test_huge_font_size_does_not_overflow() {
        let profile = DisplayProfile::new(ScreenKind::Oled128x64).with_font_px(u32::MAX);
        assert_eq!(profile.line_height(), u32::MAX);
        assert_eq!(profile.capacity(), 1);
    }

    #[test]
    fn test_custom_size() {
        let profile = DisplayProfile::new(ScreenKind::Custom).with_size(100, 0);
        assert_eq!((profile.width, profile.height), (100, 1));
        assert_eq!(profile.theme, Theme::TFT);
    }
}

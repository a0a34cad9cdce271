//! Text styles and font selection for the preview.
//!
//! The preview only has bitmap fonts, so a requested pixel size is mapped to the
//! largest built-in font whose glyph cell fits inside it:
//!
//! ```text
//! family "profont..."  -> ProFont 7/9/10/12/14/18/24 pt
//! anything else        -> embedded-graphics ASCII 4x6 .. 10x20
//! ```
//!
//! Sizes below the smallest font fall back to the smallest one.

use embedded_graphics::{
    mono_font::{
        MonoFont,
        ascii::{
            FONT_4X6,
            FONT_5X7,
            FONT_5X8,
            FONT_6X9,
            FONT_6X10,
            FONT_6X12,
            FONT_6X13,
            FONT_7X13,
            FONT_7X14,
            FONT_8X13,
            FONT_9X15,
            FONT_9X18,
            FONT_10X20,
        },
    },
    text::{Alignment, Baseline, TextStyle, TextStyleBuilder},
};
use profont::{
    PROFONT_7_POINT,
    PROFONT_9_POINT,
    PROFONT_10_POINT,
    PROFONT_12_POINT,
    PROFONT_14_POINT,
    PROFONT_18_POINT,
    PROFONT_24_POINT,
};

// =============================================================================
// Text Alignment Styles
// =============================================================================

/// Left-aligned, top baseline. Menu rows and the status bar.
pub const ROW_TEXT: TextStyle = TextStyleBuilder::new().alignment(Alignment::Left).baseline(Baseline::Top).build();

/// Right-aligned, top baseline. Position indicator in the status bar.
pub const RIGHT_TEXT: TextStyle = TextStyleBuilder::new().alignment(Alignment::Right).baseline(Baseline::Top).build();

/// Centered, middle baseline. Popups and placeholders.
pub const CENTERED: TextStyle = TextStyleBuilder::new().alignment(Alignment::Center).baseline(Baseline::Middle).build();

// =============================================================================
// Font Tables
// =============================================================================

/// Status bar font. Fixed so the chrome height does not follow the menu font.
pub const STATUS_FONT: &MonoFont = &FONT_6X10;

/// Popup font.
pub const POPUP_FONT: &MonoFont = &FONT_6X10;

const ASCII_FONTS: [&MonoFont; 13] = [
    &FONT_4X6, &FONT_5X7, &FONT_5X8, &FONT_6X9, &FONT_6X10, &FONT_6X12, &FONT_6X13, &FONT_7X13, &FONT_7X14, &FONT_8X13,
    &FONT_9X15, &FONT_9X18, &FONT_10X20,
];

const PROFONT_FONTS: [&MonoFont; 7] = [
    &PROFONT_7_POINT,
    &PROFONT_9_POINT,
    &PROFONT_10_POINT,
    &PROFONT_12_POINT,
    &PROFONT_14_POINT,
    &PROFONT_18_POINT,
    &PROFONT_24_POINT,
];

/// True if `family` names the ProFont family (case-insensitive prefix).
pub fn is_profont(family: &str) -> bool { family.trim().to_ascii_lowercase().starts_with("profont") }

/// Pick the built-in font for `family` at `px` pixels.
pub fn mono_font(
    family: &str,
    px: u32,
) -> &'static MonoFont<'static> {
    let table: &[&'static MonoFont<'static>] = if is_profont(family) { &PROFONT_FONTS } else { &ASCII_FONTS };
    table
        .iter()
        .copied()
        .filter(|font| font.character_size.height <= px)
        .max_by_key(|font| font.character_size.height)
        .or_else(|| table.iter().copied().min_by_key(|font| font.character_size.height))
        .unwrap_or(&FONT_6X10)
}

// =============================================================================
// Unit Tests
// =============================================================================

//! Menu list rendering.
//!
//! Paints the visible window of the current submenu:
//!
//! ```text
//! ┌────────────────────────────┬─┐
//! │   Display               >  │█│  <- submenu gets a `>` suffix
//! │█> Contrast ██████████████│█│  <- selected row: inverted bar + `>` marker
//! │   A very long entry na..   │ │  <- clipped with `..`
//! │ . . . . . . . . . . . . .  │ │  <- dotted filler under the last entry
//! ├────────────────────────────┴─┤
//! │ 1/2                   2/7    │
//! └──────────────────────────────┘
//! ```
//!
//! [`MenuFrame::capture`] copies everything a frame needs out of the tree and the
//! navigation state, so drawing never borrows either.

use embedded_graphics::{mono_font::MonoTextStyle, pixelcolor::Rgb565, prelude::*, text::Text};

use crate::config::DisplayProfile;
use crate::navigation::NavigationController;
use crate::styles::{CENTERED, RIGHT_TEXT, ROW_TEXT, mono_font};
use crate::tree::MenuTree;
use crate::widgets::popups::draw_invoke_popup;
use crate::widgets::primitives::{draw_dotted_line, draw_scrollbar, draw_selection_bar};
use crate::widgets::status_bar::draw_status_bar;

/// Width of the scrollbar column.
const SCROLLBAR_WIDTH: u32 = 3;

/// Columns taken by the `> ` marker.
const MARKER_COLUMNS: usize = 2;

/// Columns taken by the submenu suffix.
const SUFFIX_COLUMNS: usize = 2;

/// Dot spacing of the filler line.
const FILLER_STEP: u32 = 3;

// =============================================================================
// Frame Capture
// =============================================================================

/// One on-screen entry.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct MenuRow {
    pub label: String,
    pub submenu: bool,
    pub selected: bool,
}

/// Everything needed to paint one frame.
#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub struct MenuFrame {
    pub rows: Vec<MenuRow>,
    pub view_start: usize,
    pub page_index: usize,
    pub page_count: usize,
    pub cursor: usize,
    pub total: usize,
    pub capacity: usize,
    /// Callback to announce in a popup.
    pub popup: Option<String>,
}

impl MenuFrame {
    pub fn capture(
        tree: &MenuTree,
        nav: &NavigationController,
    ) -> Self {
        let window = nav.visible_window(tree);
        let rows = window
            .items
            .iter()
            .enumerate()
            .filter_map(|(offset, id)| {
                let node = tree.get(*id)?;
                Some(MenuRow {
                    label: node.name().to_owned(),
                    submenu: !node.is_exec(),
                    selected: window.cursor_offset == Some(offset),
                })
            })
            .collect();

        Self {
            rows,
            view_start: window.view_start,
            page_index: window.page_index,
            page_count: window.page_count,
            cursor: window.cursor,
            total: window.total,
            capacity: nav.capacity(),
            popup: None,
        }
    }

    #[must_use]
    pub fn with_popup(
        mut self,
        callback: impl Into<String>,
    ) -> Self {
        self.popup = Some(callback.into());
        self
    }
}

// =============================================================================
// Text Fitting
// =============================================================================

/// Character columns available for text in a `width`-pixel row.
pub fn text_columns(
    width: u32,
    char_width: u32,
) -> usize {
    if char_width == 0 {
        return 0;
    }
    (width / char_width) as usize
}

/// Clip `label` to `max_chars`, ending in `..` when it does not fit.
pub fn fit_label(
    label: &str,
    max_chars: usize,
) -> String {
    let count = label.chars().count();
    if count <= max_chars {
        return label.to_owned();
    }
    if max_chars <= 2 {
        return ".".repeat(max_chars);
    }
    let mut clipped: String = label.chars().take(max_chars - 2).collect();
    clipped.push_str("..");
    clipped
}

// =============================================================================
// Drawing
// =============================================================================

/// Paint a full frame: background, rows, scrollbar, status bar and popup.
pub fn draw_menu<D>(
    display: &mut D,
    profile: &DisplayProfile,
    family: &str,
    frame: &MenuFrame,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let theme = &profile.theme;
    display.clear(theme.background).ok();

    let font = mono_font(family, profile.font_px);
    let line_height = profile.line_height();
    let char_width = font.character_size.width + font.character_spacing;
    let list_height = profile.height.saturating_sub(profile.reserved_height());
    let paginated = frame.page_count > 1;
    let text_width = if paginated {
        profile.width.saturating_sub(SCROLLBAR_WIDTH + 1)
    } else {
        profile.width
    };
    let columns = text_columns(text_width, char_width);
    // Vertical centering of the glyph cell inside the line.
    let text_dy = (line_height.saturating_sub(font.character_size.height) / 2) as i32;

    if frame.rows.is_empty() {
        let center = Point::new((profile.width / 2) as i32, (list_height / 2) as i32);
        Text::with_text_style("(empty)", center, MonoTextStyle::new(font, theme.muted), CENTERED)
            .draw(display)
            .ok();
    }

    for (idx, row) in frame.rows.iter().enumerate() {
        let y = (idx as u32 * line_height) as i32;
        let color = if row.selected {
            draw_selection_bar(display, y, text_width, line_height, theme.highlight);
            theme.highlight_text
        } else {
            theme.foreground
        };
        let style = MonoTextStyle::new(font, color);

        let marker = if row.selected { "> " } else { "  " };
        let suffix_columns = if row.submenu { SUFFIX_COLUMNS } else { 0 };
        let room = columns.saturating_sub(MARKER_COLUMNS + suffix_columns);
        let mut text = String::from(marker);
        text.push_str(&fit_label(&row.label, room));
        Text::with_text_style(&text, Point::new(0, y + text_dy), style, ROW_TEXT)
            .draw(display)
            .ok();

        if row.submenu {
            Text::with_text_style(">", Point::new(text_width as i32 - 1, y + text_dy), style, RIGHT_TEXT)
                .draw(display)
                .ok();
        }
    }

    let used = frame.rows.len() as u32 * line_height;
    if !frame.rows.is_empty() && used + line_height <= list_height {
        let y = (used + line_height / 2) as i32;
        draw_dotted_line(display, y, 0, text_width as i32, FILLER_STEP, theme.muted);
    }

    if paginated {
        draw_scrollbar(
            display,
            (profile.width - SCROLLBAR_WIDTH) as i32,
            0,
            SCROLLBAR_WIDTH,
            list_height,
            frame.total,
            frame.view_start,
            frame.capacity,
            theme.muted,
            theme.foreground,
        );
    }

    if profile.status_bar {
        draw_status_bar(
            display,
            profile.width,
            profile.height,
            frame.page_index,
            frame.page_count,
            frame.cursor,
            frame.total,
            theme,
        );
    }

    if let Some(callback) = &frame.popup {
        draw_invoke_popup(display, profile.width, profile.height, callback, theme);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! Sticky-window scroller.
//!
//! Decides which slice of a sibling list is on screen. The window only moves when
//! the cursor would otherwise leave it, and then only by the minimum amount:
//!
//! ```text
//! capacity = 3, total = 10
//!
//! cursor 0..=2  -> [0 1 2] 3 4 5 ...
//! cursor 3      ->  0 [1 2 3] 4 5 ...   (edge-triggered, one step)
//! cursor 2      ->  0 [1 2 3] 4 5 ...   (inside window, no scroll)
//! cursor 0      -> [0 1 2] 3 4 5 ...
//! ```
//!
//! `page_index` is for display only ("page 2/4"); navigation never reads it.

// =============================================================================
// Viewport
// =============================================================================

/// First visible index and the page it falls on.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct Viewport {
    pub view_start: usize,
    pub page_index: usize,
}

/// Recompute the visible window for a cursor move.
///
/// A `capacity` of 0 is treated as 1.
pub fn scroll(
    total: usize,
    capacity: usize,
    cursor: usize,
    previous_start: usize,
) -> Viewport {
    let capacity = capacity.max(1);
    if total <= capacity {
        return Viewport::default();
    }

    let mut view_start = previous_start;
    if cursor < previous_start {
        view_start = cursor;
    } else if cursor >= previous_start + capacity {
        view_start = cursor + 1 - capacity;
    }
    let view_start = view_start.min(total - capacity);

    Viewport {
        view_start,
        page_index: view_start / capacity,
    }
}

/// Number of pages for display, at least 1.
#[inline]
pub const fn page_count(
    total: usize,
    capacity: usize,
) -> usize {
    let capacity = if capacity == 0 { 1 } else { capacity };
    if total == 0 { 1 } else { total.div_ceil(capacity) }
}

/// Lines that fit between the top of the display and the reserved chrome.
///
/// `floor((display_height - reserved_height) / line_height)`, never less than 1.
pub const fn capacity(
    display_height: u32,
    reserved_height: u32,
    line_height: u32,
) -> usize {
    if line_height == 0 {
        return 1;
    }
    let usable = display_height.saturating_sub(reserved_height);
    let lines = (usable / line_height) as usize;
    if lines == 0 { 1 } else { lines }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_list_never_scrolls() {
        assert_eq!(scroll(3, 5, 2, 0), Viewport::default());
        assert_eq!(scroll(5, 5, 4, 3), Viewport::default());
        assert_eq!(scroll(0, 5, 0, 0), Viewport::default());
    }

    #[test]
    fn test_window_holds_while_cursor_inside() {
        let vp = scroll(10, 3, 4, 3);
        assert_eq!(vp.view_start, 3);
        let vp = scroll(10, 3, 5, 3);
        assert_eq!(vp.view_start, 3);
    }

    #[test]
    fn test_edge_triggered_scroll() {
        // Down past the bottom edge moves by one
        assert_eq!(scroll(10, 3, 6, 3).view_start, 4);
        // Up past the top edge reveals the cursor line
        assert_eq!(scroll(10, 3, 2, 3).view_start, 2);
    }

    #[test]
    fn test_clamped_to_last_full_window() {
        // A stale start far beyond the end is pulled back
        assert_eq!(scroll(10, 3, 9, 20).view_start, 7);
        assert_eq!(scroll(10, 3, 9, 0).view_start, 7);
    }

    #[test]
    fn test_stepping_down_five_times() {
        let mut start = 0;
        for cursor in 1..=5 {
            start = scroll(10, 3, cursor, start).view_start;
        }
        assert_eq!(start, 3);
    }

    #[test]
    fn test_cursor_always_inside_window() {
        for total in 1..=12 {
            for capacity in 1..=6 {
                for previous in 0..=total {
                    for cursor in 0..total {
                        let vp = scroll(total, capacity, cursor, previous);
                        assert!(vp.view_start <= cursor, "t={total} c={capacity} p={previous} k={cursor}");
                        assert!(cursor < vp.view_start + capacity);
                        assert!(vp.view_start <= total.saturating_sub(capacity));
                        assert_eq!(vp.page_index, vp.view_start / capacity);
                    }
                }
            }
        }
    }

    #[test]
    fn test_zero_capacity_treated_as_one() {
        let vp = scroll(4, 0, 2, 0);
        assert_eq!(vp.view_start, 2);
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 3), 1);
        assert_eq!(page_count(3, 3), 1);
        assert_eq!(page_count(10, 3), 4);
        assert_eq!(page_count(10, 0), 10);
    }

    #[test]
    fn test_capacity() {
        // 128x64 OLED, 8px font + 2px spacing, no chrome
        assert_eq!(capacity(64, 0, 10), 6);
        // Same with a one-line status bar
        assert_eq!(capacity(64, 10, 10), 5);
        // Floor of one line
        assert_eq!(capacity(8, 10, 10), 1);
        assert_eq!(capacity(64, 0, 0), 1);
    }
}

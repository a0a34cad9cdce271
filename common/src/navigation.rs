//! Menu navigation state machine.
//!
//! Four discrete inputs drive the state `(current submenu, cursor)`:
//!
//! | Input | Effect |
//! |-------|--------|
//! | `Up` | cursor - 1, stops at 0 |
//! | `Down` | cursor + 1, stops at the last visible entry |
//! | `Enter` / `Right` | executable entry: report its callback; submenu: descend, cursor 0 |
//! | `Back` / `Left` | remember cursor on the submenu, ascend, cursor on the submenu we left |
//!
//! Every transition finishes by re-running [`viewport::scroll`]. The controller never
//! chooses `view_start` itself. All transitions are total: empty lists, stale node
//! handles and out-of-range cursors resolve to no-ops and clamps.

use tracing::debug;

use crate::tree::{MenuTree, NodeId};
use crate::viewport::{self, Viewport};

// =============================================================================
// Commands and Outcomes
// =============================================================================

/// Discrete directional input.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NavCommand {
    Up,
    Down,
    /// Also bound to `Right`.
    Enter,
    /// Also bound to `Left`.
    Back,
}

impl NavCommand {
    pub const RIGHT: Self = Self::Enter;
    pub const LEFT: Self = Self::Back;

    /// Parse a key name (`up`, `down`, `enter`, `right`, `back`, `left`), case-insensitive.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "up" | "u" => Some(Self::Up),
            "down" | "d" => Some(Self::Down),
            "enter" | "right" | "ok" | "e" | "r" => Some(Self::Enter),
            "back" | "left" | "esc" | "b" | "l" => Some(Self::Back),
            _ => None,
        }
    }
}

/// What a transition did. Everything except [`NavOutcome::Unchanged`] needs a redraw.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum NavOutcome {
    /// Boundary, empty list, or non-executable leaf.
    Unchanged,
    /// Cursor moved within the current submenu.
    Moved,
    /// Descended into the given submenu.
    Entered(NodeId),
    /// Returned to the given parent.
    Returned(NodeId),
    /// An executable entry was activated. The caller runs the side effect.
    Invoke { node: NodeId, callback: String },
}

impl NavOutcome {
    #[inline]
    pub const fn needs_redraw(&self) -> bool { !matches!(self, Self::Unchanged) }
}

// =============================================================================
// Visible Window
// =============================================================================

/// The slice of the current submenu that is on screen.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct VisibleWindow {
    /// On-screen entries, top to bottom.
    pub items: Vec<NodeId>,
    /// Cursor position within `items`, `None` when the submenu is empty.
    pub cursor_offset: Option<usize>,
    /// Cursor position within the whole visible sibling list.
    pub cursor: usize,
    pub view_start: usize,
    pub page_index: usize,
    pub page_count: usize,
    /// Number of visible siblings.
    pub total: usize,
}

// =============================================================================
// Navigation Controller
// =============================================================================

/// Cursor and scroll state over a [`MenuTree`].
///
/// `current` is a non-owning handle; the tree may drop the node underneath it,
/// in which case the next transition falls back to the root.
#[derive(Clone, Debug)]
pub struct NavigationController {
    current: NodeId,
    cursor: usize,
    view_start: usize,
    capacity: usize,
}

impl NavigationController {
    /// Start at the root with the cursor on the first entry.
    pub fn new(
        tree: &MenuTree,
        capacity: usize,
    ) -> Self {
        Self {
            current: tree.root(),
            cursor: 0,
            view_start: 0,
            capacity: capacity.max(1),
        }
    }

    #[inline]
    pub const fn current(&self) -> NodeId { self.current }

    #[inline]
    pub const fn cursor(&self) -> usize { self.cursor }

    #[inline]
    pub const fn view_start(&self) -> usize { self.view_start }

    #[inline]
    pub const fn capacity(&self) -> usize { self.capacity }

    /// Change the number of visible lines (font size or chrome changed).
    pub fn set_capacity(
        &mut self,
        tree: &MenuTree,
        capacity: usize,
    ) {
        self.capacity = capacity.max(1);
        self.sync(tree);
    }

    /// Return to the root with the cursor on the first entry.
    pub fn reset(
        &mut self,
        tree: &MenuTree,
    ) {
        self.current = tree.root();
        self.cursor = 0;
        self.view_start = 0;
        self.rescroll(tree);
    }

    /// Repair state after the tree was edited.
    ///
    /// A current submenu that no longer exists falls back to the root; the cursor is
    /// clamped to the visible list.
    pub fn sync(
        &mut self,
        tree: &MenuTree,
    ) {
        if !tree.contains(self.current) {
            debug!(stale = %self.current, "current submenu removed, falling back to root");
            self.current = tree.root();
            self.cursor = 0;
            self.view_start = 0;
        }
        let total = tree.visible_children(self.current).len();
        self.cursor = self.cursor.min(total.saturating_sub(1));
        self.rescroll(tree);
    }

    /// Entry under the cursor, if the current submenu has any visible entries.
    pub fn selected(
        &self,
        tree: &MenuTree,
    ) -> Option<NodeId> {
        tree.visible_children(self.current).get(self.cursor).copied()
    }

    /// Apply one input and return what happened.
    pub fn apply(
        &mut self,
        tree: &mut MenuTree,
        command: NavCommand,
    ) -> NavOutcome {
        self.sync(tree);
        let visible = tree.visible_children(self.current);

        let outcome = match command {
            NavCommand::Up => {
                let next = self.cursor.saturating_sub(1);
                self.move_cursor(next)
            }
            NavCommand::Down => {
                let next = (self.cursor + 1).min(visible.len().saturating_sub(1));
                self.move_cursor(next)
            }
            NavCommand::Enter => self.enter(tree, &visible),
            NavCommand::Back => self.back(tree),
        };

        self.rescroll(tree);
        debug!(?command, ?outcome, current = %self.current, cursor = self.cursor, "navigation");
        outcome
    }

    fn move_cursor(
        &mut self,
        next: usize,
    ) -> NavOutcome {
        if next == self.cursor {
            return NavOutcome::Unchanged;
        }
        self.cursor = next;
        NavOutcome::Moved
    }

    fn enter(
        &mut self,
        tree: &MenuTree,
        visible: &[NodeId],
    ) -> NavOutcome {
        let Some(selected) = visible.get(self.cursor).copied() else {
            return NavOutcome::Unchanged;
        };
        let Some(node) = tree.get(selected) else {
            return NavOutcome::Unchanged;
        };

        if node.is_exec() {
            if node.callback_name().is_empty() {
                return NavOutcome::Unchanged;
            }
            return NavOutcome::Invoke {
                node: selected,
                callback: node.callback_name().to_owned(),
            };
        }

        if node.has_children() {
            self.current = selected;
            self.cursor = 0;
            self.view_start = 0;
            return NavOutcome::Entered(selected);
        }

        NavOutcome::Unchanged
    }

    fn back(
        &mut self,
        tree: &mut MenuTree,
    ) -> NavOutcome {
        let left = self.current;
        let Some(parent) = tree.parent(left) else {
            return NavOutcome::Unchanged;
        };

        tree.set_cursor_pos(left, self.cursor);
        self.current = parent;
        self.cursor = tree
            .visible_children(parent)
            .iter()
            .position(|child| *child == left)
            .unwrap_or(0);
        self.view_start = 0;
        NavOutcome::Returned(parent)
    }

    fn rescroll(
        &mut self,
        tree: &MenuTree,
    ) {
        let total = tree.visible_children(self.current).len();
        let Viewport { view_start, .. } = viewport::scroll(total, self.capacity, self.cursor, self.view_start);
        self.view_start = view_start;
    }

    // -------------------------------------------------------------------------
    // Render-facing output
    // -------------------------------------------------------------------------

    /// The on-screen slice of the current submenu.
    pub fn visible_window(
        &self,
        tree: &MenuTree,
    ) -> VisibleWindow {
        let visible = tree.visible_children(self.current);
        let total = visible.len();
        let vp = viewport::scroll(total, self.capacity, self.cursor, self.view_start);
        let end = (vp.view_start + self.capacity).min(total);
        let items = visible.get(vp.view_start..end).map(<[NodeId]>::to_vec).unwrap_or_default();
        let cursor_offset = (total > 0).then(|| self.cursor.saturating_sub(vp.view_start));

        VisibleWindow {
            items,
            cursor_offset,
            cursor: self.cursor,
            view_start: vp.view_start,
            page_index: vp.page_index,
            page_count: viewport::page_count(total, self.capacity),
            total,
        }
    }

    /// Names from the root down to the current submenu.
    pub fn breadcrumb(
        &self,
        tree: &MenuTree,
    ) -> Vec<String> {
        tree.breadcrumb(self.current)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

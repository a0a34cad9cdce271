//! Designer session: one tree, one selection, one navigation state.
//!
//! Edits and navigation arrive as enumerated commands. Each call returns whether the
//! caller should re-render; the session itself never draws.
//!
//! ```text
//! EditCommand ──> MenuTree mutation ──> nav.sync() ──┐
//!                                                    ├──> redraw?
//! NavCommand  ──> NavigationController::apply() ─────┘
//! ```

use tracing::{debug, info};

use crate::navigation::{NavCommand, NavOutcome, NavigationController};
use crate::snapshot::MenuSnapshot;
use crate::tree::{LeafPolicy, MenuNode, MenuTree, NodeId};

// =============================================================================
// Edit Commands
// =============================================================================

/// Tree edit applied to the selected node.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum EditCommand {
    /// Append a new child to the selection and select it.
    AddChild { name: String },
    /// Remove the selection and its subtree; selection moves to the parent.
    Remove,
    Rename { name: String },
    ToggleExec,
    /// Only applies to executable nodes.
    SetCallback { name: String },
    SetVisible(bool),
    /// Re-parent the selection.
    MoveTo { parent: NodeId },
    Select(NodeId),
}

// =============================================================================
// Designer Session
// =============================================================================

pub struct DesignerSession {
    tree: MenuTree,
    nav: NavigationController,
    selected: NodeId,
}

impl DesignerSession {
    pub fn new(
        tree: MenuTree,
        capacity: usize,
    ) -> Self {
        let nav = NavigationController::new(&tree, capacity);
        let selected = tree.root();
        Self { tree, nav, selected }
    }

    /// Start from a persisted snapshot. Ids are fresh.
    pub fn from_snapshot(
        snapshot: &MenuSnapshot,
        policy: LeafPolicy,
        capacity: usize,
    ) -> Self {
        Self::new(MenuTree::from_snapshot(snapshot, policy), capacity)
    }

    #[inline]
    pub const fn tree(&self) -> &MenuTree { &self.tree }

    #[inline]
    pub const fn nav(&self) -> &NavigationController { &self.nav }

    #[inline]
    pub const fn selected(&self) -> NodeId { self.selected }

    /// Replace the whole tree (load). Navigation and selection restart at the root.
    pub fn replace_tree(
        &mut self,
        tree: MenuTree,
    ) {
        info!(nodes = tree.len(), "menu tree replaced");
        self.tree = tree;
        self.selected = self.tree.root();
        self.nav.reset(&self.tree);
    }

    pub fn snapshot(&self) -> MenuSnapshot { self.tree.snapshot() }

    pub fn set_capacity(
        &mut self,
        capacity: usize,
    ) {
        self.nav.set_capacity(&self.tree, capacity);
    }

    /// Feed one navigation input to the preview state machine.
    pub fn navigate(
        &mut self,
        command: NavCommand,
    ) -> NavOutcome {
        self.nav.apply(&mut self.tree, command)
    }

    /// Apply one edit to the selected node. Returns `true` if anything changed.
    pub fn edit(
        &mut self,
        command: EditCommand,
    ) -> bool {
        if !self.tree.contains(self.selected) {
            self.selected = self.tree.root();
        }
        let target = self.selected;

        let changed = match command {
            EditCommand::AddChild { name } => match self.tree.add_child(target, MenuNode::new(name)) {
                Some(id) => {
                    self.selected = id;
                    true
                }
                None => false,
            },
            EditCommand::Remove => match self.tree.remove(target) {
                Some(parent) => {
                    self.selected = parent;
                    true
                }
                None => false,
            },
            EditCommand::Rename { name } => self.tree.rename(target, name),
            EditCommand::ToggleExec => self.tree.toggle_exec(target).is_some(),
            EditCommand::SetCallback { name } => self.tree.set_callback_name(target, name),
            EditCommand::SetVisible(visible) => self.tree.set_visible(target, visible),
            EditCommand::MoveTo { parent } => self.tree.move_node(target, parent),
            EditCommand::Select(id) => {
                let known = self.tree.contains(id);
                if known {
                    self.selected = id;
                }
                known
            }
        };

        if changed {
            self.nav.sync(&self.tree);
        } else {
            debug!(node = %target, "edit rejected");
        }
        changed
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! Menu tree model.
//!
//! Nodes live in an arena keyed by [`NodeId`]. Ownership flows strictly downward
//! through each node's ordered `children` list; `parent` is a plain back-reference
//! used for upward traversal only.
//!
//! # Leaf Normalization
//!
//! Under [`LeafPolicy::AutoNormalize`] every structural mutation re-runs a sweep over
//! the mutated subtree so that childless nodes are executable and nodes with children
//! are containers:
//!
//! ```text
//! root (container)
//! ├── Settings (container)
//! │   └── Contrast (exec)
//! └── About (exec)
//! ```
//!
//! [`MenuTree::toggle_exec`] flips the flag and then runs the same sweep, so under
//! auto-normalization the toggle never sticks. [`LeafPolicy::Manual`] turns the sweep
//! off entirely and leaves `is_exec` to explicit toggles.

use core::fmt;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};

use tracing::debug;

/// Source of process-unique node ids. Never reset, so ids are never reused.
static NEXT_ID: AtomicU32 = AtomicU32::new(1);

// =============================================================================
// Node Identity
// =============================================================================

/// Process-unique node identifier, assigned monotonically at creation time.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NodeId(u32);

impl NodeId {
    fn next() -> Self { Self(NEXT_ID.fetch_add(1, Ordering::Relaxed)) }

    /// Raw numeric value, used for synthesized C identifiers.
    #[inline]
    pub const fn get(self) -> u32 { self.0 }
}

impl fmt::Display for NodeId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How `is_exec` is maintained across structural mutations.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub enum LeafPolicy {
    /// Childless nodes are executable, nodes with children are containers.
    /// Applied after add, remove, move and toggle.
    #[default]
    AutoNormalize,
    /// No sweep. `is_exec` only changes through [`MenuTree::toggle_exec`].
    Manual,
}

// =============================================================================
// Menu Node
// =============================================================================

/// One entry in the menu hierarchy.
#[derive(Clone, Debug)]
pub struct MenuNode {
    id: NodeId,
    name: String,
    is_exec: bool,
    visible: bool,
    callback_name: String,
    cursor_pos: usize,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl MenuNode {
    /// Create a detached, visible, executable node with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: NodeId::next(),
            name: name.into(),
            is_exec: true,
            visible: true,
            callback_name: String::new(),
            cursor_pos: 0,
            children: Vec::new(),
            parent: None,
        }
    }

    /// Set the callback identifier used by the C exporter.
    #[must_use]
    pub fn with_callback(
        mut self,
        callback_name: impl Into<String>,
    ) -> Self {
        self.callback_name = callback_name.into();
        self
    }

    /// Set the initial visibility.
    #[must_use]
    pub fn with_visible(
        mut self,
        visible: bool,
    ) -> Self {
        self.visible = visible;
        self
    }

    /// Set the initial executable flag (kept only under [`LeafPolicy::Manual`]).
    #[must_use]
    pub fn with_exec(
        mut self,
        is_exec: bool,
    ) -> Self {
        self.is_exec = is_exec;
        self
    }

    /// Set the remembered cursor position.
    #[must_use]
    pub fn with_cursor_pos(
        mut self,
        cursor_pos: usize,
    ) -> Self {
        self.cursor_pos = cursor_pos;
        self
    }

    #[inline]
    pub const fn id(&self) -> NodeId { self.id }

    #[inline]
    pub fn name(&self) -> &str { &self.name }

    #[inline]
    pub const fn is_exec(&self) -> bool { self.is_exec }

    #[inline]
    pub const fn is_visible(&self) -> bool { self.visible }

    #[inline]
    pub fn callback_name(&self) -> &str { &self.callback_name }

    /// Cursor index the user last had while this node was the active submenu.
    #[inline]
    pub const fn cursor_pos(&self) -> usize { self.cursor_pos }

    /// Raw children in insertion order, hidden ones included.
    #[inline]
    pub fn children(&self) -> &[NodeId] { &self.children }

    #[inline]
    pub const fn parent(&self) -> Option<NodeId> { self.parent }

    #[inline]
    pub fn has_children(&self) -> bool { !self.children.is_empty() }
}

// =============================================================================
// Menu Tree
// =============================================================================

/// Owner of every node reachable from the root.
#[derive(Clone, Debug)]
pub struct MenuTree {
    nodes: BTreeMap<NodeId, MenuNode>,
    root: NodeId,
    policy: LeafPolicy,
}

impl MenuTree {
    /// Create a tree holding only a root node, using auto-normalization.
    pub fn new(root_name: impl Into<String>) -> Self { Self::with_policy(root_name, LeafPolicy::AutoNormalize) }

    /// Create a tree holding only a root node.
    pub fn with_policy(
        root_name: impl Into<String>,
        policy: LeafPolicy,
    ) -> Self {
        Self::from_root(MenuNode::new(root_name), policy)
    }

    /// Create a tree from a detached root node.
    pub fn from_root(
        mut root: MenuNode,
        policy: LeafPolicy,
    ) -> Self {
        root.parent = None;
        root.children.clear();
        let root_id = root.id;
        let mut nodes = BTreeMap::new();
        nodes.insert(root_id, root);
        let mut tree = Self {
            nodes,
            root: root_id,
            policy,
        };
        tree.normalize_from(root_id);
        tree
    }

    #[inline]
    pub const fn root(&self) -> NodeId { self.root }

    #[inline]
    pub const fn policy(&self) -> LeafPolicy { self.policy }

    /// Switch the leaf policy. Switching to auto-normalization sweeps the whole tree.
    pub fn set_policy(
        &mut self,
        policy: LeafPolicy,
    ) {
        self.policy = policy;
        self.normalize_from(self.root);
    }

    /// Number of nodes, root included.
    #[inline]
    pub fn len(&self) -> usize { self.nodes.len() }

    /// A tree always has a root, so this is only true for a root-only tree.
    #[inline]
    pub fn is_empty(&self) -> bool { self.nodes.len() == 1 }

    #[inline]
    pub fn contains(
        &self,
        id: NodeId,
    ) -> bool {
        self.nodes.contains_key(&id)
    }

    #[inline]
    pub fn get(
        &self,
        id: NodeId,
    ) -> Option<&MenuNode> {
        self.nodes.get(&id)
    }

    #[inline]
    pub fn parent(
        &self,
        id: NodeId,
    ) -> Option<NodeId> {
        self.nodes.get(&id).and_then(MenuNode::parent)
    }

    /// Raw children in insertion order. Empty for unknown ids.
    pub fn children(
        &self,
        id: NodeId,
    ) -> &[NodeId] {
        match self.nodes.get(&id) {
            Some(node) => &node.children,
            None => &[],
        }
    }

    /// Ordered children with `visible == true`.
    ///
    /// Every display-facing component paginates and navigates over this list.
    pub fn visible_children(
        &self,
        id: NodeId,
    ) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|child| self.nodes.get(child).is_some_and(MenuNode::is_visible))
            .collect()
    }

    /// Display name, or an empty string for unknown ids.
    pub fn name(
        &self,
        id: NodeId,
    ) -> &str {
        self.nodes.get(&id).map_or("", MenuNode::name)
    }

    // -------------------------------------------------------------------------
    // Structural mutation
    // -------------------------------------------------------------------------

    /// Append `node` to `parent`'s children and return its id.
    ///
    /// Returns `None` if `parent` is not in this tree.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        node: MenuNode,
    ) -> Option<NodeId> {
        let id = self.attach(parent, node)?;
        self.normalize_from(parent);
        debug!(parent = %parent, child = %id, "menu node added");
        Some(id)
    }

    /// Attach without normalizing. Used while rebuilding from a snapshot.
    ///
    /// A node whose id is already in the tree (a clone of a live node) is attached
    /// under a fresh id.
    pub(crate) fn attach(
        &mut self,
        parent: NodeId,
        mut node: MenuNode,
    ) -> Option<NodeId> {
        if !self.nodes.contains_key(&parent) {
            return None;
        }
        if self.nodes.contains_key(&node.id) {
            node.id = NodeId::next();
        }
        let id = node.id;
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.insert(id, node);
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(id);
        }
        Some(id)
    }

    /// Remove `id` and its whole subtree.
    ///
    /// Returns the former parent, which is where selection should move. Removing the
    /// root (or an unknown id) is a no-op returning `None`.
    pub fn remove(
        &mut self,
        id: NodeId,
    ) -> Option<NodeId> {
        let parent = self.parent(id)?;
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.retain(|child| *child != id);
        }
        let removed = self.subtree(id);
        for node in &removed {
            self.nodes.remove(node);
        }
        self.normalize_from(parent);
        debug!(node = %id, parent = %parent, removed = removed.len(), "menu subtree removed");
        Some(parent)
    }

    /// Re-parent `id` under `new_parent`, appending it to the new sibling list.
    ///
    /// Rejects moving the root, moving a node into its own subtree, and unknown ids.
    pub fn move_node(
        &mut self,
        id: NodeId,
        new_parent: NodeId,
    ) -> bool {
        let Some(old_parent) = self.parent(id) else {
            return false;
        };
        if !self.nodes.contains_key(&new_parent) || self.is_ancestor_or_self(id, new_parent) {
            return false;
        }
        if let Some(p) = self.nodes.get_mut(&old_parent) {
            p.children.retain(|child| *child != id);
        }
        if let Some(p) = self.nodes.get_mut(&new_parent) {
            p.children.push(id);
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = Some(new_parent);
        }
        self.normalize_from(old_parent);
        self.normalize_from(new_parent);
        debug!(node = %id, from = %old_parent, to = %new_parent, "menu node moved");
        true
    }

    // -------------------------------------------------------------------------
    // Attribute mutation
    // -------------------------------------------------------------------------

    pub fn rename(
        &mut self,
        id: NodeId,
        name: impl Into<String>,
    ) -> bool {
        self.nodes.get_mut(&id).map(|node| node.name = name.into()).is_some()
    }

    pub fn set_visible(
        &mut self,
        id: NodeId,
        visible: bool,
    ) -> bool {
        self.nodes.get_mut(&id).map(|node| node.visible = visible).is_some()
    }

    /// Set the callback identifier. Only executable nodes carry callbacks.
    pub fn set_callback_name(
        &mut self,
        id: NodeId,
        callback_name: impl Into<String>,
    ) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) if node.is_exec => {
                node.callback_name = callback_name.into();
                true
            }
            _ => false,
        }
    }

    pub fn set_cursor_pos(
        &mut self,
        id: NodeId,
        cursor_pos: usize,
    ) -> bool {
        self.nodes.get_mut(&id).map(|node| node.cursor_pos = cursor_pos).is_some()
    }

    /// Flip `is_exec`, then re-run the leaf sweep starting at `id`.
    ///
    /// Under [`LeafPolicy::AutoNormalize`] the sweep restores the flag, so the toggle
    /// is immediately undone. Returns the resulting flag.
    pub fn toggle_exec(
        &mut self,
        id: NodeId,
    ) -> Option<bool> {
        let node = self.nodes.get_mut(&id)?;
        let requested = !node.is_exec;
        node.is_exec = requested;
        self.normalize_from(id);
        let result = self.nodes.get(&id).map(MenuNode::is_exec)?;
        if result != requested {
            debug!(node = %id, "exec toggle overridden by leaf normalization");
        }
        Some(result)
    }

    // -------------------------------------------------------------------------
    // Traversal
    // -------------------------------------------------------------------------

    /// Pre-order walk of the whole tree, root first, siblings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &MenuNode> + '_ {
        self.subtree(self.root).into_iter().filter_map(|id| self.nodes.get(&id))
    }

    /// Pre-order ids of `id` and its descendants.
    pub fn subtree(
        &self,
        id: NodeId,
    ) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.nodes.contains_key(&id) {
            return out;
        }
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Ids from the root down to `id`, inclusive. Empty for unknown ids.
    pub fn path(
        &self,
        id: NodeId,
    ) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut cursor = self.nodes.contains_key(&id).then_some(id);
        while let Some(node) = cursor {
            path.push(node);
            cursor = self.parent(node);
        }
        path.reverse();
        path
    }

    /// Names from the root down to `id`, inclusive.
    pub fn breadcrumb(
        &self,
        id: NodeId,
    ) -> Vec<String> {
        self.path(id).into_iter().map(|node| self.name(node).to_owned()).collect()
    }

    /// Number of edges between the root and `id`.
    pub fn depth(
        &self,
        id: NodeId,
    ) -> usize {
        self.path(id).len().saturating_sub(1)
    }

    /// Deepest level reachable through visible nodes (root-only tree is 0).
    pub fn max_visible_depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            for child in self.visible_children(id) {
                stack.push((child, depth + 1));
            }
        }
        deepest
    }

    /// Visible nodes below the root in pre-order. Hidden subtrees are skipped whole.
    pub fn visible_descendants(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.visible_children(self.root).into_iter().rev().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.visible_children(id).into_iter().rev());
        }
        out
    }

    /// True if `ancestor` is `id` itself or lies on the path from the root to `id`.
    pub fn is_ancestor_or_self(
        &self,
        ancestor: NodeId,
        id: NodeId,
    ) -> bool {
        self.path(id).contains(&ancestor)
    }

    // -------------------------------------------------------------------------
    // Leaf normalization
    // -------------------------------------------------------------------------

    /// Sweep `id` and its descendants under the current policy.
    fn normalize_from(
        &mut self,
        id: NodeId,
    ) {
        if self.policy == LeafPolicy::Manual {
            return;
        }
        for node in self.subtree(id) {
            if let Some(entry) = self.nodes.get_mut(&node) {
                entry.is_exec = entry.children.is_empty();
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_leaf_invariant(tree: &MenuTree) {
        for node in tree.iter() {
            assert_eq!(
                node.is_exec(),
                !node.has_children(),
                "node {} ({}) breaks the leaf invariant",
                node.id(),
                node.name()
            );
        }
    }

    #[test]
    fn test_ids_are_monotonic() {
        let a = MenuNode::new("a");
        let b = MenuNode::new("b");
        assert!(b.id().get() > a.id().get());
    }

    #[test]
    fn test_add_child_normalizes_parent() {
        let mut tree = MenuTree::new("root");
        let root = tree.root();
        assert!(tree.get(root).unwrap().is_exec());

        let settings = tree.add_child(root, MenuNode::new("Settings")).unwrap();
        assert!(!tree.get(root).unwrap().is_exec());
        assert!(tree.get(settings).unwrap().is_exec());

        tree.add_child(settings, MenuNode::new("Contrast")).unwrap();
        assert!(!tree.get(settings).unwrap().is_exec());
        assert_eq!(tree.parent(settings), Some(root));
        assert_leaf_invariant(&tree);
    }

    #[test]
    fn test_add_cloned_node_gets_fresh_id() {
        let mut tree = MenuTree::new("root");
        let root = tree.root();
        let a = tree.add_child(root, MenuNode::new("A")).unwrap();
        let a1 = tree.add_child(a, MenuNode::new("A1")).unwrap();

        let clone = tree.get(a).cloned().unwrap();
        let copy = tree.add_child(root, clone).unwrap();
        assert_ne!(copy, a);
        assert_eq!(tree.children(root), &[a, copy]);
        assert_eq!(tree.children(a), &[a1]);
        assert_eq!(tree.parent(a1), Some(a));
        assert!(tree.children(copy).is_empty());
        assert_eq!(tree.name(copy), "A");
        assert_eq!(tree.len(), 4);
        assert_leaf_invariant(&tree);
    }

    #[test]
    fn test_visible_descendants_skip_hidden_subtrees() {
        let mut tree = MenuTree::new("root");
        let root = tree.root();
        let a = tree.add_child(root, MenuNode::new("A")).unwrap();
        let a1 = tree.add_child(a, MenuNode::new("A1")).unwrap();
        let b = tree.add_child(root, MenuNode::new("B")).unwrap();
        tree.add_child(b, MenuNode::new("B1")).unwrap();
        let c = tree.add_child(root, MenuNode::new("C")).unwrap();
        tree.set_visible(b, false);

        assert_eq!(tree.visible_descendants(), vec![a, a1, c]);
    }

    #[test]
    fn test_add_child_unknown_parent() {
        let mut tree = MenuTree::new("root");
        let other = MenuTree::new("other");
        assert!(tree.add_child(other.root(), MenuNode::new("x")).is_none());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_invariant_after_add_remove_sequence() {
        let mut tree = MenuTree::new("root");
        let root = tree.root();
        let a = tree.add_child(root, MenuNode::new("A")).unwrap();
        let b = tree.add_child(root, MenuNode::new("B")).unwrap();
        let a1 = tree.add_child(a, MenuNode::new("A1")).unwrap();
        let a2 = tree.add_child(a, MenuNode::new("A2")).unwrap();
        tree.add_child(a1, MenuNode::new("A1x")).unwrap();
        assert_leaf_invariant(&tree);

        assert_eq!(tree.remove(a2), Some(a));
        assert_leaf_invariant(&tree);

        // Removing the last child turns the parent back into a leaf
        let a1x = tree.children(a1)[0];
        assert_eq!(tree.remove(a1x), Some(a1));
        assert!(tree.get(a1).unwrap().is_exec());
        assert_leaf_invariant(&tree);

        assert_eq!(tree.remove(a), Some(root));
        assert!(!tree.contains(a1));
        assert_eq!(tree.children(root), &[b]);
        assert_leaf_invariant(&tree);
    }

    #[test]
    fn test_remove_root_is_noop() {
        let mut tree = MenuTree::new("root");
        let root = tree.root();
        tree.add_child(root, MenuNode::new("A")).unwrap();
        assert_eq!(tree.remove(root), None);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_remove_drops_whole_subtree() {
        let mut tree = MenuTree::new("root");
        let a = tree.add_child(tree.root(), MenuNode::new("A")).unwrap();
        let a1 = tree.add_child(a, MenuNode::new("A1")).unwrap();
        let a11 = tree.add_child(a1, MenuNode::new("A11")).unwrap();
        tree.remove(a);
        assert!(!tree.contains(a1));
        assert!(!tree.contains(a11));
        assert_eq!(tree.len(), 1);
        // Stale handles stay harmless
        assert_eq!(tree.remove(a11), None);
        assert!(!tree.rename(a1, "gone"));
    }

    #[test]
    fn test_move_node() {
        let mut tree = MenuTree::new("root");
        let root = tree.root();
        let a = tree.add_child(root, MenuNode::new("A")).unwrap();
        let b = tree.add_child(root, MenuNode::new("B")).unwrap();
        let a1 = tree.add_child(a, MenuNode::new("A1")).unwrap();

        assert!(tree.move_node(a1, b));
        assert_eq!(tree.parent(a1), Some(b));
        assert!(tree.get(a).unwrap().is_exec());
        assert!(!tree.get(b).unwrap().is_exec());
        assert_leaf_invariant(&tree);
    }

    #[test]
    fn test_move_node_rejects_cycles() {
        let mut tree = MenuTree::new("root");
        let root = tree.root();
        let a = tree.add_child(root, MenuNode::new("A")).unwrap();
        let a1 = tree.add_child(a, MenuNode::new("A1")).unwrap();
        assert!(!tree.move_node(a, a1));
        assert!(!tree.move_node(a, a));
        assert!(!tree.move_node(root, a));
        assert_eq!(tree.parent(a1), Some(a));
    }

    #[test]
    fn test_visible_children_filters_and_is_stable() {
        let mut tree = MenuTree::new("root");
        let root = tree.root();
        let a = tree.add_child(root, MenuNode::new("A")).unwrap();
        let b = tree.add_child(root, MenuNode::new("B").with_visible(false)).unwrap();
        let c = tree.add_child(root, MenuNode::new("C")).unwrap();

        let first = tree.visible_children(root);
        let second = tree.visible_children(root);
        assert_eq!(first, vec![a, c]);
        assert_eq!(first, second);

        tree.set_visible(b, true);
        assert_eq!(tree.visible_children(root), vec![a, b, c]);
    }

    #[test]
    fn test_toggle_exec_auto_normalize_is_undone() {
        let mut tree = MenuTree::new("root");
        let root = tree.root();
        let a = tree.add_child(root, MenuNode::new("A")).unwrap();
        tree.add_child(a, MenuNode::new("A1")).unwrap();

        assert_eq!(tree.toggle_exec(a), Some(false));
        assert!(!tree.get(a).unwrap().is_exec());
        let leaf = tree.children(a)[0];
        assert_eq!(tree.toggle_exec(leaf), Some(true));
    }

    #[test]
    fn test_toggle_exec_manual_sticks() {
        let mut tree = MenuTree::with_policy("root", LeafPolicy::Manual);
        let root = tree.root();
        let a = tree.add_child(root, MenuNode::new("A")).unwrap();
        tree.add_child(a, MenuNode::new("A1")).unwrap();

        // Manual policy leaves flags alone on add
        assert!(tree.get(a).unwrap().is_exec());
        assert_eq!(tree.toggle_exec(a), Some(false));
        assert_eq!(tree.toggle_exec(a), Some(true));

        tree.set_policy(LeafPolicy::AutoNormalize);
        assert!(!tree.get(a).unwrap().is_exec());
    }

    #[test]
    fn test_callback_only_on_exec_nodes() {
        let mut tree = MenuTree::new("root");
        let root = tree.root();
        let a = tree.add_child(root, MenuNode::new("A")).unwrap();
        assert!(tree.set_callback_name(a, "on_a"));
        assert_eq!(tree.get(a).unwrap().callback_name(), "on_a");
        assert!(!tree.set_callback_name(root, "on_root"));
    }

    #[test]
    fn test_path_and_depth() {
        let mut tree = MenuTree::new("Main");
        let a = tree.add_child(tree.root(), MenuNode::new("Settings")).unwrap();
        let a1 = tree.add_child(a, MenuNode::new("Display")).unwrap();
        assert_eq!(tree.breadcrumb(a1), vec!["Main", "Settings", "Display"]);
        assert_eq!(tree.depth(a1), 2);
        assert_eq!(tree.depth(tree.root()), 0);
        assert_eq!(tree.max_visible_depth(), 2);
    }

    #[test]
    fn test_iter_is_preorder() {
        let mut tree = MenuTree::new("r");
        let root = tree.root();
        let a = tree.add_child(root, MenuNode::new("a")).unwrap();
        tree.add_child(a, MenuNode::new("a1")).unwrap();
        tree.add_child(root, MenuNode::new("b")).unwrap();
        let names: Vec<&str> = tree.iter().map(MenuNode::name).collect();
        assert_eq!(names, vec!["r", "a", "a1", "b"]);
    }
}

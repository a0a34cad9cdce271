//! Serializable tree shape.
//!
//! A snapshot is the nested record form persisted by the settings layer:
//!
//! ```text
//! { name, is_exec, visible, callback_name, cursor_pos, children: [...] }
//! ```
//!
//! Node ids are not part of the shape. Loading assigns fresh ids.

use serde::{Deserialize, Serialize};

use crate::tree::{LeafPolicy, MenuNode, MenuTree, NodeId};

const fn default_true() -> bool { true }

/// One node of a persisted tree, with its children inline.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct MenuSnapshot {
    pub name: String,
    #[serde(default = "default_true")]
    pub is_exec: bool,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub callback_name: String,
    #[serde(default)]
    pub cursor_pos: usize,
    #[serde(default)]
    pub children: Vec<MenuSnapshot>,
}

impl MenuSnapshot {
    /// A childless, visible record.
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_exec: true,
            visible: true,
            callback_name: String::new(),
            cursor_pos: 0,
            children: Vec::new(),
        }
    }

    fn to_node(&self) -> MenuNode {
        MenuNode::new(self.name.clone())
            .with_exec(self.is_exec)
            .with_visible(self.visible)
            .with_callback(self.callback_name.clone())
            .with_cursor_pos(self.cursor_pos)
    }
}

impl MenuTree {
    /// Capture the tree rooted at the root node.
    pub fn snapshot(&self) -> MenuSnapshot { self.snapshot_of(self.root()) }

    fn snapshot_of(
        &self,
        id: NodeId,
    ) -> MenuSnapshot {
        let Some(node) = self.get(id) else {
            return MenuSnapshot::leaf("");
        };
        MenuSnapshot {
            name: node.name().to_owned(),
            is_exec: node.is_exec(),
            visible: node.is_visible(),
            callback_name: node.callback_name().to_owned(),
            cursor_pos: node.cursor_pos(),
            children: node.children().iter().map(|child| self.snapshot_of(*child)).collect(),
        }
    }

    /// Rebuild a tree from a snapshot, assigning new ids.
    ///
    /// Stored `is_exec` flags survive only under [`LeafPolicy::Manual`]; with
    /// auto-normalization the loaded tree is swept once.
    pub fn from_snapshot(
        snapshot: &MenuSnapshot,
        policy: LeafPolicy,
    ) -> Self {
        let mut tree = Self::from_root(snapshot.to_node(), LeafPolicy::Manual);
        let mut pending: Vec<(NodeId, &MenuSnapshot)> = snapshot
            .children
            .iter()
            .rev()
            .map(|child| (tree.root(), child))
            .collect();
        while let Some((parent, record)) = pending.pop() {
            if let Some(id) = tree.attach(parent, record.to_node()) {
                pending.extend(record.children.iter().rev().map(|child| (id, child)));
            }
        }
        tree.set_policy(policy);
        tree
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MenuTree {
        let mut tree = MenuTree::new("Main");
        let root = tree.root();
        let settings = tree.add_child(root, MenuNode::new("Settings")).unwrap();
        let contrast = tree.add_child(settings, MenuNode::new("Contrast")).unwrap();
        tree.set_callback_name(contrast, "on_contrast");
        tree.add_child(settings, MenuNode::new("Hidden").with_visible(false)).unwrap();
        tree.add_child(root, MenuNode::new("About")).unwrap();
        tree.set_cursor_pos(settings, 1);
        tree
    }

    #[test]
    fn test_snapshot_shape() {
        let snap = sample().snapshot();
        assert_eq!(snap.name, "Main");
        assert!(!snap.is_exec);
        assert_eq!(snap.children.len(), 2);
        let settings = &snap.children[0];
        assert_eq!(settings.cursor_pos, 1);
        assert_eq!(settings.children[0].callback_name, "on_contrast");
        assert!(!settings.children[1].visible);
    }

    #[test]
    fn test_reload_assigns_new_ids_and_keeps_order() {
        let original = sample();
        let reloaded = MenuTree::from_snapshot(&original.snapshot(), LeafPolicy::AutoNormalize);

        assert_ne!(original.root(), reloaded.root());
        assert_eq!(reloaded.len(), original.len());
        let names: Vec<&str> = reloaded.iter().map(MenuNode::name).collect();
        assert_eq!(names, vec!["Main", "Settings", "Contrast", "Hidden", "About"]);
        assert_eq!(reloaded.snapshot(), original.snapshot());
    }

    #[test]
    fn test_load_normalizes_stale_exec_flags() {
        let mut snap = MenuSnapshot::leaf("root");
        let mut parent = MenuSnapshot::leaf("Parent");
        parent.children.push(MenuSnapshot::leaf("Child"));
        snap.children.push(parent);

        let auto = MenuTree::from_snapshot(&snap, LeafPolicy::AutoNormalize);
        let parent_id = auto.children(auto.root())[0];
        assert!(!auto.get(parent_id).unwrap().is_exec());

        let manual = MenuTree::from_snapshot(&snap, LeafPolicy::Manual);
        let parent_id = manual.children(manual.root())[0];
        assert!(manual.get(parent_id).unwrap().is_exec());
    }

    #[test]
    fn test_json_defaults() {
        let json = r#"{ "name": "root", "children": [ { "name": "A" } ] }"#;
        let snap: MenuSnapshot = serde_json::from_str(json).unwrap();
        assert!(snap.visible);
        assert_eq!(snap.children[0].callback_name, "");
        let tree = MenuTree::from_snapshot(&snap, LeafPolicy::AutoNormalize);
        assert_eq!(tree.len(), 2);
    }
}

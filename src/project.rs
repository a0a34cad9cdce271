//! Menu project files: one JSON tree snapshot per file.
//!
//! ```json
//! {"name": "Main", "is_exec": false, "visible": true, "callback_name": "",
//!  "cursor_pos": 0, "children": [ ... ]}
//! ```
//!
//! Ids are not stored; loading assigns fresh ones.

use core::fmt::Write;
use std::fs;
use std::path::Path;

use menu_common::snapshot::MenuSnapshot;
use menu_common::{LeafPolicy, MenuNode, MenuTree};
use tracing::{debug, info};

use crate::codegen::ident::callback_symbol;
use crate::error::{DesignerError, Result};

pub fn read_snapshot(path: &Path) -> Result<MenuSnapshot> {
    let text = fs::read_to_string(path).map_err(|source| DesignerError::io(path, source))?;
    serde_json::from_str(&text).map_err(|source| DesignerError::Snapshot {
        path: path.to_owned(),
        source,
    })
}

pub fn load_tree(
    path: &Path,
    policy: LeafPolicy,
) -> Result<MenuTree> {
    let snapshot = read_snapshot(path)?;
    let tree = MenuTree::from_snapshot(&snapshot, policy);
    info!(path = %path.display(), nodes = tree.len(), "menu loaded");
    Ok(tree)
}

pub fn save_tree(
    path: &Path,
    tree: &MenuTree,
) -> Result<()> {
    let json = serde_json::to_string_pretty(&tree.snapshot()).map_err(|source| DesignerError::Snapshot {
        path: path.to_owned(),
        source,
    })?;
    fs::write(path, json + "\n").map_err(|source| DesignerError::io(path, source))?;
    debug!(path = %path.display(), nodes = tree.len(), "menu saved");
    Ok(())
}

/// Starter tree for `menu-designer new`.
pub fn starter_tree(policy: LeafPolicy) -> MenuTree {
    let mut tree = MenuTree::with_policy("Main Menu", policy);
    let root = tree.root();
    if let Some(settings) = tree.add_child(root, MenuNode::new("Settings")) {
        for name in ["Brightness", "Contrast"] {
            tree.add_child(settings, MenuNode::new(name));
        }
    }
    if let Some(about) = tree.add_child(root, MenuNode::new("About")) {
        tree.set_callback_name(about, "on_about");
    }
    tree
}

/// Indented text outline, one node per line.
///
/// ```text
/// Main Menu
///   Settings/
///     Brightness  -> menu_cb_4
///   About  -> on_about
///   Secret/  (hidden)
/// ```
pub fn outline(tree: &MenuTree) -> String {
    let mut out = String::new();
    for id in tree.subtree(tree.root()) {
        let Some(node) = tree.get(id) else {
            continue;
        };
        let indent = "  ".repeat(tree.depth(id));
        let _ = write!(out, "{indent}{}", node.name());
        if id != tree.root() {
            if let Some(symbol) = callback_symbol(node) {
                let _ = write!(out, "  -> {symbol}");
            } else {
                out.push('/');
            }
        }
        if !node.is_visible() {
            out.push_str("  (hidden)");
        }
        out.push('\n');
    }
    out
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_load_keeps_structure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("menu.json");
        let tree = starter_tree(LeafPolicy::AutoNormalize);
        save_tree(&path, &tree).unwrap();

        let loaded = load_tree(&path, LeafPolicy::AutoNormalize).unwrap();
        assert_eq!(loaded.snapshot(), tree.snapshot());
        assert_eq!(loaded.len(), 5);
    }

    #[test]
    fn test_missing_fields_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("menu.json");
        fs::write(&path, r#"{"name": "Root", "children": [{"name": "Only"}]}"#).unwrap();

        let tree = load_tree(&path, LeafPolicy::AutoNormalize).unwrap();
        let only = tree.children(tree.root())[0];
        assert!(tree.get(only).unwrap().is_exec());
        assert!(tree.get(only).unwrap().is_visible());
    }

    #[test]
    fn test_outline_marks_kinds() {
        let mut tree = starter_tree(LeafPolicy::AutoNormalize);
        let settings = tree.children(tree.root())[0];
        tree.set_visible(settings, false);
        let brightness = tree.children(settings)[0];

        let text = outline(&tree);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Main Menu");
        assert_eq!(lines[1], "  Settings/  (hidden)");
        assert_eq!(lines[2], format!("    Brightness  -> menu_cb_{brightness}"));
        assert_eq!(lines[4], "  About  -> on_about");
    }

    #[test]
    fn test_malformed_json_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{\"name\": ").unwrap();
        let err = load_tree(&path, LeafPolicy::Manual).unwrap_err();
        assert!(matches!(err, DesignerError::Snapshot { path: ref p, .. } if *p == path));
        assert!(err.to_string().contains("broken.json"));
    }
}

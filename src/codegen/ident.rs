//! C identifier and literal helpers.
//!
//! Array names are derived from node names but always carry the node id, so two
//! "Settings" entries under different parents can never collide:
//!
//! ```text
//! "Settings"     (id 12) -> Settings_12_children
//! "Display  -> " (id 13) -> Display_13_children
//! "日本語"        (id 14) -> node_14_children
//! "2nd page"     (id 15) -> node_15_children
//! ```

use core::fmt::Write;

use menu_common::{MenuNode, NodeId};

/// Reserved words that would compile as something other than an identifier.
const C_KEYWORDS: [&str; 44] = [
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else", "enum", "extern",
    "float", "for", "goto", "if", "inline", "int", "long", "register", "restrict", "return", "short", "signed",
    "sizeof", "static", "struct", "switch", "typedef", "union", "unsigned", "void", "volatile", "while", "_Bool",
    "_Complex", "_Imaginary", "_Alignas", "_Alignof", "_Atomic", "_Generic", "_Noreturn", "_Static_assert",
    "_Thread_local",
];

/// Replace every non `[A-Za-z0-9_]` character with `_`, collapse runs of `_` and trim
/// them from both ends.
pub fn sanitize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        let ch = if ch.is_ascii_alphanumeric() || ch == '_' { ch } else { '_' };
        if ch == '_' && out.ends_with('_') {
            continue;
        }
        out.push(ch);
    }
    out.trim_matches('_').to_owned()
}

/// Unique per-node identifier stem: `<clean>_<id>`, or `node_<id>` when the clean
/// name is empty or starts with a digit.
pub fn node_ident(
    name: &str,
    id: NodeId,
) -> String {
    let clean = sanitize(name);
    match clean.chars().next() {
        Some(first) if !first.is_ascii_digit() => format!("{clean}_{id}"),
        _ => format!("node_{id}"),
    }
}

/// Name of the array holding a node's visible children.
pub fn children_array(
    name: &str,
    id: NodeId,
) -> String {
    format!("{}_children", node_ident(name, id))
}

/// Synthesized callback name for nodes without a usable one.
pub fn synthetic_callback(id: NodeId) -> String { format!("menu_cb_{id}") }

/// True for a non-keyword C identifier.
pub fn is_c_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        && !C_KEYWORDS.contains(&s)
}

/// Callback symbol for an executable node, `None` for containers.
///
/// A non-empty `callback_name` is used verbatim when it is a valid identifier;
/// otherwise the name is synthesized from the id.
pub fn callback_symbol(node: &MenuNode) -> Option<String> {
    if !node.is_exec() {
        return None;
    }
    let name = node.callback_name().trim();
    if !name.is_empty() && is_c_identifier(name) {
        return Some(name.to_owned());
    }
    Some(synthetic_callback(node.id()))
}

/// Double-quoted C string literal. Non-ASCII and control bytes become 3-digit octal
/// escapes of their UTF-8 encoding.
pub fn c_string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for byte in s.bytes() {
        match byte {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            b'\n' => out.push_str("\\n"),
            b'\t' => out.push_str("\\t"),
            // `??x` trigraphs
            b'?' => out.push_str("\\?"),
            0x20..=0x7E => out.push(byte as char),
            _ => {
                let _ = write!(out, "\\{byte:03o}");
            }
        }
    }
    out.push('"');
    out
}

/// Body text safe to place inside a `/* ... */` comment.
pub fn comment_text(s: &str) -> String { s.replace("*/", "* /").replace(['\n', '\r'], " ") }

// =============================================================================
// Unit Tests
// =============================================================================

//! `menu_callbacks.h` / `menu_callbacks.c`: one empty stub per distinct callback.

use core::fmt::Write;

use menu_common::MenuTree;
use tracing::warn;

use super::ident::{c_string_literal, callback_symbol, comment_text, is_c_identifier};
use super::{banner, visible_descendants};

/// One stub and the entry that first asked for it.
#[derive(Clone, PartialEq, Eq, Debug)]
pub(crate) struct CallbackStub {
    pub symbol: String,
    pub label: String,
}

/// Distinct callbacks of visible executable nodes, in menu order.
pub(crate) fn collect(tree: &MenuTree) -> Vec<CallbackStub> {
    let mut stubs: Vec<CallbackStub> = Vec::new();
    for id in visible_descendants(tree) {
        let Some(node) = tree.get(id) else {
            continue;
        };
        let requested = node.callback_name().trim();
        if node.is_exec() && !requested.is_empty() && !is_c_identifier(requested) {
            warn!(node = %id, callback = requested, "callback is not a C identifier, using a generated name");
        }
        let Some(symbol) = callback_symbol(node) else {
            continue;
        };
        if stubs.iter().any(|stub| stub.symbol == symbol) {
            continue;
        }
        stubs.push(CallbackStub {
            symbol,
            label: node.name().to_owned(),
        });
    }
    stubs
}

pub(crate) fn header(stubs: &[CallbackStub]) -> String {
    let mut out = banner("menu_callbacks.h");
    out.push_str("#ifndef MENU_CALLBACKS_H\n#define MENU_CALLBACKS_H\n\n");
    for stub in stubs {
        let _ = writeln!(out, "void {}(void);", stub.symbol);
    }
    out.push_str("\n#endif /* MENU_CALLBACKS_H */\n");
    out
}

pub(crate) fn source(stubs: &[CallbackStub]) -> String {
    let mut out = banner("menu_callbacks.c");
    out.push_str("#include \"menu_callbacks.h\"\n");
    for stub in stubs {
        let _ = writeln!(
            out,
            "\n/* {} */\nvoid {}(void)\n{{\n    /* Action for {}. */\n}}",
            comment_text(&stub.label),
            stub.symbol,
            comment_text(&c_string_literal(&stub.label))
        );
    }
    out
}

// =============================================================================
// Unit Tests
// =============================================================================

//! `menu_port.h` / `menu_port.c`: hardware-agnostic navigation runtime.
//!
//! The C state machine mirrors the designer's preview:
//!
//! ```text
//! UP     cursor - 1, stops at 0
//! DOWN   cursor + 1, stops at count - 1
//! ENTER  exec entry: call its callback; submenu: push, descend, cursor 0
//! BACK   pop, cursor back on the submenu we left
//! ```
//!
//! followed by the same sticky-window scroll. The integrator implements the
//! `menu_port_*` hooks for their display and input hardware.

use core::fmt::Write;

use super::banner;

pub(crate) fn header(stack_depth: usize) -> String {
    let mut out = banner("menu_port.h");
    out.push_str("#ifndef MENU_PORT_H\n#define MENU_PORT_H\n\n#include <stdint.h>\n\n#include \"menu.h\"\n\n");
    let _ = writeln!(out, "/* Deepest submenu level of the exported tree. */");
    let _ = writeln!(out, "#define MENU_STACK_DEPTH {}\n", stack_depth.max(1));

    out.push_str(
        r"typedef enum MenuKey {
    MENU_KEY_NONE = 0,
    MENU_KEY_UP,
    MENU_KEY_DOWN,
    MENU_KEY_ENTER,
    MENU_KEY_BACK
} MenuKey;

typedef struct MenuFrame {
    const MenuItem *items;
    uint16_t count;
    uint16_t cursor;
} MenuFrame;

typedef struct MenuState {
    const MenuItem *items;
    uint16_t count;
    uint16_t cursor;
    uint16_t view_start;
    uint16_t capacity;
    uint8_t depth;
    MenuFrame stack[MENU_STACK_DEPTH];
} MenuState;

/* ---- hooks implemented by the integrator ---- */

/* Non-blocking. MENU_KEY_NONE when nothing was pressed. */
MenuKey menu_port_read_key(void);
void menu_port_clear(void);
void menu_port_fill_rect(int x, int y, int w, int h, uint8_t on);
void menu_port_draw_bitmap(int x, int y, int stride, int h, const uint8_t *bits, uint8_t on);
void menu_port_draw_text(int x, int y, const char *s, uint8_t on);
void menu_port_flush(void);

/* ---- runtime ---- */

void menu_init(MenuState *state, uint16_t capacity);
/* Returns 1 when the screen needs repainting. */
uint8_t menu_handle_key(MenuState *state, MenuKey key);
void menu_render(const MenuState *state);
/* Poll keys and repaint forever. */
void menu_example_loop(void);

#endif /* MENU_PORT_H */
",
    );
    out
}

pub(crate) fn source(draw_skeleton: bool) -> String {
    let mut out = banner("menu_port.c");
    out.push_str("#include \"menu_port.h\"\n\n");

    out.push_str(
        r"static void menu_scroll(MenuState *state)
{
    uint16_t capacity = state->capacity > 0 ? state->capacity : 1;

    if (state->count <= capacity) {
        state->view_start = 0;
        return;
    }
    if (state->cursor < state->view_start) {
        state->view_start = state->cursor;
    } else if (state->cursor >= state->view_start + capacity) {
        state->view_start = (uint16_t)(state->cursor + 1 - capacity);
    }
    if (state->view_start > state->count - capacity) {
        state->view_start = (uint16_t)(state->count - capacity);
    }
}

void menu_init(MenuState *state, uint16_t capacity)
{
    state->items = menu_root;
    state->count = menu_root_count;
    state->cursor = 0;
    state->view_start = 0;
    state->capacity = capacity > 0 ? capacity : MENU_VISIBLE_LINES;
    state->depth = 0;
}

uint8_t menu_handle_key(MenuState *state, MenuKey key)
{
    const MenuItem *selected;

    switch (key) {
    case MENU_KEY_UP:
        if (state->cursor == 0) {
            return 0;
        }
        state->cursor--;
        break;

    case MENU_KEY_DOWN:
        if (state->count == 0 || state->cursor + 1 >= state->count) {
            return 0;
        }
        state->cursor++;
        break;

    case MENU_KEY_ENTER:
        if (state->count == 0) {
            return 0;
        }
        selected = &state->items[state->cursor];
        if (selected->is_exec) {
            if (selected->callback != NULL) {
                selected->callback();
            }
            return 0;
        }
        if (selected->child_count == 0 || state->depth >= MENU_STACK_DEPTH) {
            return 0;
        }
        state->stack[state->depth].items = state->items;
        state->stack[state->depth].count = state->count;
        state->stack[state->depth].cursor = state->cursor;
        state->depth++;
        state->items = selected->children;
        state->count = selected->child_count;
        state->cursor = 0;
        state->view_start = 0;
        break;

    case MENU_KEY_BACK:
        if (state->depth == 0) {
            return 0;
        }
        state->depth--;
        state->items = state->stack[state->depth].items;
        state->count = state->stack[state->depth].count;
        state->cursor = state->stack[state->depth].cursor;
        state->view_start = 0;
        break;

    default:
        return 0;
    }

    menu_scroll(state);
    return 1;
}

",
    );

    if draw_skeleton {
        out.push_str(
            r"void menu_render(const MenuState *state)
{
    menu_port_clear();
    menu_draw(state->items, state->count, state->cursor, state->view_start);
    menu_port_flush();
}
",
        );
    } else {
        out.push_str(
            r#"void menu_render(const MenuState *state)
{
    uint16_t row;

    menu_port_clear();
    for (row = 0; row < state->capacity && state->view_start + row < state->count; row++) {
        const MenuItem *item = &state->items[state->view_start + row];
        int y = row * MENU_LINE_HEIGHT;
        uint8_t selected = (uint8_t)(state->view_start + row == state->cursor);

        if (selected) {
            menu_port_fill_rect(0, y, MENU_SCREEN_WIDTH, MENU_LINE_HEIGHT, 1);
        }
        menu_port_draw_text(2, y + 1, item->name, (uint8_t)!selected);
        if (item->child_count > 0) {
            menu_port_draw_text(MENU_SCREEN_WIDTH - 8, y + 1, ">", (uint8_t)!selected);
        }
    }
    menu_port_flush();
}
"#,
        );
    }

    out.push_str(
        r"
void menu_example_loop(void)
{
    MenuState state;

    menu_init(&state, MENU_VISIBLE_LINES);
    menu_render(&state);
    for (;;) {
        MenuKey key = menu_port_read_key();

        if (key != MENU_KEY_NONE && menu_handle_key(&state, key)) {
            menu_render(&state);
        }
    }
}
",
    );
    out
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_declares_hooks_and_depth() {
        let header = header(3);
        assert!(header.contains("#define MENU_STACK_DEPTH 3"));
        for hook in ["menu_port_read_key", "menu_port_fill_rect", "menu_port_draw_bitmap", "menu_port_flush"] {
            assert!(header.contains(hook), "missing {hook}");
        }
        assert!(header.contains("MENU_KEY_BACK"));
    }

    #[test]
    fn test_render_delegates_to_skeleton() {
        assert!(source(true).contains("menu_draw(state->items, state->count, state->cursor, state->view_start);"));
        let own = source(false);
        assert!(!own.contains("menu_draw("));
        assert!(own.contains("menu_port_draw_text(2, y + 1, item->name"));
    }

    #[test]
    fn test_state_machine_mirrors_preview() {
        let source = source(false);
        assert!(source.contains("state->cursor = 0;\n        state->view_start = 0;"));
        assert!(source.contains("state->cursor = state->stack[state->depth].cursor;"));
        assert!(source.contains("menu_scroll(state);\n    return 1;"));
    }
}

//! `menu.h` / `menu.c`: the item struct, the tree as static arrays and the optional
//! draw skeleton.
//!
//! Each record is the fixed five-field struct:
//!
//! ```c
//! { name, is_exec, child_count, children | NULL, callback | NULL }
//! ```

use core::fmt::Write;

use menu_common::MenuTree;

use super::ident::{c_string_literal, callback_symbol, children_array, comment_text};
use super::{ExportLayout, ExportOptions, banner, containers_post_order};

/// Which glyph tables the draw skeleton may link against.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct FontLinks {
    pub ascii: bool,
    pub cjk: bool,
}

impl FontLinks {
    const fn any(self) -> bool { self.ascii || self.cjk }
}

// =============================================================================
// menu.h
// =============================================================================

pub(crate) fn header(
    options: &ExportOptions,
    layout: &ExportLayout,
    fonts: FontLinks,
) -> String {
    let mut out = banner("menu.h");
    out.push_str("#ifndef MENU_H\n#define MENU_H\n\n#include <stddef.h>\n#include <stdint.h>\n");
    if options.draw_skeleton && !options.host_independent {
        out.push_str("#include <u8g2.h>\n");
    }
    out.push('\n');

    let _ = writeln!(out, "#define MENU_SCREEN_WIDTH  {}", layout.width);
    let _ = writeln!(out, "#define MENU_SCREEN_HEIGHT {}", layout.height);
    let _ = writeln!(out, "#define MENU_LINE_HEIGHT   {}", layout.line_height);
    let _ = writeln!(out, "#define MENU_VISIBLE_LINES {}", layout.visible_lines);
    out.push('\n');

    out.push_str(
        "typedef struct MenuItem {\n    const char *name;\n    uint8_t is_exec;\n    uint16_t child_count;\n    const \
         struct MenuItem *children;\n    void (*callback)(void);\n} MenuItem;\n\n",
    );
    out.push_str("/* Top-level entries. NULL with a count of 0 for an empty menu. */\n");
    out.push_str("extern const MenuItem *const menu_root;\nextern const uint16_t menu_root_count;\n");

    if options.draw_skeleton {
        out.push('\n');
        out.push_str("/* Paint the visible window of one submenu. */\n");
        if options.host_independent {
            out.push_str(
                "void menu_draw(const MenuItem *items, uint16_t count, uint16_t cursor, uint16_t view_start);\n",
            );
        } else {
            out.push_str(
                "void menu_draw(u8g2_t *u8g2, const MenuItem *items, uint16_t count, uint16_t cursor, uint16_t \
                 view_start);\n",
            );
        }
    }
    if options.draw_skeleton && fonts.any() {
        out.push_str("\n/* Glyph lines are row-aligned, MSB first, ceil(width / 8) bytes per row. */\n");
    }

    out.push_str("\n#endif /* MENU_H */\n");
    out
}

// =============================================================================
// menu.c
// =============================================================================

pub(crate) fn source(
    tree: &MenuTree,
    options: &ExportOptions,
    layout: &ExportLayout,
    fonts: FontLinks,
) -> String {
    let mut out = banner("menu.c");
    out.push_str("#include \"menu.h\"\n#include \"menu_callbacks.h\"\n");
    if options.draw_skeleton {
        if fonts.ascii {
            out.push_str("#include \"menu_font_ascii.h\"\n");
        }
        if fonts.cjk {
            out.push_str("#include \"menu_font_cjk.h\"\n");
        }
        if options.host_independent {
            out.push_str("#include \"menu_port.h\"\n");
        }
    }
    out.push('\n');

    write_tree(&mut out, tree);

    if options.draw_skeleton {
        out.push('\n');
        write_draw_skeleton(&mut out, options.host_independent, fonts, layout);
    }
    out
}

/// Children arrays in post-order, then the root pointer and count.
fn write_tree(
    out: &mut String,
    tree: &MenuTree,
) {
    for id in containers_post_order(tree) {
        let children = tree.visible_children(id);
        let name = tree.name(id);
        let _ = writeln!(out, "/* {} */", comment_text(name));
        let _ = writeln!(
            out,
            "static const MenuItem {}[{}] = {{",
            children_array(name, id),
            children.len()
        );
        for child in children {
            let Some(node) = tree.get(child) else {
                continue;
            };
            let grandchildren = tree.visible_children(child).len();
            let children_ref = if grandchildren > 0 {
                children_array(node.name(), child)
            } else {
                "NULL".to_owned()
            };
            let callback = callback_symbol(node).unwrap_or_else(|| "NULL".to_owned());
            let _ = writeln!(
                out,
                "    {{{}, {}, {}, {}, {}}},",
                c_string_literal(node.name()),
                u8::from(node.is_exec()),
                grandchildren,
                children_ref,
                callback
            );
        }
        out.push_str("};\n\n");
    }

    let root = tree.root();
    let count = tree.visible_children(root).len();
    if count > 0 {
        let _ = writeln!(
            out,
            "const MenuItem *const menu_root = {};",
            children_array(tree.name(root), root)
        );
    } else {
        out.push_str("const MenuItem *const menu_root = NULL;\n");
    }
    let _ = writeln!(out, "const uint16_t menu_root_count = {count};");
}

// =============================================================================
// Draw Skeleton
// =============================================================================

const UTF8_DECODER: &str = r"static uint32_t menu_utf8_next(const char **s)
{
    const uint8_t *p = (const uint8_t *)*s;
    uint32_t code;
    int extra;

    if (p[0] < 0x80) {
        code = p[0];
        extra = 0;
    } else if ((p[0] & 0xE0) == 0xC0) {
        code = p[0] & 0x1F;
        extra = 1;
    } else if ((p[0] & 0xF0) == 0xE0) {
        code = p[0] & 0x0F;
        extra = 2;
    } else {
        code = p[0] & 0x07;
        extra = 3;
    }
    p++;
    while (extra-- > 0 && (*p & 0xC0) == 0x80) {
        code = (code << 6) | (uint32_t)(*p & 0x3F);
        p++;
    }
    *s = (const char *)p;
    return code;
}
";

fn write_glyph_lookup(
    out: &mut String,
    fonts: FontLinks,
) {
    out.push_str("static const MenuGlyph *menu_find_glyph(uint32_t code, const uint8_t **bits)\n{\n");
    out.push_str("    const MenuGlyph *glyph = NULL;\n\n");
    if fonts.cjk {
        out.push_str(
            "    glyph = menu_font_cjk_find(code);\n    if (glyph != NULL) {\n        *bits = \
             menu_font_cjk_bits(glyph);\n        return glyph;\n    }\n",
        );
    }
    if fonts.ascii {
        out.push_str(
            "    glyph = menu_font_ascii_find(code);\n    if (glyph != NULL) {\n        *bits = \
             menu_font_ascii_bits(glyph);\n        return glyph;\n    }\n",
        );
    }
    out.push_str("    return NULL;\n}\n\n");
}

fn write_draw_skeleton(
    out: &mut String,
    host_independent: bool,
    fonts: FontLinks,
    layout: &ExportLayout,
) {
    out.push_str("/* ---- draw skeleton ---- */\n\n");

    // Text primitive
    let (target_param, target_arg) = if host_independent {
        ("", "")
    } else {
        ("u8g2_t *u8g2, ", "u8g2, ")
    };

    if fonts.any() {
        out.push_str(UTF8_DECODER);
        out.push('\n');
        write_glyph_lookup(out, fonts);

        let _ = writeln!(
            out,
            "static void menu_draw_text({target_param}int x, int y, const char *s, uint8_t on)\n{{"
        );
        out.push_str("    while (*s != '\\0' && x < MENU_SCREEN_WIDTH) {\n");
        out.push_str("        const uint8_t *bits = NULL;\n");
        out.push_str("        const MenuGlyph *glyph = menu_find_glyph(menu_utf8_next(&s), &bits);\n\n");
        out.push_str("        if (glyph == NULL || glyph->width == 0) {\n");
        let _ = writeln!(out, "            x += {};", (layout.line_height / 2).max(1));
        out.push_str("            continue;\n        }\n");
        if host_independent {
            out.push_str(
                "        menu_port_draw_bitmap(x, y, (glyph->width + 7) / 8, glyph->height, bits, on);\n",
            );
        } else {
            out.push_str("        u8g2_SetDrawColor(u8g2, on);\n");
            out.push_str("        u8g2_DrawBitmap(u8g2, x, y, (glyph->width + 7) / 8, glyph->height, bits);\n");
        }
        out.push_str("        x += glyph->width + 1;\n    }\n}\n\n");
    } else {
        let _ = writeln!(
            out,
            "static void menu_draw_text({target_param}int x, int y, const char *s, uint8_t on)\n{{"
        );
        if host_independent {
            out.push_str("    menu_port_draw_text(x, y, s, on);\n}\n\n");
        } else {
            out.push_str("    u8g2_SetDrawColor(u8g2, on);\n    u8g2_SetFontPosTop(u8g2);\n");
            out.push_str("    u8g2_DrawUTF8(u8g2, x, y, s);\n}\n\n");
        }
    }

    // Window painter
    let _ = writeln!(
        out,
        "void menu_draw({target_param}const MenuItem *items, uint16_t count, uint16_t cursor, uint16_t \
         view_start)\n{{"
    );
    out.push_str("    uint16_t row;\n\n");
    out.push_str("    for (row = 0; row < MENU_VISIBLE_LINES && view_start + row < count; row++) {\n");
    out.push_str("        const MenuItem *item = &items[view_start + row];\n");
    out.push_str("        int y = row * MENU_LINE_HEIGHT;\n");
    out.push_str("        uint8_t selected = (uint8_t)(view_start + row == cursor);\n\n");
    out.push_str("        if (selected) {\n");
    if host_independent {
        out.push_str("            menu_port_fill_rect(0, y, MENU_SCREEN_WIDTH, MENU_LINE_HEIGHT, 1);\n");
    } else {
        out.push_str("            u8g2_SetDrawColor(u8g2, 1);\n");
        out.push_str("            u8g2_DrawBox(u8g2, 0, y, MENU_SCREEN_WIDTH, MENU_LINE_HEIGHT);\n");
    }
    out.push_str("        }\n");
    let _ = writeln!(out, "        menu_draw_text({target_arg}2, y + 1, item->name, (uint8_t)!selected);");
    out.push_str("        if (item->child_count > 0) {\n");
    let _ = writeln!(
        out,
        "            menu_draw_text({target_arg}MENU_SCREEN_WIDTH - 8, y + 1, \">\", (uint8_t)!selected);"
    );
    out.push_str("        }\n    }\n");
    if !host_independent {
        out.push_str("    u8g2_SetDrawColor(u8g2, 1);\n");
    }
    out.push_str("}\n");
}

// =============================================================================
// Unit Tests
// =============================================================================

//! `menu_font_<name>.h` / `.c`: glyph index, bitmap blob and binary-search lookup.
//!
//! ```c
//! typedef struct MenuGlyph {
//!     uint32_t code;    /* ascending */
//!     uint32_t offset;  /* into the bitmap blob */
//!     uint16_t width;
//!     uint16_t height;
//! } MenuGlyph;
//! ```
//!
//! Bitmaps are row-aligned, MSB first, `(width + 7) / 8` bytes per row, rows top to
//! bottom, the layout `u8g2_DrawBitmap` reads.

use core::fmt::Write;

use menu_common::font_subset::GlyphTable;

use super::banner;

/// Bytes per line in the bitmap initializer.
const BYTES_PER_LINE: usize = 16;

pub(crate) struct FontTableEmitter<'a> {
    name: &'a str,
    table: &'a GlyphTable,
}

impl<'a> FontTableEmitter<'a> {
    pub const fn new(
        name: &'a str,
        table: &'a GlyphTable,
    ) -> Self {
        Self { name, table }
    }

    fn upper(&self) -> String { self.name.to_ascii_uppercase() }

    pub fn header(&self) -> String {
        let name = self.name;
        let upper = self.upper();
        let mut out = banner(&format!("menu_font_{name}.h"));
        let _ = writeln!(out, "#ifndef MENU_FONT_{upper}_H\n#define MENU_FONT_{upper}_H\n");
        out.push_str("#include <stdint.h>\n\n");
        out.push_str(
            "#ifndef MENU_GLYPH_T\n#define MENU_GLYPH_T\n/* Bitmap rows are MSB first, (width + 7) / 8 bytes each. */\ntypedef \
             struct MenuGlyph {\n    uint32_t code;\n    uint32_t offset;\n    uint16_t width;\n    uint16_t \
             height;\n} MenuGlyph;\n#endif\n\n",
        );
        let _ = writeln!(out, "#define MENU_FONT_{upper}_COUNT  {}", self.table.len());
        let _ = writeln!(out, "#define MENU_FONT_{upper}_HEIGHT {}", self.table.max_height());
        out.push('\n');
        let _ = writeln!(
            out,
            "extern const MenuGlyph menu_font_{name}_index[MENU_FONT_{upper}_COUNT];"
        );
        let _ = writeln!(out, "extern const uint8_t menu_font_{name}_bitmap[];\n");
        let _ = writeln!(out, "/* Binary search by code point. NULL when absent. */");
        let _ = writeln!(out, "const MenuGlyph *menu_font_{name}_find(uint32_t code);");
        let _ = writeln!(out, "const uint8_t *menu_font_{name}_bits(const MenuGlyph *glyph);");
        let _ = writeln!(out, "\n#endif /* MENU_FONT_{upper}_H */");
        out
    }

    pub fn source(&self) -> String {
        let name = self.name;
        let upper = self.upper();
        let mut out = banner(&format!("menu_font_{name}.c"));
        let _ = writeln!(out, "#include <stddef.h>\n\n#include \"menu_font_{name}.h\"\n");

        let _ = writeln!(out, "const MenuGlyph menu_font_{name}_index[MENU_FONT_{upper}_COUNT] = {{");
        for entry in self.table.entries() {
            let label = char::from_u32(entry.code)
                .filter(|ch| !ch.is_control() && *ch != '/' && *ch != '*' && *ch != '\\')
                .map(|ch| format!(" /* {ch} */"))
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "    {{0x{:04X}, {}, {}, {}}},{label}",
                entry.code, entry.offset, entry.width, entry.height
            );
        }
        out.push_str("};\n\n");

        // Zero-length arrays are not valid C.
        let blob = self.table.blob();
        let _ = writeln!(out, "const uint8_t menu_font_{name}_bitmap[{}] = {{", blob.len().max(1));
        if blob.is_empty() {
            out.push_str("    0x00,\n");
        }
        for chunk in blob.chunks(BYTES_PER_LINE) {
            out.push_str("   ");
            for byte in chunk {
                let _ = write!(out, " 0x{byte:02X},");
            }
            out.push('\n');
        }
        out.push_str("};\n\n");

        let _ = writeln!(out, "const MenuGlyph *menu_font_{name}_find(uint32_t code)\n{{");
        out.push_str("    size_t lo = 0;\n");
        let _ = writeln!(out, "    size_t hi = MENU_FONT_{upper}_COUNT;\n");
        out.push_str("    while (lo < hi) {\n        size_t mid = lo + (hi - lo) / 2;\n");
        let _ = writeln!(out, "        uint32_t probe = menu_font_{name}_index[mid].code;\n");
        let _ = writeln!(
            out,
            "        if (probe == code) {{\n            return &menu_font_{name}_index[mid];\n        }}"
        );
        out.push_str("        if (probe < code) {\n            lo = mid + 1;\n        } else {\n            hi = mid;\n        }\n    }\n");
        out.push_str("    return NULL;\n}\n\n");

        let _ = writeln!(out, "const uint8_t *menu_font_{name}_bits(const MenuGlyph *glyph)\n{{");
        let _ = writeln!(out, "    return &menu_font_{name}_bitmap[glyph->offset];\n}}");
        out
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

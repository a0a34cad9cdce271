//! Glyph tables for the generated firmware.
//!
//! A table is one contiguous bitmap blob plus an index sorted by code point:
//!
//! ```text
//! index:  { code, offset, width, height }  (ascending by code)
//!           │
//!           └──> blob[offset .. offset + stride * height]
//! ```
//!
//! The ASCII table always carries 32..=126. The CJK table carries exactly the CJK
//! characters that appear in exported names (visible nodes below the root), nothing else; an unused tree yields an empty
//! table and no CJK files are generated.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::glyph::{Glyph, GlyphRasterizer};
use crate::tree::MenuTree;

/// Printable ASCII range included in every ASCII table.
pub const ASCII_RANGE: core::ops::RangeInclusive<u32> = 32..=126;

// =============================================================================
// Character Collection
// =============================================================================

/// CJK Unified Ideographs (+ Extension A), CJK punctuation and full-width forms.
pub const fn is_cjk(ch: char) -> bool {
    matches!(
        ch as u32,
        0x3000..=0x303F | 0x3400..=0x4DBF | 0x4E00..=0x9FFF | 0xFF00..=0xFFEF
    )
}

/// Every distinct character of the names that get exported, in code point order.
///
/// Walks the visible nodes below the root. The root name and hidden subtrees never
/// reach `menu.c`, so their characters are left out.
pub fn collect_chars(tree: &MenuTree) -> BTreeSet<char> {
    tree.visible_descendants()
        .into_iter()
        .flat_map(|id| tree.name(id).chars())
        .collect()
}

/// The CJK subset of [`collect_chars`].
pub fn collect_cjk(tree: &MenuTree) -> BTreeSet<char> {
    collect_chars(tree).into_iter().filter(|ch| is_cjk(*ch)).collect()
}

// =============================================================================
// Glyph Table
// =============================================================================

/// Index record for one glyph in the blob.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct GlyphEntry {
    pub code: u32,
    pub offset: u32,
    pub width: u32,
    pub height: u32,
}

impl GlyphEntry {
    #[inline]
    pub const fn stride(&self) -> u32 { self.width.div_ceil(8) }

    #[inline]
    pub const fn byte_len(&self) -> u32 { self.stride() * self.height }
}

/// Sorted glyph index plus the packed bitmap blob.
#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub struct GlyphTable {
    entries: Vec<GlyphEntry>,
    blob: Vec<u8>,
}

impl GlyphTable {
    /// Build from `(code, glyph)` pairs in any order. Duplicate codes keep the first.
    pub fn from_glyphs(glyphs: impl IntoIterator<Item = (u32, Glyph)>) -> Self {
        let mut glyphs: Vec<(u32, Glyph)> = glyphs.into_iter().collect();
        glyphs.sort_by_key(|(code, _)| *code);
        glyphs.dedup_by_key(|(code, _)| *code);

        let mut table = Self::default();
        for (code, glyph) in glyphs {
            table.entries.push(GlyphEntry {
                code,
                offset: table.blob.len() as u32,
                width: glyph.width,
                height: glyph.height,
            });
            table.blob.extend_from_slice(&glyph.bits);
        }
        table
    }

    #[inline]
    pub fn entries(&self) -> &[GlyphEntry] { &self.entries }

    #[inline]
    pub fn blob(&self) -> &[u8] { &self.blob }

    #[inline]
    pub fn len(&self) -> usize { self.entries.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Binary search by code point, the same lookup the generated C performs.
    pub fn lookup(
        &self,
        code: u32,
    ) -> Option<&GlyphEntry> {
        self.entries
            .binary_search_by_key(&code, |entry| entry.code)
            .ok()
            .and_then(|idx| self.entries.get(idx))
    }

    /// Packed rows of one glyph.
    pub fn glyph_bits(
        &self,
        entry: &GlyphEntry,
    ) -> &[u8] {
        let start = entry.offset as usize;
        let end = start + entry.byte_len() as usize;
        self.blob.get(start..end).unwrap_or(&[])
    }

    /// Tallest glyph, used for line height in the generated draw code.
    pub fn max_height(&self) -> u32 { self.entries.iter().map(|entry| entry.height).max().unwrap_or(0) }
}

// =============================================================================
// Font Subset Builder
// =============================================================================

/// Builds glyph tables through a [`GlyphRasterizer`].
pub struct FontSubsetBuilder<'r, 'b> {
    rasterizer: &'r GlyphRasterizer<'b>,
}

impl<'r, 'b> FontSubsetBuilder<'r, 'b> {
    pub const fn new(rasterizer: &'r GlyphRasterizer<'b>) -> Self { Self { rasterizer } }

    /// Full printable ASCII table.
    pub fn ascii(&self) -> GlyphTable {
        let table = self.build(ASCII_RANGE.filter_map(char::from_u32));
        debug!(glyphs = table.len(), bytes = table.blob().len(), "ascii glyph table built");
        table
    }

    /// Only the CJK characters present in `tree`. Empty if there are none.
    pub fn cjk(
        &self,
        tree: &MenuTree,
    ) -> GlyphTable {
        let table = self.build(collect_cjk(tree));
        debug!(glyphs = table.len(), bytes = table.blob().len(), "cjk glyph subset built");
        table
    }

    /// Table for an explicit character set.
    pub fn build(
        &self,
        chars: impl IntoIterator<Item = char>,
    ) -> GlyphTable {
        let mut degraded = 0usize;
        let table = GlyphTable::from_glyphs(chars.into_iter().map(|ch| {
            let glyph = self.rasterizer.rasterize(ch);
            if glyph.is_empty() && ch != ' ' {
                degraded += 1;
            }
            (ch as u32, glyph)
        }));
        if degraded > 0 {
            warn!(degraded, family = self.rasterizer.family(), "some glyphs rendered empty");
        }
        table
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::{Coverage, FontBackend, MonoFontBackend};
    use crate::tree::MenuNode;

    /// Solid `px x px` box for anything, so CJK tests need no font file.
    struct BoxBackend;

    impl FontBackend for BoxBackend {
        fn rasterize(
            &self,
            _ch: char,
            _family: &str,
            px: u32,
        ) -> Option<Coverage> {
            Some(Coverage {
                width: px,
                height: px,
                data: vec![255; (px * px) as usize],
            })
        }
    }

    fn cjk_tree() -> MenuTree {
        let mut tree = MenuTree::new("Main");
        let root = tree.root();
        let lang = tree.add_child(root, MenuNode::new("Language")).unwrap();
        tree.add_child(lang, MenuNode::new("日本語")).unwrap();
        tree.add_child(lang, MenuNode::new("English")).unwrap();
        tree
    }

    #[test]
    fn test_is_cjk_ranges() {
        assert!(is_cjk('日'));
        assert!(is_cjk('、'));
        assert!(is_cjk('！'));
        assert!(is_cjk('㐀'));
        assert!(!is_cjk('A'));
        assert!(!is_cjk('é'));
    }

    #[test]
    fn test_ascii_table_is_complete_and_sorted() {
        let rasterizer = GlyphRasterizer::new(&MonoFontBackend, "mono", 8);
        let table = FontSubsetBuilder::new(&rasterizer).ascii();
        assert_eq!(table.len(), 95);
        assert!(table.entries().windows(2).all(|pair| pair[0].code < pair[1].code));
        assert_eq!(table.entries()[0].code, 32);
        assert_eq!(table.entries()[94].code, 126);
    }

    #[test]
    fn test_cjk_subset_exact() {
        let rasterizer = GlyphRasterizer::new(&BoxBackend, "box", 12);
        let table = FontSubsetBuilder::new(&rasterizer).cjk(&cjk_tree());

        let codes: Vec<u32> = table.entries().iter().map(|entry| entry.code).collect();
        let mut expected: Vec<u32> = "日本語".chars().map(|ch| ch as u32).collect();
        expected.sort_unstable();
        assert_eq!(codes, expected);
        assert_eq!(table.blob().len(), 3 * 2 * 12);
    }

    #[test]
    fn test_cjk_subset_empty_without_cjk() {
        let mut tree = MenuTree::new("Main");
        tree.add_child(tree.root(), MenuNode::new("About")).unwrap();
        let rasterizer = GlyphRasterizer::new(&BoxBackend, "box", 12);
        assert!(FontSubsetBuilder::new(&rasterizer).cjk(&tree).is_empty());
    }

    #[test]
    fn test_lookup_present_and_absent() {
        let rasterizer = GlyphRasterizer::new(&BoxBackend, "box", 9);
        let table = FontSubsetBuilder::new(&rasterizer).build("zebra".chars());
        assert_eq!(table.len(), 5);
        for ch in "zebra".chars() {
            let entry = table.lookup(ch as u32).unwrap();
            assert_eq!(entry.code, ch as u32);
            assert_eq!(table.glyph_bits(entry).len(), 2 * 9);
        }
        assert!(table.lookup('c' as u32).is_none());
        assert!(table.lookup(0).is_none());
        assert!(table.lookup(u32::MAX).is_none());
    }

    #[test]
    fn test_offsets_are_contiguous() {
        let rasterizer = GlyphRasterizer::new(&MonoFontBackend, "mono", 10);
        let table = FontSubsetBuilder::new(&rasterizer).build("ba?".chars());
        let mut expected = 0;
        for entry in table.entries() {
            assert_eq!(entry.offset, expected);
            expected += entry.byte_len();
        }
        assert_eq!(expected as usize, table.blob().len());
        assert_eq!(table.max_height(), 10);
    }

    #[test]
    fn test_failed_glyph_keeps_its_entry() {
        let rasterizer = GlyphRasterizer::new(&MonoFontBackend, "mono", 10);
        let table = FontSubsetBuilder::new(&rasterizer).build("a語".chars());
        let entry = table.lookup('語' as u32).unwrap();
        assert_eq!((entry.width, entry.height), (0, 0));
        assert!(table.glyph_bits(entry).is_empty());
    }

    #[test]
    fn test_collect_chars_skips_root_name() {
        let chars = collect_chars(&cjk_tree());
        assert!(!chars.contains(&'M'));
        assert!(chars.contains(&'L'));
        assert!(chars.contains(&'語'));
    }

    #[test]
    fn test_cjk_subset_skips_hidden_and_root() {
        let mut tree = MenuTree::new("主菜单");
        let root = tree.root();
        let hidden = tree.add_child(root, MenuNode::new("隐藏")).unwrap();
        tree.add_child(root, MenuNode::new("語")).unwrap();
        tree.set_visible(hidden, false);

        let rasterizer = GlyphRasterizer::new(&BoxBackend, "box", 12);
        let table = FontSubsetBuilder::new(&rasterizer).cjk(&tree);
        let codes: Vec<u32> = table.entries().iter().map(|entry| entry.code).collect();
        assert_eq!(codes, vec!['語' as u32]);
        assert_eq!(table.blob().len(), 2 * 12);
    }
}

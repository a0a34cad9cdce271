//! C code generation.
//!
//! Export is a pure, in-memory step: a [`CCodeEmitter`] turns a tree (plus optional
//! glyph tables) into an ordered list of [`GeneratedFile`]s. Writing them to disk is
//! [`crate::export`]'s job.
//!
//! # Generated Files
//!
//! | File | When |
//! |------|------|
//! | `inc/menu.h`, `src/menu.c` | always |
//! | `inc/menu_callbacks.h`, `src/menu_callbacks.c` | always |
//! | `inc/menu_font_ascii.h`, `src/menu_font_ascii.c` | ASCII font flag |
//! | `inc/menu_font_cjk.h`, `src/menu_font_cjk.c` | CJK flag and CJK characters present |
//! | `inc/menu_port.h`, `src/menu_port.c` | host-independent bundle flag |
//!
//! Only visible nodes (and only those reachable through visible parents) are exported.

mod callbacks;
mod font_table;
pub mod ident;
mod menu_data;
mod porting;

use core::fmt;
use std::path::PathBuf;

use menu_common::font_subset::GlyphTable;
use menu_common::{DisplayProfile, MenuTree, NodeId};
use tracing::info;

// =============================================================================
// Options
// =============================================================================

/// Independent export add-ons.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct ExportOptions {
    /// Embed the full printable-ASCII glyph table.
    pub ascii_font: bool,
    /// Emit a `menu_draw()` skeleton.
    pub draw_skeleton: bool,
    /// Embed glyphs for the CJK characters used by the tree.
    pub cjk_subset: bool,
    /// Emit the hardware-agnostic porting layer instead of depending on u8g2.
    pub host_independent: bool,
}

/// Screen geometry baked into the generated code.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ExportLayout {
    pub width: u32,
    pub height: u32,
    pub line_height: u32,
    pub visible_lines: usize,
}

impl ExportLayout {
    pub const fn from_profile(profile: &DisplayProfile) -> Self {
        Self {
            width: profile.width,
            height: profile.height,
            line_height: profile.line_height(),
            visible_lines: profile.capacity(),
        }
    }
}

impl Default for ExportLayout {
    fn default() -> Self { Self::from_profile(&DisplayProfile::default()) }
}

// =============================================================================
// Generated Files
// =============================================================================

/// Directory of the fixed output skeleton.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OutputDir {
    Inc,
    Src,
}

impl OutputDir {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Inc => "inc",
            Self::Src => "src",
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct GeneratedFile {
    pub dir: OutputDir,
    pub name: String,
    pub contents: String,
}

impl GeneratedFile {
    fn new(
        dir: OutputDir,
        name: &str,
        contents: String,
    ) -> Self {
        Self {
            dir,
            name: name.to_owned(),
            contents,
        }
    }

    /// Path relative to the export root, e.g. `inc/menu.h`.
    pub fn relative_path(&self) -> PathBuf { PathBuf::from(self.dir.name()).join(&self.name) }
}

impl fmt::Display for GeneratedFile {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}/{}", self.dir.name(), self.name)
    }
}

/// Banner placed at the top of every generated file.
pub(crate) fn banner(file: &str) -> String {
    format!(
        "/*\n * {file}\n *\n * Generated by menu-designer {}. Do not edit by hand.\n */\n",
        env!("CARGO_PKG_VERSION")
    )
}

// =============================================================================
// Visible Tree Walk
// =============================================================================

/// Visible nodes that own a children array, children before parents.
///
/// Static initializers may only reference arrays already defined, so this post-order
/// is the emission order of `menu.c`.
pub(crate) fn containers_post_order(tree: &MenuTree) -> Vec<NodeId> {
    let mut out = Vec::new();
    // (node, children already pushed)
    let mut stack = vec![(tree.root(), false)];
    while let Some((id, expanded)) = stack.pop() {
        let children = tree.visible_children(id);
        if children.is_empty() {
            continue;
        }
        if expanded {
            out.push(id);
        } else {
            stack.push((id, true));
            stack.extend(children.into_iter().rev().map(|child| (child, false)));
        }
    }
    out
}

/// Every visible node below the root, pre-order.
pub(crate) fn visible_descendants(tree: &MenuTree) -> Vec<NodeId> { tree.visible_descendants() }

/// Deepest visible level below the root, at least 1.
pub(crate) fn stack_depth(tree: &MenuTree) -> usize { tree.max_visible_depth().max(1) }

// =============================================================================
// C Code Emitter
// =============================================================================

pub struct CCodeEmitter<'a> {
    tree: &'a MenuTree,
    options: ExportOptions,
    layout: ExportLayout,
    ascii: Option<&'a GlyphTable>,
    cjk: Option<&'a GlyphTable>,
}

impl<'a> CCodeEmitter<'a> {
    pub const fn new(
        tree: &'a MenuTree,
        options: ExportOptions,
        layout: ExportLayout,
    ) -> Self {
        Self {
            tree,
            options,
            layout,
            ascii: None,
            cjk: None,
        }
    }

    /// Table used when `ascii_font` is set.
    #[must_use]
    pub const fn with_ascii_table(
        mut self,
        table: &'a GlyphTable,
    ) -> Self {
        self.ascii = Some(table);
        self
    }

    /// Table used when `cjk_subset` is set. An empty table emits no CJK files.
    #[must_use]
    pub const fn with_cjk_table(
        mut self,
        table: &'a GlyphTable,
    ) -> Self {
        self.cjk = Some(table);
        self
    }

    fn ascii_table(&self) -> Option<&'a GlyphTable> { self.ascii.filter(|_| self.options.ascii_font) }

    fn cjk_table(&self) -> Option<&'a GlyphTable> {
        self.cjk.filter(|table| self.options.cjk_subset && !table.is_empty())
    }

    /// Generate every file, in write order.
    pub fn emit(&self) -> Vec<GeneratedFile> {
        let ascii = self.ascii_table();
        let cjk = self.cjk_table();
        let fonts = menu_data::FontLinks {
            ascii: ascii.is_some(),
            cjk: cjk.is_some(),
        };

        let mut files = Vec::new();
        files.push(GeneratedFile::new(
            OutputDir::Inc,
            "menu.h",
            menu_data::header(&self.options, &self.layout, fonts),
        ));
        files.push(GeneratedFile::new(
            OutputDir::Src,
            "menu.c",
            menu_data::source(self.tree, &self.options, &self.layout, fonts),
        ));

        let stubs = callbacks::collect(self.tree);
        files.push(GeneratedFile::new(OutputDir::Inc, "menu_callbacks.h", callbacks::header(&stubs)));
        files.push(GeneratedFile::new(OutputDir::Src, "menu_callbacks.c", callbacks::source(&stubs)));

        if let Some(table) = ascii {
            let emitter = font_table::FontTableEmitter::new("ascii", table);
            files.push(GeneratedFile::new(OutputDir::Inc, "menu_font_ascii.h", emitter.header()));
            files.push(GeneratedFile::new(OutputDir::Src, "menu_font_ascii.c", emitter.source()));
        }
        if let Some(table) = cjk {
            let emitter = font_table::FontTableEmitter::new("cjk", table);
            files.push(GeneratedFile::new(OutputDir::Inc, "menu_font_cjk.h", emitter.header()));
            files.push(GeneratedFile::new(OutputDir::Src, "menu_font_cjk.c", emitter.source()));
        }

        if self.options.host_independent {
            let depth = stack_depth(self.tree);
            files.push(GeneratedFile::new(OutputDir::Inc, "menu_port.h", porting::header(depth)));
            files.push(GeneratedFile::new(
                OutputDir::Src,
                "menu_port.c",
                porting::source(self.options.draw_skeleton),
            ));
        }

        info!(files = files.len(), nodes = visible_descendants(self.tree).len(), "C sources generated");
        files
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

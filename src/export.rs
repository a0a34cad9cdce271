//! Export pipeline: glyph tables, C generation and the staged writer.
//!
//! ```text
//! MenuTree --+--> FontSubsetBuilder (ascii / cjk) --+
//!            |                                      v
//!            +----------------------------> CCodeEmitter --> [GeneratedFile]
//!                                                                   |
//!   <dest>/.menu-exportXXXX/{inc,src}/*  <-- stage all --------------+
//!   <dest>/{inc,src}/*                   <-- rename, fixed order
//! ```
//!
//! Everything that can fail (bad destination, full disk, permission) fails while
//! staging, before any previously exported file is touched.

use std::fs;
use std::path::{Path, PathBuf};

use menu_common::font_subset::{FontSubsetBuilder, GlyphTable};
use menu_common::glyph::{FontBackend, GlyphRasterizer, MonoFontBackend};
use menu_common::{DisplayProfile, MenuTree};
use tracing::{debug, info};

use crate::codegen::{CCodeEmitter, ExportLayout, ExportOptions, GeneratedFile, OutputDir};
use crate::error::{DesignerError, Result};

// =============================================================================
// Export Job
// =============================================================================

/// Everything needed to turn one tree into C sources.
pub struct ExportJob<'a> {
    tree: &'a MenuTree,
    layout: ExportLayout,
    options: ExportOptions,
    family: String,
    glyph_px: u32,
    cjk_backend: &'a dyn FontBackend,
}

impl<'a> ExportJob<'a> {
    pub fn new(
        tree: &'a MenuTree,
        profile: &DisplayProfile,
        options: ExportOptions,
        cjk_backend: &'a dyn FontBackend,
    ) -> Self {
        Self {
            tree,
            layout: ExportLayout::from_profile(profile),
            options,
            family: "mono".to_owned(),
            glyph_px: profile.font_px,
            cjk_backend,
        }
    }

    /// Built-in family and size for the ASCII table. CJK glyphs use the same size.
    #[must_use]
    pub fn with_font(
        mut self,
        family: impl Into<String>,
        px: u32,
    ) -> Self {
        self.family = family.into();
        self.glyph_px = px;
        self
    }

    fn ascii_table(&self) -> Option<GlyphTable> {
        if !self.options.ascii_font {
            return None;
        }
        let rasterizer = GlyphRasterizer::new(&MonoFontBackend, self.family.as_str(), self.glyph_px);
        Some(FontSubsetBuilder::new(&rasterizer).ascii())
    }

    fn cjk_table(&self) -> Option<GlyphTable> {
        if !self.options.cjk_subset {
            return None;
        }
        let rasterizer = GlyphRasterizer::new(self.cjk_backend, self.family.as_str(), self.glyph_px);
        Some(FontSubsetBuilder::new(&rasterizer).cjk(self.tree))
    }

    /// Generate all files in memory.
    pub fn render(&self) -> Vec<GeneratedFile> {
        let ascii = self.ascii_table();
        let cjk = self.cjk_table();
        let mut emitter = CCodeEmitter::new(self.tree, self.options, self.layout);
        if let Some(table) = &ascii {
            emitter = emitter.with_ascii_table(table);
        }
        if let Some(table) = &cjk {
            emitter = emitter.with_cjk_table(table);
        }
        emitter.emit()
    }

    /// Generate and write to `dest`.
    pub fn run(
        &self,
        dest: &Path,
    ) -> Result<ExportReport> {
        let files = self.render();
        write_files(dest, &files)
    }
}

// =============================================================================
// Staged Writer
// =============================================================================

/// Paths written by one export, in write order.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ExportReport {
    pub root: PathBuf,
    pub written: Vec<PathBuf>,
}

/// Refuse destinations that are files, and output slots that are directories.
fn validate_destination(
    dest: &Path,
    files: &[GeneratedFile],
) -> Result<()> {
    if dest.exists() && !dest.is_dir() {
        return Err(DesignerError::destination(dest, "not a directory"));
    }
    for dir in [OutputDir::Inc, OutputDir::Src] {
        let path = dest.join(dir.name());
        if path.exists() && !path.is_dir() {
            return Err(DesignerError::destination(path, "exists and is not a directory"));
        }
    }
    for file in files {
        let path = dest.join(file.relative_path());
        if path.is_dir() {
            return Err(DesignerError::destination(path, "output file name is taken by a directory"));
        }
    }
    Ok(())
}

/// Write `files` under `dest/inc` and `dest/src`.
///
/// All contents are staged inside `dest` first, so a failure leaves earlier exports
/// untouched. The final renames happen in `files` order.
pub fn write_files(
    dest: &Path,
    files: &[GeneratedFile],
) -> Result<ExportReport> {
    validate_destination(dest, files)?;
    fs::create_dir_all(dest).map_err(|source| DesignerError::io(dest, source))?;

    let staging = tempfile::Builder::new()
        .prefix(".menu-export")
        .tempdir_in(dest)
        .map_err(|source| DesignerError::io(dest, source))?;
    debug!(staging = %staging.path().display(), "staging export");

    for dir in [OutputDir::Inc, OutputDir::Src] {
        let path = staging.path().join(dir.name());
        fs::create_dir_all(&path).map_err(|source| DesignerError::io(&path, source))?;
    }
    for file in files {
        let path = staging.path().join(file.relative_path());
        fs::write(&path, &file.contents).map_err(|source| DesignerError::io(&path, source))?;
    }

    for dir in [OutputDir::Inc, OutputDir::Src] {
        let path = dest.join(dir.name());
        fs::create_dir_all(&path).map_err(|source| DesignerError::io(&path, source))?;
    }
    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let from = staging.path().join(file.relative_path());
        let to = dest.join(file.relative_path());
        fs::rename(&from, &to).map_err(|source| DesignerError::io(&to, source))?;
        debug!(file = %file, "written");
        written.push(to);
    }

    staging.close().map_err(|source| DesignerError::io(dest, source))?;
    info!(dest = %dest.display(), files = written.len(), "export complete");
    Ok(ExportReport {
        root: dest.to_owned(),
        written,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

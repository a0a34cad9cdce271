//! Font backends living outside `menu-common`.
//!
//! [`TrueTypeBackend`] rasterizes TrueType/OpenType files through `fontdue`, which is
//! what makes CJK subsets possible; the built-in mono fonts only cover ASCII.
//!
//! # Glyph Cell
//!
//! ```text
//!   0 +-----------------+    cell width  = ceil(advance width)
//!     |    xmin         |    cell height = px
//!     |   +-----+       |
//!     |   | ### |       |    bitmap top  = ascent - (ymin + height)
//!  asc+---|-###-|-------+ <- baseline
//!     |   +-----+       |
//!  px +-----------------+
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use fontdue::{Font, FontSettings};
use menu_common::glyph::{Coverage, FontBackend, MonoFontBackend};
use tracing::{debug, info};

use crate::error::{DesignerError, Result};

// =============================================================================
// Glyph Placement
// =============================================================================

/// Where a rasterized bitmap lands inside its cell.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Placement {
    cell_width: u32,
    cell_height: u32,
    /// Baseline row, from the top of the cell.
    baseline: i32,
    xmin: i32,
    ymin: i32,
    width: usize,
    height: usize,
}

/// Copy `bitmap` into a `cell_width x cell_height` coverage map, clipping overflow.
fn compose(
    placement: Placement,
    bitmap: &[u8],
) -> Coverage {
    let mut coverage = Coverage::blank(placement.cell_width, placement.cell_height);
    let top = placement.baseline - (placement.ymin + placement.height as i32);
    for row in 0..placement.height {
        let y = top + row as i32;
        if y < 0 || y >= placement.cell_height as i32 {
            continue;
        }
        for col in 0..placement.width {
            let x = placement.xmin + col as i32;
            if x < 0 || x >= placement.cell_width as i32 {
                continue;
            }
            let value = bitmap.get(row * placement.width + col).copied().unwrap_or(0);
            coverage.set(x as u32, y as u32, value);
        }
    }
    coverage
}

// =============================================================================
// TrueType Backend
// =============================================================================

/// `fontdue` rasterizer over one font file. The family argument is ignored; the file
/// is the family.
pub struct TrueTypeBackend {
    font: Font,
    path: PathBuf,
}

impl TrueTypeBackend {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|source| DesignerError::io(path, source))?;
        Self::from_bytes(&bytes, path)
    }

    pub fn from_bytes(
        bytes: &[u8],
        path: &Path,
    ) -> Result<Self> {
        let font = Font::from_bytes(bytes, FontSettings::default()).map_err(|reason| DesignerError::Font {
            path: path.to_owned(),
            reason: reason.to_owned(),
        })?;
        info!(path = %path.display(), glyphs = font.glyph_count(), "font loaded");
        Ok(Self {
            font,
            path: path.to_owned(),
        })
    }

    #[inline]
    pub fn path(&self) -> &Path { &self.path }
}

impl FontBackend for TrueTypeBackend {
    fn rasterize(
        &self,
        ch: char,
        _family: &str,
        px: u32,
    ) -> Option<Coverage> {
        if px == 0 || self.font.lookup_glyph_index(ch) == 0 {
            return None;
        }
        let size = px as f32;
        let ascent = self.font.horizontal_line_metrics(size).map_or(size * 0.8, |line| line.ascent);
        let (metrics, bitmap) = self.font.rasterize(ch, size);

        let cell_width = (metrics.advance_width.ceil() as i32).max(metrics.xmin + metrics.width as i32).max(1) as u32;
        Some(compose(
            Placement {
                cell_width,
                cell_height: px,
                baseline: ascent.round() as i32,
                xmin: metrics.xmin,
                ymin: metrics.ymin,
                width: metrics.width,
                height: metrics.height,
            },
            &bitmap,
        ))
    }
}

// =============================================================================
// Backend Selection
// =============================================================================

/// Backend for the CJK subset: the configured font file, else the built-in mono fonts
/// (which render every CJK character empty).
pub fn cjk_backend(font_file: Option<&Path>) -> Result<Box<dyn FontBackend>> {
    match font_file {
        Some(path) => Ok(Box::new(TrueTypeBackend::load(path)?)),
        None => {
            debug!("no CJK font configured, using built-in mono fonts");
            Ok(Box::new(MonoFontBackend))
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn placement() -> Placement {
        Placement {
            cell_width: 6,
            cell_height: 8,
            baseline: 6,
            xmin: 1,
            ymin: 0,
            width: 2,
            height: 3,
        }
    }

    #[test]
    fn test_compose_sits_on_baseline() {
        let coverage = compose(placement(), &[255, 10, 20, 30, 40, 200]);
        // top = 6 - 3
        assert_eq!(coverage.get(1, 3), 255);
        assert_eq!(coverage.get(2, 3), 10);
        assert_eq!(coverage.get(2, 5), 200);
        assert_eq!(coverage.get(0, 3), 0);
        assert_eq!(coverage.get(1, 6), 0);
        assert_eq!(coverage.data.len(), 48);
    }

    #[test]
    fn test_compose_clips_descenders_and_overhang() {
        let placement = Placement {
            xmin: -1,
            ymin: -4,
            ..placement()
        };
        // top = 6 - (-4 + 3) = 7, only the first row fits
        let coverage = compose(placement, &[1, 2, 3, 4, 5, 6]);
        assert_eq!(coverage.get(0, 7), 2);
        assert_eq!(coverage.data.iter().filter(|value| **value != 0).count(), 1);
    }

    #[test]
    fn test_invalid_font_bytes_are_reported() {
        let err = TrueTypeBackend::from_bytes(b"not a font", Path::new("bogus.ttf")).err().unwrap();
        assert!(matches!(err, DesignerError::Font { ref path, .. } if path == Path::new("bogus.ttf")));
    }

    #[test]
    fn test_missing_font_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = TrueTypeBackend::load(&dir.path().join("none.otf")).err().unwrap();
        assert!(matches!(err, DesignerError::Io { .. }));
    }

    #[test]
    fn test_without_font_file_cjk_renders_empty() {
        let backend = cjk_backend(None).unwrap();
        assert!(backend.rasterize('日', "mono", 8).is_none());
        assert!(backend.rasterize('A', "mono", 8).is_some());
    }
}

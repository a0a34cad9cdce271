//! Designer configuration.
//!
//! Loaded from an optional TOML file; every key has a default, so an empty file (or
//! none at all) gives the 128x64 OLED profile with the built-in mono font.
//!
//! ```toml
//! [display]
//! profile = "tft-240x240"
//! font_px = 12
//! status_bar = true
//!
//! [font]
//! family = "profont"
//! cjk_font = "fonts/NotoSansCJK-Regular.otf"
//!
//! [export]
//! ascii_font = true
//! draw_skeleton = true
//! cjk_subset = true
//! host_independent = false
//! out_dir = "generated"
//!
//! [menu]
//! leaf_policy = "auto"
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use menu_common::{DisplayProfile, LeafPolicy, ScreenKind};
use serde::Deserialize;
use tracing::debug;

use crate::codegen::ExportOptions;
use crate::error::{DesignerError, Result};

// =============================================================================
// Timing Configuration
// =============================================================================

/// Target frame time of the interactive simulator (~50 FPS).
pub const FRAME_TIME: Duration = Duration::from_millis(20);

/// How long the "RUN <callback>" popup stays on screen.
pub const POPUP_DURATION: Duration = Duration::from_millis(1500);

/// Pixel scale of PNG previews and the simulator window.
pub const PREVIEW_SCALE: u32 = 3;

// =============================================================================
// File Sections
// =============================================================================

#[derive(Clone, PartialEq, Eq, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplaySection {
    /// Profile name, see [`ScreenKind::name`].
    pub profile: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub font_px: Option<u32>,
    pub status_bar: bool,
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            profile: ScreenKind::default().name().to_owned(),
            width: None,
            height: None,
            font_px: None,
            status_bar: true,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontSection {
    /// Built-in family (`mono` or `profont`) used for preview and the ASCII table.
    pub family: String,
    /// Glyph size; defaults to the display font size.
    pub size: Option<u32>,
    /// TrueType/OpenType file used for the CJK subset.
    pub cjk_font: Option<PathBuf>,
}

impl Default for FontSection {
    fn default() -> Self {
        Self {
            family: "mono".to_owned(),
            size: None,
            cjk_font: None,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportSection {
    pub ascii_font: bool,
    pub draw_skeleton: bool,
    pub cjk_subset: bool,
    pub host_independent: bool,
    pub out_dir: PathBuf,
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            ascii_font: false,
            draw_skeleton: false,
            cjk_subset: false,
            host_independent: false,
            out_dir: PathBuf::from("generated"),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Default, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeafPolicyName {
    #[default]
    Auto,
    Manual,
}

#[derive(Clone, PartialEq, Eq, Default, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MenuSection {
    pub leaf_policy: LeafPolicyName,
}

// =============================================================================
// Designer Config
// =============================================================================

#[derive(Clone, PartialEq, Eq, Default, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DesignerConfig {
    pub display: DisplaySection,
    pub font: FontSection,
    pub export: ExportSection,
    pub menu: MenuSection,
}

impl DesignerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| DesignerError::io(path, source))?;
        let config = toml::from_str(&text).map_err(|source| DesignerError::Config {
            path: path.to_owned(),
            source,
        })?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Defaults when `path` is `None`.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Resolved display geometry. Explicit sizes override the profile's.
    pub fn profile(&self) -> Result<DisplayProfile> {
        let display = &self.display;
        let kind = ScreenKind::parse(&display.profile)
            .ok_or_else(|| DesignerError::UnknownProfile(display.profile.clone()))?;
        let (default_width, default_height) = kind.size();

        let mut profile = DisplayProfile::new(kind).with_status_bar(display.status_bar);
        if display.width.is_some() || display.height.is_some() {
            profile = profile.with_size(
                display.width.unwrap_or(default_width),
                display.height.unwrap_or(default_height),
            );
        }
        if let Some(px) = display.font_px {
            profile = profile.with_font_px(px);
        }
        Ok(profile)
    }

    /// Glyph size for export: `[font] size`, else the display font size.
    pub fn glyph_px(
        &self,
        profile: &DisplayProfile,
    ) -> u32 {
        self.font.size.unwrap_or(profile.font_px)
    }

    pub const fn leaf_policy(&self) -> LeafPolicy {
        match self.menu.leaf_policy {
            LeafPolicyName::Auto => LeafPolicy::AutoNormalize,
            LeafPolicyName::Manual => LeafPolicy::Manual,
        }
    }

    pub const fn export_options(&self) -> ExportOptions {
        ExportOptions {
            ascii_font: self.export.ascii_font,
            draw_skeleton: self.export.draw_skeleton,
            cjk_subset: self.export.cjk_subset,
            host_independent: self.export.host_independent,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: DesignerConfig = toml::from_str("").unwrap();
        assert_eq!(config, DesignerConfig::default());
        let profile = config.profile().unwrap();
        assert_eq!(profile.kind, ScreenKind::Oled128x64);
        assert_eq!(profile.capacity(), 5);
        assert_eq!(config.leaf_policy(), LeafPolicy::AutoNormalize);
        assert_eq!(config.export_options(), ExportOptions::default());
    }

    #[test]
    fn test_sections_override_profile() {
        let config: DesignerConfig = toml::from_str(
            r#"
            [display]
            profile = "tft-320x240"
            height = 120
            font_px = 10
            status_bar = false

            [font]
            family = "profont"
            size = 14

            [export]
            ascii_font = true
            cjk_subset = true
            out_dir = "out"

            [menu]
            leaf_policy = "manual"
            "#,
        )
        .unwrap();

        let profile = config.profile().unwrap();
        assert_eq!((profile.width, profile.height), (320, 120));
        assert_eq!(profile.font_px, 10);
        // 120 / 12
        assert_eq!(profile.capacity(), 10);
        assert_eq!(config.glyph_px(&profile), 14);
        assert_eq!(config.leaf_policy(), LeafPolicy::Manual);

        let options = config.export_options();
        assert!(options.ascii_font && options.cjk_subset);
        assert!(!options.draw_skeleton && !options.host_independent);
        assert_eq!(config.export.out_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_unknown_profile_is_reported() {
        let config: DesignerConfig = toml::from_str("[display]\nprofile = \"vfd\"").unwrap();
        assert!(matches!(config.profile(), Err(DesignerError::UnknownProfile(name)) if name == "vfd"));
    }

    #[test]
    fn test_load_reports_bad_toml_with_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[display\nprofile = 1").unwrap();
        let err = DesignerConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, DesignerError::Config { ref path, .. } if path == file.path()));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DesignerConfig::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, DesignerError::Io { .. }));
        assert!(DesignerConfig::load_or_default(None).is_ok());
    }
}

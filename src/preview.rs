//! Off-screen previews: play a key script against a tree and render the result.

use std::path::Path;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay};
use menu_common::widgets::{MenuFrame, draw_menu};
use menu_common::{DisplayProfile, MenuTree, NavCommand, NavOutcome, NavigationController};
use tracing::{debug, info};

use crate::error::{DesignerError, Result};

/// Parse a key script such as `"down,down,enter"` (commas or whitespace).
pub fn parse_keys(script: &str) -> Result<Vec<NavCommand>> {
    script
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| NavCommand::parse(token).ok_or_else(|| DesignerError::UnknownKey(token.to_owned())))
        .collect()
}

/// Navigation state after a key script, ready to draw.
pub struct Preview {
    profile: DisplayProfile,
    family: String,
    frame: MenuFrame,
    breadcrumb: Vec<String>,
}

impl Preview {
    /// Replay `keys` from the root. Invoked callbacks only show their popup.
    pub fn run(
        tree: &mut MenuTree,
        profile: DisplayProfile,
        family: impl Into<String>,
        keys: &[NavCommand],
    ) -> Self {
        let mut nav = NavigationController::new(tree, profile.capacity());
        let mut popup = None;
        for key in keys {
            let outcome = nav.apply(tree, *key);
            debug!(?key, ?outcome, "preview key");
            popup = match outcome {
                NavOutcome::Invoke { callback, .. } => Some(callback),
                NavOutcome::Unchanged => popup,
                _ => None,
            };
        }

        let mut frame = MenuFrame::capture(tree, &nav);
        if let Some(callback) = popup {
            frame = frame.with_popup(callback);
        }
        Self {
            profile,
            family: family.into(),
            frame,
            breadcrumb: nav.breadcrumb(tree),
        }
    }

    #[inline]
    pub const fn frame(&self) -> &MenuFrame { &self.frame }

    /// Names from the root to the shown submenu.
    #[inline]
    pub fn breadcrumb(&self) -> &[String] { &self.breadcrumb }

    pub fn draw<D>(
        &self,
        display: &mut D,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        draw_menu(display, &self.profile, &self.family, &self.frame);
    }

    /// Framebuffer at the profile's native size.
    pub fn render(&self) -> SimulatorDisplay<Rgb565> {
        let mut display = SimulatorDisplay::new(Size::new(self.profile.width, self.profile.height));
        self.draw(&mut display);
        display
    }

    /// Render and write a PNG, each panel pixel `scale` x `scale`.
    pub fn save_png(
        &self,
        path: &Path,
        scale: u32,
    ) -> Result<()> {
        let display = self.render();
        let settings = OutputSettingsBuilder::new().scale(scale.max(1)).build();
        display
            .to_rgb_output_image(&settings)
            .save_png(path)
            .map_err(|err| DesignerError::Image {
                path: path.to_owned(),
                reason: err.to_string(),
            })?;
        info!(path = %path.display(), scale, "preview written");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use menu_common::MenuNode;

    fn tree() -> MenuTree {
        let mut tree = MenuTree::new("Main");
        let root = tree.root();
        let settings = tree.add_child(root, MenuNode::new("Settings")).unwrap();
        tree.add_child(settings, MenuNode::new("Contrast")).unwrap();
        let about = tree.add_child(root, MenuNode::new("About")).unwrap();
        tree.set_callback_name(about, "on_about");
        tree
    }

    #[test]
    fn test_parse_keys() {
        let keys = parse_keys("down, down enter,left").unwrap();
        assert_eq!(keys, vec![NavCommand::Down, NavCommand::Down, NavCommand::Enter, NavCommand::Back]);
        assert!(parse_keys("").unwrap().is_empty());
        assert!(matches!(parse_keys("down,jump"), Err(DesignerError::UnknownKey(key)) if key == "jump"));
    }

    #[test]
    fn test_script_descends_and_shows_breadcrumb() {
        let mut tree = tree();
        let preview = Preview::run(&mut tree, DisplayProfile::default(), "mono", &[NavCommand::Enter]);
        assert_eq!(preview.breadcrumb(), ["Main", "Settings"]);
        assert_eq!(preview.frame().rows.len(), 1);
        assert_eq!(preview.frame().rows[0].label, "Contrast");
        assert!(preview.frame().popup.is_none());
    }

    #[test]
    fn test_invoke_leaves_popup() {
        let mut tree = tree();
        let preview = Preview::run(&mut tree, DisplayProfile::default(), "mono", &[
            NavCommand::Down,
            NavCommand::Enter,
        ]);
        assert_eq!(preview.frame().popup.as_deref(), Some("on_about"));
    }

    #[test]
    fn test_render_highlights_selected_row() {
        let mut tree = tree();
        let profile = DisplayProfile::default();
        let preview = Preview::run(&mut tree, profile, "mono", &[NavCommand::Down]);
        let display = preview.render();
        let line = profile.line_height() as i32;
        let x = profile.width as i32 - 3;
        assert_eq!(display.get_pixel(Point::new(x, line)), profile.theme.highlight);
        assert_eq!(display.get_pixel(Point::new(x, 0)), profile.theme.background);
    }

    #[test]
    fn test_save_png_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("menu.png");
        let mut tree = tree();
        Preview::run(&mut tree, DisplayProfile::default(), "mono", &[]).save_png(&path, 2).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"\x89PNG"));
    }

    #[test]
    fn test_save_png_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("menu.png");
        let mut tree = tree();
        let err = Preview::run(&mut tree, DisplayProfile::default(), "mono", &[]).save_png(&path, 1).unwrap_err();
        assert!(matches!(err, DesignerError::Image { .. }));
    }
}

//! Interactive designer preview.
//!
//! [`Simulator`] owns the editing session and turns [`SimAction`]s into navigation,
//! edits and redraws. The SDL window loop is behind the `sdl` feature.
//!
//! # Controls
//!
//! | Key | Action |
//! |-----|--------|
//! | `Up` / `Down` | Move the cursor |
//! | `Enter` / `Right` | Open submenu or run entry |
//! | `Backspace` / `Left` / `Esc` | Back to parent |
//! | `N` | Add an entry to the shown submenu |
//! | `Delete` | Remove the highlighted entry |
//! | `T` | Toggle executable on the highlighted entry |
//! | `H` | Hide the highlighted entry |
//! | `S` | Save the project file |
//! | `Q` | Quit |
//!
//! Key repeat is honored for cursor movement only.

use std::path::PathBuf;
use std::time::Instant;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use menu_common::widgets::{MenuFrame, draw_menu};
use menu_common::{DesignerSession, DisplayProfile, EditCommand, MenuTree, NavCommand, NavOutcome};
use tracing::{debug, info};

use crate::error::Result;
use crate::project;
use crate::render::RenderState;

/// Name given to entries added from the keyboard.
const NEW_ENTRY_NAME: &str = "New item";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SimAction {
    Nav(NavCommand),
    AddEntry,
    RemoveEntry,
    ToggleExec,
    HideEntry,
    Save,
    Quit,
}

pub struct Simulator {
    session: DesignerSession,
    render: RenderState,
    profile: DisplayProfile,
    family: String,
    project: Option<PathBuf>,
}

impl Simulator {
    pub fn new(
        tree: MenuTree,
        profile: DisplayProfile,
        family: impl Into<String>,
        project: Option<PathBuf>,
    ) -> Self {
        Self {
            session: DesignerSession::new(tree, profile.capacity()),
            render: RenderState::new(),
            profile,
            family: family.into(),
            project,
        }
    }

    #[inline]
    pub const fn session(&self) -> &DesignerSession { &self.session }

    #[inline]
    pub const fn profile(&self) -> &DisplayProfile { &self.profile }

    /// Point the session's selection at the highlighted entry.
    fn select_highlighted(&mut self) -> bool {
        match self.session.nav().selected(self.session.tree()) {
            Some(id) => self.session.edit(EditCommand::Select(id)),
            None => false,
        }
    }

    /// Apply one action. Returns `false` when the simulator should exit.
    pub fn handle(
        &mut self,
        action: SimAction,
        now: Instant,
    ) -> Result<bool> {
        let edited = match action {
            SimAction::Nav(command) => {
                let outcome = self.session.navigate(command);
                if let NavOutcome::Invoke { callback, .. } = &outcome {
                    info!(callback = %callback, "entry invoked");
                }
                self.render.record(&outcome, now);
                false
            }
            SimAction::AddEntry => {
                let current = self.session.nav().current();
                self.session.edit(EditCommand::Select(current))
                    && self.session.edit(EditCommand::AddChild {
                        name: NEW_ENTRY_NAME.to_owned(),
                    })
            }
            SimAction::RemoveEntry => self.select_highlighted() && self.session.edit(EditCommand::Remove),
            SimAction::ToggleExec => self.select_highlighted() && self.session.edit(EditCommand::ToggleExec),
            SimAction::HideEntry => self.select_highlighted() && self.session.edit(EditCommand::SetVisible(false)),
            SimAction::Save => {
                match &self.project {
                    Some(path) => project::save_tree(path, self.session.tree())?,
                    None => debug!("no project file, save skipped"),
                }
                false
            }
            SimAction::Quit => return Ok(false),
        };
        if edited {
            self.render.mark_dirty();
        }
        Ok(true)
    }

    /// Repaint if anything changed since the last frame. Returns whether it drew.
    pub fn frame<D>(
        &mut self,
        display: &mut D,
        now: Instant,
    ) -> bool
    where
        D: DrawTarget<Color = Rgb565>,
    {
        self.render.tick(now);
        if !self.render.needs_redraw() {
            return false;
        }
        let mut frame = MenuFrame::capture(self.session.tree(), self.session.nav());
        if let Some(popup) = self.render.popup() {
            frame = frame.with_popup(popup.callback());
        }
        draw_menu(display, &self.profile, &self.family, &frame);
        self.render.end_frame();
        true
    }
}

// =============================================================================
// SDL Window
// =============================================================================

#[cfg(feature = "sdl")]
mod window {
    use std::thread;
    use std::time::Instant;

    use embedded_graphics::pixelcolor::Rgb565;
    use embedded_graphics::prelude::*;
    use embedded_graphics_simulator::sdl2::Keycode;
    use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};
    use menu_common::NavCommand;

    use super::{SimAction, Simulator};
    use crate::config::{FRAME_TIME, PREVIEW_SCALE};
    use crate::error::Result;

    fn action_for(
        keycode: Keycode,
        repeat: bool,
    ) -> Option<SimAction> {
        let action = match keycode {
            Keycode::Up => SimAction::Nav(NavCommand::Up),
            Keycode::Down => SimAction::Nav(NavCommand::Down),
            Keycode::Return | Keycode::Right => SimAction::Nav(NavCommand::Enter),
            Keycode::Backspace | Keycode::Left | Keycode::Escape => SimAction::Nav(NavCommand::Back),
            Keycode::N => SimAction::AddEntry,
            Keycode::Delete => SimAction::RemoveEntry,
            Keycode::T => SimAction::ToggleExec,
            Keycode::H => SimAction::HideEntry,
            Keycode::S => SimAction::Save,
            Keycode::Q => SimAction::Quit,
            _ => return None,
        };
        // Holding a key only repeats cursor movement
        let repeatable = matches!(action, SimAction::Nav(NavCommand::Up | NavCommand::Down));
        (!repeat || repeatable).then_some(action)
    }

    pub fn run(mut sim: Simulator) -> Result<()> {
        let profile = *sim.profile();
        let mut display: SimulatorDisplay<Rgb565> = SimulatorDisplay::new(Size::new(profile.width, profile.height));
        let output_settings = OutputSettingsBuilder::new().scale(PREVIEW_SCALE).build();
        let mut window = Window::new(&format!("Menu Designer ({})", profile.kind), &output_settings);

        loop {
            let frame_start = Instant::now();

            for ev in window.events() {
                match ev {
                    SimulatorEvent::Quit => return Ok(()),
                    SimulatorEvent::KeyDown { keycode, repeat, .. } => {
                        let Some(action) = action_for(keycode, repeat) else {
                            continue;
                        };
                        if !sim.handle(action, frame_start)? {
                            return Ok(());
                        }
                    }
                    _ => {}
                }
            }

            sim.frame(&mut display, frame_start);
            window.update(&display);

            let elapsed = frame_start.elapsed();
            if let Some(rest) = FRAME_TIME.checked_sub(elapsed) {
                thread::sleep(rest);
            }
        }
    }
}

#[cfg(feature = "sdl")]
pub use window::run;

// =============================================================================
// Unit Tests
// =============================================================================

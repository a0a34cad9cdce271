//! Menu designer for small embedded displays.
//!
//! Builds on [`menu_common`] (tree, navigation, glyphs, widgets) and adds everything
//! that touches the outside world:
//!
//! - [`config`]: TOML designer configuration
//! - [`project`]: JSON menu files
//! - [`fonts`]: `fontdue` TrueType/OpenType backend for CJK subsets
//! - [`codegen`]: C source generation
//! - [`export`]: Glyph tables + codegen + staged writer
//! - [`preview`]: Key-script PNG previews
//! - [`render`] / [`sim`]: Interactive preview state (SDL window behind `sdl`)
//! - [`error`]: Error type for all of the above
//!
//! # Export Layout
//!
//! ```text
//! <dest>/
//! ├── inc/  menu.h  menu_callbacks.h  [menu_font_ascii.h]  [menu_font_cjk.h]  [menu_port.h]
//! └── src/  menu.c  menu_callbacks.c  [menu_font_ascii.c]  [menu_font_cjk.c]  [menu_port.c]
//! ```

// Crate-level lints
#![allow(clippy::cast_possible_truncation)] // usize/u32 -> i32 pixel math
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)] // u32 -> f32 font sizes

pub mod codegen;
pub mod config;
pub mod error;
pub mod export;
pub mod fonts;
pub mod preview;
pub mod project;
pub mod render;
pub mod sim;

pub use config::DesignerConfig;
pub use error::{DesignerError, Result};
pub use export::{ExportJob, ExportReport};

//! Menu model and display logic shared by the designer, its previews and the C exporter.
//!
//! This crate holds everything that does not touch the file system or a window:
//!
//! - [`tree`]: Menu tree arena with leaf normalization
//! - [`snapshot`]: Serializable tree shape used for save/load
//! - [`viewport`]: Sticky-window scroller and line capacity
//! - [`navigation`]: Up/Down/Enter/Back state machine
//! - [`session`]: Edit and navigation command pipeline
//! - [`glyph`]: Glyph rasterizer and the built-in mono-font backend
//! - [`font_subset`]: ASCII and CJK glyph tables
//! - [`config`]: Display profiles and layout constants
//! - [`colors`]: Preview color themes
//! - [`styles`]: Mono font selection for preview text
//! - [`widgets`]: `DrawTarget`-generic menu rendering
//!
//! Everything is single-threaded and synchronous. Tree and navigation operations are
//! total: invalid handles and out-of-range cursors resolve to no-ops or clamps.

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod colors;
pub mod config;
pub mod font_subset;
pub mod glyph;
pub mod navigation;
pub mod session;
pub mod snapshot;
pub mod styles;
pub mod tree;
pub mod viewport;
pub mod widgets;

// Re-export commonly used items
pub use config::{DisplayProfile, ScreenKind};
pub use navigation::{NavCommand, NavOutcome, NavigationController};
pub use session::{DesignerSession, EditCommand};
pub use tree::{LeafPolicy, MenuNode, MenuTree, NodeId};

//! Error type for everything that touches the file system.
//!
//! The menu model itself never fails; only loading inputs (snapshots, config, fonts)
//! and writing exports can.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DesignerError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid menu snapshot {path}: {source}")]
    Snapshot {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("cannot load font {path}: {reason}")]
    Font { path: PathBuf, reason: String },

    #[error("invalid export destination {path}: {reason}")]
    Destination { path: PathBuf, reason: String },

    #[error("cannot encode preview image {path}: {reason}")]
    Image { path: PathBuf, reason: String },

    #[error("unknown key {0:?} (expected up, down, enter/right, back/left)")]
    UnknownKey(String),

    #[error("unknown display profile {0:?}")]
    UnknownProfile(String),
}

impl DesignerError {
    pub fn io(
        path: impl Into<PathBuf>,
        source: io::Error,
    ) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn destination(
        path: impl Into<PathBuf>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Destination {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DesignerError>;

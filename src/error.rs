//! Error taxonomy shared by the core, the scene providers and the runner.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptionError {
    /// Non-positive resolution/block size or an inconsistent frame range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The object has no bounding box that can be projected.
    #[error("object '{object}' has no usable bounding box")]
    MissingGeometry { object: String },

    /// The camera's view-projection cannot be inverted.
    #[error("frame {frame:03}: camera view-projection is singular")]
    DegenerateCamera { frame: u32 },

    #[error("scene: {0}")]
    Scene(String),

    #[error("failed to read config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("I/O failure on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CaptionError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = CaptionError> = std::result::Result<T, E>;

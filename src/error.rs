//! Error types for image/pose synchronization.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading inputs or building a manifest.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A required input file or folder does not exist.
    #[error("{kind} '{}' does not exist", .path.display())]
    MissingInput {
        /// What the input is, e.g. "calibration file".
        kind: &'static str,
        /// The offending path.
        path: PathBuf,
    },

    /// A pose row is missing a field or holds a non-finite value.
    #[error("malformed pose sample at line {line}: {reason}")]
    MalformedSample {
        /// 1-based line number in the pose table (header is line 1).
        line: usize,
        /// What was wrong with the row.
        reason: String,
    },

    /// The calibration document does not describe a pinhole camera.
    #[error("invalid calibration: {0}")]
    InvalidCalibration(String),

    /// Bad glob pattern built from an image folder path.
    #[error("invalid image pattern: {0}")]
    Glob(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

impl SyncError {
    /// Creates a missing input error.
    #[must_use]
    pub fn missing_input(kind: &'static str, path: impl Into<PathBuf>) -> Self {
        Self::MissingInput {
            kind,
            path: path.into(),
        }
    }

    /// Creates a malformed sample error.
    #[must_use]
    pub fn malformed_sample(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedSample {
            line,
            reason: reason.into(),
        }
    }

    /// Creates an invalid calibration error.
    #[must_use]
    pub fn invalid_calibration(reason: impl Into<String>) -> Self {
        Self::InvalidCalibration(reason.into())
    }
}

/// Result type for synchronization operations.
pub type Result<T> = std::result::Result<T, SyncError>;

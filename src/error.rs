//! Error types for background removal runs

use crate::remover::TransformError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for background removal runs
pub type Result<T> = std::result::Result<T, RemovalError>;

/// The stage of a run at which a failure occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    /// Building the runner or its backend
    Configuration,
    /// Reading the input image
    InputRead,
    /// Inside the background removal capability
    Transform,
    /// Writing the output image
    OutputWrite,
}

impl std::fmt::Display for FailureStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration => write!(f, "configuration"),
            Self::InputRead => write!(f, "input read"),
            Self::Transform => write!(f, "transform"),
            Self::OutputWrite => write!(f, "output write"),
        }
    }
}

/// Errors produced by a background removal run
#[derive(Error, Debug)]
pub enum RemovalError {
    /// The input image could not be read (missing, unreadable, empty)
    #[error("Failed to read input '{}': {}", .path.display(), .source)]
    InputRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The background removal capability failed on the payload
    #[error("Background removal failed: {0}")]
    Transform(#[from] TransformError),

    /// The output image could not be written
    #[error("Failed to write output '{}': {}", .path.display(), .source)]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration or parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Generic error for unexpected conditions
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RemovalError {
    /// Create an input read error for `path`
    pub fn input_read<P: AsRef<Path>>(path: P, source: std::io::Error) -> Self {
        Self::InputRead {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create an output write error for `path`
    pub fn output_write<P: AsRef<Path>>(path: P, source: std::io::Error) -> Self {
        Self::OutputWrite {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// Stage of the run this error belongs to
    #[must_use]
    pub fn stage(&self) -> FailureStage {
        match self {
            Self::InputRead { .. } => FailureStage::InputRead,
            Self::Transform(_) => FailureStage::Transform,
            Self::OutputWrite { .. } => FailureStage::OutputWrite,
            Self::InvalidConfig(_) | Self::Internal(_) => FailureStage::Configuration,
        }
    }
}

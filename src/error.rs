//! Error types for the smoothing pipeline.
//!
//! Degenerate geometry is not represented here: the rotation engine resolves
//! it locally and never fails.

use std::path::PathBuf;

use thiserror::Error;

use crate::pose::LandmarkGroup;

/// Structural failure of one track. Other tracks keep going.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SmoothError {
    /// A group's landmark count differs from the count its channels were
    /// allocated with.
    #[error("frame {frame}: {group} has {found} landmarks, channels were initialized for {expected}")]
    GroupSizeMismatch {
        group: LandmarkGroup,
        expected: usize,
        found: usize,
        frame: u64,
    },

    /// Frame indices must strictly increase within a track.
    #[error("frame {found} does not follow frame {previous}")]
    FrameOrder { previous: u64, found: u64 },
}

/// Malformed or unreadable boundary documents. Aborts the run.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed document {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

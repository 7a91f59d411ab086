//! JSON documents exchanged with the extraction and export stages.
//!
//! Landmark documents map a track id to its frames, rotation documents map a
//! track id to its rotation frames. Track order follows the file.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::error::DocumentError;
use crate::pose::{RotationSet, TrackSet};

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DocumentError> {
    let content = fs::read_to_string(path).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| DocumentError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), DocumentError> {
    let json = serde_json::to_string_pretty(value).map_err(|source| DocumentError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a landmark document held in memory
pub fn parse_tracks(json: &str) -> serde_json::Result<TrackSet> {
    serde_json::from_str(json)
}

pub fn load_tracks<P: AsRef<Path>>(path: P) -> Result<TrackSet, DocumentError> {
    let path = path.as_ref();
    let tracks: TrackSet = read_json(path)?;
    tracing::info!(
        path = %path.display(),
        tracks = tracks.len(),
        frames = tracks.values().map(Vec::len).sum::<usize>(),
        "landmark document loaded"
    );
    Ok(tracks)
}

pub fn save_tracks<P: AsRef<Path>>(path: P, tracks: &TrackSet) -> Result<(), DocumentError> {
    let path = path.as_ref();
    write_json(path, tracks)?;
    tracing::info!(path = %path.display(), tracks = tracks.len(), "landmark document written");
    Ok(())
}

pub fn load_rotations<P: AsRef<Path>>(path: P) -> Result<RotationSet, DocumentError> {
    read_json(path.as_ref())
}

pub fn save_rotations<P: AsRef<Path>>(path: P, rotations: &RotationSet) -> Result<(), DocumentError> {
    let path = path.as_ref();
    write_json(path, rotations)?;
    tracing::info!(path = %path.display(), tracks = rotations.len(), "rotation document written");
    Ok(())
}

//! Sequence orchestration: runs the smoothing and rotation engines over every
//! track of a document.
//!
//! Tracks share no state, so they may run on the rayon pool; results are
//! collected back in input order either way.

use rayon::prelude::*;

use crate::config::{Config, FilterConfig};
use crate::error::{ConfigError, SmoothError};
use crate::pose::{Frame, RotationSet, TrackId, TrackSet};
use crate::skeleton::Skeleton;
use crate::tracker::{RotationEstimator, TrackSmoother};

/// A track dropped from the smoothed output
#[derive(Debug, Clone, PartialEq)]
pub struct TrackFailure {
    pub track: TrackId,
    pub error: SmoothError,
}

#[derive(Debug, Clone, Default)]
pub struct SmoothOutcome {
    /// Successfully smoothed tracks, input order
    pub tracks: TrackSet,
    pub failures: Vec<TrackFailure>,
}

#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub smoothed: TrackSet,
    pub rotations: RotationSet,
    pub failures: Vec<TrackFailure>,
}

impl RunReport {
    pub fn rotation_frames(&self) -> usize {
        self.rotations.values().map(Vec::len).sum()
    }
}

fn map_tracks<T, F>(tracks: &TrackSet, parallel: bool, f: F) -> Vec<(TrackId, T)>
where
    T: Send,
    F: Fn(&str, &[Frame]) -> T + Sync + Send,
{
    let entries: Vec<(&TrackId, &Vec<Frame>)> = tracks.iter().collect();
    if parallel {
        entries
            .par_iter()
            .map(|(id, frames)| ((*id).clone(), f(id, frames)))
            .collect()
    } else {
        entries
            .iter()
            .map(|(id, frames)| ((*id).clone(), f(id, frames)))
            .collect()
    }
}

/// Smooth every track independently. A structural failure drops only that
/// track; an invalid filter configuration refuses the whole batch.
pub fn smooth_tracks(
    tracks: &TrackSet,
    config: &FilterConfig,
    parallel: bool,
) -> Result<SmoothOutcome, ConfigError> {
    config.validate()?;
    let results = map_tracks(tracks, parallel, |id, frames| {
        tracing::info!(track = id, frames = frames.len(), "smoothing track");
        let result = TrackSmoother::smooth_track(config, frames);
        if let Ok(smoothed) = &result {
            tracing::info!(track = id, frames = smoothed.len(), "track smoothed");
        }
        result
    });

    let mut outcome = SmoothOutcome::default();
    for (track, result) in results {
        match result {
            Ok(frames) => {
                outcome.tracks.insert(track, frames);
            }
            Err(error) => {
                tracing::warn!(track = %track, %error, "track dropped");
                outcome.failures.push(TrackFailure { track, error });
            }
        }
    }
    Ok(outcome)
}

/// Bone rotations for every track. Frames without a usable pose produce no
/// entry; this never fails.
pub fn estimate_tracks(
    tracks: &TrackSet,
    skeleton: &Skeleton,
    expected_landmarks: usize,
    parallel: bool,
) -> RotationSet {
    let estimator = RotationEstimator::new(skeleton, expected_landmarks);
    map_tracks(tracks, parallel, |id, frames| {
        let rotations = estimator.estimate_track(frames);
        tracing::info!(
            track = id,
            frames = frames.len(),
            rotation_frames = rotations.len(),
            "rotations computed"
        );
        rotations
    })
    .into_iter()
    .collect()
}

/// Smoothing followed by rotation estimation on the surviving tracks
pub fn run(tracks: &TrackSet, config: &Config) -> Result<RunReport, ConfigError> {
    config.validate()?;
    let skeleton = Skeleton::mediapipe();
    let parallel = config.run.parallel;

    let SmoothOutcome { tracks: smoothed, failures } = smooth_tracks(tracks, &config.filter, parallel)?;
    let rotations = estimate_tracks(
        &smoothed,
        &skeleton,
        config.rotation.expected_pose_landmarks,
        parallel,
    );

    let report = RunReport {
        smoothed,
        rotations,
        failures,
    };
    tracing::info!(
        tracks = tracks.len(),
        smoothed = report.smoothed.len(),
        failed = report.failures.len(),
        rotation_frames = report.rotation_frames(),
        "run finished"
    );
    Ok(report)
}

#![allow(dead_code)]

use mocap_rig::pose::{Frame, Landmark, LandmarkGroup, Landmarks, PoseLandmark, Track};

/// Standing T-pose, +X is the subject's left, +Y up
pub fn t_pose() -> Vec<Landmark> {
    use PoseLandmark::*;
    let mut pose = vec![Landmark::new(0.0, 0.6, 0.0, 0.9); PoseLandmark::COUNT];
    for (lm, x, y) in [
        (Nose, 0.0, 0.7),
        (LeftShoulder, 0.2, 0.5),
        (RightShoulder, -0.2, 0.5),
        (LeftElbow, 0.5, 0.5),
        (RightElbow, -0.5, 0.5),
        (LeftWrist, 0.8, 0.5),
        (RightWrist, -0.8, 0.5),
        (LeftHip, 0.1, 0.0),
        (RightHip, -0.1, 0.0),
        (LeftKnee, 0.1, -0.45),
        (RightKnee, -0.1, -0.45),
        (LeftAnkle, 0.1, -0.9),
        (RightAnkle, -0.1, -0.9),
    ] {
        pose[lm.index()] = Landmark::new(x, y, 0.0, 0.9);
    }
    pose
}

/// Deterministic pseudo-noise in [-amplitude, amplitude]
pub fn jitter(frame: u64, channel: usize, amplitude: f64) -> f64 {
    let phase = frame as f64 * 12.9898 + channel as f64 * 78.233;
    amplitude * (phase.sin() * 43758.5453).fract()
}

pub fn noisy_pose(frame: u64, amplitude: f64) -> Vec<Landmark> {
    t_pose()
        .into_iter()
        .enumerate()
        .map(|(i, lm)| {
            Landmark::new(
                lm.x + jitter(frame, i * 3, amplitude),
                lm.y + jitter(frame, i * 3 + 1, amplitude),
                lm.z + jitter(frame, i * 3 + 2, amplitude),
                lm.visibility,
            )
        })
        .collect()
}

pub fn pose_frame(index: u64, pose: Vec<Landmark>) -> Frame {
    Frame::new(index, Landmarks::default().with(LandmarkGroup::Pose, pose))
}

pub fn noisy_track(indices: &[u64], amplitude: f64) -> Track {
    indices
        .iter()
        .map(|&i| pose_frame(i, noisy_pose(i, amplitude)))
        .collect()
}

pub fn hand(count: usize, frame: u64) -> Vec<Landmark> {
    (0..count)
        .map(|i| Landmark::new(0.8 + 0.01 * i as f64, 0.5 + jitter(frame, i, 0.01), 0.0, 1.0))
        .collect()
}

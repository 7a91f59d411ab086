use nalgebra::{Unit, UnitQuaternion};

use crate::config::RotationConfig;
use crate::geometry::{basis_to_quaternion, direction, rotation_between, Direction, MIN_LENGTH};
use crate::pose::{Frame, Landmark, PoseLandmark, RotationFrame};
use crate::skeleton::{BoneDefinition, Skeleton};

fn landmark_direction(pose: &[Landmark], start: PoseLandmark, end: PoseLandmark) -> Option<Direction> {
    direction(pose.get(start.index())?, pose.get(end.index())?)
}

/// Global bone orientations from smoothed pose landmarks
pub struct RotationEstimator<'a> {
    skeleton: &'a Skeleton,
    expected_landmarks: usize,
}

impl<'a> RotationEstimator<'a> {
    pub fn new(skeleton: &'a Skeleton, expected_landmarks: usize) -> Self {
        if expected_landmarks < skeleton.required_landmarks() {
            tracing::warn!(
                expected_landmarks,
                required = skeleton.required_landmarks(),
                "pose landmark count too small for the bone table, some bones will never resolve"
            );
        }
        Self {
            skeleton,
            expected_landmarks,
        }
    }

    pub fn from_config(skeleton: &'a Skeleton, config: &RotationConfig) -> Self {
        Self::new(skeleton, config.expected_pose_landmarks)
    }

    /// Rotations for one frame, `None` when the frame has no usable pose.
    ///
    /// Bones whose direction cannot be formed are left out of the result.
    pub fn estimate_frame(&self, frame: &Frame) -> Option<RotationFrame> {
        let Some(pose) = frame.pose() else {
            tracing::debug!(frame = frame.frame_index, "no pose landmarks, frame skipped");
            return None;
        };
        if pose.len() != self.expected_landmarks {
            tracing::debug!(
                frame = frame.frame_index,
                found = pose.len(),
                expected = self.expected_landmarks,
                "unexpected pose landmark count, frame skipped"
            );
            return None;
        }

        let mut rotations = RotationFrame::new(frame.frame_index);
        for bone in self.skeleton.bones() {
            let rotation = if bone.is_root() {
                self.root_orientation(bone, pose)
            } else {
                Self::bone_rotation(bone, pose)
            };
            match rotation {
                Some(q) => rotations.insert(bone.name, &q),
                None => tracing::trace!(bone = bone.name, frame = frame.frame_index, "degenerate bone skipped"),
            }
        }
        Some(rotations)
    }

    /// One entry per frame with a usable pose, input order kept
    pub fn estimate_track(&self, frames: &[Frame]) -> Vec<RotationFrame> {
        frames.iter().filter_map(|f| self.estimate_frame(f)).collect()
    }

    /// Pelvis orientation from the hip line and the up hint.
    ///
    /// right = hip line, forward = up_hint × right, up = right × forward.
    /// Columns (right, up, -forward) form the rotation.
    fn root_orientation(&self, bone: &BoneDefinition, pose: &[Landmark]) -> Option<UnitQuaternion<f64>> {
        let right = landmark_direction(pose, bone.start, bone.end)?;
        let (hint_start, hint_end) = self.skeleton.up_hint();
        let up_hint = landmark_direction(pose, hint_start, hint_end)?;

        // Hip line parallel to the up hint leaves forward undefined
        let forward = Unit::try_new(up_hint.cross(&right.into_inner()), MIN_LENGTH)?;
        let up = Unit::new_normalize(right.cross(&forward.into_inner()));
        let back = Unit::new_unchecked(-forward.into_inner());
        Some(basis_to_quaternion(&right, &up, &back))
    }

    fn bone_rotation(bone: &BoneDefinition, pose: &[Landmark]) -> Option<UnitQuaternion<f64>> {
        let observed = landmark_direction(pose, bone.start, bone.end)?;
        Some(rotation_between(&bone.reference, &observed))
    }
}

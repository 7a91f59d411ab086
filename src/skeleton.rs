use nalgebra::{Unit, Vector3};

use crate::geometry::Direction;
use crate::pose::PoseLandmark;

/// How a bone's rest orientation is described
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoneCategory {
    /// Pelvis. Oriented from a full basis, not a single direction
    Root,
    /// Spine, neck, head: up (+Y)
    Axial,
    /// Left arm: +X
    LeftArm,
    /// Right arm: -X
    RightArm,
    /// Legs: down (-Y)
    Leg,
}

impl BoneCategory {
    /// T-pose direction of bones in this category
    pub fn reference_direction(self) -> Direction {
        match self {
            BoneCategory::Root | BoneCategory::Axial => Vector3::y_axis(),
            BoneCategory::LeftArm => Vector3::x_axis(),
            BoneCategory::RightArm => Unit::new_unchecked(-Vector3::x()),
            BoneCategory::Leg => Unit::new_unchecked(-Vector3::y()),
        }
    }
}

/// Skeletal segment between two pose landmarks
#[derive(Debug, Clone, PartialEq)]
pub struct BoneDefinition {
    pub name: &'static str,
    pub start: PoseLandmark,
    /// Same as `start` for terminal bones
    pub end: PoseLandmark,
    pub category: BoneCategory,
    pub reference: Direction,
}

impl BoneDefinition {
    pub fn new(name: &'static str, start: PoseLandmark, end: PoseLandmark, category: BoneCategory) -> Self {
        Self {
            name,
            start,
            end,
            category,
            reference: category.reference_direction(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.category == BoneCategory::Root
    }
}

/// Immutable bone table plus the landmarks that define the root basis.
///
/// Built once per run and shared by reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Skeleton {
    bones: Vec<BoneDefinition>,
    /// Pelvis → shoulder landmarks giving the root's up hint
    up_hint: (PoseLandmark, PoseLandmark),
}

impl Skeleton {
    pub fn new(bones: Vec<BoneDefinition>, up_hint: (PoseLandmark, PoseLandmark)) -> Self {
        Self { bones, up_hint }
    }

    /// Twelve-bone humanoid over the MediaPipe pose topology.
    ///
    /// Hips run right hip → left hip (the root's lateral axis); the up hint
    /// runs right hip → right shoulder. `spine` follows the shoulder line.
    /// `head` is a self-pair and so never yields a direction.
    pub fn mediapipe() -> Self {
        use BoneCategory::*;
        use PoseLandmark::*;
        let bones = vec![
            BoneDefinition::new("hips", RightHip, LeftHip, Root),
            BoneDefinition::new("spine", RightShoulder, LeftShoulder, Axial),
            BoneDefinition::new("neck", RightShoulder, Nose, Axial),
            BoneDefinition::new("head", Nose, Nose, Axial),
            BoneDefinition::new("left_upper_arm", LeftShoulder, LeftElbow, LeftArm),
            BoneDefinition::new("left_lower_arm", LeftElbow, LeftWrist, LeftArm),
            BoneDefinition::new("right_upper_arm", RightShoulder, RightElbow, RightArm),
            BoneDefinition::new("right_lower_arm", RightElbow, RightWrist, RightArm),
            BoneDefinition::new("left_upper_leg", LeftHip, LeftKnee, Leg),
            BoneDefinition::new("left_lower_leg", LeftKnee, LeftAnkle, Leg),
            BoneDefinition::new("right_upper_leg", RightHip, RightKnee, Leg),
            BoneDefinition::new("right_lower_leg", RightKnee, RightAnkle, Leg),
        ];
        Self::new(bones, (RightHip, RightShoulder))
    }

    /// Bones in emission order
    pub fn bones(&self) -> &[BoneDefinition] {
        &self.bones
    }

    pub fn bone(&self, name: &str) -> Option<&BoneDefinition> {
        self.bones.iter().find(|b| b.name == name)
    }

    pub fn up_hint(&self) -> (PoseLandmark, PoseLandmark) {
        self.up_hint
    }

    /// Smallest pose landmark count every bone can be read from
    pub fn required_landmarks(&self) -> usize {
        self.bones
            .iter()
            .flat_map(|b| [b.start, b.end])
            .chain([self.up_hint.0, self.up_hint.1])
            .map(|lm| lm.index() + 1)
            .max()
            .unwrap_or(0)
    }
}

impl Default for Skeleton {
    fn default() -> Self {
        Self::mediapipe()
    }
}

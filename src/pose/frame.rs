use std::fmt;

use indexmap::IndexMap;
use nalgebra::{Quaternion, UnitQuaternion};
use serde::{Deserialize, Deserializer, Serialize};

use super::landmark::Landmark;

/// Named landmark set produced by the holistic detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkGroup {
    Pose,
    Face,
    LeftHand,
    RightHand,
}

impl LandmarkGroup {
    pub const COUNT: usize = 4;

    pub const ALL: [LandmarkGroup; Self::COUNT] = [
        LandmarkGroup::Pose,
        LandmarkGroup::Face,
        LandmarkGroup::LeftHand,
        LandmarkGroup::RightHand,
    ];

    /// Slot in per-group arrays
    pub fn slot(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            LandmarkGroup::Pose => "pose",
            LandmarkGroup::Face => "face",
            LandmarkGroup::LeftHand => "left_hand",
            LandmarkGroup::RightHand => "right_hand",
        }
    }
}

impl fmt::Display for LandmarkGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `null` and `[]` both mean the group was not detected.
fn absent_if_empty<'de, D>(deserializer: D) -> Result<Option<Vec<Landmark>>, D::Error>
where
    D: Deserializer<'de>,
{
    let list = Option::<Vec<Landmark>>::deserialize(deserializer)?;
    Ok(list.filter(|l| !l.is_empty()))
}

/// Landmarks of one frame, one optional list per group
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Landmarks {
    #[serde(default, deserialize_with = "absent_if_empty", skip_serializing_if = "Option::is_none")]
    pub pose: Option<Vec<Landmark>>,
    #[serde(default, deserialize_with = "absent_if_empty", skip_serializing_if = "Option::is_none")]
    pub face: Option<Vec<Landmark>>,
    #[serde(default, deserialize_with = "absent_if_empty", skip_serializing_if = "Option::is_none")]
    pub left_hand: Option<Vec<Landmark>>,
    #[serde(default, deserialize_with = "absent_if_empty", skip_serializing_if = "Option::is_none")]
    pub right_hand: Option<Vec<Landmark>>,
}

impl Landmarks {
    pub fn get(&self, group: LandmarkGroup) -> Option<&[Landmark]> {
        self.slot(group).as_deref()
    }

    pub fn set(&mut self, group: LandmarkGroup, landmarks: Option<Vec<Landmark>>) {
        *self.slot_mut(group) = landmarks.filter(|l| !l.is_empty());
    }

    pub fn with(mut self, group: LandmarkGroup, landmarks: Vec<Landmark>) -> Self {
        self.set(group, Some(landmarks));
        self
    }

    /// Present groups in `LandmarkGroup::ALL` order
    pub fn iter(&self) -> impl Iterator<Item = (LandmarkGroup, &[Landmark])> {
        LandmarkGroup::ALL
            .into_iter()
            .filter_map(move |g| self.get(g).map(|l| (g, l)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    fn slot(&self, group: LandmarkGroup) -> &Option<Vec<Landmark>> {
        match group {
            LandmarkGroup::Pose => &self.pose,
            LandmarkGroup::Face => &self.face,
            LandmarkGroup::LeftHand => &self.left_hand,
            LandmarkGroup::RightHand => &self.right_hand,
        }
    }

    fn slot_mut(&mut self, group: LandmarkGroup) -> &mut Option<Vec<Landmark>> {
        match group {
            LandmarkGroup::Pose => &mut self.pose,
            LandmarkGroup::Face => &mut self.face,
            LandmarkGroup::LeftHand => &mut self.left_hand,
            LandmarkGroup::RightHand => &mut self.right_hand,
        }
    }
}

/// `"landmarks": null` is a frame where nothing was detected.
fn empty_if_null<'de, D>(deserializer: D) -> Result<Landmarks, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Landmarks>::deserialize(deserializer)?.unwrap_or_default())
}

/// One video frame of one track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    #[serde(rename = "frame")]
    pub frame_index: u64,
    #[serde(deserialize_with = "empty_if_null")]
    pub landmarks: Landmarks,
}

impl Frame {
    pub fn new(frame_index: u64, landmarks: Landmarks) -> Self {
        Self { frame_index, landmarks }
    }

    pub fn pose(&self) -> Option<&[Landmark]> {
        self.landmarks.get(LandmarkGroup::Pose)
    }
}

pub type TrackId = String;

/// Frames of one tracked person, increasing frame index
pub type Track = Vec<Frame>;

/// Track id → frames, in file order
pub type TrackSet = IndexMap<TrackId, Track>;

/// Global bone orientations of one frame.
///
/// Quaternions are stored `[qx, qy, qz, qw]`; consumers wanting `w` first
/// reorder on their side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RotationFrame {
    #[serde(rename = "frame")]
    pub frame_index: u64,
    pub rotations: IndexMap<String, [f64; 4]>,
}

impl RotationFrame {
    pub fn new(frame_index: u64) -> Self {
        Self {
            frame_index,
            rotations: IndexMap::new(),
        }
    }

    pub fn insert(&mut self, bone: &str, rotation: &UnitQuaternion<f64>) {
        let q = rotation.quaternion();
        self.rotations
            .insert(bone.to_string(), [q.i, q.j, q.k, q.w]);
    }

    pub fn get(&self, bone: &str) -> Option<UnitQuaternion<f64>> {
        self.rotations.get(bone).map(|&[x, y, z, w]| {
            UnitQuaternion::from_quaternion(Quaternion::new(w, x, y, z))
        })
    }
}

pub type RotationSet = IndexMap<TrackId, Vec<RotationFrame>>;

pub mod frame;
pub mod landmark;

pub use frame::{
    Frame, LandmarkGroup, Landmarks, RotationFrame, RotationSet, Track, TrackId, TrackSet,
};
pub use landmark::{Landmark, PoseLandmark};

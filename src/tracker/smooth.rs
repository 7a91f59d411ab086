use crate::config::FilterConfig;
use crate::error::SmoothError;
use crate::pose::{Frame, Landmark, LandmarkGroup, Landmarks};

use super::one_euro::{ChannelState, FilterParams};

const AXES: usize = 3;

/// Filter channels of one landmark group, `landmark * AXES + axis`
#[derive(Debug, Clone)]
struct GroupChannels {
    channels: Vec<ChannelState>,
}

impl GroupChannels {
    /// Channels seeded with the group's first sample
    fn init(landmarks: &[Landmark], timestamp: f64) -> Self {
        let channels = landmarks
            .iter()
            .flat_map(|lm| lm.position())
            .map(|v| ChannelState::new(v, timestamp))
            .collect();
        Self { channels }
    }

    fn landmark_count(&self) -> usize {
        self.channels.len() / AXES
    }

    fn apply(&mut self, params: &FilterParams, landmarks: &[Landmark], timestamp: f64) -> Vec<Landmark> {
        landmarks
            .iter()
            .zip(self.channels.chunks_exact_mut(AXES))
            .map(|(lm, axes)| {
                let raw = lm.position();
                let mut filtered = [0.0; AXES];
                for (axis, state) in axes.iter_mut().enumerate() {
                    filtered[axis] = state.step(params, timestamp, raw[axis]);
                }
                lm.with_position(filtered)
            })
            .collect()
    }
}

/// Adaptive smoothing of one track.
///
/// Channels for a group are allocated the first time the group appears and
/// keep their state while the group is missing: a gap only lengthens the
/// next step's elapsed time.
pub struct TrackSmoother {
    params: FilterParams,
    frame_rate: f64,
    groups: [Option<GroupChannels>; LandmarkGroup::COUNT],
    last_frame: Option<u64>,
}

impl TrackSmoother {
    /// `frame_rate` must be positive. Validate the config first; the pipeline
    /// entry points do.
    pub fn new(params: FilterParams, frame_rate: f64) -> Self {
        Self {
            params,
            frame_rate,
            groups: Default::default(),
            last_frame: None,
        }
    }

    pub fn from_config(config: &FilterConfig) -> Self {
        Self::new(FilterParams::from_config(config), config.frame_rate)
    }

    /// Seconds since frame 0
    pub fn timestamp(&self, frame_index: u64) -> f64 {
        frame_index as f64 / self.frame_rate
    }

    /// Landmark count the group's channels were allocated for
    pub fn channel_count(&self, group: LandmarkGroup) -> Option<usize> {
        self.groups[group.slot()].as_ref().map(|g| g.landmark_count())
    }

    /// Smooth the next frame of the track.
    ///
    /// The frame is checked in full before any channel moves, so a rejected
    /// frame leaves every state as it was.
    pub fn process_frame(&mut self, frame: &Frame) -> Result<Frame, SmoothError> {
        if let Some(previous) = self.last_frame {
            if frame.frame_index <= previous {
                return Err(SmoothError::FrameOrder {
                    previous,
                    found: frame.frame_index,
                });
            }
        }
        for (group, landmarks) in frame.landmarks.iter() {
            if let Some(expected) = self.channel_count(group) {
                if expected != landmarks.len() {
                    return Err(SmoothError::GroupSizeMismatch {
                        group,
                        expected,
                        found: landmarks.len(),
                        frame: frame.frame_index,
                    });
                }
            }
        }

        let timestamp = self.timestamp(frame.frame_index);
        let mut smoothed = Landmarks::default();
        for (group, landmarks) in frame.landmarks.iter() {
            let filtered = if let Some(channels) = self.groups[group.slot()].as_mut() {
                channels.apply(&self.params, landmarks, timestamp)
            } else {
                tracing::trace!(%group, count = landmarks.len(), frame = frame.frame_index, "allocating filter channels");
                self.groups[group.slot()] = Some(GroupChannels::init(landmarks, timestamp));
                landmarks.to_vec()
            };
            smoothed.set(group, Some(filtered));
        }

        self.last_frame = Some(frame.frame_index);
        Ok(Frame::new(frame.frame_index, smoothed))
    }

    /// Smooth a whole track with fresh channels
    pub fn smooth_track(config: &FilterConfig, frames: &[Frame]) -> Result<Vec<Frame>, SmoothError> {
        let mut smoother = Self::from_config(config);
        frames.iter().map(|f| smoother.process_frame(f)).collect()
    }
}

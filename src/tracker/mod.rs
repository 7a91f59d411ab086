pub mod one_euro;
pub mod rotation;
pub mod smooth;

pub use one_euro::{ChannelState, FilterParams};
pub use rotation::RotationEstimator;
pub use smooth::TrackSmoother;

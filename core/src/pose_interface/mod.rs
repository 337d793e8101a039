pub mod frame;
pub mod keypoint;
pub mod message;

pub use frame::PoseFrame;
pub use keypoint::{Keypoint, KeypointIndex};
pub use message::{LegGeometry, PayloadProfile, TelemetryMessage};

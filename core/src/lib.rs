//! Knee-angle tracking core for the camera pose smoke test.
//!
//! Landmarks from an external pose estimator are turned into per-leg knee
//! angles, stabilised by a median/slew-rate smoother that tolerates short
//! detection gaps, and packaged into rate-limited telemetry messages for a
//! last-value sink.

pub mod math;
pub mod pose_interface;
pub mod prelude;
pub mod processing;
pub mod telemetry;

pub use prelude::{Channel, ChannelFilter, Observation, SmootherConfig};

pub mod log;
pub mod metrics;
pub mod throttle;

pub use log::LogManager;
pub use metrics::{ChannelCounts, MetricsRecorder, MetricsSnapshot};
pub use throttle::SendThrottle;

pub mod encoder;
pub mod latest_store;
pub mod smoother;
pub mod tracker;
pub mod window;

pub use encoder::TelemetryEncoder;
pub use latest_store::LatestStore;
pub use smoother::{AngleSmoother, PassThroughFilter, SmootherBank};
pub use tracker::{FrameReading, LegLandmarks, LegReading, LegTracker};
pub use window::AngleWindow;

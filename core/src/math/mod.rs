pub mod geometry;
pub mod stats;

pub use geometry::{angle_at, Point2};
pub use stats::StatsHelper;

use serde::{Deserialize, Serialize};
use std::fmt;

/// One independently tracked limb angle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Left,
    Right,
}

impl Channel {
    pub const ALL: [Channel; 2] = [Channel::Left, Channel::Right];

    pub fn index(self) -> usize {
        match self {
            Channel::Left => 0,
            Channel::Right => 1,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Left => write!(f, "left"),
            Channel::Right => write!(f, "right"),
        }
    }
}

/// Raw per-frame estimate for a single channel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Observation {
    pub angle: Option<f32>,
    pub confidence: f32,
}

impl Observation {
    pub fn new(angle: Option<f32>, confidence: f32) -> Self {
        Self { angle, confidence }
    }

    pub fn missing() -> Self {
        Self::default()
    }

    /// Returns the angle when the observation is usable under `min_confidence`.
    pub fn accepted_angle(&self, min_confidence: f32) -> Option<f32> {
        let angle = self.angle?;
        let in_range = angle.is_finite() && (0.0..=180.0).contains(&angle);
        let confident = self.confidence.is_finite() && self.confidence >= min_confidence;
        (in_range && confident).then_some(angle)
    }
}

/// Tuning shared by every channel filter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SmootherConfig {
    /// Number of accepted angles backing the median.
    pub window: usize,
    /// Largest move allowed away from the previous output, in degrees.
    pub max_step_deg: f32,
    /// Consecutive misses tolerated before the channel drops out.
    pub gap_hold: u32,
    pub min_confidence: f32,
}

impl Default for SmootherConfig {
    fn default() -> Self {
        Self {
            window: 5,
            max_step_deg: 12.0,
            gap_hold: 6,
            min_confidence: 0.4,
        }
    }
}

impl SmootherConfig {
    pub fn validate(&self) -> TrackingResult<()> {
        if self.window == 0 {
            return Err(TrackingError::InvalidConfig(
                "window must hold at least one sample".into(),
            ));
        }
        if !self.max_step_deg.is_finite() || self.max_step_deg <= 0.0 {
            return Err(TrackingError::InvalidConfig(format!(
                "max_step_deg must be positive, got {}",
                self.max_step_deg
            )));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(TrackingError::InvalidConfig(format!(
                "min_confidence must lie in [0, 1], got {}",
                self.min_confidence
            )));
        }
        Ok(())
    }
}

/// Common error type for the tracking core.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum TrackingError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("missing keypoint {index} (frame has {available})")]
    MissingKeypoint { index: usize, available: usize },
}

pub type TrackingResult<T> = Result<T, TrackingError>;

/// Per-channel filter fed once per frame.
pub trait ChannelFilter {
    /// Consumes one observation and returns the value to emit, if any.
    fn update(&mut self, observation: Observation) -> Option<f32>;
    /// Drops all accumulated state.
    fn reset(&mut self);
    /// Whether the filter currently holds a usable output.
    fn is_tracking(&self) -> bool;
    /// Whether the output survives short detection gaps, so that losing it is a dropout.
    fn holds_through_gaps(&self) -> bool {
        false
    }
}

impl<F: ChannelFilter + ?Sized> ChannelFilter for Box<F> {
    fn update(&mut self, observation: Observation) -> Option<f32> {
        (**self).update(observation)
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn is_tracking(&self) -> bool {
        (**self).is_tracking()
    }

    fn holds_through_gaps(&self) -> bool {
        (**self).holds_through_gaps()
    }
}

use crate::pose_interface::{LegGeometry, PayloadProfile, TelemetryMessage};
use crate::processing::tracker::{FrameReading, LegReading};
use crate::telemetry::SendThrottle;
use std::time::Duration;

/// Packages tracker readings into rate-limited telemetry messages.
#[derive(Debug, Clone)]
pub struct TelemetryEncoder {
    profile: PayloadProfile,
    throttle: SendThrottle,
    next_frame_id: u64,
}

impl TelemetryEncoder {
    pub fn new(profile: PayloadProfile, interval: Duration) -> Self {
        Self {
            profile,
            throttle: SendThrottle::new(interval),
            next_frame_id: 0,
        }
    }

    /// Returns a message when the throttle allows a send at `now_ms`.
    pub fn encode(&mut self, reading: &FrameReading, now_ms: u64) -> Option<TelemetryMessage> {
        if !self.throttle.ready(now_ms) {
            return None;
        }
        let frame_id = self.next_frame_id;
        self.next_frame_id += 1;

        Some(TelemetryMessage {
            frame_id,
            ts: now_ms as f64 / 1000.0,
            left_knee_angle: reading.left.smoothed,
            right_knee_angle: reading.right.smoothed,
            left_knee_score: score(&reading.left),
            right_knee_score: score(&reading.right),
            left_leg: self.geometry(&reading.left),
            right_leg: self.geometry(&reading.right),
        })
    }

    pub fn sent(&self) -> u64 {
        self.next_frame_id
    }

    fn geometry(&self, leg: &LegReading) -> Option<LegGeometry> {
        let landmarks = leg.landmarks?;
        LegGeometry::for_profile(self.profile, landmarks.hip, landmarks.knee, landmarks.foot)
    }
}

impl Default for TelemetryEncoder {
    fn default() -> Self {
        Self::new(PayloadProfile::default(), SendThrottle::DEFAULT_INTERVAL)
    }
}

/// Landmark score reported alongside the angle; zero when the leg was not seen.
fn score(leg: &LegReading) -> f32 {
    if leg.observation.angle.is_some() {
        leg.observation.confidence
    } else {
        0.0
    }
}

use crate::math::{angle_at, Point2, StatsHelper};
use crate::pose_interface::{KeypointIndex, PoseFrame};
use crate::prelude::{Channel, ChannelFilter, Observation, SmootherConfig, TrackingResult};
use crate::processing::smoother::{AngleSmoother, PassThroughFilter, SmootherBank};
use crate::telemetry::{LogManager, MetricsRecorder, MetricsSnapshot};

/// Hip, knee and foot of one leg in unit-square coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegLandmarks {
    pub hip: Point2,
    pub knee: Point2,
    pub foot: Point2,
}

/// What the tracker derived for one leg in one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LegReading {
    pub observation: Observation,
    pub smoothed: Option<f32>,
    pub landmarks: Option<LegLandmarks>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameReading {
    pub left: LegReading,
    pub right: LegReading,
}

impl FrameReading {
    fn leg_mut(&mut self, channel: Channel) -> &mut LegReading {
        match channel {
            Channel::Left => &mut self.left,
            Channel::Right => &mut self.right,
        }
    }
}

type BoxedFilter = Box<dyn ChannelFilter + Send>;

/// Per-frame step that turns estimator landmarks into filtered knee angles.
pub struct LegTracker {
    filters: SmootherBank<BoxedFilter>,
    min_confidence: f32,
    metrics: MetricsRecorder,
    logger: LogManager,
}

impl LegTracker {
    /// Tracker backed by the median/slew-rate smoother.
    pub fn smoothing(config: &SmootherConfig) -> TrackingResult<Self> {
        config.validate()?;
        Ok(Self::with_filters(
            config,
            Box::new(AngleSmoother::new(config.clone())),
            Box::new(AngleSmoother::new(config.clone())),
        ))
    }

    /// Tracker that reports raw angles unfiltered.
    pub fn pass_through(config: &SmootherConfig) -> TrackingResult<Self> {
        config.validate()?;
        Ok(Self::with_filters(
            config,
            Box::new(PassThroughFilter::new(config)),
            Box::new(PassThroughFilter::new(config)),
        ))
    }

    fn with_filters(config: &SmootherConfig, left: BoxedFilter, right: BoxedFilter) -> Self {
        Self {
            filters: SmootherBank::new(left, right),
            min_confidence: config.min_confidence,
            metrics: MetricsRecorder::new(),
            logger: LogManager::new("tracker"),
        }
    }

    pub fn step(&mut self, frame: &PoseFrame) -> FrameReading {
        self.metrics.record_frame();
        let mut reading = FrameReading::default();

        for channel in Channel::ALL {
            let (observation, landmarks) = match read_leg(frame, channel, self.min_confidence) {
                Ok(leg) => leg,
                Err(err) => {
                    self.logger.detail(channel, &format!("treated as miss: {err}"));
                    (Observation::missing(), None)
                }
            };

            let was_tracking = self.filters.filter(channel).is_tracking();
            let smoothed = self
                .filters
                .update(channel, observation.angle, observation.confidence);
            let filter = self.filters.filter(channel);
            let dropped = was_tracking && !filter.is_tracking() && filter.holds_through_gaps();

            if observation.accepted_angle(self.min_confidence).is_some() {
                self.metrics.record_accepted(channel);
                if !was_tracking {
                    self.logger.record(&format!("{channel} knee acquired"));
                }
            } else {
                self.metrics.record_miss(channel);
                self.logger.detail(channel, "miss");
                if dropped {
                    self.metrics.record_dropout(channel);
                    self.logger.record(&format!("{channel} knee lost"));
                }
            }

            *reading.leg_mut(channel) = LegReading {
                observation,
                smoothed,
                landmarks,
            };
        }

        reading
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

/// Raw observation for one leg plus its normalised landmarks when all three pass.
fn read_leg(
    frame: &PoseFrame,
    channel: Channel,
    min_confidence: f32,
) -> TrackingResult<(Observation, Option<LegLandmarks>)> {
    let [hip_idx, knee_idx, ankle_idx] = KeypointIndex::leg(channel);
    let hip = frame.keypoint(hip_idx)?;
    let knee = frame.keypoint(knee_idx)?;
    let ankle = frame.keypoint(ankle_idx)?;

    let score = StatsHelper::min(&[hip.score, knee.score, ankle.score]);
    let visible = [hip, knee, ankle]
        .iter()
        .all(|keypoint| keypoint.is_valid(min_confidence));
    if !visible {
        return Ok((Observation::new(None, score), None));
    }

    let angle = angle_at(knee.position(), hip.position(), ankle.position());
    let landmarks = LegLandmarks {
        hip: hip.position().normalized(frame.width, frame.height),
        knee: knee.position().normalized(frame.width, frame.height),
        foot: ankle.position().normalized(frame.width, frame.height),
    };
    Ok((Observation::new(Some(angle), score), Some(landmarks)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose_interface::Keypoint;

    fn frame_with_leg(channel: Channel, score: f32) -> PoseFrame {
        let mut frame = PoseFrame::empty(640.0, 480.0);
        let [hip, knee, ankle] = KeypointIndex::leg(channel);
        frame.set(hip, Keypoint::new(320.0, 100.0, score));
        frame.set(knee, Keypoint::new(320.0, 240.0, score));
        frame.set(ankle, Keypoint::new(460.0, 240.0, score + 0.05));
        frame
    }

    #[test]
    fn right_angled_leg_reads_ninety_degrees() {
        let mut tracker = LegTracker::smoothing(&SmootherConfig::default()).unwrap();
        let reading = tracker.step(&frame_with_leg(Channel::Left, 0.8));

        let angle = reading.left.smoothed.unwrap();
        assert!((angle - 90.0).abs() < 1e-3);
        assert_eq!(reading.left.observation.confidence, 0.8);
        assert_eq!(reading.right.smoothed, None);

        let landmarks = reading.left.landmarks.unwrap();
        assert_eq!(landmarks.knee, Point2::new(0.5, 0.5));
    }

    #[test]
    fn low_score_landmark_yields_absent_observation() {
        let mut tracker = LegTracker::smoothing(&SmootherConfig::default()).unwrap();
        let reading = tracker.step(&frame_with_leg(Channel::Right, 0.3));
        assert_eq!(reading.right.observation.angle, None);
        assert_eq!(reading.right.observation.confidence, 0.3);
        assert!(reading.right.landmarks.is_none());
    }

    #[test]
    fn truncated_frame_counts_as_miss_for_both_legs() {
        let mut tracker = LegTracker::smoothing(&SmootherConfig::default()).unwrap();
        let reading = tracker.step(&PoseFrame::new(640.0, 480.0, Vec::new()));
        assert_eq!(reading, FrameReading::default());

        let metrics = tracker.metrics();
        assert_eq!(metrics.frames, 1);
        assert_eq!(metrics.left.missed, 1);
        assert_eq!(metrics.right.missed, 1);
    }

    #[test]
    fn dropout_is_recorded_after_gap_hold() {
        let mut tracker = LegTracker::smoothing(&SmootherConfig::default()).unwrap();
        tracker.step(&frame_with_leg(Channel::Left, 0.9));
        let blank = PoseFrame::empty(640.0, 480.0);
        let mut last = None;
        for _ in 0..7 {
            last = tracker.step(&blank).left.smoothed;
        }
        assert_eq!(last, None);
        assert_eq!(tracker.metrics().left.dropouts, 1);
        assert_eq!(tracker.metrics().right.dropouts, 0);
    }

    #[test]
    fn pass_through_tracker_emits_raw_angle() {
        let mut tracker = LegTracker::pass_through(&SmootherConfig::default()).unwrap();
        tracker.step(&frame_with_leg(Channel::Left, 0.9));
        let reading = tracker.step(&PoseFrame::empty(640.0, 480.0));
        assert_eq!(reading.left.smoothed, None);
    }

    #[test]
    fn pass_through_misses_are_not_dropouts() {
        let mut tracker = LegTracker::pass_through(&SmootherConfig::default()).unwrap();
        let blank = PoseFrame::empty(640.0, 480.0);
        for _ in 0..3 {
            tracker.step(&frame_with_leg(Channel::Left, 0.9));
            tracker.step(&blank);
        }
        let left = tracker.metrics().left;
        assert_eq!(left.accepted, 3);
        assert_eq!(left.missed, 3);
        assert_eq!(left.dropouts, 0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SmootherConfig {
            min_confidence: 1.5,
            ..Default::default()
        };
        assert!(LegTracker::smoothing(&config).is_err());
    }
}

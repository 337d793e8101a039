use crate::bridge::publisher::HttpPublisher;
use crate::generator::GaitGenerator;
use crate::workflow::config::WorkflowConfig;
use kneecore::pose_interface::{PoseFrame, TelemetryMessage};
use kneecore::processing::{FrameReading, LegTracker, TelemetryEncoder};
use kneecore::telemetry::MetricsSnapshot;
use kneecore::Channel;
use log::info;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::{interval, MissedTickBehavior};

/// Outcome of a replay; holds only the newest message so streaming runs stay bounded.
#[derive(Debug, Default)]
pub struct ReplayResult {
    pub frames: usize,
    pub sent: usize,
    pub last_message: Option<TelemetryMessage>,
    pub metrics: MetricsSnapshot,
}

impl ReplayResult {
    fn record(&mut self, message: TelemetryMessage) {
        self.sent += 1;
        self.last_message = Some(message);
    }

    pub fn report_line(&self) -> String {
        let angle = |value: Option<f32>| {
            value
                .map(|v| format!("{v:.1}"))
                .unwrap_or_else(|| "--".into())
        };
        let (left, right) = self
            .last_message
            .as_ref()
            .map(|m| (angle(m.left_knee_angle), angle(m.right_knee_angle)))
            .unwrap_or_else(|| ("--".into(), "--".into()));
        let counts = |channel: Channel| {
            let c = self.metrics.channel(channel);
            format!(
                "{channel}(accepted={} missed={} dropouts={})",
                c.accepted, c.missed, c.dropouts
            )
        };
        format!(
            "frames={} sent={} {} {} last L={} R={}",
            self.frames,
            self.sent,
            counts(Channel::Left),
            counts(Channel::Right),
            left,
            right
        )
    }
}

/// Drives frames through the tracker and the telemetry encoder.
pub struct Runner {
    tracker: LegTracker,
    encoder: TelemetryEncoder,
}

impl Runner {
    pub fn new(config: &WorkflowConfig) -> anyhow::Result<Self> {
        Ok(Self {
            tracker: config.build_tracker()?,
            encoder: config.build_encoder(),
        })
    }

    /// One display-refresh iteration: track, then encode if the throttle allows.
    pub fn step(
        &mut self,
        frame: &PoseFrame,
        now_ms: u64,
    ) -> (FrameReading, Option<TelemetryMessage>) {
        let reading = self.tracker.step(frame);
        let message = self.encoder.encode(&reading, now_ms);
        (reading, message)
    }

    /// Replays `frames` on a virtual clock spaced by `frame_period_ms`.
    pub fn execute(&mut self, frames: &[PoseFrame], frame_period_ms: f64) -> ReplayResult {
        let mut result = ReplayResult::default();
        for (index, frame) in frames.iter().enumerate() {
            let now_ms = (index as f64 * frame_period_ms).round() as u64;
            if let Some(message) = self.step(frame, now_ms).1 {
                result.record(message);
            }
        }
        result.frames = frames.len();
        result.metrics = self.tracker.metrics();
        result
    }

    /// Streams generator frames in real time and hands each message to `publisher`.
    pub async fn run_live(
        &mut self,
        generator: &mut GaitGenerator,
        publisher: Arc<HttpPublisher>,
    ) -> ReplayResult {
        let period = Duration::from_secs_f64(generator.config().frame_period_ms() / 1000.0);
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let start = Instant::now();
        let mut result = ReplayResult::default();

        for frame in generator {
            ticker.tick().await;
            let now_ms = start.elapsed().as_millis() as u64;
            if let Some(message) = self.step(&frame, now_ms).1 {
                publisher.spawn_publish(message.clone());
                result.record(message);
            }
            result.frames += 1;
            if result.frames % 600 == 0 {
                info!(
                    "replayed {} frames, {} delivered",
                    result.frames,
                    publisher.delivered()
                );
            }
        }

        result.metrics = self.tracker.metrics();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{build_frames, GeneratorConfig};
    use kneecore::pose_interface::PayloadProfile;

    fn config(frames: usize) -> WorkflowConfig {
        WorkflowConfig {
            generator: GeneratorConfig {
                frames,
                seed: 5,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Every message a virtual-clock replay would emit, in order.
    fn replay_messages(cfg: &WorkflowConfig) -> Vec<TelemetryMessage> {
        let frames = build_frames(&cfg.generator).unwrap();
        let period = cfg.generator.frame_period_ms();
        let mut runner = Runner::new(cfg).unwrap();
        frames
            .iter()
            .enumerate()
            .filter_map(|(index, frame)| {
                runner
                    .step(frame, (index as f64 * period).round() as u64)
                    .1
            })
            .collect()
    }

    #[test]
    fn runner_throttles_sixty_hz_to_twenty() {
        let cfg = config(60);
        let frames = build_frames(&cfg.generator).unwrap();
        let mut runner = Runner::new(&cfg).unwrap();
        let result = runner.execute(&frames, cfg.generator.frame_period_ms());

        assert_eq!(result.frames, 60);
        assert_eq!(result.metrics.frames, 60);
        // one second of 60 Hz frames at a 50 ms interval
        assert!(result.sent >= 18 && result.sent <= 20);
        let last = result.last_message.as_ref().unwrap();
        assert_eq!(last.frame_id, result.sent as u64 - 1);

        let messages = replay_messages(&cfg);
        assert_eq!(messages.len(), result.sent);
        assert!(messages
            .windows(2)
            .all(|pair| pair[1].frame_id == pair[0].frame_id + 1));
    }

    #[test]
    fn smoothed_angles_stay_within_gait_range() {
        let mut cfg = config(240);
        cfg.generator.dropout_chance = 0.0;
        cfg.generator.spike_chance = 0.0;

        for message in replay_messages(&cfg) {
            for angle in [message.left_knee_angle, message.right_knee_angle]
                .into_iter()
                .flatten()
            {
                assert!((95.0..=180.0).contains(&angle), "angle {angle}");
            }
        }

        let frames = build_frames(&cfg.generator).unwrap();
        let result = Runner::new(&cfg)
            .unwrap()
            .execute(&frames, cfg.generator.frame_period_ms());
        assert!(result.report_line().starts_with("frames=240 sent="));
        assert!(result.report_line().contains("left(accepted=240 missed=0 dropouts=0)"));
    }

    #[test]
    fn angles_profile_omits_geometry() {
        let mut cfg = config(10);
        cfg.profile = PayloadProfile::Angles;
        assert!(replay_messages(&cfg).iter().all(|m| m.left_leg.is_none()));
    }

    #[test]
    fn empty_replay_reports_placeholders() {
        let result = ReplayResult::default();
        assert_eq!(result.sent, 0);
        assert!(result.report_line().ends_with("last L=-- R=--"));
    }

    #[tokio::test]
    async fn live_replay_keeps_only_newest_message() {
        let mut cfg = config(12);
        cfg.generator.fps = 500.0;
        let mut generator = GaitGenerator::new(cfg.generator.clone()).unwrap();
        let publisher = Arc::new(
            HttpPublisher::new("http://127.0.0.1:9/pose", Duration::from_millis(100)).unwrap(),
        );
        let mut runner = Runner::new(&cfg).unwrap();
        let result = runner.run_live(&mut generator, publisher).await;

        assert_eq!(result.frames, 12);
        assert!(result.sent >= 1);
        let last = result.last_message.unwrap();
        assert_eq!(last.frame_id, result.sent as u64 - 1);
    }
}

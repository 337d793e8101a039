use crate::generator::template::{knee_angle, leg_points};
use anyhow::ensure;
use kneecore::math::Point2;
use kneecore::pose_interface::{Keypoint, KeypointIndex, PoseFrame};
use kneecore::Channel;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

const SEEN_SCORE: f32 = 0.85;
const LOST_SCORE: f32 = 0.15;

/// Configuration for generating a synthetic walking subject.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Frames to produce; zero streams until stopped.
    pub frames: usize,
    pub fps: f32,
    pub width: f32,
    pub height: f32,
    pub gait_hz: f32,
    pub min_knee_deg: f32,
    pub max_knee_deg: f32,
    pub jitter_deg: f32,
    pub spike_chance: f64,
    pub spike_deg: f32,
    pub dropout_chance: f64,
    pub dropout_frames: usize,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            frames: 300,
            fps: 60.0,
            width: 640.0,
            height: 480.0,
            gait_hz: 0.9,
            min_knee_deg: 105.0,
            max_knee_deg: 175.0,
            jitter_deg: 1.5,
            spike_chance: 0.02,
            spike_deg: 35.0,
            dropout_chance: 0.01,
            dropout_frames: 4,
            seed: 0,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.fps > 0.0, "fps must be positive, got {}", self.fps);
        ensure!(
            self.width > 0.0 && self.height > 0.0,
            "frame size must be positive, got {}x{}",
            self.width,
            self.height
        );
        ensure!(
            self.min_knee_deg <= self.max_knee_deg,
            "min_knee_deg {} exceeds max_knee_deg {}",
            self.min_knee_deg,
            self.max_knee_deg
        );
        ensure!(
            (0.0..=1.0).contains(&self.spike_chance) && (0.0..=1.0).contains(&self.dropout_chance),
            "spike_chance and dropout_chance must lie in [0, 1]"
        );
        ensure!(self.jitter_deg >= 0.0, "jitter_deg must not be negative");
        Ok(())
    }

    /// Milliseconds between consecutive frames.
    pub fn frame_period_ms(&self) -> f64 {
        1000.0 / self.fps as f64
    }
}

/// Seeded source of pose frames standing in for the camera and pose model.
pub struct GaitGenerator {
    config: GeneratorConfig,
    rng: StdRng,
    frame_index: usize,
    dropout_left: [usize; 2],
}

impl GaitGenerator {
    pub fn new(config: GeneratorConfig) -> anyhow::Result<Self> {
        config.validate()?;
        Ok(Self {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            frame_index: 0,
            dropout_left: [0; 2],
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// True once the configured frame count has been produced.
    pub fn finished(&self) -> bool {
        self.config.frames > 0 && self.frame_index >= self.config.frames
    }

    /// The knee angle the subject actually holds in frame `index`, before noise.
    pub fn true_angle(&self, channel: Channel, index: usize) -> f32 {
        let t = index as f32 / self.config.fps;
        let offset = match channel {
            Channel::Left => 0.0,
            Channel::Right => 0.5,
        };
        let phase = (t * self.config.gait_hz + offset).fract();
        knee_angle(phase, self.config.min_knee_deg, self.config.max_knee_deg)
    }

    pub fn next_frame(&mut self) -> PoseFrame {
        let mut frame = PoseFrame::empty(self.config.width, self.config.height);
        for channel in Channel::ALL {
            self.place_leg(&mut frame, channel);
        }
        self.frame_index += 1;
        frame
    }

    fn place_leg(&mut self, frame: &mut PoseFrame, channel: Channel) {
        let (width, height) = (self.config.width, self.config.height);
        let hip_x = match channel {
            Channel::Left => width * 0.53,
            Channel::Right => width * 0.47,
        };
        let hip = Point2::new(hip_x, height * 0.45);
        let limb = height * 0.2;

        let mut angle = self.true_angle(channel, self.frame_index);
        if self.config.jitter_deg > 0.0 {
            angle += self
                .rng
                .gen_range(-self.config.jitter_deg..=self.config.jitter_deg);
        }
        if self.rng.gen_bool(self.config.spike_chance) {
            let sign: f32 = if self.rng.gen_bool(0.5) { 1.0 } else { -1.0 };
            angle += sign * self.config.spike_deg;
        }
        let (knee, ankle) = leg_points(hip, limb, limb, angle);

        let slot = channel.index();
        if self.dropout_left[slot] == 0
            && self.config.dropout_frames > 0
            && self.rng.gen_bool(self.config.dropout_chance)
        {
            self.dropout_left[slot] = self.config.dropout_frames;
        }
        let score = if self.dropout_left[slot] > 0 {
            self.dropout_left[slot] -= 1;
            LOST_SCORE
        } else {
            SEEN_SCORE + self.rng.gen_range(-0.05f32..=0.05)
        };

        let [hip_idx, knee_idx, ankle_idx] = KeypointIndex::leg(channel);
        frame.set(hip_idx, Keypoint::new(hip.x, hip.y, score));
        frame.set(knee_idx, Keypoint::new(knee.x, knee.y, score));
        frame.set(ankle_idx, Keypoint::new(ankle.x, ankle.y, score));
    }
}

impl Iterator for GaitGenerator {
    type Item = PoseFrame;

    fn next(&mut self) -> Option<PoseFrame> {
        if self.finished() {
            None
        } else {
            Some(self.next_frame())
        }
    }
}

/// Builds the full frame sequence for a bounded configuration.
pub fn build_frames(config: &GeneratorConfig) -> anyhow::Result<Vec<PoseFrame>> {
    ensure!(config.frames > 0, "offline generation needs a frame count");
    Ok(GaitGenerator::new(config.clone())?.collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_builds_expected_frame_count() {
        let config = GeneratorConfig {
            frames: 120,
            ..Default::default()
        };
        let frames = build_frames(&config).unwrap();
        assert_eq!(frames.len(), 120);
        assert!(frames
            .iter()
            .all(|frame| frame.keypoints.len() == KeypointIndex::COUNT));
    }

    #[test]
    fn same_seed_gives_same_frames() {
        let config = GeneratorConfig {
            frames: 40,
            seed: 13,
            spike_chance: 0.2,
            dropout_chance: 0.1,
            ..Default::default()
        };
        assert_eq!(build_frames(&config).unwrap(), build_frames(&config).unwrap());
    }

    #[test]
    fn clean_generator_keeps_legs_visible() {
        let config = GeneratorConfig {
            frames: 30,
            jitter_deg: 0.0,
            spike_chance: 0.0,
            dropout_chance: 0.0,
            ..Default::default()
        };
        for frame in build_frames(&config).unwrap() {
            let knee = frame.keypoint(KeypointIndex::RightKnee).unwrap();
            assert!(knee.score >= 0.75);
            assert!(knee.x >= 0.0 && knee.x <= config.width);
            assert!(knee.y >= 0.0 && knee.y <= config.height);
        }
    }

    #[test]
    fn legs_are_half_a_cycle_apart() {
        let generator = GaitGenerator::new(GeneratorConfig::default()).unwrap();
        let left = generator.true_angle(Channel::Left, 0);
        let right = generator.true_angle(Channel::Right, 0);
        assert!((left - 175.0).abs() < 1e-3);
        assert!((right - 105.0).abs() < 1e-3);
    }

    #[test]
    fn unbounded_generator_requires_frame_count_offline() {
        let config = GeneratorConfig {
            frames: 0,
            ..Default::default()
        };
        assert!(build_frames(&config).is_err());
        let mut streaming = GaitGenerator::new(config).unwrap();
        assert!(streaming.next().is_some());
        assert!(!streaming.finished());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = GeneratorConfig {
            fps: 0.0,
            ..Default::default()
        };
        assert!(GaitGenerator::new(config).is_err());
    }
}

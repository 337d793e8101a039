use crate::math::Point2;
use crate::prelude::Channel;
use serde::{Deserialize, Serialize};

/// MoveNet 17-keypoint layout as emitted by the upstream estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum KeypointIndex {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl KeypointIndex {
    pub const COUNT: usize = 17;

    pub fn index(self) -> usize {
        self as usize
    }

    /// Hip, knee and ankle for one leg.
    pub fn leg(channel: Channel) -> [KeypointIndex; 3] {
        match channel {
            Channel::Left => [Self::LeftHip, Self::LeftKnee, Self::LeftAnkle],
            Channel::Right => [Self::RightHip, Self::RightKnee, Self::RightAnkle],
        }
    }
}

/// Single landmark in frame pixel space.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
    pub score: f32,
}

impl Keypoint {
    pub fn new(x: f32, y: f32, score: f32) -> Self {
        Self { x, y, score }
    }

    pub fn position(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    pub fn is_valid(&self, threshold: f32) -> bool {
        self.score >= threshold
    }
}

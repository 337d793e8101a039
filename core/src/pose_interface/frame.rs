use crate::pose_interface::keypoint::{Keypoint, KeypointIndex};
use crate::prelude::{TrackingError, TrackingResult};
use serde::{Deserialize, Serialize};

/// One estimator result: the landmarks of a single person in a frame.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PoseFrame {
    pub width: f32,
    pub height: f32,
    pub keypoints: Vec<Keypoint>,
}

impl PoseFrame {
    pub fn new(width: f32, height: f32, keypoints: Vec<Keypoint>) -> Self {
        Self {
            width,
            height,
            keypoints,
        }
    }

    /// A frame where every landmark is undetected.
    pub fn empty(width: f32, height: f32) -> Self {
        Self::new(width, height, vec![Keypoint::default(); KeypointIndex::COUNT])
    }

    pub fn keypoint(&self, index: KeypointIndex) -> TrackingResult<&Keypoint> {
        self.keypoints
            .get(index.index())
            .ok_or(TrackingError::MissingKeypoint {
                index: index.index(),
                available: self.keypoints.len(),
            })
    }

    pub fn set(&mut self, index: KeypointIndex, keypoint: Keypoint) {
        if let Some(slot) = self.keypoints.get_mut(index.index()) {
            *slot = keypoint;
        }
    }
}

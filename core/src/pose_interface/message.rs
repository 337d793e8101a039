use crate::math::Point2;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which auxiliary geometry a telemetry message carries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PayloadProfile {
    /// Angles and scores only.
    Angles,
    /// Hip, knee and foot in unit-square coordinates.
    #[default]
    Absolute,
    /// Knee and foot as offsets from the hip.
    HipRelative,
}

impl FromStr for PayloadProfile {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "angles" => Ok(Self::Angles),
            "absolute" => Ok(Self::Absolute),
            "hip-relative" | "relative" => Ok(Self::HipRelative),
            other => Err(format!(
                "unknown payload profile {other:?} (expected angles, absolute or hip-relative)"
            )),
        }
    }
}

/// Leg landmarks attached to a message, normalised to the unit square.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LegGeometry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hip: Option<Point2>,
    pub knee: Point2,
    pub foot: Point2,
}

impl LegGeometry {
    /// Builds the geometry for `profile` from absolute unit-square points.
    pub fn for_profile(
        profile: PayloadProfile,
        hip: Point2,
        knee: Point2,
        foot: Point2,
    ) -> Option<Self> {
        match profile {
            PayloadProfile::Angles => None,
            PayloadProfile::Absolute => Some(Self {
                hip: Some(hip),
                knee,
                foot,
            }),
            PayloadProfile::HipRelative => Some(Self {
                hip: None,
                knee: knee.offset_from(hip),
                foot: foot.offset_from(hip),
            }),
        }
    }
}

/// Status message delivered to the last-value sink.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryMessage {
    pub frame_id: u64,
    pub ts: f64,
    pub left_knee_angle: Option<f32>,
    pub right_knee_angle: Option<f32>,
    pub left_knee_score: f32,
    pub right_knee_score: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_leg: Option<LegGeometry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_leg: Option<LegGeometry>,
}

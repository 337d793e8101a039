use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reduced view of the last stored record.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PoseSummary {
    pub frame_id: Option<u64>,
    pub ts: Option<f64>,
    pub left_knee_angle: Option<f64>,
    pub right_knee_angle: Option<f64>,
}

impl PoseSummary {
    pub fn from_record(record: Option<&Value>) -> Self {
        let Some(record) = record else {
            return Self::default();
        };
        Self {
            frame_id: record.get("frameId").and_then(Value::as_u64),
            ts: record.get("ts").and_then(Value::as_f64),
            left_knee_angle: record.get("leftKneeAngle").and_then(Value::as_f64),
            right_knee_angle: record.get("rightKneeAngle").and_then(Value::as_f64),
        }
    }
}

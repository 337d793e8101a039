use anyhow::Context;
use kneecore::pose_interface::TelemetryMessage;
use log::debug;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Best-effort poster of telemetry messages to a last-value sink.
///
/// Failures are counted and logged at debug level, never surfaced.
pub struct HttpPublisher {
    client: reqwest::Client,
    url: String,
    delivered: AtomicUsize,
    failed: AtomicUsize,
}

impl HttpPublisher {
    pub fn new(url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("building telemetry http client")?;
        Ok(Self {
            client,
            url: url.into(),
            delivered: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
        })
    }

    /// Posts one message; returns whether the sink accepted it.
    pub async fn publish(&self, message: &TelemetryMessage) -> bool {
        let accepted = match self.client.post(&self.url).json(message).send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                debug!("sink rejected frame {}: {}", message.frame_id, response.status());
                false
            }
            Err(err) => {
                debug!("sink unreachable for frame {}: {}", message.frame_id, err);
                false
            }
        };
        let counter = if accepted { &self.delivered } else { &self.failed };
        counter.fetch_add(1, Ordering::Relaxed);
        accepted
    }

    /// Publishes on a detached task so the frame loop never waits on the network.
    pub fn spawn_publish(self: &Arc<Self>, message: TelemetryMessage) {
        let publisher = Arc::clone(self);
        tokio::spawn(async move {
            publisher.publish(&message).await;
        });
    }

    pub fn delivered(&self) -> usize {
        self.delivered.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::Relaxed)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::server::routes;
    use kneecore::processing::LatestStore;

    fn message(frame_id: u64) -> TelemetryMessage {
        TelemetryMessage {
            frame_id,
            ts: frame_id as f64 * 0.05,
            left_knee_angle: Some(150.0),
            right_knee_angle: None,
            left_knee_score: 0.8,
            right_knee_score: 0.0,
            left_leg: None,
            right_leg: None,
        }
    }

    #[tokio::test]
    async fn unreachable_sink_is_swallowed() {
        // port 9 (discard) on localhost is not expected to serve HTTP
        let publisher = HttpPublisher::new("http://127.0.0.1:9/pose", Duration::from_millis(200))
            .unwrap();
        assert!(!publisher.publish(&message(0)).await);
        assert_eq!(publisher.failed(), 1);
        assert_eq!(publisher.delivered(), 0);
    }

    #[tokio::test]
    async fn message_reaches_running_sink() {
        let store = Arc::new(LatestStore::new());
        let (addr, server) = warp::serve(routes(store.clone(), &[]))
            .bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);

        let publisher =
            HttpPublisher::new(format!("http://{addr}/pose"), Duration::from_secs(2)).unwrap();
        assert!(publisher.publish(&message(7)).await);
        assert_eq!(publisher.delivered(), 1);

        let stored = store.fetch().unwrap();
        assert_eq!(stored["frameId"], 7);
        assert_eq!(stored["rightKneeAngle"], serde_json::Value::Null);
    }
}

use crate::generator::GeneratorConfig;
use anyhow::{bail, Context};
use kneecore::pose_interface::PayloadProfile;
use kneecore::processing::{LegTracker, TelemetryEncoder};
use kneecore::SmootherConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Address the last-value sink listens on.
    pub bind: SocketAddr,
    /// Where replayed telemetry is posted.
    pub sink_url: String,
    pub send_interval_ms: u64,
    pub profile: PayloadProfile,
    /// Raw angles are reported when false.
    pub smoothing: bool,
    pub smoother: SmootherConfig,
    pub cors_origins: Vec<String>,
    pub generator: GeneratorConfig,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8081)),
            sink_url: "http://127.0.0.1:8081/pose".into(),
            send_interval_ms: 50,
            profile: PayloadProfile::default(),
            smoothing: true,
            smoother: SmootherConfig::default(),
            cors_origins: vec![
                "http://localhost:8081".into(),
                "http://127.0.0.1:8081".into(),
            ],
            generator: GeneratorConfig::default(),
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.smoother.validate().context("validating smoother config")?;
        self.generator
            .validate()
            .context("validating generator config")?;
        reqwest::Url::parse(&self.sink_url)
            .with_context(|| format!("parsing sink url {}", self.sink_url))?;
        for origin in &self.cors_origins {
            validate_origin(origin)?;
        }
        Ok(())
    }

    pub fn send_interval(&self) -> Duration {
        Duration::from_millis(self.send_interval_ms)
    }

    pub fn build_tracker(&self) -> anyhow::Result<LegTracker> {
        let tracker = if self.smoothing {
            LegTracker::smoothing(&self.smoother)
        } else {
            LegTracker::pass_through(&self.smoother)
        };
        tracker.context("building leg tracker")
    }

    pub fn build_encoder(&self) -> TelemetryEncoder {
        TelemetryEncoder::new(self.profile, self.send_interval())
    }
}

/// CORS origins must be bare ASCII `scheme://host[:port]` strings.
fn validate_origin(origin: &str) -> anyhow::Result<()> {
    if !origin.is_ascii() {
        bail!("origin {origin} must be ASCII; use the punycode form of the host");
    }
    let url = reqwest::Url::parse(origin).with_context(|| format!("parsing origin {origin}"))?;
    let bare = url.host_str().is_some()
        && url.path() == "/"
        && !origin.ends_with('/')
        && url.query().is_none()
        && url.fragment().is_none();
    if !bare {
        bail!("origin {origin} must be scheme://host[:port]");
    }
    Ok(())
}

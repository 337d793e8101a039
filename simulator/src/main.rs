use anyhow::Context;
use bridge::{HttpPublisher, TelemetryBridge};
use clap::Parser;
use generator::{build_frames, GaitGenerator};
use kneecore::pose_interface::PayloadProfile;
use kneecore::processing::LatestStore;
use log::info;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::{Runner, WorkflowConfig};

mod bridge;
mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Knee-angle replay driver and telemetry sink")]
struct Args {
    /// Replay the synthetic gait on a virtual clock and print a summary
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Stream the synthetic gait in real time to the sink URL
    #[arg(long, default_value_t = false)]
    replay: bool,
    /// Host the last-value HTTP sink until Ctrl+C
    #[arg(long, default_value_t = false)]
    serve: bool,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Payload profile: angles, absolute or hip-relative
    #[arg(long)]
    profile: Option<PayloadProfile>,
    /// Report raw angles instead of smoothed ones
    #[arg(long, default_value_t = false)]
    raw: bool,
    #[arg(long)]
    frames: Option<usize>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    port: Option<u16>,
    #[arg(long)]
    sink_url: Option<String>,
    /// Append the offline summary line to this file
    #[arg(long)]
    report: Option<PathBuf>,
}

impl Args {
    fn apply(&self, config: &mut WorkflowConfig) {
        if let Some(profile) = self.profile {
            config.profile = profile;
        }
        if self.raw {
            config.smoothing = false;
        }
        if let Some(frames) = self.frames {
            config.generator.frames = frames;
        }
        if let Some(seed) = self.seed {
            config.generator.seed = seed;
        }
        if let Some(port) = self.port {
            config.bind.set_port(port);
        }
        if let Some(url) = &self.sink_url {
            config.sink_url = url.clone();
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = if let Some(path) = &args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::default()
    };
    args.apply(&mut config);
    config.validate()?;

    let store = Arc::new(LatestStore::new());
    let bridge = if args.serve {
        Some(TelemetryBridge::spawn(
            config.bind,
            store.clone(),
            config.cors_origins.clone(),
        )?)
    } else {
        None
    };

    if args.offline {
        let frames = build_frames(&config.generator)?;
        let mut runner = Runner::new(&config)?;
        let result = runner.execute(&frames, config.generator.frame_period_ms());
        let report = result.report_line();
        println!("Offline run -> {}", report);

        if let (Some(bridge), Some(message)) = (&bridge, &result.last_message) {
            bridge.publish(serde_json::to_value(message).context("encoding last message")?);
            bridge.publish_status("Offline replay results ready.");
        }

        if let Some(report_path) = &args.report {
            if let Some(parent) = report_path.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(report_path)
                .with_context(|| format!("opening report {}", report_path.display()))?;
            writeln!(file, "{}", report)?;
        }
    }

    if args.replay || args.serve {
        let runtime = TokioBuilder::new_multi_thread()
            .enable_all()
            .build()
            .context("creating runtime for replay")?;
        runtime.block_on(async {
            if args.replay {
                let mut generator = GaitGenerator::new(config.generator.clone())?;
                let mut runner = Runner::new(&config)?;
                let publisher = Arc::new(HttpPublisher::new(
                    config.sink_url.clone(),
                    Duration::from_millis(500),
                )?);
                info!(
                    "replaying to {} ({:?} profile, smoothing {})",
                    publisher.url(),
                    config.profile,
                    config.smoothing
                );
                tokio::select! {
                    result = runner.run_live(&mut generator, publisher.clone()) => {
                        println!("Replay finished -> {}", result.report_line());
                    }
                    signal = signal::ctrl_c() => {
                        signal.context("awaiting Ctrl+C to exit")?;
                        println!("Replay interrupted");
                    }
                }
                info!(
                    "sink delivery: {} delivered, {} failed",
                    publisher.delivered(),
                    publisher.failed()
                );
            }
            if let Some(bridge) = &bridge {
                bridge.publish_status(&format!(
                    "HTTP sink running on http://{} (Ctrl+C to stop)...",
                    bridge.local_addr()
                ));
                signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            }
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}

use crate::bridge::model::PoseSummary;
use kneecore::processing::LatestStore;
use anyhow::{anyhow, Context};
use log::info;
use serde_json::{json, Value};
use std::{net::SocketAddr, sync::mpsc, sync::Arc, thread};
use tokio::runtime::Builder;
use warp::Filter;

const MAX_BODY_BYTES: u64 = 64 * 1024;

pub type SharedStore = Arc<LatestStore<Value>>;

/// HTTP routes of the last-value sink.
pub fn routes(
    store: SharedStore,
    cors_origins: &[String],
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let store_filter = warp::any().map(move || store.clone());

    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| warp::reply::json(&json!({"ok": true})));

    let ingest = warp::path("pose")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(store_filter.clone())
        .map(|record: Value, store: SharedStore| {
            store.store(record);
            warp::reply::json(&json!({"status": "received"}))
        });

    let latest = warp::path!("pose" / "latest")
        .and(warp::get())
        .and(store_filter.clone())
        .map(|store: SharedStore| {
            let record = store
                .fetch()
                .filter(|value| !value.is_null())
                .unwrap_or_else(|| json!({}));
            warp::reply::json(&record)
        });

    let summary = warp::path!("pose" / "summary")
        .and(warp::get())
        .and(store_filter)
        .map(|store: SharedStore| {
            warp::reply::json(&PoseSummary::from_record(store.fetch().as_ref()))
        });

    let cors = warp::cors()
        .allow_methods(vec!["GET", "POST"])
        .allow_header("content-type")
        .allow_credentials(true);
    let cors = if cors_origins.is_empty() {
        cors.allow_any_origin()
    } else {
        cors.allow_origins(cors_origins.iter().map(String::as_str))
    };

    health
        .or(ingest)
        .or(latest)
        .or(summary)
        .with(cors)
        .with(warp::log("simulator::bridge"))
}

/// Hosts the sink on a dedicated thread and shares its store with the driver.
pub struct TelemetryBridge {
    store: SharedStore,
    addr: SocketAddr,
}

impl TelemetryBridge {
    /// Binds the sink and returns once it is listening; bind failures surface here.
    pub fn spawn(
        addr: SocketAddr,
        store: SharedStore,
        cors_origins: Vec<String>,
    ) -> anyhow::Result<Self> {
        let routes = routes(store.clone(), &cors_origins);
        let (bound_tx, bound_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    let _ = bound_tx.send(Err(anyhow!(err).context("building sink runtime")));
                    return;
                }
            };
            runtime.block_on(async move {
                match warp::serve(routes).try_bind_ephemeral(addr) {
                    Ok((bound, server)) => {
                        let _ = bound_tx.send(Ok(bound));
                        server.await;
                    }
                    Err(err) => {
                        let _ = bound_tx.send(Err(anyhow!(err)
                            .context(format!("binding sink on {addr}"))));
                    }
                }
            });
        });

        let bound = bound_rx
            .recv()
            .context("sink thread exited before binding")??;
        info!("sink listening on http://{}", bound);
        Ok(Self { store, addr: bound })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stores a record directly, bypassing HTTP.
    pub fn publish(&self, record: Value) {
        self.store.store(record);
    }

    pub fn publish_status(&self, message: &str) {
        info!("[sink] {}", message);
    }

    #[cfg(test)]
    pub fn latest(&self) -> Option<Value> {
        self.store.fetch()
    }
}

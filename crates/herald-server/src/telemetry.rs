//! Logging and metrics setup

use herald_core::config::{LoggingConfig, MetricsConfig};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle, PrometheusRecorder};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(filter);

    if config.format.eq_ignore_ascii_case("json") {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().with_target(true)).init();
    }
}

/// Recorder handed to listeners plus a handle for rendering
pub struct Metrics {
    pub recorder: Arc<PrometheusRecorder>,
    pub handle: PrometheusHandle,
}

/// Build the Prometheus recorder, serving `/metrics` when an address is configured
pub fn init_metrics(config: &MetricsConfig) -> anyhow::Result<Metrics> {
    let builder = PrometheusBuilder::new();

    let recorder = match &config.listen {
        Some(listen) => {
            let addr: SocketAddr = listen.parse()?;
            let (recorder, exporter) = builder.with_http_listener(addr).build()?;
            tokio::spawn(async move {
                if let Err(e) = exporter.await {
                    error!("Metrics exporter stopped: {:?}", e);
                }
            });
            info!("Serving metrics on http://{}/metrics", addr);
            recorder
        }
        None => builder.build_recorder(),
    };

    let handle = recorder.handle();

    Ok(Metrics {
        recorder: Arc::new(recorder),
        handle,
    })
}

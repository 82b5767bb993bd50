//! Herald - application event relay
//!
//! Reads newline-delimited JSON events and hands them to every registered
//! listener. The SNS listener is registered only when `sns.enabled` is set.

mod source;
mod telemetry;

use clap::{Parser, Subcommand};
use herald_core::{EventDispatcher, EventDispatcherConfig, EventListener, HeraldConfig};
use herald_sns::{SerdeJsonMapper, SnsEventListener};
use metrics_exporter_prometheus::PrometheusRecorder;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{debug, error, info, warn};

#[derive(Parser)]
#[command(name = "herald")]
#[command(author = "Herald Team")]
#[command(version = herald_core::VERSION)]
#[command(about = "Forwards application events to SNS", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Event input file (newline-delimited JSON); stdin when omitted
    #[arg(short, long, global = true)]
    events: Option<String>,

    /// Destination topic ARN
    #[arg(long, env = "HERALD_SNS_TOPIC_ARN")]
    topic_arn: Option<String>,

    /// Bucket for offloaded payloads
    #[arg(long, env = "HERALD_SNS_BUCKET_NAME")]
    bucket_name: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "HERALD_LOG_LEVEL")]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Relay events until input ends or Ctrl-C
    Run,

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = if let Some(config_path) = &cli.config {
        HeraldConfig::from_file(config_path)?
    } else {
        HeraldConfig::from_env()
    };

    if let Some(topic_arn) = cli.topic_arn {
        config.sns.topic_arn = topic_arn;
    }
    if let Some(bucket_name) = cli.bucket_name {
        config.sns.bucket_name = bucket_name;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    match cli.command {
        Some(Commands::Version) => {
            println!("herald {}", herald_core::VERSION);
        }
        Some(Commands::Run) | None => {
            telemetry::init_logging(&config.logging);
            run(config, cli.events).await?;
        }
    }

    Ok(())
}

async fn run(config: HeraldConfig, events: Option<String>) -> anyhow::Result<()> {
    info!("Starting Herald {}", herald_core::VERSION);

    let metrics = telemetry::init_metrics(&config.metrics)?;
    let listeners = build_listeners(&config, metrics.recorder.clone()).await;
    let dispatcher = EventDispatcher::new(
        EventDispatcherConfig::from(&config.dispatcher),
        listeners,
    );

    let result = relay(dispatcher, events).await;
    debug!("Final metrics:\n{}", metrics.handle.render());
    info!("Herald stopped");

    result
}

/// Listeners for every enabled sink, in delivery order
async fn build_listeners(
    config: &HeraldConfig,
    recorder: Arc<PrometheusRecorder>,
) -> Vec<Arc<dyn EventListener>> {
    let mut listeners: Vec<Arc<dyn EventListener>> = Vec::new();

    if config.sns.enabled {
        info!(
            "Registering SNS listener for topic {} (payload bucket {})",
            config.sns.topic_arn, config.sns.bucket_name
        );
        let listener =
            SnsEventListener::from_config(&config.sns, Arc::new(SerdeJsonMapper), recorder).await;
        listeners.push(Arc::new(listener));
    } else {
        info!("SNS listener disabled");
    }

    listeners
}

/// Pump events until input ends or Ctrl-C, then shut the dispatcher down.
///
/// Shutdown runs even when intake fails; the intake error wins over a
/// shutdown error.
async fn relay(dispatcher: EventDispatcher, events: Option<String>) -> anyhow::Result<()> {
    let intake = async {
        match &events {
            Some(path) => {
                let file = tokio::fs::File::open(path).await?;
                source::pump_events(BufReader::new(file), &dispatcher).await
            }
            None => source::pump_events(BufReader::new(tokio::io::stdin()), &dispatcher).await,
        }
    };

    let intake_result = tokio::select! {
        result = intake => result.map(Some),
        _ = tokio::signal::ctrl_c() => Ok(None),
    };

    match &intake_result {
        Ok(Some(stats)) => info!(
            "Input exhausted after {} events ({} skipped)",
            stats.dispatched, stats.skipped
        ),
        Ok(None) => warn!("Interrupted, shutting down"),
        Err(e) => error!(code = e.code(), "Event intake failed: {}", e),
    }

    let shutdown_result = dispatcher.shutdown().await;

    intake_result?;
    shutdown_result?;
    Ok(())
}

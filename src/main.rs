//! Drivemode: main entry point.
//!
//! One binary, three roles selected by subcommand:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  MqttTransport     LogEventSink    JsonFileConfig   LogRender  │
//! │  (Transport+pump)  (EventSink)     (ConfigPort)     (Render)   │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │  publish:   StatePublisher                             │    │
//! │  │  display:   DisplayController (FSM · BlinkSession)     │    │
//! │  │  classify:  DriveModeClassifier → StatePublisher       │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use log::info;

use drivemode::adapters::config_file::JsonFileConfig;
use drivemode::adapters::log_render::LogRender;
use drivemode::adapters::log_sink::LogEventSink;
use drivemode::adapters::mqtt::{self, OneShotPublisher};
use drivemode::app::ports::ConfigPort;
use drivemode::app::publisher::StatePublisher;
use drivemode::app::service::DisplayController;
use drivemode::classifier::DriveModeClassifier;
use drivemode::config::RelayConfig;
use drivemode::events::{Inbox, InboxHandler};
use drivemode::runtime;

/// Shared between the broker pump thread and the async loop.
static INBOX: Inbox = Inbox::new();

#[derive(Parser, Debug)]
#[command(name = "drivemode", version, about = "Driver-state relay")]
struct Cli {
    #[arg(long, global = true, help = "JSON configuration file")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the cluster display: subscribe to drive-mode notifications.
    Display,
    /// Publish one notification for a detector label and exit.
    Publish {
        /// Raw label, e.g. `normal` or `restricted`.
        label: String,
    },
    /// Aggregate mood and heart-rate samples into drive-mode decisions.
    Classify,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = JsonFileConfig::new(cli.config)
        .load()
        .context("loading configuration")?;
    info!("drivemode v{} broker={}", env!("CARGO_PKG_VERSION"), config.broker_addr());

    match cli.command {
        Command::Display => run_display(&config),
        Command::Publish { label } => run_publish(&config, &label),
        Command::Classify => run_classify(&config),
    }
}

// ── Roles ─────────────────────────────────────────────────────

fn run_publish(config: &RelayConfig, label: &str) -> Result<()> {
    let publisher = StatePublisher::new(config.topics.mode.clone());
    let mut transport = OneShotPublisher::new(&config.broker);
    let mut sink = LogEventSink::new();
    let result = publisher.report(label, &mut transport, &mut sink);
    transport.disconnect();
    let state = result.context("publishing notification")?;
    info!("Sent {} for label {:?}", state, label);
    Ok(())
}

fn run_display(config: &RelayConfig) -> Result<()> {
    let (transport, connection) = mqtt::connect(&config.broker, "display");
    let pump = mqtt::spawn_pump(
        &transport,
        connection,
        vec![config.topics.mode.clone()],
        InboxHandler::new(&INBOX),
    )
    .context("starting broker pump")?;

    let mut render = LogRender::new();
    let mut sink = LogEventSink::new();
    let mut controller = DisplayController::new(config.alert.clone(), Instant::now());
    controller.start(&mut render, &mut sink);

    runtime::block_on(runtime::run_display(
        &INBOX,
        &config.topics.mode,
        &mut controller,
        &mut render,
        &mut sink,
    ));

    if pump.join().is_err() {
        bail!("broker pump panicked");
    }
    bail!("lost connection to broker at {}", config.broker_addr())
}

fn run_classify(config: &RelayConfig) -> Result<()> {
    let (mut transport, connection) = mqtt::connect(&config.broker, "classify");
    let mut classifier = DriveModeClassifier::new(&config.topics, &config.classifier);
    let topics = classifier.topics().map(str::to_string).to_vec();
    let pump = mqtt::spawn_pump(&transport, connection, topics, InboxHandler::new(&INBOX))
        .context("starting broker pump")?;

    let publisher = StatePublisher::new(config.topics.mode.clone());
    let mut sink = LogEventSink::new();
    let interval = Duration::from_secs(u64::from(config.classifier.analysis_interval_secs));

    runtime::block_on(runtime::run_classifier(
        &INBOX,
        interval,
        &mut classifier,
        &publisher,
        &mut transport,
        &mut sink,
    ));

    if pump.join().is_err() {
        bail!("broker pump panicked");
    }
    bail!("lost connection to broker at {}", config.broker_addr())
}

//! SynthWeather - Multi-AI Consensus Weather Dashboard
//!
//! Interactive terminal front end for the synthetic weather engine:
//! - Event loop on tokio (`TokioContext` + `TokioScheduler`)
//! - Ratatui dashboard on the main thread
//! - Frames flow to the UI over a crossbeam channel, key presses flow back
//!   through the scheduler

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use synthweather_core::{DashboardConfig, DashboardEvent, DashboardRuntime, WeatherDashboard};
use synthweather_env::{TokioContext, TokioScheduler};

/// SynthWeather terminal dashboard
#[derive(Parser, Debug)]
#[command(name = "synthweather")]
#[command(about = "Synthetic multi-AI weather consensus dashboard", long_about = None)]
struct Args {
    /// Location shown before the first search
    #[arg(short, long, default_value = "San Francisco, CA")]
    location: String,

    /// Header clock refresh interval in milliseconds
    #[arg(long, default_value = "1000")]
    tick_ms: u64,

    /// Write logs to this file (the terminal belongs to the dashboard)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };

    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let rt = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    let context = TokioContext::shared();
    let scheduler = TokioScheduler::<DashboardEvent>::shared(rt.handle().clone());

    let config = DashboardConfig {
        initial_location: args.location.clone(),
        clock_interval: Duration::from_millis(args.tick_ms.max(1)),
        ..DashboardConfig::default()
    };
    info!(location = %config.initial_location, "starting SynthWeather");

    // Engine: runs until the dashboard posts Shutdown
    let (frame_tx, frame_rx) = crossbeam::channel::unbounded();
    let mut runtime = DashboardRuntime::new(context, Arc::clone(&scheduler), config);
    let engine = rt.spawn(async move {
        runtime
            .run(move |frame| {
                // Receiver gone means the UI already quit
                let _ = frame_tx.send(frame.clone());
            })
            .await;
    });

    // UI: key presses go back through the scheduler
    let input = Arc::clone(&scheduler);
    let mut dashboard = WeatherDashboard::new(
        frame_rx,
        Box::new(move |event| {
            if let Err(e) = input.post(event) {
                warn!("dropping dashboard event: {}", e);
            }
        }),
    );
    let ui = dashboard.run();

    if ui.is_err() {
        // Esc posts Shutdown itself; a terminal failure does not
        let _ = scheduler.post(DashboardEvent::Shutdown);
    }
    rt.block_on(engine).context("dashboard engine panicked")?;
    ui.context("terminal dashboard failed")?;

    info!("SynthWeather stopped");
    Ok(())
}

//! JSON exporter for simulation traces.
//!
//! Exports one frame per dispatched event so a run can be diffed against
//! another seed or inspected offline.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use synthweather_core::DashboardFrame;

use crate::runner::ScenarioMetrics;

/// A single frame of simulation data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimFrame {
    /// Virtual time in milliseconds
    pub time_ms: u64,

    /// Event that produced this frame (`None` for the initial frame)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,

    pub location: String,
    pub condition: String,
    pub temperature: i32,
    pub loading: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_flight: Option<u64>,

    /// Status label per AI source, in source order
    pub statuses: Vec<String>,

    pub consensus_temperature: i32,
    pub average_confidence: u8,
    pub selected_day: String,
    pub forecast_high: i32,
    pub forecast_low: i32,
    pub average_precipitation: u8,
}

impl SimFrame {
    /// Flattens a dashboard frame taken at `time_ms`.
    pub fn capture(time_ms: u64, event: Option<String>, frame: &DashboardFrame) -> Self {
        Self {
            time_ms,
            event,
            location: frame.snapshot.location.clone(),
            condition: frame.snapshot.condition.label().to_string(),
            temperature: frame.snapshot.temperature,
            loading: frame.loading,
            in_flight: frame.in_flight.map(|id| id.value()),
            statuses: frame
                .readings
                .iter()
                .map(|r| r.status.label().to_string())
                .collect(),
            consensus_temperature: frame.consensus.consensus_temperature,
            average_confidence: frame.consensus.average_confidence,
            selected_day: frame.selected_day.label().to_string(),
            forecast_high: frame.forecast_summary.rounded_high(),
            forecast_low: frame.forecast_summary.rounded_low(),
            average_precipitation: frame.forecast_summary.average_precipitation,
        }
    }
}

/// Complete simulation export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimExport {
    /// Scenario name
    pub scenario: String,

    /// Seed used
    pub seed: u64,

    /// Duration in seconds
    pub duration_sec: f64,

    /// All frames
    pub frames: Vec<SimFrame>,

    /// Final results
    pub passed: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,

    pub metrics: ScenarioMetrics,
}

impl SimExport {
    /// Creates a new export container.
    pub fn new(scenario: &str, seed: u64) -> Self {
        Self {
            scenario: scenario.to_string(),
            seed,
            duration_sec: 0.0,
            frames: Vec::new(),
            passed: false,
            failure_reason: None,
            metrics: ScenarioMetrics::default(),
        }
    }

    /// Adds a frame.
    pub fn add_frame(&mut self, frame: SimFrame) {
        self.duration_sec = frame.time_ms as f64 / 1000.0;
        self.frames.push(frame);
    }

    /// Finalizes the export.
    pub fn finalize(&mut self, passed: bool, failure_reason: Option<String>, metrics: ScenarioMetrics) {
        self.passed = passed;
        self.failure_reason = failure_reason;
        self.metrics = metrics;
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

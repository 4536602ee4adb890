//! SynthWeather Core - Synthetic Multi-AI Weather Consensus Engine
//!
//! This library holds the sans-IO logic behind the SynthWeather dashboard:
//! 1. **Generators**: weather snapshots, AI source readings, 24-hour forecasts
//!    and map particles drawn from an injected random source
//! 2. **Consensus Simulator**: a timed `Analyzing -> Syncing -> Complete`
//!    state machine guarded by per-search ids
//! 3. **Summaries**: consensus temperature, agreement, forecast high/low and
//!    bar heights derived on every frame
//!
//! Time and timers come from `synthweather_env`, so the same runtime drives
//! the interactive dashboard and the deterministic simulator.

pub mod consensus;
pub mod error;
pub mod forecast;
pub mod frame;
pub mod generators;
pub mod model;
pub mod runtime;
pub mod search;
pub mod store;

#[cfg(feature = "dashboard")]
pub mod dashboard;

// Re-export key types for convenience
pub use consensus::ConsensusSummary;
pub use error::{CoreError, SearchError};
pub use forecast::ForecastSummary;
pub use frame::DashboardFrame;
pub use model::{
    AiReadings, AiSource, AiSourceReading, Condition, Forecast, ForecastCondition, ForecastDay,
    ForecastHour, MapParticle, SourceStatus, UvLevel, WeatherSnapshot,
};
pub use runtime::{DashboardConfig, DashboardRuntime, LoopControl};
pub use search::LocationSearch;
pub use store::{DashboardEvent, DashboardStore, SearchPhase, SearchTiming, StoreStats};

#[cfg(feature = "dashboard")]
pub use dashboard::{KeyOutcome, WeatherDashboard};

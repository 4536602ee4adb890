//! SynthWeather Deterministic Simulation Testing (DST) Harness
//!
//! This crate runs the dashboard runtime under a controlled environment
//! where every run is reproducible from a single 64-bit seed.
//!
//! # Core Principle
//!
//! All sources of non-determinism are intercepted and controlled:
//! - **Time**: Virtual clock that only moves to the next timer deadline
//! - **Timers**: Deadline heap instead of sleeping tasks
//! - **Randomness**: All generator entropy derived from the seed
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         SimWorld                            │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │ SimScheduler (deadline heap) ──► SimContext (clock)  │   │
//! │  └──────────────────────────────────────────────────────┘   │
//! │       │                                                     │
//! │  ┌────▼─────────────────┐        ┌──────────────────────┐   │
//! │  │   DashboardRuntime   │───────►│  SimFrame recording  │   │
//! │  │   (DashboardStore)   │        │  (JSON export)       │   │
//! │  └──────────────────────┘        └──────────────────────┘   │
//! │       ▲                                                     │
//! │  ┌────┴─────────────────────────┐                           │
//! │  │ ScenarioRunner (input+checks)│                           │
//! │  └──────────────────────────────┘                           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use synthweather_sim::{SimWorld, SimConfig};
//!
//! let mut world = SimWorld::new(SimConfig { seed: 42, ..Default::default() });
//! world.submit("Tokyo")?;
//! world.run_for(Duration::from_secs(2));
//! ```

mod context;
mod exporter;
mod runner;
mod scheduler;
mod world;
pub mod scenarios;

pub use context::SimContext;
pub use exporter::{SimExport, SimFrame};
pub use runner::{check_frame, ScenarioMetrics, ScenarioResult, ScenarioRunner};
pub use scheduler::SimScheduler;
pub use world::{SimConfig, SimRuntime, SimWorld};

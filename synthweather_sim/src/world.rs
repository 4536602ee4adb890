//! SimWorld - The simulation harness container.

use crate::context::SimContext;
use crate::exporter::SimFrame;
use crate::scheduler::SimScheduler;

use std::sync::Arc;
use std::time::Duration;
use synthweather_core::{
    CoreError, DashboardConfig, DashboardEvent, DashboardFrame, DashboardRuntime, DashboardStore,
    ForecastDay, LoopControl,
};
use synthweather_env::{Scheduler, WeatherContext};
use tracing::{debug, warn};

/// Runtime under the virtual clock.
pub type SimRuntime = DashboardRuntime<SimContext, SimScheduler<DashboardEvent>>;

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Master seed for determinism
    pub seed: u64,

    /// Scenario duration in virtual time
    pub duration: Duration,

    /// Dashboard settings (timings, initial location)
    pub dashboard: DashboardConfig,

    /// Keep a frame per dispatched event
    pub record: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            duration: Duration::from_secs(10),
            dashboard: DashboardConfig::default(),
            record: false,
        }
    }
}

/// The SimWorld - container for the entire simulation.
///
/// Events are dispatched synchronously: `run_for` pops every timer due within
/// the window in deadline order, moving the virtual clock with it.
pub struct SimWorld {
    /// Configuration
    pub config: SimConfig,

    /// Shared simulation context (virtual clock)
    pub context: Arc<SimContext>,

    /// Timer queue feeding the runtime
    pub scheduler: Arc<SimScheduler<DashboardEvent>>,

    runtime: SimRuntime,

    /// Recorded frames, if enabled
    frames: Vec<SimFrame>,

    /// Set once a `Shutdown` has been dispatched
    stopped: bool,
}

impl SimWorld {
    /// Creates a new SimWorld with the given configuration and arms the clock.
    pub fn new(config: SimConfig) -> Self {
        let context = SimContext::shared(config.seed);
        let scheduler = SimScheduler::shared(Arc::clone(&context));
        let mut runtime = DashboardRuntime::new(
            Arc::clone(&context),
            Arc::clone(&scheduler),
            config.dashboard.clone(),
        );
        runtime.start();

        let mut world = Self {
            config,
            context,
            scheduler,
            runtime,
            frames: Vec::new(),
            stopped: false,
        };
        world.record(None);
        world
    }

    /// Submits a location as if typed into the search box.
    pub fn submit(&mut self, location: &str) -> Result<(), CoreError> {
        self.dispatch(DashboardEvent::SubmitSearch(location.to_string()))
            .map(|_| ())
    }

    /// Selects a forecast day tab.
    pub fn select_day(&mut self, day: ForecastDay) -> Result<(), CoreError> {
        self.dispatch(DashboardEvent::SelectDay(day)).map(|_| ())
    }

    /// Posts `event` for delivery after `delay` of virtual time.
    pub fn inject(&self, delay: Duration, event: DashboardEvent) {
        self.scheduler.schedule(delay, event);
    }

    /// Handles one event at the current virtual time.
    pub fn dispatch(&mut self, event: DashboardEvent) -> Result<LoopControl, CoreError> {
        if self.stopped {
            return Ok(LoopControl::Shutdown);
        }

        let label = format!("{:?}", event);
        let result = self.runtime.dispatch(event);
        if let Ok(LoopControl::Shutdown) = result {
            self.stopped = true;
        }
        self.record(Some(label));
        result
    }

    /// Delivers every timer due within `window` and returns how many fired.
    ///
    /// The clock ends at the end of the window unless a `Shutdown` stopped
    /// the loop first.
    pub fn run_for(&mut self, window: Duration) -> usize {
        let horizon = self.context.now() + window;
        let mut fired = 0;

        while !self.stopped {
            let Some(event) = self.scheduler.pop_due(horizon) else {
                break;
            };
            fired += 1;
            match self.dispatch(event) {
                Ok(_) => {}
                Err(e) if e.is_rejected_search() => debug!("submission ignored: {}", e),
                Err(e) => warn!("event failed: {}", e),
            }
        }

        if !self.stopped {
            self.context.advance_to(horizon);
        }
        fired
    }

    fn record(&mut self, event: Option<String>) {
        if !self.config.record {
            return;
        }
        let time_ms = self.context.now().as_millis() as u64;
        self.frames
            .push(SimFrame::capture(time_ms, event, &self.runtime.frame()));
    }

    /// Returns the state container.
    pub fn store(&self) -> &DashboardStore {
        self.runtime.store()
    }

    /// Returns the current render input.
    pub fn frame(&self) -> DashboardFrame {
        self.runtime.frame()
    }

    /// Returns the current simulation time in seconds.
    pub fn time(&self) -> f64 {
        self.context.now().as_secs_f64()
    }

    /// Returns the number of events dispatched.
    pub fn dispatched(&self) -> u64 {
        self.runtime.dispatched()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Recorded frames (empty unless `record` is set).
    pub fn frames(&self) -> &[SimFrame] {
        &self.frames
    }

    /// Moves the recorded frames out.
    pub fn take_frames(&mut self) -> Vec<SimFrame> {
        std::mem::take(&mut self.frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use synthweather_core::SourceStatus;

    fn world(seed: u64) -> SimWorld {
        SimWorld::new(SimConfig {
            seed,
            record: true,
            ..Default::default()
        })
    }

    #[test]
    fn test_sim_world_creation() {
        let world = world(42);
        assert_eq!(world.time(), 0.0);
        assert!(!world.store().is_loading());
        // Only the clock tick is armed
        assert_eq!(world.scheduler.pending(), 1);
        assert_eq!(world.frames().len(), 1);
    }

    #[test]
    fn test_search_runs_on_virtual_clock() {
        let mut world = world(42);
        world.submit("Lisbon").unwrap();
        assert!(world
            .store()
            .readings()
            .iter()
            .all(|r| r.status == SourceStatus::Analyzing));

        world.run_for(Duration::from_millis(800));
        assert!(world
            .store()
            .readings()
            .iter()
            .all(|r| r.status == SourceStatus::Syncing));

        world.run_for(Duration::from_millis(1200));
        assert!(!world.store().is_loading());
        assert_eq!(world.store().snapshot().location, "Lisbon");
        assert!((world.time() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_clock_ticks_until_shutdown() {
        let mut world = world(3);
        let fired = world.run_for(Duration::from_secs(3));
        assert_eq!(fired, 3);

        world.dispatch(DashboardEvent::Shutdown).unwrap();
        assert!(world.is_stopped());
        assert_eq!(world.run_for(Duration::from_secs(3)), 0);
    }

    #[test]
    fn test_sim_world_determinism() {
        let run = |seed| {
            let mut world = world(seed);
            world.submit("Nairobi").unwrap();
            world.run_for(Duration::from_secs(3));
            world.select_day(ForecastDay::DayAfter).unwrap();
            serde_json::to_string(world.frames()).unwrap()
        };

        // Same seed = same trace
        assert_eq!(run(42), run(42));
        assert_ne!(run(42), run(43));
    }
}

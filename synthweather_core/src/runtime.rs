//! Dashboard Runtime - drives the store with an environment context.
//!
//! This module is the composition root between the pure state container
//! (`DashboardStore`) and the environment abstraction (`WeatherContext` +
//! `Scheduler`).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    DashboardRuntime                         │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │              Context: WeatherContext                  │   │
//! │  │  • system_time() → header clock                      │   │
//! │  │  • derive_rng() → generator random source            │   │
//! │  └──────────────────────────────────────────────────────┘   │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │     Scheduler<DashboardEvent>: timers + UI input      │   │
//! │  └──────────────────────────────────────────────────────┘   │
//! │                              │                               │
//! │  ┌─────────┐ ┌─────────┐ ┌───────────┐ ┌─────────────────┐  │
//! │  │   MAP   │ │  CONDS  │ │ CONSENSUS │ │    FORECAST     │  │
//! │  └─────────┘ └─────────┘ └───────────┘ └─────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use synthweather_core::runtime::{DashboardConfig, DashboardRuntime};
//! use synthweather_env::{TokioContext, TokioScheduler};
//!
//! let ctx = TokioContext::shared();
//! let sched = TokioScheduler::shared(handle);
//! let mut runtime = DashboardRuntime::new(ctx, sched, DashboardConfig::default());
//!
//! runtime.run(|frame| render(frame)).await;
//! ```

use crate::error::CoreError;
use crate::frame::DashboardFrame;
use crate::store::{DashboardEvent, DashboardStore, SearchTiming};

use std::sync::Arc;
use std::time::Duration;
use synthweather_env::{Scheduler, WeatherContext};
use tracing::{debug, info, warn};

/// Random stream the store draws from.
pub const STORE_RNG_STREAM: u64 = 1;

/// Configuration for the dashboard runtime.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Location shown before the first search (default: "San Francisco, CA")
    pub initial_location: String,

    /// Delays of the search sequence (default: 800ms + 1200ms)
    pub timing: SearchTiming,

    /// Wall-clock refresh period (default: 1s)
    pub clock_interval: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            initial_location: "San Francisco, CA".to_string(),
            timing: SearchTiming::default(),
            clock_interval: Duration::from_secs(1),
        }
    }
}

/// Whether the event loop keeps going after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Shutdown,
}

/// The dashboard event loop.
///
/// Generic over the context and scheduler implementations, allowing the
/// same loop to run interactively (tokio) or under the virtual clock.
pub struct DashboardRuntime<Ctx, Sched>
where
    Ctx: WeatherContext,
    Sched: Scheduler<DashboardEvent>,
{
    /// Environment context
    pub context: Arc<Ctx>,

    /// Timer and input queue
    pub scheduler: Arc<Sched>,

    /// Configuration
    pub config: DashboardConfig,

    /// State container
    store: DashboardStore,

    /// Whether the clock tick has been armed
    started: bool,

    /// Events handled so far
    dispatched: u64,
}

impl<Ctx, Sched> DashboardRuntime<Ctx, Sched>
where
    Ctx: WeatherContext,
    Sched: Scheduler<DashboardEvent>,
{
    /// Creates a runtime whose store draws from the context's random source.
    pub fn new(context: Arc<Ctx>, scheduler: Arc<Sched>, config: DashboardConfig) -> Self {
        let rng = context.derive_rng(STORE_RNG_STREAM);
        let store = DashboardStore::new(
            rng,
            &config.initial_location,
            config.timing,
            context.system_time(),
        );

        Self {
            context,
            scheduler,
            config,
            store,
            started: false,
            dispatched: 0,
        }
    }

    /// Arms the periodic clock tick. Idempotent.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.scheduler.schedule(self.config.clock_interval, DashboardEvent::ClockTick);
        info!(
            location = %self.config.initial_location,
            seed = self.context.seed(),
            "dashboard runtime started"
        );
    }

    /// Handles one event and schedules whatever it defers.
    ///
    /// A `ClockTick` re-arms itself here, so the tick runs until `Shutdown`.
    ///
    /// # Errors
    /// Rejected submissions are returned as `CoreError::Search`; the state is
    /// unchanged.
    pub fn dispatch(&mut self, event: DashboardEvent) -> Result<LoopControl, CoreError> {
        self.dispatched += 1;

        if event == DashboardEvent::Shutdown {
            info!(events = self.dispatched, "dashboard runtime shutting down");
            return Ok(LoopControl::Shutdown);
        }

        let rearm_clock = event == DashboardEvent::ClockTick;
        let deferred = self.store.apply(event, self.context.system_time())?;

        for d in deferred {
            self.scheduler.schedule(d.delay, d.event);
        }
        if rearm_clock {
            self.scheduler.schedule(self.config.clock_interval, DashboardEvent::ClockTick);
        }

        Ok(LoopControl::Continue)
    }

    /// Runs the event loop until `Shutdown` or until the scheduler runs dry.
    ///
    /// `on_frame` sees the initial frame and the frame after every event.
    pub async fn run<F>(&mut self, mut on_frame: F)
    where
        F: FnMut(&DashboardFrame) + Send,
    {
        self.start();
        on_frame(&self.store.frame());

        while let Some(event) = self.scheduler.recv().await {
            match self.dispatch(event) {
                Ok(LoopControl::Continue) => {}
                Ok(LoopControl::Shutdown) => break,
                Err(e) if e.is_rejected_search() => debug!("submission ignored: {}", e),
                Err(e) => warn!("event failed: {}", e),
            }
            on_frame(&self.store.frame());
        }
    }

    /// Returns the state container.
    pub fn store(&self) -> &DashboardStore {
        &self.store
    }

    /// Returns the current render input.
    pub fn frame(&self) -> DashboardFrame {
        self.store.frame()
    }

    /// Returns the number of events handled.
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SourceStatus;
    use synthweather_env::{TokioContext, TokioScheduler};

    #[test]
    fn test_dashboard_config_default() {
        let config = DashboardConfig::default();
        assert_eq!(config.initial_location, "San Francisco, CA");
        assert_eq!(config.timing.total(), Duration::from_millis(2000));
        assert_eq!(config.clock_interval, Duration::from_secs(1));
    }

    fn fast_config() -> DashboardConfig {
        DashboardConfig {
            timing: SearchTiming {
                analyzing: Duration::from_millis(20),
                syncing: Duration::from_millis(30),
            },
            clock_interval: Duration::from_millis(10),
            ..DashboardConfig::default()
        }
    }

    #[tokio::test]
    async fn test_run_completes_search_then_shuts_down() {
        let context = TokioContext::shared();
        let scheduler = Arc::new(TokioScheduler::current());
        let mut runtime = DashboardRuntime::new(context, Arc::clone(&scheduler), fast_config());

        scheduler.schedule(Duration::ZERO, DashboardEvent::SubmitSearch("Hanoi".into()));
        scheduler.schedule(Duration::ZERO, DashboardEvent::SubmitSearch("Ignored".into()));
        scheduler.schedule(Duration::from_millis(200), DashboardEvent::Shutdown);

        let mut seen = Vec::new();
        runtime
            .run(|frame| {
                seen.push(frame.readings.iter().map(|r| r.status).collect::<Vec<_>>());
            })
            .await;

        let store = runtime.store();
        assert_eq!(store.snapshot().location, "Hanoi");
        assert!(!store.is_loading());
        assert_eq!(store.stats().rejected_submissions, 1);
        assert!(seen.iter().any(|s| s.iter().all(|st| *st == SourceStatus::Analyzing)));
        assert!(seen.iter().any(|s| s.iter().all(|st| *st == SourceStatus::Syncing)));
    }

    #[tokio::test]
    async fn test_dispatch_rearms_clock() {
        let context = TokioContext::shared();
        let scheduler = Arc::new(TokioScheduler::current());
        let mut runtime = DashboardRuntime::new(context, Arc::clone(&scheduler), fast_config());

        runtime.start();
        runtime.start();
        assert_eq!(scheduler.pending(), 1);

        let event = scheduler.recv().await.unwrap();
        assert_eq!(event, DashboardEvent::ClockTick);
        assert_eq!(runtime.dispatch(event).unwrap(), LoopControl::Continue);
        assert_eq!(scheduler.pending(), 1);
    }
}

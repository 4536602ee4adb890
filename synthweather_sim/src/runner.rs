//! Scenario runner - executes the deterministic dashboard scenarios.

use crate::exporter::SimExport;
use crate::scenarios::ScenarioId;
use crate::world::{SimConfig, SimWorld};

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use synthweather_core::{
    ConsensusSummary, CoreError, DashboardEvent, DashboardFrame, ForecastDay, SearchError,
    SearchPhase, SourceStatus, StoreStats,
};
use synthweather_env::{Scheduler, SearchId, WeatherContext};
use tracing::{debug, info, warn};

/// Random stream the soak scenario draws its input from.
const SOAK_INPUT_STREAM: u64 = 7;

const SOAK_LOCATIONS: [&str; 6] = [
    "Reykjavik",
    "Tokyo",
    "São Paulo",
    "Cape Town",
    "  Anchorage  ",
    "   ",
];

/// Results from running a scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    /// Scenario that was run
    #[serde(serialize_with = "serialize_scenario")]
    pub scenario: ScenarioId,

    /// Seed used
    pub seed: u64,

    /// Whether scenario passed all assertions
    pub passed: bool,

    /// Events dispatched by the runtime
    pub events_dispatched: u64,

    /// Final simulation time in seconds
    pub final_time_secs: f64,

    /// Failure message if any
    pub failure_reason: Option<String>,

    /// Metrics collected during run
    pub metrics: ScenarioMetrics,
}

fn serialize_scenario<S: serde::Serializer>(id: &ScenarioId, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(id.name())
}

/// Metrics collected during scenario execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioMetrics {
    pub searches_started: u64,
    pub searches_completed: u64,
    pub rejected_submissions: u64,
    pub stale_transitions: u64,
    pub forecasts_generated: u64,

    /// Frames checked against the dashboard invariants
    pub frames_checked: u64,
}

impl ScenarioMetrics {
    fn from_stats(stats: StoreStats, frames_checked: u64) -> Self {
        Self {
            searches_started: stats.searches_started,
            searches_completed: stats.searches_completed,
            rejected_submissions: stats.rejected_submissions,
            stale_transitions: stats.stale_transitions,
            forecasts_generated: stats.forecasts_generated,
            frames_checked,
        }
    }
}

type Check = Result<(), String>;

fn ensure(condition: bool, reason: impl FnOnce() -> String) -> Check {
    if condition {
        Ok(())
    } else {
        Err(reason())
    }
}

fn all_status(frame: &DashboardFrame, status: SourceStatus) -> bool {
    frame.readings.iter().all(|r| r.status == status)
}

/// Checks every frame-level invariant of the dashboard.
pub fn check_frame(frame: &DashboardFrame) -> Check {
    let s = &frame.snapshot;
    ensure((10..40).contains(&s.temperature), || format!("temperature {} out of range", s.temperature))?;
    ensure((40..80).contains(&s.humidity), || format!("humidity {} out of range", s.humidity))?;
    ensure((5..30).contains(&s.wind_speed), || format!("wind {} out of range", s.wind_speed))?;
    ensure((1000..1040).contains(&s.pressure), || format!("pressure {} out of range", s.pressure))?;
    ensure((1..11).contains(&s.uv_index), || format!("uv {} out of range", s.uv_index))?;
    ensure((5..20).contains(&s.visibility), || format!("visibility {} out of range", s.visibility))?;

    let first = frame.readings[0].status;
    ensure(frame.readings.iter().all(|r| r.status == first), || {
        "sources disagree on status".to_string()
    })?;
    ensure(frame.loading == frame.in_flight.is_some(), || {
        "loading flag does not match in-flight search".to_string()
    })?;
    ensure(frame.loading || first == SourceStatus::Complete, || {
        format!("idle dashboard shows {:?}", first)
    })?;
    ensure(!frame.loading || first != SourceStatus::Complete, || {
        "loading dashboard shows Complete".to_string()
    })?;
    for r in frame.readings.iter() {
        ensure(r.confidence <= 100, || format!("{} confidence {}", r.source.label(), r.confidence))?;
    }

    ensure(
        frame.consensus == ConsensusSummary::from_readings(&frame.readings),
        || "consensus out of date".to_string(),
    )?;

    let hours = frame.forecast.hours();
    ensure(hours.len() == 24, || format!("{} forecast hours", hours.len()))?;
    ensure(
        hours.iter().enumerate().all(|(i, h)| usize::from(h.hour) == i),
        || "forecast hours out of order".to_string(),
    )?;
    ensure(
        frame.forecast_summary.low <= frame.forecast_summary.high,
        || "forecast low above high".to_string(),
    )?;
    ensure(
        frame.bar_heights().iter().all(|h| h.is_finite() && (0.0..=1.0).contains(h)),
        || "bar height outside [0, 1]".to_string(),
    )?;
    Ok(())
}

/// Runs dashboard scenarios.
pub struct ScenarioRunner {
    /// Configuration seed
    seed: u64,

    /// Duration of open-ended scenarios
    duration: Duration,
}

impl ScenarioRunner {
    /// Creates a new scenario runner.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            duration: Duration::from_secs(10),
        }
    }

    /// Sets the virtual window of the clock and soak scenarios.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    fn world(&self, record: bool) -> SimWorld {
        SimWorld::new(SimConfig {
            seed: self.seed,
            duration: self.duration,
            record,
            ..SimConfig::default()
        })
    }

    /// Runs a scenario and returns the result.
    pub fn run(&self, scenario: ScenarioId) -> ScenarioResult {
        let mut world = self.world(false);
        self.execute(scenario, &mut world)
    }

    /// Runs a scenario keeping a frame per event.
    pub fn run_recorded(&self, scenario: ScenarioId) -> (ScenarioResult, SimExport) {
        let mut world = self.world(true);
        let result = self.execute(scenario, &mut world);

        let mut export = SimExport::new(scenario.name(), self.seed);
        for frame in world.take_frames() {
            export.add_frame(frame);
        }
        export.finalize(result.passed, result.failure_reason.clone(), result.metrics);
        (result, export)
    }

    fn execute(&self, scenario: ScenarioId, world: &mut SimWorld) -> ScenarioResult {
        info!("Starting scenario: {} (seed={})", scenario.name(), self.seed);

        let mut frames_checked = 0;
        let outcome = match scenario {
            ScenarioId::SingleSearch => self.run_single_search(world, &mut frames_checked),
            ScenarioId::RapidResubmit => self.run_rapid_resubmit(world, &mut frames_checked),
            ScenarioId::BlankSearch => self.run_blank_search(world, &mut frames_checked),
            ScenarioId::StaleTimer => self.run_stale_timer(world, &mut frames_checked),
            ScenarioId::DaySwitch => self.run_day_switch(world, &mut frames_checked),
            ScenarioId::ClockTick => self.run_clock_tick(world, &mut frames_checked),
            ScenarioId::Soak => self.run_soak(world, &mut frames_checked),
        };

        let metrics = ScenarioMetrics::from_stats(world.store().stats(), frames_checked);
        match &outcome {
            Ok(()) => info!("✓ {} passed at t={:.1}s", scenario.name(), world.time()),
            Err(reason) => warn!("✗ {} failed: {}", scenario.name(), reason),
        }

        ScenarioResult {
            scenario,
            seed: self.seed,
            passed: outcome.is_ok(),
            events_dispatched: world.dispatched(),
            final_time_secs: world.time(),
            failure_reason: outcome.err(),
            metrics,
        }
    }

    fn checked(world: &SimWorld, frames_checked: &mut u64) -> Result<DashboardFrame, String> {
        let frame = world.frame();
        check_frame(&frame).map_err(|e| format!("t={:.3}s: {}", world.time(), e))?;
        *frames_checked += 1;
        Ok(frame)
    }

    /// SW-001: SingleSearch - one search from submit to Complete.
    ///
    /// **Assertion**: statuses flip exactly at 800ms and 2000ms, values stay
    /// put until Complete, the snapshot then carries the submitted location.
    fn run_single_search(&self, world: &mut SimWorld, checked: &mut u64) -> Check {
        info!("SW-001: SingleSearch");
        let timing = world.config.dashboard.timing;
        let before = Self::checked(world, checked)?;

        world.submit("Tokyo").map_err(|e| e.to_string())?;
        let analyzing = Self::checked(world, checked)?;
        ensure(analyzing.loading && all_status(&analyzing, SourceStatus::Analyzing), || {
            "submit did not enter Analyzing".to_string()
        })?;

        world.run_for(timing.analyzing - Duration::from_millis(1));
        let still = Self::checked(world, checked)?;
        ensure(all_status(&still, SourceStatus::Analyzing), || {
            "left Analyzing before 800ms".to_string()
        })?;

        world.run_for(Duration::from_millis(1));
        let syncing = Self::checked(world, checked)?;
        ensure(all_status(&syncing, SourceStatus::Syncing), || {
            "not Syncing at 800ms".to_string()
        })?;
        ensure(syncing.snapshot == before.snapshot, || {
            "snapshot changed before Complete".to_string()
        })?;
        let values = |f: &DashboardFrame| -> Vec<(i32, u8)> {
            f.readings.iter().map(|r| (r.temperature, r.confidence)).collect()
        };
        ensure(values(&syncing) == values(&before), || {
            "reading values changed before Complete".to_string()
        })?;

        world.run_for(timing.syncing - Duration::from_millis(1));
        ensure(Self::checked(world, checked)?.loading, || {
            "completed before 2000ms".to_string()
        })?;

        world.run_for(Duration::from_millis(1));
        let done = Self::checked(world, checked)?;
        ensure(!done.loading && all_status(&done, SourceStatus::Complete), || {
            "not Complete at 2000ms".to_string()
        })?;
        ensure(done.snapshot.location == "Tokyo", || {
            format!("snapshot location {:?}", done.snapshot.location)
        })?;
        ensure(world.store().stats().searches_completed == 1, || {
            "expected one completed search".to_string()
        })
    }

    /// SW-002: RapidResubmit - the in-flight guard.
    fn run_rapid_resubmit(&self, world: &mut SimWorld, checked: &mut u64) -> Check {
        info!("SW-002: RapidResubmit");
        let timing = world.config.dashboard.timing;

        world.submit("Oslo").map_err(|e| e.to_string())?;
        let first = world.store().in_flight_search();

        for (at, location) in [(100, "Bergen"), (900, "Trondheim"), (1999, "Tromsø")] {
            world.run_for(Duration::from_millis(at) - world.context.now());
            let result = world.submit(location);
            ensure(
                matches!(result, Err(CoreError::Search(SearchError::InFlight { .. }))),
                || format!("{} at {}ms was not rejected: {:?}", location, at, result),
            )?;
            ensure(world.store().in_flight_search() == first, || {
                "rejected submission replaced the in-flight search".to_string()
            })?;
            Self::checked(world, checked)?;
        }

        world.run_for(timing.total());
        let done = Self::checked(world, checked)?;
        ensure(done.snapshot.location == "Oslo", || {
            format!("completed for {:?}", done.snapshot.location)
        })?;

        // Accepted again once idle
        world.submit("Bergen").map_err(|e| e.to_string())?;
        world.run_for(timing.total());
        let stats = world.store().stats();
        ensure(stats.searches_started == 2 && stats.searches_completed == 2, || {
            format!("stats {:?}", stats)
        })?;
        ensure(stats.rejected_submissions == 3, || {
            format!("{} rejected submissions", stats.rejected_submissions)
        })
    }

    /// SW-003: BlankSearch - whitespace input is a no-op.
    fn run_blank_search(&self, world: &mut SimWorld, checked: &mut u64) -> Check {
        info!("SW-003: BlankSearch");
        let before = Self::checked(world, checked)?;
        let pending = world.scheduler.pending();

        for raw in ["", "   ", "\t\n"] {
            let result = world.submit(raw);
            ensure(
                matches!(result, Err(CoreError::Search(SearchError::EmptyLocation))),
                || format!("{:?} was not rejected as empty: {:?}", raw, result),
            )?;
        }

        let after = Self::checked(world, checked)?;
        ensure(!after.loading && after.snapshot == before.snapshot, || {
            "blank submission changed the dashboard".to_string()
        })?;
        ensure(world.scheduler.pending() == pending, || {
            "blank submission scheduled a timer".to_string()
        })?;
        ensure(world.store().stats().searches_started == 0, || {
            "blank submission started a search".to_string()
        })
    }

    /// SW-004: StaleTimer - transitions that do not belong to the in-flight
    /// search in its current phase are dropped.
    fn run_stale_timer(&self, world: &mut SimWorld, checked: &mut u64) -> Check {
        info!("SW-004: StaleTimer");
        let timing = world.config.dashboard.timing;

        // Nothing in flight
        world.inject(Duration::from_millis(10), DashboardEvent::Advance {
            search: SearchId::first(),
            phase: SearchPhase::Syncing,
        });
        world.run_for(Duration::from_millis(50));

        world.submit("Lima").map_err(|e| e.to_string())?;
        let current = world
            .store()
            .in_flight_search()
            .ok_or_else(|| "submit did not start a search".to_string())?;

        // Foreign id, then a phase skip on the real id
        world.inject(Duration::from_millis(100), DashboardEvent::Advance {
            search: SearchId(current.value() + 41),
            phase: SearchPhase::Syncing,
        });
        world.inject(Duration::from_millis(200), DashboardEvent::Advance {
            search: current,
            phase: SearchPhase::Complete,
        });
        world.run_for(Duration::from_millis(300));
        let frame = Self::checked(world, checked)?;
        ensure(all_status(&frame, SourceStatus::Analyzing), || {
            "stale transition moved the search".to_string()
        })?;

        world.run_for(timing.total());
        let done = Self::checked(world, checked)?;
        ensure(!done.loading && done.snapshot.location == "Lima", || {
            "search did not finish normally".to_string()
        })?;

        // Replay of a finished search
        world.inject(Duration::ZERO, DashboardEvent::Advance {
            search: current,
            phase: SearchPhase::Complete,
        });
        world.run_for(Duration::from_millis(1));

        let stats = world.store().stats();
        debug!("stale transitions: {}", stats.stale_transitions);
        ensure(stats.stale_transitions == 4, || {
            format!("{} stale transitions, expected 4", stats.stale_transitions)
        })?;
        ensure(stats.searches_completed == 1, || {
            format!("{} completions, expected 1", stats.searches_completed)
        })
    }

    /// SW-005: DaySwitch - forecast regeneration on tab change.
    fn run_day_switch(&self, world: &mut SimWorld, checked: &mut u64) -> Check {
        info!("SW-005: DaySwitch");
        let initial = Self::checked(world, checked)?;

        world.select_day(ForecastDay::Today).map_err(|e| e.to_string())?;
        let same = Self::checked(world, checked)?;
        ensure(same.forecast == initial.forecast, || {
            "reselecting the current day regenerated the forecast".to_string()
        })?;

        let mut previous = same.forecast;
        for day in [ForecastDay::Tomorrow, ForecastDay::DayAfter, ForecastDay::Today] {
            world.select_day(day).map_err(|e| e.to_string())?;
            let frame = Self::checked(world, checked)?;
            ensure(frame.selected_day == day, || format!("{:?} not selected", day))?;
            ensure(frame.forecast != previous, || {
                format!("{:?} kept the previous forecast", day)
            })?;
            previous = frame.forecast;
        }

        let generated = world.store().stats().forecasts_generated;
        ensure(generated == 4, || format!("{} forecasts generated, expected 4", generated))
    }

    /// SW-006: ClockTick - header clock follows virtual time until shutdown.
    fn run_clock_tick(&self, world: &mut SimWorld, checked: &mut u64) -> Check {
        info!("SW-006: ClockTick");
        let start = Self::checked(world, checked)?.clock;
        let secs = world.config.duration.as_secs().max(1);

        let fired = world.run_for(Duration::from_secs(secs));
        ensure(fired as u64 == secs, || format!("{} ticks in {}s", fired, secs))?;
        let frame = Self::checked(world, checked)?;
        let elapsed = frame
            .clock
            .duration_since(start)
            .map_err(|e| e.to_string())?;
        ensure(elapsed == Duration::from_secs(secs), || {
            format!("clock moved {:?} in {}s", elapsed, secs)
        })?;
        ensure(world.scheduler.pending() == 1, || {
            format!("{} timers pending, expected the next tick", world.scheduler.pending())
        })?;

        world.dispatch(DashboardEvent::Shutdown).map_err(|e| e.to_string())?;
        ensure(world.run_for(Duration::from_secs(5)) == 0, || {
            "ticks fired after shutdown".to_string()
        })
    }

    /// SW-007: Soak - random input against every frame invariant.
    fn run_soak(&self, world: &mut SimWorld, checked: &mut u64) -> Check {
        let window = world.config.duration;
        info!("SW-007: Soak ({:?})", window);
        let timing = world.config.dashboard.timing;
        let mut input = world.context.derive_rng(SOAK_INPUT_STREAM);
        let end = world.context.now() + window;

        while world.context.now() < end {
            let step = Duration::from_millis(input.gen_range(50..1500));
            world.run_for(step.min(end - world.context.now()));
            Self::checked(world, checked)?;

            match input.gen_range(0..10) {
                0..=4 => {
                    let location = SOAK_LOCATIONS[input.gen_range(0..SOAK_LOCATIONS.len())];
                    if let Err(e) = world.submit(location) {
                        debug!("  soak submission {:?} rejected: {}", location, e);
                    }
                }
                5..=7 => {
                    let day = ForecastDay::ALL[input.gen_range(0..ForecastDay::ALL.len())];
                    world.select_day(day).map_err(|e| e.to_string())?;
                }
                _ => {}
            }
            Self::checked(world, checked)?;
        }

        // Let the last search land
        world.run_for(timing.total());
        Self::checked(world, checked)?;
        let stats = world.store().stats();
        ensure(!world.store().is_loading(), || "still loading after drain".to_string())?;
        ensure(stats.searches_started == stats.searches_completed, || {
            format!("{} started, {} completed", stats.searches_started, stats.searches_completed)
        })?;
        ensure(stats.stale_transitions == 0, || {
            format!("{} stale transitions without injection", stats.stale_transitions)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_all_scenarios_pass() {
        let runner = ScenarioRunner::new(42).with_duration(Duration::from_secs(20));
        for scenario in ScenarioId::all() {
            let result = runner.run(scenario);
            assert!(result.passed, "{}: {:?}", scenario, result.failure_reason);
        }
    }

    #[test]
    fn test_recorded_run_matches_plain_run() {
        let runner = ScenarioRunner::new(9).with_duration(Duration::from_secs(5));
        let plain = runner.run(ScenarioId::Soak);
        let (recorded, export) = runner.run_recorded(ScenarioId::Soak);

        assert_eq!(plain.metrics.searches_started, recorded.metrics.searches_started);
        assert_eq!(plain.events_dispatched, recorded.events_dispatched);
        assert_eq!(export.frames.len() as u64, recorded.events_dispatched + 1);
        assert!(export.passed);
    }

    #[test]
    fn test_scenario_window_follows_duration() {
        let result = ScenarioRunner::new(3)
            .with_duration(Duration::from_secs(3))
            .run(ScenarioId::ClockTick);
        assert!(result.passed, "{:?}", result.failure_reason);
        assert_eq!(result.final_time_secs, 3.0);

        let soak = ScenarioRunner::new(3)
            .with_duration(Duration::from_millis(2500))
            .run(ScenarioId::Soak);
        assert!(soak.passed, "{:?}", soak.failure_reason);
        assert!(soak.final_time_secs >= 2.5);
        assert!(soak.final_time_secs < 2.5 + 2.1);
    }

    #[test]
    fn test_soak_is_deterministic() {
        let a = ScenarioRunner::new(1234).with_duration(Duration::from_secs(15)).run(ScenarioId::Soak);
        let b = ScenarioRunner::new(1234).with_duration(Duration::from_secs(15)).run(ScenarioId::Soak);
        assert_eq!(a.metrics, b.metrics);
        assert_eq!(a.events_dispatched, b.events_dispatched);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_soak_holds_for_any_seed(seed in any::<u64>()) {
            let result = ScenarioRunner::new(seed).with_duration(Duration::from_secs(8)).run(ScenarioId::Soak);
            prop_assert!(result.passed, "{:?}", result.failure_reason);
        }

        #[test]
        fn prop_single_search_holds_for_any_seed(seed in any::<u64>()) {
            let result = ScenarioRunner::new(seed).run(ScenarioId::SingleSearch);
            prop_assert!(result.passed, "{:?}", result.failure_reason);
        }
    }
}

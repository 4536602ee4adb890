//! AI Consensus Simulator
//! =======================
//!
//! The dashboard's single state container. All mutation goes through
//! [`DashboardStore::apply`], which returns the deferred events the caller
//! must schedule.
//!
//! # Search Sequence
//!
//! ```text
//!  submit ──► ANALYZING ──(800ms)──► SYNCING ──(1200ms)──► COMPLETE
//!    │            │                     │                     │
//!    │       loading = true        values unchanged     snapshot + readings
//!    │                                                  regenerated, loading
//!    └─ rejected while a search is in flight                 = false
//! ```
//!
//! Each transition is chained from the previous one and tagged with the
//! search's `SearchId` and the phase it moves to. A transition that does not
//! match the in-flight search, or skips a phase, is stale and dropped.

use crate::consensus::ConsensusSummary;
use crate::error::{CoreError, SearchError};
use crate::forecast::ForecastSummary;
use crate::frame::DashboardFrame;
use crate::generators::{
    generate_ai_source_readings, generate_forecast, generate_map_particles,
    generate_weather_snapshot,
};
use crate::model::{
    AiReadings, Forecast, ForecastDay, MapParticle, SourceStatus, WeatherSnapshot,
};
use crate::search::normalize_location;

use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};
use synthweather_env::{BoxedRng, SearchId};
use tracing::{debug, info};

// =============================================================================
// EVENTS
// =============================================================================

/// Phase a scheduled search transition moves the readings into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchPhase {
    Syncing,
    Complete,
}

impl SearchPhase {
    pub fn status(&self) -> SourceStatus {
        match self {
            SearchPhase::Syncing => SourceStatus::Syncing,
            SearchPhase::Complete => SourceStatus::Complete,
        }
    }
}

/// Everything the dashboard event loop can be handed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardEvent {
    /// Search control submitted a location
    SubmitSearch(String),
    /// Forecast day tab selected
    SelectDay(ForecastDay),
    /// Periodic wall-clock refresh
    ClockTick,
    /// One-shot transition of a search
    Advance { search: SearchId, phase: SearchPhase },
    /// Stop the event loop
    Shutdown,
}

/// An event to deliver once `delay` has elapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deferred {
    pub delay: Duration,
    pub event: DashboardEvent,
}

/// Delays of the search sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTiming {
    /// Submit to Syncing
    pub analyzing: Duration,
    /// Syncing to Complete
    pub syncing: Duration,
}

impl SearchTiming {
    /// Submit to Complete.
    pub fn total(&self) -> Duration {
        self.analyzing + self.syncing
    }
}

impl Default for SearchTiming {
    fn default() -> Self {
        Self {
            analyzing: Duration::from_millis(800),
            syncing: Duration::from_millis(1200),
        }
    }
}

/// Counters kept by the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub searches_started: u64,
    pub searches_completed: u64,
    pub rejected_submissions: u64,
    pub stale_transitions: u64,
    pub forecasts_generated: u64,
}

/// The search currently between submit and Complete.
#[derive(Debug, Clone, PartialEq, Eq)]
struct InFlightSearch {
    id: SearchId,
    location: String,
    status: SourceStatus,
}

// =============================================================================
// STORE
// =============================================================================

/// Top-level dashboard state.
pub struct DashboardStore {
    rng: BoxedRng,
    timing: SearchTiming,
    snapshot: WeatherSnapshot,
    readings: AiReadings,
    forecast: Forecast,
    selected_day: ForecastDay,
    map_particles: Vec<MapParticle>,
    clock: SystemTime,
    in_flight: Option<InFlightSearch>,
    next_search: SearchId,
    stats: StoreStats,
}

impl DashboardStore {
    /// Creates the store with an initial snapshot for `initial_location`.
    pub fn new(mut rng: BoxedRng, initial_location: &str, timing: SearchTiming, clock: SystemTime) -> Self {
        let snapshot = generate_weather_snapshot(rng.as_mut(), initial_location);
        let readings = generate_ai_source_readings(rng.as_mut());
        let forecast = generate_forecast(rng.as_mut());
        let map_particles = generate_map_particles(rng.as_mut());

        Self {
            rng,
            timing,
            snapshot,
            readings,
            forecast,
            selected_day: ForecastDay::default(),
            map_particles,
            clock,
            in_flight: None,
            next_search: SearchId::first(),
            stats: StoreStats {
                forecasts_generated: 1,
                ..StoreStats::default()
            },
        }
    }

    /// Applies one event and returns the events to schedule.
    ///
    /// `now` is the wall-clock time at delivery; only `ClockTick` reads it.
    ///
    /// # Errors
    /// `CoreError::Search` when a submission is rejected. The state is left
    /// untouched in that case.
    pub fn apply(&mut self, event: DashboardEvent, now: SystemTime) -> Result<Vec<Deferred>, CoreError> {
        match event {
            DashboardEvent::SubmitSearch(raw) => {
                let deferred = self.submit_search(&raw)?;
                Ok(vec![deferred])
            }
            DashboardEvent::SelectDay(day) => {
                self.select_day(day);
                Ok(Vec::new())
            }
            DashboardEvent::ClockTick => {
                self.clock = now;
                Ok(Vec::new())
            }
            DashboardEvent::Advance { search, phase } => {
                Ok(self.advance(search, phase).into_iter().collect())
            }
            DashboardEvent::Shutdown => Ok(Vec::new()),
        }
    }

    /// Starts a search for `raw` and returns its Syncing transition.
    pub fn submit_search(&mut self, raw: &str) -> Result<Deferred, SearchError> {
        let location = match normalize_location(raw) {
            Ok(location) => location,
            Err(e) => {
                self.stats.rejected_submissions += 1;
                return Err(e);
            }
        };

        if let Some(flight) = &self.in_flight {
            self.stats.rejected_submissions += 1;
            return Err(SearchError::InFlight { in_flight: flight.id });
        }

        let id = self.next_search;
        self.next_search = id.next();
        self.set_statuses(SourceStatus::Analyzing);

        info!(search = %id, location = %location, "search started");

        self.in_flight = Some(InFlightSearch {
            id,
            location,
            status: SourceStatus::Analyzing,
        });
        self.stats.searches_started += 1;

        Ok(Deferred {
            delay: self.timing.analyzing,
            event: DashboardEvent::Advance {
                search: id,
                phase: SearchPhase::Syncing,
            },
        })
    }

    /// Moves the in-flight search into `phase`.
    ///
    /// Returns the next chained transition, if any. Stale transitions are
    /// counted and ignored.
    pub fn advance(&mut self, search: SearchId, phase: SearchPhase) -> Option<Deferred> {
        let expected = match &self.in_flight {
            Some(flight) if flight.id == search => flight.status.next(),
            _ => None,
        };

        if expected != Some(phase.status()) {
            self.stats.stale_transitions += 1;
            debug!(search = %search, ?phase, in_flight = ?self.in_flight_search(), "dropping stale transition");
            return None;
        }

        match phase {
            SearchPhase::Syncing => {
                if let Some(flight) = self.in_flight.as_mut() {
                    flight.status = SourceStatus::Syncing;
                }
                self.set_statuses(SourceStatus::Syncing);
                debug!(search = %search, "sources syncing");

                Some(Deferred {
                    delay: self.timing.syncing,
                    event: DashboardEvent::Advance {
                        search,
                        phase: SearchPhase::Complete,
                    },
                })
            }
            SearchPhase::Complete => {
                let flight = self.in_flight.take()?;
                self.complete(flight);
                None
            }
        }
    }

    fn complete(&mut self, flight: InFlightSearch) {
        self.snapshot = generate_weather_snapshot(self.rng.as_mut(), flight.location);
        self.readings = generate_ai_source_readings(self.rng.as_mut());
        self.stats.searches_completed += 1;

        info!(
            search = %flight.id,
            location = %self.snapshot.location,
            condition = %self.snapshot.condition,
            "search complete"
        );
    }

    /// Selects a forecast day. Returns true if the forecast was regenerated.
    pub fn select_day(&mut self, day: ForecastDay) -> bool {
        if day == self.selected_day {
            return false;
        }
        self.selected_day = day;
        self.forecast = generate_forecast(self.rng.as_mut());
        self.stats.forecasts_generated += 1;
        debug!(day = day.label(), "forecast regenerated");
        true
    }

    fn set_statuses(&mut self, status: SourceStatus) {
        for reading in self.readings.iter_mut() {
            reading.status = status;
        }
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    pub fn snapshot(&self) -> &WeatherSnapshot {
        &self.snapshot
    }

    pub fn readings(&self) -> &AiReadings {
        &self.readings
    }

    pub fn forecast(&self) -> &Forecast {
        &self.forecast
    }

    pub fn selected_day(&self) -> ForecastDay {
        self.selected_day
    }

    pub fn map_particles(&self) -> &[MapParticle] {
        &self.map_particles
    }

    pub fn clock(&self) -> SystemTime {
        self.clock
    }

    /// True between a search's submit and its Complete transition.
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight_search(&self) -> Option<SearchId> {
        self.in_flight.as_ref().map(|f| f.id)
    }

    /// Location of the in-flight search.
    pub fn pending_location(&self) -> Option<&str> {
        self.in_flight.as_ref().map(|f| f.location.as_str())
    }

    pub fn stats(&self) -> StoreStats {
        self.stats
    }

    pub fn consensus(&self) -> ConsensusSummary {
        ConsensusSummary::from_readings(&self.readings)
    }

    pub fn forecast_summary(&self) -> ForecastSummary {
        ForecastSummary::from_forecast(&self.forecast)
    }

    /// Derives everything the panels render.
    pub fn frame(&self) -> DashboardFrame {
        DashboardFrame {
            snapshot: self.snapshot.clone(),
            readings: self.readings.clone(),
            consensus: self.consensus(),
            forecast: self.forecast.clone(),
            forecast_summary: self.forecast_summary(),
            selected_day: self.selected_day,
            map_particles: self.map_particles.clone(),
            clock: self.clock,
            loading: self.is_loading(),
            in_flight: self.in_flight_search(),
        }
    }
}

impl std::fmt::Debug for DashboardStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardStore")
            .field("location", &self.snapshot.location)
            .field("selected_day", &self.selected_day)
            .field("in_flight", &self.in_flight)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::UNIX_EPOCH;

    fn store(seed: u64) -> DashboardStore {
        DashboardStore::new(
            Box::new(StdRng::seed_from_u64(seed)),
            "San Francisco, CA",
            SearchTiming::default(),
            UNIX_EPOCH,
        )
    }

    fn statuses(store: &DashboardStore) -> Vec<SourceStatus> {
        store.readings().iter().map(|r| r.status).collect()
    }

    fn advance_event(deferred: &Deferred) -> (SearchId, SearchPhase) {
        match deferred.event {
            DashboardEvent::Advance { search, phase } => (search, phase),
            ref other => panic!("expected Advance, got {:?}", other),
        }
    }

    #[test]
    fn test_initial_state() {
        let store = store(1);
        assert_eq!(store.snapshot().location, "San Francisco, CA");
        assert_eq!(statuses(&store), vec![SourceStatus::Complete; 3]);
        assert!(!store.is_loading());
        assert_eq!(store.forecast().hours().len(), 24);
        assert_eq!(store.selected_day(), ForecastDay::Today);
    }

    #[test]
    fn test_full_search_sequence() {
        let mut store = store(2);
        let before: Vec<(i32, u8)> = store.readings().iter().map(|r| (r.temperature, r.confidence)).collect();

        let syncing = store.submit_search("  Tokyo  ").unwrap();
        assert_eq!(syncing.delay, Duration::from_millis(800));
        assert_eq!(statuses(&store), vec![SourceStatus::Analyzing; 3]);
        assert!(store.is_loading());
        assert_eq!(store.pending_location(), Some("Tokyo"));

        let (id, phase) = advance_event(&syncing);
        assert_eq!(phase, SearchPhase::Syncing);
        let complete = store.advance(id, phase).unwrap();
        assert_eq!(complete.delay, Duration::from_millis(1200));
        assert_eq!(statuses(&store), vec![SourceStatus::Syncing; 3]);
        let during: Vec<(i32, u8)> = store.readings().iter().map(|r| (r.temperature, r.confidence)).collect();
        assert_eq!(during, before);
        assert_eq!(store.snapshot().location, "San Francisco, CA");

        let (id, phase) = advance_event(&complete);
        assert_eq!(store.advance(id, phase), None);
        assert_eq!(statuses(&store), vec![SourceStatus::Complete; 3]);
        assert_eq!(store.snapshot().location, "Tokyo");
        assert!(!store.is_loading());
        assert_eq!(store.stats().searches_completed, 1);
    }

    #[test]
    fn test_second_submit_rejected_while_in_flight() {
        let mut store = store(3);
        let first = store.submit_search("Paris").unwrap();
        let (first_id, _) = advance_event(&first);

        let err = store.submit_search("Berlin").unwrap_err();
        assert_eq!(err, SearchError::InFlight { in_flight: first_id });
        assert_eq!(store.pending_location(), Some("Paris"));
        assert_eq!(store.stats().rejected_submissions, 1);
    }

    #[test]
    fn test_blank_submit_rejected() {
        let mut store = store(4);
        let err = store
            .apply(DashboardEvent::SubmitSearch("   ".into()), UNIX_EPOCH)
            .unwrap_err();
        assert_eq!(err, CoreError::Search(SearchError::EmptyLocation));
        assert!(!store.is_loading());
        assert_eq!(statuses(&store), vec![SourceStatus::Complete; 3]);
    }

    #[test]
    fn test_stale_transition_dropped() {
        let mut store = store(5);
        let first = store.submit_search("Lagos").unwrap();
        let (old_id, _) = advance_event(&first);
        let sync = store.advance(old_id, SearchPhase::Syncing).unwrap();
        let (id, phase) = advance_event(&sync);
        store.advance(id, phase);

        // Replayed transitions of a finished search
        assert_eq!(store.advance(old_id, SearchPhase::Syncing), None);
        assert_eq!(store.advance(old_id, SearchPhase::Complete), None);
        assert_eq!(statuses(&store), vec![SourceStatus::Complete; 3]);

        // Old id while a new search runs
        store.submit_search("Quito").unwrap();
        assert_eq!(store.advance(old_id, SearchPhase::Complete), None);
        assert_eq!(statuses(&store), vec![SourceStatus::Analyzing; 3]);
        assert_eq!(store.snapshot().location, "Lagos");
        assert_eq!(store.stats().stale_transitions, 3);
    }

    #[test]
    fn test_phase_skip_dropped() {
        let mut store = store(6);
        let first = store.submit_search("Nairobi").unwrap();
        let (id, _) = advance_event(&first);

        assert_eq!(store.advance(id, SearchPhase::Complete), None);
        assert!(store.is_loading());
        assert_eq!(statuses(&store), vec![SourceStatus::Analyzing; 3]);
        assert_eq!(store.snapshot().location, "San Francisco, CA");
    }

    #[test]
    fn test_select_day_regenerates_only_on_change() {
        let mut store = store(7);
        let original = store.forecast().clone();

        assert!(!store.select_day(ForecastDay::Today));
        assert_eq!(store.forecast(), &original);

        assert!(store.select_day(ForecastDay::Tomorrow));
        assert_eq!(store.selected_day(), ForecastDay::Tomorrow);
        assert_eq!(store.forecast().hours().len(), 24);
        assert_eq!(store.stats().forecasts_generated, 2);
    }

    #[test]
    fn test_clock_tick_sets_clock() {
        let mut store = store(8);
        let later = UNIX_EPOCH + Duration::from_secs(90);
        let deferred = store.apply(DashboardEvent::ClockTick, later).unwrap();
        assert!(deferred.is_empty());
        assert_eq!(store.clock(), later);
    }

    #[test]
    fn test_frame_matches_store() {
        let mut store = store(9);
        store.submit_search("Lima").unwrap();
        let frame = store.frame();

        assert!(frame.loading);
        assert_eq!(frame.in_flight, store.in_flight_search());
        assert_eq!(frame.consensus, store.consensus());
        assert_eq!(frame.readings.len(), 3);
    }
}

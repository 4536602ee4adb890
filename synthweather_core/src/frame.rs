//! Render input of the dashboard panels.

use crate::consensus::ConsensusSummary;
use crate::forecast::ForecastSummary;
use crate::model::{AiReadings, Forecast, ForecastDay, MapParticle, UvLevel, WeatherSnapshot};

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use std::time::SystemTime;
use synthweather_env::SearchId;

/// Everything the four panels and the header draw, derived from the store
/// after each event. Panels treat it as read-only.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardFrame {
    pub snapshot: WeatherSnapshot,
    pub readings: AiReadings,
    pub consensus: ConsensusSummary,
    pub forecast: Forecast,
    pub forecast_summary: ForecastSummary,
    pub selected_day: ForecastDay,
    pub map_particles: Vec<MapParticle>,
    pub clock: SystemTime,
    pub loading: bool,
    pub in_flight: Option<SearchId>,
}

impl DashboardFrame {
    pub fn uv_level(&self) -> UvLevel {
        self.snapshot.uv_level()
    }

    /// Header clock, 24-hour local time.
    pub fn clock_label(&self) -> String {
        DateTime::<Local>::from(self.clock).format("%H:%M:%S").to_string()
    }

    /// Header clock in UTC, independent of the host time zone.
    pub fn clock_label_utc(&self) -> String {
        DateTime::<Utc>::from(self.clock).format("%H:%M:%S").to_string()
    }

    /// Bar heights of the forecast timeline, in `[0, 1]`.
    pub fn bar_heights(&self) -> Vec<f64> {
        self.forecast_summary.bar_heights(&self.forecast)
    }
}

#[cfg(test)]
mod tests {
    use crate::store::{DashboardStore, SearchTiming};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn test_clock_label_utc() {
        let store = DashboardStore::new(
            Box::new(StdRng::seed_from_u64(1)),
            "Accra",
            SearchTiming::default(),
            UNIX_EPOCH + Duration::from_secs(13 * 3600 + 5 * 60 + 9),
        );
        assert_eq!(store.frame().clock_label_utc(), "13:05:09");
        assert_eq!(store.frame().clock_label().len(), 8);
    }

    #[test]
    fn test_bar_heights_are_finite() {
        let store = DashboardStore::new(
            Box::new(StdRng::seed_from_u64(2)),
            "Accra",
            SearchTiming::default(),
            UNIX_EPOCH,
        );
        let heights = store.frame().bar_heights();
        assert_eq!(heights.len(), 24);
        assert!(heights.iter().all(|h| h.is_finite() && (0.0..=1.0).contains(h)));
    }
}

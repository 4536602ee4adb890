//! Dashboard data model.
//!
//! Every record here is produced by `crate::generators`, lives in the
//! `DashboardStore` until the next generation, and is then replaced whole.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};

// =============================================================================
// CURRENT CONDITIONS
// =============================================================================

/// Sky condition of the current snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    Clear,
    PartlyCloudy,
    Overcast,
    LightRain,
    Thunderstorm,
    Fog,
}

impl Condition {
    /// All conditions, in draw order.
    pub const ALL: [Condition; 6] = [
        Condition::Clear,
        Condition::PartlyCloudy,
        Condition::Overcast,
        Condition::LightRain,
        Condition::Thunderstorm,
        Condition::Fog,
    ];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Condition::Clear => "Clear",
            Condition::PartlyCloudy => "Partly Cloudy",
            Condition::Overcast => "Overcast",
            Condition::LightRain => "Light Rain",
            Condition::Thunderstorm => "Thunderstorm",
            Condition::Fog => "Fog",
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// UV bar is drawn out of this many steps.
pub const UV_SCALE_MAX: u8 = 11;

/// Exposure band of a UV index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UvLevel {
    Low,
    Moderate,
    High,
    Extreme,
}

impl UvLevel {
    /// Classifies a UV index.
    pub fn from_index(uv_index: u8) -> Self {
        match uv_index {
            0..=2 => UvLevel::Low,
            3..=5 => UvLevel::Moderate,
            6..=7 => UvLevel::High,
            _ => UvLevel::Extreme,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UvLevel::Low => "LOW",
            UvLevel::Moderate => "MODERATE",
            UvLevel::High => "HIGH",
            UvLevel::Extreme => "EXTREME",
        }
    }
}

/// Complete record of current conditions for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Location label exactly as submitted (trimmed)
    pub location: String,
    /// Temperature in °C
    pub temperature: i32,
    /// Relative humidity in percent
    pub humidity: u8,
    /// Wind speed in km/h
    pub wind_speed: u32,
    /// Pressure in hPa
    pub pressure: u32,
    pub condition: Condition,
    /// UV index, 1 to 10
    pub uv_index: u8,
    /// Visibility in km
    pub visibility: u32,
}

impl WeatherSnapshot {
    pub fn uv_level(&self) -> UvLevel {
        UvLevel::from_index(self.uv_index)
    }
}

// =============================================================================
// AI SOURCES
// =============================================================================

/// The simulated forecasting sources polled for consensus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AiSource {
    Perplexity,
    Grok,
    NanoBananaPro,
}

impl AiSource {
    /// Number of sources. Reading sets always have exactly this many members.
    pub const COUNT: usize = 3;

    /// All sources, in display order.
    pub const ALL: [AiSource; AiSource::COUNT] =
        [AiSource::Perplexity, AiSource::Grok, AiSource::NanoBananaPro];

    /// Display name.
    pub fn label(&self) -> &'static str {
        match self {
            AiSource::Perplexity => "PERPLEXITY",
            AiSource::Grok => "GROK",
            AiSource::NanoBananaPro => "NANOBANANAPRO",
        }
    }
}

impl std::fmt::Display for AiSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Phase of a source during a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceStatus {
    Analyzing,
    Syncing,
    Complete,
}

impl SourceStatus {
    /// The phase that follows this one, if any.
    pub fn next(&self) -> Option<SourceStatus> {
        match self {
            SourceStatus::Analyzing => Some(SourceStatus::Syncing),
            SourceStatus::Syncing => Some(SourceStatus::Complete),
            SourceStatus::Complete => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SourceStatus::Analyzing => "ANALYZING",
            SourceStatus::Syncing => "SYNCING",
            SourceStatus::Complete => "COMPLETE",
        }
    }
}

impl std::fmt::Display for SourceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One source's current output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiSourceReading {
    pub source: AiSource,
    /// Confidence in percent, never above 100
    pub confidence: u8,
    pub prediction: String,
    /// Predicted temperature in °C
    pub temperature: i32,
    pub status: SourceStatus,
}

/// The full reading set: one reading per source, in `AiSource::ALL` order.
pub type AiReadings = [AiSourceReading; AiSource::COUNT];

// =============================================================================
// FORECAST
// =============================================================================

/// Hours in one forecast day.
pub const FORECAST_HOURS: usize = 24;

/// Condition of a forecast hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ForecastCondition {
    Clear,
    Cloudy,
    Rain,
    Storm,
}

impl ForecastCondition {
    pub fn label(&self) -> &'static str {
        match self {
            ForecastCondition::Clear => "clear",
            ForecastCondition::Cloudy => "cloudy",
            ForecastCondition::Rain => "rain",
            ForecastCondition::Storm => "storm",
        }
    }

    /// Single-cell glyph for the timeline.
    pub fn glyph(&self) -> char {
        match self {
            ForecastCondition::Clear => '☀',
            ForecastCondition::Cloudy => '☁',
            ForecastCondition::Rain => '☂',
            ForecastCondition::Storm => '⚡',
        }
    }
}

/// One hour of the forecast timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastHour {
    /// Hour of day, 0 to 23
    pub hour: u8,
    /// Temperature in °C (fractional, from the diurnal curve)
    pub temperature: f64,
    pub condition: ForecastCondition,
    /// Precipitation chance in percent
    pub precipitation_chance: u8,
}

/// A 24-hour forecast ordered by hour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    hours: Vec<ForecastHour>,
}

impl Forecast {
    /// Builds a forecast from externally supplied hours.
    ///
    /// # Errors
    /// `CoreError::InvalidForecast` unless there are exactly 24 hours
    /// numbered 0 to 23 in order.
    pub fn from_hours(hours: Vec<ForecastHour>) -> Result<Self, CoreError> {
        if hours.len() != FORECAST_HOURS {
            return Err(CoreError::invalid_forecast(format!(
                "expected {} hours, got {}",
                FORECAST_HOURS,
                hours.len()
            )));
        }

        if let Some((i, h)) = hours
            .iter()
            .enumerate()
            .find(|(i, h)| h.hour as usize != *i)
        {
            return Err(CoreError::invalid_forecast(format!(
                "hour at position {} is {}",
                i, h.hour
            )));
        }

        Ok(Self { hours })
    }

    /// Wraps hours the generator produced in order.
    pub(crate) fn from_generated(hours: Vec<ForecastHour>) -> Self {
        debug_assert_eq!(hours.len(), FORECAST_HOURS);
        Self { hours }
    }

    pub fn hours(&self) -> &[ForecastHour] {
        &self.hours
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ForecastHour> {
        self.hours.iter()
    }
}

/// Day tabs of the forecast panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ForecastDay {
    #[default]
    Today,
    Tomorrow,
    DayAfter,
}

impl ForecastDay {
    pub const ALL: [ForecastDay; 3] =
        [ForecastDay::Today, ForecastDay::Tomorrow, ForecastDay::DayAfter];

    pub fn label(&self) -> &'static str {
        match self {
            ForecastDay::Today => "TODAY",
            ForecastDay::Tomorrow => "TOMORROW",
            ForecastDay::DayAfter => "+2 DAYS",
        }
    }

    /// Tab index, 0 to 2.
    pub fn index(&self) -> usize {
        match self {
            ForecastDay::Today => 0,
            ForecastDay::Tomorrow => 1,
            ForecastDay::DayAfter => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The tab to the right, wrapping around.
    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// The tab to the left, wrapping around.
    pub fn previous(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

// =============================================================================
// SECTOR MAP
// =============================================================================

/// Particles scattered over the sector map.
pub const MAP_PARTICLE_COUNT: usize = 30;

/// A decorative particle on the sector map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapParticle {
    pub id: u32,
    /// Horizontal position in percent of the map width
    pub x: f64,
    /// Vertical position in percent of the map height
    pub y: f64,
    pub size: f64,
    /// Animation delay in seconds
    pub delay: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hour(h: u8) -> ForecastHour {
        ForecastHour {
            hour: h,
            temperature: 20.0,
            condition: ForecastCondition::Clear,
            precipitation_chance: 10,
        }
    }

    #[test]
    fn test_uv_level_bands() {
        assert_eq!(UvLevel::from_index(1), UvLevel::Low);
        assert_eq!(UvLevel::from_index(2), UvLevel::Low);
        assert_eq!(UvLevel::from_index(3), UvLevel::Moderate);
        assert_eq!(UvLevel::from_index(5), UvLevel::Moderate);
        assert_eq!(UvLevel::from_index(7), UvLevel::High);
        assert_eq!(UvLevel::from_index(8), UvLevel::Extreme);
        assert_eq!(UvLevel::from_index(10).label(), "EXTREME");
    }

    #[test]
    fn test_status_progression() {
        assert_eq!(SourceStatus::Analyzing.next(), Some(SourceStatus::Syncing));
        assert_eq!(SourceStatus::Syncing.next(), Some(SourceStatus::Complete));
        assert_eq!(SourceStatus::Complete.next(), None);
    }

    #[test]
    fn test_forecast_from_hours_accepts_ordered_day() {
        let hours: Vec<_> = (0..24).map(hour).collect();
        let forecast = Forecast::from_hours(hours).unwrap();
        assert_eq!(forecast.hours().len(), FORECAST_HOURS);
    }

    #[test]
    fn test_forecast_from_hours_rejects_short_day() {
        let hours: Vec<_> = (0..23).map(hour).collect();
        let err = Forecast::from_hours(hours).unwrap_err();
        assert!(matches!(err, CoreError::InvalidForecast(_)));
    }

    #[test]
    fn test_forecast_from_hours_rejects_out_of_order() {
        let mut hours: Vec<_> = (0..24).map(hour).collect();
        hours.swap(3, 4);
        assert!(Forecast::from_hours(hours).is_err());
    }

    #[test]
    fn test_forecast_day_cycling() {
        assert_eq!(ForecastDay::Today.next(), ForecastDay::Tomorrow);
        assert_eq!(ForecastDay::DayAfter.next(), ForecastDay::Today);
        assert_eq!(ForecastDay::Today.previous(), ForecastDay::DayAfter);
        assert_eq!(ForecastDay::from_index(2), Some(ForecastDay::DayAfter));
        assert_eq!(ForecastDay::from_index(3), None);
    }

    #[test]
    fn test_condition_labels() {
        assert_eq!(Condition::PartlyCloudy.to_string(), "Partly Cloudy");
        assert_eq!(AiSource::NanoBananaPro.to_string(), "NANOBANANAPRO");
    }
}

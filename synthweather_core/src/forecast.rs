//! Forecast timeline summary: high/low, average precipitation and the
//! normalization used for the temperature bars.

use crate::consensus::round_half_up;
use crate::model::Forecast;
use serde::{Deserialize, Serialize};

/// Summary statistics of a forecast day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    /// Highest hourly temperature (°C)
    pub high: f64,
    /// Lowest hourly temperature (°C)
    pub low: f64,
    /// Rounded mean precipitation chance (percent)
    pub average_precipitation: u8,
    /// `high - low`, or 1.0 when every hour has the same temperature so
    /// bar normalization never divides by zero
    pub temp_range: f64,
}

impl ForecastSummary {
    pub fn from_forecast(forecast: &Forecast) -> Self {
        let hours = forecast.hours();

        let high = hours
            .iter()
            .map(|h| h.temperature)
            .fold(f64::NEG_INFINITY, f64::max);
        let low = hours
            .iter()
            .map(|h| h.temperature)
            .fold(f64::INFINITY, f64::min);

        let precipitation_sum: u32 = hours
            .iter()
            .map(|h| u32::from(h.precipitation_chance))
            .sum();
        let average_precipitation =
            round_half_up(f64::from(precipitation_sum) / hours.len().max(1) as f64) as u8;

        let span = high - low;
        let temp_range = if span == 0.0 { 1.0 } else { span };

        Self {
            high,
            low,
            average_precipitation,
            temp_range,
        }
    }

    /// High temperature as displayed.
    pub fn rounded_high(&self) -> i32 {
        round_half_up(self.high) as i32
    }

    /// Low temperature as displayed.
    pub fn rounded_low(&self) -> i32 {
        round_half_up(self.low) as i32
    }

    /// Bar height of `temperature` in `[0, 1]` relative to this day.
    pub fn bar_height(&self, temperature: f64) -> f64 {
        (temperature - self.low) / self.temp_range
    }

    /// Bar heights of every hour in order.
    pub fn bar_heights(&self, forecast: &Forecast) -> Vec<f64> {
        forecast
            .iter()
            .map(|h| self.bar_height(h.temperature))
            .collect()
    }
}

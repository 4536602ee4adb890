//! Consensus aggregation over the current AI readings.

use crate::model::AiSourceReading;
use serde::{Deserialize, Serialize};

/// Rounds half-way values up, the way dashboard figures are displayed.
pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Aggregate of the current reading set.
///
/// Recomputed from the readings on every frame; there is nothing to cache
/// for three values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusSummary {
    /// Rounded mean of the predicted temperatures (°C)
    pub consensus_temperature: i32,
    /// Rounded mean confidence (percent), shown as "% AGREEMENT"
    pub average_confidence: u8,
}

impl ConsensusSummary {
    /// Aggregates a reading set.
    ///
    /// An empty slice yields zeros; the store always holds three readings.
    pub fn from_readings(readings: &[AiSourceReading]) -> Self {
        if readings.is_empty() {
            return Self {
                consensus_temperature: 0,
                average_confidence: 0,
            };
        }

        let n = readings.len() as f64;
        let temperature_sum: i64 = readings.iter().map(|r| i64::from(r.temperature)).sum();
        let confidence_sum: u32 = readings.iter().map(|r| u32::from(r.confidence)).sum();

        Self {
            consensus_temperature: round_half_up(temperature_sum as f64 / n) as i32,
            average_confidence: round_half_up(f64::from(confidence_sum) / n) as u8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AiSource, SourceStatus};

    fn reading(source: AiSource, temperature: i32, confidence: u8) -> AiSourceReading {
        AiSourceReading {
            source,
            confidence,
            prediction: String::new(),
            temperature,
            status: SourceStatus::Complete,
        }
    }

    fn sample() -> Vec<AiSourceReading> {
        vec![
            reading(AiSource::Perplexity, 22, 90),
            reading(AiSource::Grok, 21, 85),
            reading(AiSource::NanoBananaPro, 23, 95),
        ]
    }

    #[test]
    fn test_consensus_example() {
        let summary = ConsensusSummary::from_readings(&sample());
        assert_eq!(summary.consensus_temperature, 22);
        assert_eq!(summary.average_confidence, 90);
    }

    #[test]
    fn test_consensus_is_idempotent() {
        let readings = sample();
        let first = ConsensusSummary::from_readings(&readings);
        let second = ConsensusSummary::from_readings(&readings);
        assert_eq!(first, second);
    }

    #[test]
    fn test_consensus_rounds_half_up() {
        let readings = vec![
            reading(AiSource::Perplexity, 22, 90),
            reading(AiSource::Grok, 23, 91),
        ];
        let summary = ConsensusSummary::from_readings(&readings);
        assert_eq!(summary.consensus_temperature, 23);
        assert_eq!(summary.average_confidence, 91);
    }

    #[test]
    fn test_consensus_ignores_status() {
        let mut readings = sample();
        let before = ConsensusSummary::from_readings(&readings);
        for r in readings.iter_mut() {
            r.status = SourceStatus::Syncing;
        }
        assert_eq!(ConsensusSummary::from_readings(&readings), before);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(2.49), 2.0);
        assert_eq!(round_half_up(-2.5), -2.0);
    }
}

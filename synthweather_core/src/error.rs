//! Error types for the SynthWeather engine.

use synthweather_env::SearchId;
use thiserror::Error;

/// Why a location search submission was turned away.
///
/// Neither case is shown to the user: the search control simply does not
/// start a new search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The submitted text was empty after trimming
    #[error("location is empty")]
    EmptyLocation,

    /// Another search has not completed yet
    #[error("{in_flight} is still in progress")]
    InFlight { in_flight: SearchId },
}

/// Errors raised by the dashboard engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// A submission was rejected
    #[error("Search rejected: {0}")]
    Search(#[from] SearchError),

    /// Hours handed to `Forecast::from_hours` break the 24-hour invariant
    #[error("Invalid forecast: {0}")]
    InvalidForecast(String),
}

impl CoreError {
    /// Creates an invalid forecast error.
    pub fn invalid_forecast(msg: impl Into<String>) -> Self {
        Self::InvalidForecast(msg.into())
    }

    /// Returns true for rejections the UI silently ignores.
    pub fn is_rejected_search(&self) -> bool {
        matches!(self, CoreError::Search(_))
    }
}

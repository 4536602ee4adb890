//! Error types for the SynthWeather environment abstraction.

use thiserror::Error;

/// Errors that can occur in the environment abstraction layer.
#[derive(Debug, Error)]
pub enum EnvError {
    /// The message queue was closed (event loop shut down)
    #[error("Scheduler closed: {0}")]
    SchedulerClosed(String),
}

impl EnvError {
    /// Creates a scheduler-closed error.
    pub fn closed(msg: impl Into<String>) -> Self {
        Self::SchedulerClosed(msg.into())
    }
}

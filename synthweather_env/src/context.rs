//! Core environment context trait for the SynthWeather engine.

use rand::RngCore;
use std::time::{Duration, SystemTime};

/// A random source handed out by a context.
pub type BoxedRng = Box<dyn RngCore + Send>;

/// The central interface for Environment Interaction.
///
/// This trait abstracts the "real world" so that the dashboard engine can
/// run in both production (tokio) and simulation (virtual clock) environments.
///
/// # Implementations
///
/// - **Production**: `TokioContext` - system clock, OS entropy
/// - **Simulation**: `SimContext` - virtual clock, `ChaCha8Rng(seed)`
///
/// # Determinism
///
/// For DST, all methods that would normally introduce non-determinism
/// (time, randomness) are controlled by the implementation.
pub trait WeatherContext: Send + Sync + 'static {
    /// Returns the current monotonic time since context creation.
    ///
    /// In simulation, this is the virtual clock time.
    fn now(&self) -> Duration;

    /// Returns the wall-clock time shown in the dashboard header.
    ///
    /// In simulation, this is derived from virtual clock + epoch offset.
    fn system_time(&self) -> SystemTime;

    /// Hands out a random source for one consumer.
    ///
    /// The simulation combines the global seed with `stream` so that every
    /// consumer gets an independent but reproducible sequence. Production
    /// ignores `stream` and seeds from OS entropy.
    fn derive_rng(&self, stream: u64) -> BoxedRng;

    /// Returns the context's seed (for logging/debugging).
    ///
    /// In production, returns 0 (not seeded).
    fn seed(&self) -> u64;
}

//! Simulation context implementing WeatherContext for deterministic testing.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use synthweather_env::{BoxedRng, WeatherContext};

/// Simulation context backed by deterministic time and RNG.
///
/// This implements `WeatherContext` using:
/// - A virtual clock that only moves when the harness advances it
/// - Seeded ChaCha8 streams for every generator random source
pub struct SimContext {
    /// Master seed for this simulation
    seed: u64,

    /// Current virtual time (nanoseconds since simulation start)
    virtual_time_ns: Arc<Mutex<u64>>,

    /// Epoch offset (virtual time 0 maps to this wall-clock time)
    epoch: SystemTime,
}

impl SimContext {
    /// Creates a new SimContext with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            virtual_time_ns: Arc::new(Mutex::new(0)),
            epoch: UNIX_EPOCH + Duration::from_secs(1704067200), // 2024-01-01 00:00:00 UTC
        }
    }

    /// Creates an Arc-wrapped context for sharing.
    pub fn shared(seed: u64) -> Arc<Self> {
        Arc::new(Self::new(seed))
    }

    fn clock(&self) -> MutexGuard<'_, u64> {
        self.virtual_time_ns
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Advances virtual time by the given duration.
    pub fn advance_time(&self, duration: Duration) {
        let mut time = self.clock();
        *time += duration.as_nanos() as u64;
    }

    /// Moves virtual time forward to `target`. Never moves it backwards.
    pub fn advance_to(&self, target: Duration) {
        let mut time = self.clock();
        *time = (*time).max(target.as_nanos() as u64);
    }

    /// Returns the current virtual time in nanoseconds.
    pub fn time_ns(&self) -> u64 {
        *self.clock()
    }

    /// Seed of the ChaCha8 stream handed out for `stream`.
    pub fn stream_seed(&self, stream: u64) -> u64 {
        self.seed.wrapping_mul(0x517cc1b727220a95) ^ stream
    }
}

impl Clone for SimContext {
    fn clone(&self) -> Self {
        Self {
            seed: self.seed,
            virtual_time_ns: Arc::clone(&self.virtual_time_ns),
            epoch: self.epoch,
        }
    }
}

impl WeatherContext for SimContext {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.time_ns())
    }

    fn system_time(&self) -> SystemTime {
        self.epoch + self.now()
    }

    fn derive_rng(&self, stream: u64) -> BoxedRng {
        Box::new(ChaCha8Rng::seed_from_u64(self.stream_seed(stream)))
    }

    fn seed(&self) -> u64 {
        self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    #[test]
    fn test_sim_context_time() {
        let ctx = SimContext::new(42);
        assert_eq!(ctx.now(), Duration::ZERO);

        ctx.advance_time(Duration::from_secs(1));
        assert_eq!(ctx.now(), Duration::from_secs(1));

        ctx.advance_time(Duration::from_millis(500));
        assert_eq!(ctx.now(), Duration::from_millis(1500));
    }

    #[test]
    fn test_advance_to_never_rewinds() {
        let ctx = SimContext::new(42);
        ctx.advance_to(Duration::from_millis(800));
        ctx.advance_to(Duration::from_millis(300));
        assert_eq!(ctx.now(), Duration::from_millis(800));
    }

    #[test]
    fn test_system_time_follows_virtual_clock() {
        let ctx = SimContext::new(1);
        let start = ctx.system_time();
        ctx.advance_time(Duration::from_secs(3));
        assert_eq!(ctx.system_time().duration_since(start).unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn test_sim_context_deterministic_rng() {
        let ctx1 = SimContext::new(42);
        let ctx2 = SimContext::new(42);

        // Same seed + stream = same draws
        let a = ctx1.derive_rng(1).next_u64();
        let b = ctx2.derive_rng(1).next_u64();
        assert_eq!(a, b);

        // Different stream = different draws
        let c = ctx1.derive_rng(2).next_u64();
        assert_ne!(a, c);
    }

    #[test]
    fn test_sim_context_seed() {
        let ctx = SimContext::new(12345);
        assert_eq!(ctx.seed(), 12345);
    }

    #[test]
    fn test_sim_context_clone_shares_time() {
        let ctx1 = SimContext::new(42);
        let ctx2 = ctx1.clone();

        ctx1.advance_time(Duration::from_secs(5));

        // Both should see the same time
        assert_eq!(ctx1.now(), ctx2.now());
    }
}

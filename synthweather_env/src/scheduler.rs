//! Deferred message delivery for the dashboard event loop.

use async_trait::async_trait;
use std::time::Duration;

/// A queue of timed messages feeding a single-threaded event loop.
///
/// Every deferred callback of the dashboard (clock ticks, search phase
/// transitions, UI input) is a message posted here and later handed back
/// to the loop by `recv()`.
///
/// # Implementations
///
/// - **Production**: `TokioScheduler` - one sleeping task per timer
/// - **Simulation**: `SimScheduler` - deadline heap on the virtual clock
///
/// # Message Flow
///
/// ```text
/// Store                     Scheduler                  Event loop
///   |                           |                          |
///   |-- schedule(800ms, m) ---->|                          |
///   |                           |-- [delay elapses] ------>|
///   |                           |                          |-- recv() -> m
/// ```
#[async_trait]
pub trait Scheduler<M>: Send + Sync + 'static
where
    M: Send + 'static,
{
    /// Posts `message` for delivery once `delay` has elapsed.
    ///
    /// A zero delay delivers the message on the next `recv()`.
    fn schedule(&self, delay: Duration, message: M);

    /// Receives the next due message.
    ///
    /// # Returns
    /// * `Some(message)` - A message became due
    /// * `None` - Nothing can ever be delivered again
    async fn recv(&self) -> Option<M>;

    /// Number of messages posted but not yet received.
    fn pending(&self) -> usize;
}

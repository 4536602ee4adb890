//! Production implementations of WeatherContext and Scheduler using Tokio.

use crate::context::BoxedRng;
use crate::error::EnvError;
use crate::{Scheduler, WeatherContext};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, Mutex};

/// Production context backed by Tokio and OS entropy.
///
/// This is the "real" implementation used by the interactive dashboard.
/// Time comes from the system clock, randomness from the OS.
pub struct TokioContext {
    /// Start time for monotonic duration calculations
    start: Instant,
}

impl TokioContext {
    /// Creates a new TokioContext.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Creates an Arc-wrapped context for sharing across tasks.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

impl Default for TokioContext {
    fn default() -> Self {
        Self::new()
    }
}

impl WeatherContext for TokioContext {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }

    fn system_time(&self) -> SystemTime {
        SystemTime::now()
    }

    fn derive_rng(&self, _stream: u64) -> BoxedRng {
        // Production is never replayed, every stream gets fresh entropy
        Box::new(StdRng::from_entropy())
    }

    fn seed(&self) -> u64 {
        // Production is not seeded
        0
    }
}

/// Production scheduler: each timer is a Tokio task that sleeps and then
/// forwards its message into one unbounded channel.
///
/// Messages may be posted from any thread (the terminal UI runs on its own
/// blocking thread), so the scheduler keeps a runtime `Handle` instead of
/// relying on an ambient runtime.
pub struct TokioScheduler<M> {
    tx: mpsc::UnboundedSender<M>,
    rx: Mutex<mpsc::UnboundedReceiver<M>>,
    handle: Handle,
    pending: Arc<AtomicUsize>,
}

impl<M> TokioScheduler<M>
where
    M: Send + 'static,
{
    /// Creates a scheduler spawning its timers on `handle`.
    pub fn new(handle: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: Mutex::new(rx),
            handle,
            pending: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Creates a scheduler on the runtime of the calling task.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn current() -> Self {
        Self::new(Handle::current())
    }

    /// Creates an Arc-wrapped scheduler for sharing across threads.
    pub fn shared(handle: Handle) -> Arc<Self> {
        Arc::new(Self::new(handle))
    }

    /// Posts a message for immediate delivery.
    ///
    /// # Errors
    /// `EnvError::SchedulerClosed` once the receiving side is gone.
    pub fn post(&self, message: M) -> Result<(), EnvError> {
        self.pending.fetch_add(1, Ordering::SeqCst);
        self.tx.send(message).map_err(|_| {
            self.pending.fetch_sub(1, Ordering::SeqCst);
            EnvError::closed("event loop receiver dropped")
        })
    }
}

#[async_trait]
impl<M> Scheduler<M> for TokioScheduler<M>
where
    M: Send + 'static,
{
    fn schedule(&self, delay: Duration, message: M) {
        if delay.is_zero() {
            if let Err(e) = self.post(message) {
                tracing::warn!("dropping message: {}", e);
            }
            return;
        }

        self.pending.fetch_add(1, Ordering::SeqCst);
        let tx = self.tx.clone();
        let pending = Arc::clone(&self.pending);
        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(message).is_err() {
                pending.fetch_sub(1, Ordering::SeqCst);
            }
        });
    }

    async fn recv(&self) -> Option<M> {
        let message = self.rx.lock().await.recv().await;
        if message.is_some() {
            self.pending.fetch_sub(1, Ordering::SeqCst);
        }
        message
    }

    fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }
}

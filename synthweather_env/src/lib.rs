//! SynthWeather Environment Abstraction Layer
//!
//! This crate provides the "Sans-IO" abstraction allowing the SynthWeather
//! dashboard engine to run in both **Production** (tokio) and **Simulation**
//! (virtual clock) environments.
//!
//! # Core Concept: The Reactor Pattern
//!
//! For Deterministic Simulation Testing (DST), we intercept all I/O:
//! - Time (`now()`, `system_time()`)
//! - Deferred work (`Scheduler::schedule()`, `Scheduler::recv()`)
//! - Randomness (`derive_rng()`)
//!
//! By deriving all entropy from a single 64-bit seed, any run of the
//! consensus simulator becomes reproducible via its seed number.
//!
//! # Example
//!
//! ```ignore
//! use synthweather_env::{Scheduler, WeatherContext};
//!
//! async fn event_loop<Ctx: WeatherContext, Sched: Scheduler<Event>>(
//!     ctx: &Ctx,
//!     sched: &Sched,
//! ) {
//!     sched.schedule(Duration::from_secs(1), Event::ClockTick);
//!     while let Some(event) = sched.recv().await {
//!         handle(ctx.system_time(), event);
//!     }
//! }
//! ```

mod context;
mod scheduler;
mod types;
mod error;
mod tokio_impl;

pub use context::{BoxedRng, WeatherContext};
pub use scheduler::Scheduler;
pub use types::SearchId;
pub use error::EnvError;
pub use tokio_impl::{TokioContext, TokioScheduler};

//! Simulated timer queue driven by the virtual clock.

use async_trait::async_trait;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use synthweather_env::{Scheduler, WeatherContext};

use crate::context::SimContext;

/// A message waiting for its deadline.
struct Timer<M> {
    deadline_ns: u64,
    seq: u64,
    message: M,
}

// Ordered by deadline, then by posting order, so equal deadlines fire FIFO.
impl<M> PartialEq for Timer<M> {
    fn eq(&self, other: &Self) -> bool {
        self.deadline_ns == other.deadline_ns && self.seq == other.seq
    }
}

impl<M> Eq for Timer<M> {}

impl<M> PartialOrd for Timer<M> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<M> Ord for Timer<M> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.deadline_ns
            .cmp(&other.deadline_ns)
            .then(self.seq.cmp(&other.seq))
    }
}

struct Queue<M> {
    heap: BinaryHeap<Reverse<Timer<M>>>,
    next_seq: u64,
}

/// Deadline heap on the virtual clock.
///
/// Nothing fires on its own: `recv()` jumps the shared `SimContext` clock to
/// the earliest deadline and hands that message back. Scenarios that need a
/// horizon use `pop_due`.
pub struct SimScheduler<M> {
    context: Arc<SimContext>,
    queue: Mutex<Queue<M>>,
}

impl<M> SimScheduler<M>
where
    M: Send + 'static,
{
    /// Creates a scheduler reading and advancing `context`'s clock.
    pub fn new(context: Arc<SimContext>) -> Self {
        Self {
            context,
            queue: Mutex::new(Queue {
                heap: BinaryHeap::new(),
                next_seq: 0,
            }),
        }
    }

    /// Creates an Arc-wrapped scheduler for sharing.
    pub fn shared(context: Arc<SimContext>) -> Arc<Self> {
        Arc::new(Self::new(context))
    }

    fn queue(&self) -> MutexGuard<'_, Queue<M>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Virtual time of the earliest pending message.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue()
            .heap
            .peek()
            .map(|Reverse(timer)| Duration::from_nanos(timer.deadline_ns))
    }

    /// Pops the earliest message due at or before `horizon`, moving the clock
    /// to its deadline. Returns `None` once nothing is due by then.
    pub fn pop_due(&self, horizon: Duration) -> Option<M> {
        let horizon_ns = horizon.as_nanos() as u64;
        let mut queue = self.queue();
        let due = matches!(queue.heap.peek(), Some(Reverse(t)) if t.deadline_ns <= horizon_ns);
        if !due {
            return None;
        }
        let Reverse(timer) = queue.heap.pop()?;
        drop(queue);

        self.context.advance_to(Duration::from_nanos(timer.deadline_ns));
        Some(timer.message)
    }
}

#[async_trait]
impl<M> Scheduler<M> for SimScheduler<M>
where
    M: Send + 'static,
{
    fn schedule(&self, delay: Duration, message: M) {
        let deadline_ns = self.context.time_ns() + delay.as_nanos() as u64;
        let mut queue = self.queue();
        let seq = queue.next_seq;
        queue.next_seq += 1;
        queue.heap.push(Reverse(Timer {
            deadline_ns,
            seq,
            message,
        }));
    }

    async fn recv(&self) -> Option<M> {
        let Reverse(timer) = self.queue().heap.pop()?;
        self.context.advance_to(Duration::from_nanos(timer.deadline_ns));
        Some(timer.message)
    }

    fn pending(&self) -> usize {
        self.queue().heap.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler() -> (Arc<SimContext>, SimScheduler<&'static str>) {
        let ctx = SimContext::shared(7);
        let sched = SimScheduler::new(Arc::clone(&ctx));
        (ctx, sched)
    }

    #[tokio::test]
    async fn test_recv_in_deadline_order_and_advances_clock() {
        let (ctx, sched) = scheduler();
        sched.schedule(Duration::from_millis(1200), "late");
        sched.schedule(Duration::from_millis(800), "early");

        assert_eq!(sched.recv().await, Some("early"));
        assert_eq!(ctx.now(), Duration::from_millis(800));
        assert_eq!(sched.recv().await, Some("late"));
        assert_eq!(ctx.now(), Duration::from_millis(1200));
        assert_eq!(sched.recv().await, None);
    }

    #[tokio::test]
    async fn test_equal_deadlines_fire_in_posting_order() {
        let (_ctx, sched) = scheduler();
        sched.schedule(Duration::from_millis(5), "a");
        sched.schedule(Duration::from_millis(5), "b");
        sched.schedule(Duration::ZERO, "now");

        assert_eq!(sched.recv().await, Some("now"));
        assert_eq!(sched.recv().await, Some("a"));
        assert_eq!(sched.recv().await, Some("b"));
    }

    #[test]
    fn test_delay_is_relative_to_virtual_now() {
        let (ctx, sched) = scheduler();
        ctx.advance_time(Duration::from_secs(2));
        sched.schedule(Duration::from_millis(800), "m");
        assert_eq!(sched.next_deadline(), Some(Duration::from_millis(2800)));
    }

    #[test]
    fn test_pop_due_respects_horizon() {
        let (ctx, sched) = scheduler();
        sched.schedule(Duration::from_secs(1), "tick");
        sched.schedule(Duration::from_secs(3), "later");

        assert_eq!(sched.pop_due(Duration::from_secs(2)), Some("tick"));
        assert_eq!(sched.pop_due(Duration::from_secs(2)), None);
        assert_eq!(ctx.now(), Duration::from_secs(1));
        assert_eq!(sched.pending(), 1);
    }
}

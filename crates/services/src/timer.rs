//! Countdown tick driver.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::events::QuizEvent;

/// Spawns repeating tick sequences that post [`QuizEvent::Tick`] to the controller.
#[derive(Debug, Clone)]
pub struct TimerDriver {
    period: Duration,
    events: UnboundedSender<QuizEvent>,
}

impl TimerDriver {
    #[must_use]
    pub fn new(period: Duration, events: UnboundedSender<QuizEvent>) -> Self {
        Self { period, events }
    }

    /// Start a new tick sequence tagged with `generation`.
    ///
    /// The first tick arrives one full period after the call.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[must_use]
    pub fn start(&self, generation: u64) -> TimerHandle {
        let period = self.period;
        let events = self.events.clone();
        let task = tokio::spawn(async move {
            let mut ticks = time::interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                if events.send(QuizEvent::Tick { generation }).is_err() {
                    log::debug!("tick receiver dropped; stopping timer {generation}");
                    break;
                }
            }
        });
        log::debug!("timer {generation} started with period {period:?}");
        TimerHandle { generation, task }
    }
}

/// Owning handle for a running tick sequence. Dropping it cancels the sequence.
#[derive(Debug)]
pub struct TimerHandle {
    generation: u64,
    task: JoinHandle<()>,
}

impl TimerHandle {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Stop the sequence. Ticks already queued keep their old generation.
    pub fn cancel(self) {
        log::debug!("timer {} cancelled", self.generation);
        drop(self);
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period_until_cancelled() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let driver = TimerDriver::new(Duration::from_secs(1), tx);
        let handle = driver.start(7);

        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err(), "no tick before the first period");

        for _ in 0..3 {
            assert_eq!(rx.recv().await, Some(QuizEvent::Tick { generation: 7 }));
        }

        handle.cancel();
        time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn new_sequence_uses_new_generation() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let driver = TimerDriver::new(Duration::from_secs(1), tx);

        let first = driver.start(1);
        assert_eq!(rx.recv().await, Some(QuizEvent::Tick { generation: 1 }));
        drop(first);

        let _second = driver.start(2);
        assert_eq!(rx.recv().await, Some(QuizEvent::Tick { generation: 2 }));
    }
}

use std::time::Duration;
use tokio::time::{Instant, sleep_until};

/// A single pending delayed action that can be re-armed or cancelled.
///
/// Arming while a deadline is pending replaces it, so only the most recent
/// trigger ever fires. The task does not spawn anything: the owner awaits
/// [`DelayedTask::fired`] from its event loop.
#[derive(Debug)]
pub struct DelayedTask<T> {
    pending: Option<(Instant, T)>,
}

impl<T> Default for DelayedTask<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> DelayedTask<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `value` to fire after `delay`, superseding any pending value.
    /// A delay too far out to represent never fires.
    pub fn arm(&mut self, delay: Duration, value: T) {
        self.pending = Instant::now()
            .checked_add(delay)
            .map(|deadline| (deadline, value));
    }

    /// Drop the pending value, if any
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }

    /// Wait for the pending deadline and take its value.
    ///
    /// Never resolves while nothing is armed. Cancel-safe: dropping the
    /// future before the deadline leaves the task armed.
    pub async fn fired(&mut self) -> T {
        let Some(deadline) = self.deadline() else {
            return std::future::pending().await;
        };

        sleep_until(deadline).await;

        match self.pending.take() {
            Some((_, value)) => value,
            None => std::future::pending().await,
        }
    }
}

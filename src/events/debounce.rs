//! Cancellable trailing-edge debounce for free-text input.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Runs one deferred action at a time; scheduling again restarts the clock,
/// so only the value from the last call before a quiet period survives.
///
/// Each owner gets its own instance: the pending timer is per-view state,
/// not anything process-wide. Dropping the debouncer aborts the timer.
///
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    /// Return a new instance with the given quiet period.
    ///
    pub fn new(delay: Duration) -> Debouncer {
        Debouncer {
            delay,
            pending: None,
        }
    }

    /// Schedules `action` to run after the quiet period, cancelling any
    /// previously scheduled action. Must be called from within a tokio
    /// runtime.
    ///
    pub fn schedule<F>(&mut self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            sleep(delay).await;
            action.await;
        }));
    }

    /// Aborts the pending action, if any.
    ///
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    const DELAY: Duration = Duration::from_millis(500);

    #[tokio::test(start_paused = true)]
    async fn only_the_last_scheduled_value_fires() {
        let (tx, rx) = mpsc::channel::<String>();
        let mut debounce = Debouncer::new(DELAY);

        for value in ["foo", "foobar"] {
            let tx = tx.clone();
            debounce.schedule(async move {
                tx.send(value.to_string()).ok();
            });
        }
        sleep(DELAY * 2).await;

        let fired: Vec<String> = rx.try_iter().collect();
        assert_eq!(fired, vec!["foobar".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn rescheduling_restarts_the_quiet_period() {
        let (tx, rx) = mpsc::channel::<&str>();
        let mut debounce = Debouncer::new(DELAY);

        let first = tx.clone();
        debounce.schedule(async move {
            first.send("first").ok();
        });
        sleep(DELAY / 2).await;
        assert!(rx.try_recv().is_err());

        let second = tx.clone();
        debounce.schedule(async move {
            second.send("second").ok();
        });
        // Half the delay again: the restarted timer must not have fired yet.
        sleep(DELAY / 2).await;
        assert!(rx.try_recv().is_err());

        sleep(DELAY).await;
        assert_eq!(rx.try_iter().collect::<Vec<&str>>(), vec!["second"]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_suppresses_the_pending_action() {
        let (tx, rx) = mpsc::channel::<&str>();
        let mut debounce = Debouncer::new(DELAY);

        debounce.schedule(async move {
            tx.send("fired").ok();
        });
        debounce.cancel();
        sleep(DELAY * 2).await;
        assert!(rx.try_recv().is_err());
    }
}

//! Trailing-edge debounce.

use std::{
    sync::{Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use tokio::{
    task::JoinHandle,
    time::{Instant, sleep_until},
};

/// Fires the most recently scheduled action once the window has elapsed
/// without another schedule.
///
/// Only the wait is cancellable: once the window elapses the action runs as
/// its own task and later schedules never abort it.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    /// Create a debouncer with the given quiet window.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: Mutex::new(None),
        }
    }

    /// Quiet window before an action fires.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// (Re)start the window, replacing any action still waiting.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule<F>(&self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let deadline = Instant::now() + self.window;

        let waiting = tokio::spawn(async move {
            sleep_until(deadline).await;

            tokio::spawn(action);
        });

        if let Some(previous) = self.pending().replace(waiting) {
            previous.abort();
        }
    }

    /// Drop the action still waiting, if any.
    ///
    /// Returns `true` when an action was waiting.
    pub fn cancel(&self) -> bool {
        let Some(waiting) = self.pending().take() else {
            return false;
        };

        let was_waiting = !waiting.is_finished();

        waiting.abort();

        was_waiting
    }

    /// Whether an action is waiting for the window to elapse.
    pub fn is_pending(&self) -> bool {
        self.pending()
            .as_ref()
            .is_some_and(|waiting| !waiting.is_finished())
    }

    fn pending(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

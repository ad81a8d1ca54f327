//! Trailing-edge debounce on the tokio timer.
//!
//! Every [`Debouncer::call`] replaces the pending value and restarts the
//! window; the action runs once with the latest value after the window
//! passes without another call. A generation counter guards against a timer
//! that already woke up racing a newer call, cancel or flush.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

type Action<T> = Arc<dyn Fn(T) + Send + Sync>;

struct Pending<T> {
    value: Option<T>,
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

impl<T> Pending<T> {
    /// Drop the pending value and timer, invalidating any timer in flight.
    fn take(&mut self) -> Option<T> {
        self.generation = self.generation.wrapping_add(1);
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        self.value.take()
    }
}

/// Collapses bursts of calls into one trailing execution.
///
/// [`call`](Debouncer::call) must run inside a tokio runtime. Timer-driven
/// runs happen on the blocking pool, so the action may do synchronous I/O;
/// [`flush`](Debouncer::flush) runs it on the caller's thread.
pub struct Debouncer<T> {
    delay: Duration,
    action: Action<T>,
    pending: Arc<Mutex<Pending<T>>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration, action: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self {
            delay,
            action: Arc::new(action),
            pending: Arc::new(Mutex::new(Pending {
                value: None,
                generation: 0,
                timer: None,
            })),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `value`, replacing any pending value and restarting the timer.
    pub fn call(&self, value: T) {
        let mut pending = lock(&self.pending);
        pending.take();
        pending.value = Some(value);
        let generation = pending.generation;

        let shared = Arc::clone(&self.pending);
        let action = Arc::clone(&self.action);
        let delay = self.delay;
        pending.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let value = {
                let mut pending = lock(&shared);
                if pending.generation != generation {
                    return;
                }
                pending.timer = None;
                pending.value.take()
            };
            if let Some(value) = value {
                if let Err(e) = tokio::task::spawn_blocking(move || action(value)).await {
                    tracing::error!(error = %e, "Debounced action failed");
                }
            }
        }));
    }

    /// Drop the pending call. Returns whether one was pending.
    pub fn cancel(&self) -> bool {
        lock(&self.pending).take().is_some()
    }

    /// Run the pending call now. Returns whether one was pending.
    pub fn flush(&self) -> bool {
        let value = lock(&self.pending).take();
        match value {
            Some(value) => {
                (self.action)(value);
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        lock(&self.pending).value.is_some()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        lock(&self.pending).take();
    }
}

/// The guarded data stays consistent even if an action panicked, so a
/// poisoned lock is recovered rather than propagated.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

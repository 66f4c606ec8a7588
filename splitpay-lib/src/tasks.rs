//! Registry of background tasks owned by the extension context.
//!
//! Tasks receive a [`ShutdownSignal`] when spawned. [`TaskRegistry::stop_all`]
//! flips the signal, gives every task a shared grace period to return and
//! aborts whatever is still running afterwards. Task failures during
//! teardown are logged and collected, never propagated.

use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Deadline used when `now + grace` does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Error a background task may finish with.
pub type TaskError = Box<dyn std::error::Error + Send + Sync>;

/// Cooperative cancellation handle given to each background task.
#[derive(Clone, Debug)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Returns true once shutdown was requested.
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait until shutdown is requested or the registry is dropped.
    pub async fn cancelled(&mut self) {
        let _ = self.rx.wait_for(|stop| *stop).await;
    }
}

/// Outcome of [`TaskRegistry::stop_all`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StopReport {
    /// Teardown ran to completion. Per-task failures do not clear this.
    pub success: bool,
    /// Tasks that returned cleanly.
    pub stopped: Vec<String>,
    /// Tasks that failed, panicked or had to be aborted, with the reason.
    pub failed: Vec<(String, String)>,
}

struct RegisteredTask {
    name: String,
    handle: JoinHandle<Result<(), TaskError>>,
}

/// Background tasks sharing one shutdown signal.
pub struct TaskRegistry {
    shutdown: watch::Sender<bool>,
    tasks: Mutex<Vec<RegisteredTask>>,
    grace: Duration,
}

impl TaskRegistry {
    /// Create a registry whose tasks get `grace` to stop before being aborted.
    pub fn new(grace: Duration) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            shutdown,
            tasks: Mutex::new(Vec::new()),
            grace,
        }
    }

    /// Spawn `task` on the current tokio runtime and register it.
    ///
    /// Tasks spawned after [`stop_all`](Self::stop_all) start with the
    /// signal already raised.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    pub fn spawn<F, Fut>(&self, name: impl Into<String>, task: F)
    where
        F: FnOnce(ShutdownSignal) -> Fut,
        Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
    {
        let name = name.into();
        let signal = ShutdownSignal {
            rx: self.shutdown.subscribe(),
        };
        let handle = tokio::spawn(task(signal));
        tracing::debug!(task = %name, "spawned background task");
        self.lock_tasks().push(RegisteredTask { name, handle });
    }

    /// Number of registered tasks, finished or not.
    pub fn len(&self) -> usize {
        self.lock_tasks().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true once [`stop_all`](Self::stop_all) was called.
    pub fn is_stopped(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Signal every task to stop and wait for them.
    pub async fn stop_all(&self) -> StopReport {
        self.shutdown.send_replace(true);
        let tasks = std::mem::take(&mut *self.lock_tasks());
        let now = tokio::time::Instant::now();
        let deadline = now.checked_add(self.grace).unwrap_or(now + FAR_FUTURE);
        let mut report = StopReport::default();

        for RegisteredTask { name, mut handle } in tasks {
            match tokio::time::timeout_at(deadline, &mut handle).await {
                Ok(Ok(Ok(()))) => report.stopped.push(name),
                Ok(Ok(Err(err))) => {
                    tracing::warn!(task = %name, "task failed during shutdown: {err}");
                    report.failed.push((name, err.to_string()));
                }
                Ok(Err(join_err)) => {
                    tracing::warn!(task = %name, "task did not finish cleanly: {join_err}");
                    report.failed.push((name, join_err.to_string()));
                }
                Err(_) => {
                    handle.abort();
                    tracing::warn!(task = %name, grace = ?self.grace, "task ignored shutdown, aborted");
                    report
                        .failed
                        .push((name, "aborted after grace period".to_string()));
                }
            }
        }

        report.success = true;
        tracing::info!(
            stopped = report.stopped.len(),
            failed = report.failed.len(),
            "background tasks stopped"
        );
        report
    }

    fn lock_tasks(&self) -> std::sync::MutexGuard<'_, Vec<RegisteredTask>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for TaskRegistry {
    fn drop(&mut self) {
        let tasks = self.tasks.get_mut().unwrap_or_else(PoisonError::into_inner);
        for task in tasks.drain(..) {
            task.handle.abort();
        }
    }
}

use crate::error::{HardwareError, HardwareErrorExt};
use fxhash::FxHashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

/// Identifies one scheduled job, so its owner can cancel it without touching
/// a newer job scheduled under the same device name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(u64);

/// Delayed jobs keyed by device name. Scheduling a job for a device aborts
/// the one still pending for it.
#[derive(Debug, Clone)]
pub struct RestScheduler {
    runtime: Handle,
    next_id: Arc<AtomicU64>,
    jobs: Arc<Mutex<FxHashMap<String, (JobId, JoinHandle<()>)>>>,
}

impl RestScheduler {
    #[must_use]
    pub fn new(runtime: Handle) -> Self {
        Self { runtime, next_id: Arc::default(), jobs: Arc::default() }
    }

    /// Uses the runtime the caller is running on.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::Runtime`] outside of a tokio runtime.
    pub fn current() -> Result<Self, HardwareError> {
        let runtime = Handle::try_current().context("Rest scheduler needs a tokio runtime")?;
        Ok(Self::new(runtime))
    }

    /// Runs `job` after `delay`, replacing any pending job of `device`.
    pub fn schedule<F>(&self, device: &str, delay: Duration, job: F) -> JobId
    where
        F: FnOnce() + Send + 'static,
    {
        let id = JobId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let task = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            job();
        });

        let mut jobs = self.jobs.lock();
        jobs.retain(|_, (_, handle)| !handle.is_finished());
        if let Some((_, previous)) = jobs.insert(device.to_owned(), (id, task)) {
            previous.abort();
            debug!(target: "tilt::hardware", device, "Pending rest job replaced");
        }
        id
    }

    /// Aborts the pending job of `device`. Returns whether one was pending.
    pub fn cancel(&self, device: &str) -> bool {
        self.jobs.lock().remove(device).is_some_and(|(_, handle)| abort(handle))
    }

    /// Aborts the job of `device` only while it is still the one identified by
    /// `id`. Returns whether it was pending.
    pub fn cancel_job(&self, device: &str, id: JobId) -> bool {
        let mut jobs = self.jobs.lock();
        if jobs.get(device).is_none_or(|(current, _)| *current != id) {
            return false;
        }
        jobs.remove(device).is_some_and(|(_, handle)| abort(handle))
    }

    pub fn cancel_all(&self) {
        for (_, (_, handle)) in self.jobs.lock().drain() {
            handle.abort();
        }
    }

    #[must_use]
    pub fn is_pending(&self, device: &str) -> bool {
        self.jobs.lock().get(device).is_some_and(|(_, handle)| !handle.is_finished())
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.jobs.lock().values().filter(|(_, handle)| !handle.is_finished()).count()
    }
}

fn abort(handle: JoinHandle<()>) -> bool {
    let pending = !handle.is_finished();
    handle.abort();
    pending
}

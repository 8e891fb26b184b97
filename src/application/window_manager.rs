// Window manager - Applies samples atomically and publishes snapshots
use crate::domain::error::{FetchError, WindowError};
use crate::domain::sample::Sample;
use crate::domain::snapshot::{ErrorStatus, Snapshot};
use crate::domain::window::Window;
use chrono::Local;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

/// Owns the sliding window and publishes an immutable `Arc<Snapshot>`
/// after every change.
///
/// Writers serialize on an internal mutex; readers only touch the published
/// snapshot, so a reader holding a snapshot never sees it change.
#[derive(Debug)]
pub struct WindowManager {
    inner: Mutex<Inner>,
    published: watch::Sender<Arc<Snapshot>>,
    stale_after: u32,
}

#[derive(Debug)]
struct Inner {
    window: Window,
    latest: Option<Sample>,
    error: Option<ErrorStatus>,
    version: u64,
}

impl Inner {
    fn consecutive_failures(&self) -> u32 {
        self.error.as_ref().map_or(0, |e| e.consecutive_failures)
    }

    fn snapshot(&self, stale_after: u32) -> Snapshot {
        Snapshot {
            version: self.version,
            state: self.window.state(),
            capacity: self.window.capacity(),
            time_axis: self.window.time_axis(),
            series: self.window.series(),
            latest: self.latest.clone(),
            error: self.error.clone(),
            stale: stale_after > 0 && self.consecutive_failures() >= stale_after,
        }
    }
}

impl WindowManager {
    /// `stale_after` consecutive failures mark the snapshot stale; zero
    /// disables the flag.
    pub fn new(series_names: &[String], capacity: usize, stale_after: u32) -> Self {
        let inner = Inner {
            window: Window::new(series_names, capacity),
            latest: None,
            error: None,
            version: 0,
        };
        let (published, _) = watch::channel(Arc::new(inner.snapshot(stale_after)));

        Self {
            inner: Mutex::new(inner),
            published,
            stale_after,
        }
    }

    /// Append a sample to the axis and every series, evicting the oldest
    /// entry across all of them once full.
    pub fn apply(&self, sample: Sample) -> Result<(), WindowError> {
        let mut inner = self.lock();

        inner.window.push(&sample)?;

        if let Some(previous) = &inner.latest {
            if sample.request_count < previous.request_count {
                tracing::warn!(
                    previous = previous.request_count,
                    current = sample.request_count,
                    "metrics counter went backwards"
                );
            }
        }

        tracing::debug!(
            request_count = sample.request_count,
            len = inner.window.len(),
            "sample applied"
        );

        inner.latest = Some(sample);
        inner.error = None;
        self.publish(&mut inner);
        Ok(())
    }

    /// Record a fetch failure without touching the axis or series.
    pub fn apply_error(&self, error: &FetchError) {
        let mut inner = self.lock();

        let failures = inner.consecutive_failures().saturating_add(1);
        inner.error = Some(ErrorStatus::new(error, Local::now(), failures));

        if failures == self.stale_after {
            tracing::warn!(failures, "metrics data is now stale");
        }

        self.publish(&mut inner);
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.published.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.published.subscribe()
    }

    /// Drop all history, returning the window to `Empty`.
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.window.clear();
        inner.latest = None;
        inner.error = None;
        self.publish(&mut inner);
        tracing::info!("window reset");
    }

    fn publish(&self, inner: &mut Inner) {
        inner.version += 1;
        self.published
            .send_replace(Arc::new(inner.snapshot(self.stale_after)));
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

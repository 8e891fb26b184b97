// Sampler - Drives periodic fetches and reports outcomes
use crate::application::metrics_source::MetricsSource;
use crate::domain::error::FetchError;
use crate::domain::sample::Sample;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Polls a `MetricsSource` on a fixed cadence.
///
/// Fetches are serialized: the next tick is only awaited once the previous
/// fetch has completed. Outcomes are delivered under a gate shared with
/// `stop`, so once `stop` returns no callback runs again for that run.
#[derive(Debug, Default)]
pub struct Sampler {
    task: Option<JoinHandle<()>>,
    epoch: Arc<Mutex<u64>>,
}

impl Sampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch immediately, then every `interval` until stopped.
    ///
    /// Must be called from within a tokio runtime. A running sampler is
    /// stopped first. A zero interval is raised to one millisecond.
    pub fn start<S, F, E>(&mut self, interval: Duration, source: Arc<S>, mut on_sample: F, mut on_error: E)
    where
        S: MetricsSource + ?Sized + 'static,
        F: FnMut(Sample) + Send + 'static,
        E: FnMut(FetchError) + Send + 'static,
    {
        self.stop();

        let interval = interval.max(MIN_INTERVAL);
        let epoch = *lock(&self.epoch);
        let gate = self.epoch.clone();

        tracing::info!(
            source = %source.describe(),
            ?interval,
            "sampler started"
        );

        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let result = source.fetch().await;

                let current = lock(&gate);
                if *current != epoch {
                    break;
                }
                match result {
                    Ok(sample) => on_sample(sample),
                    Err(e) => {
                        tracing::warn!(error = %e, "metrics fetch failed");
                        on_error(e);
                    }
                }
            }
        }));
    }

    /// Cancel polling. In-flight results are discarded. Idempotent.
    pub fn stop(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };

        *lock(&self.epoch) += 1;
        task.abort();
        tracing::info!("sampler stopped");
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        self.stop();
    }
}

fn lock(epoch: &Mutex<u64>) -> MutexGuard<'_, u64> {
    epoch.lock().unwrap_or_else(PoisonError::into_inner)
}

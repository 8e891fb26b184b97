// Source trait for metrics samples
use crate::domain::error::FetchError;
use crate::domain::sample::Sample;
use async_trait::async_trait;

#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// Fetch one sample. Every failure mode maps to a `FetchError`.
    async fn fetch(&self) -> Result<Sample, FetchError>;

    /// Human-readable description, used in logs.
    fn describe(&self) -> String;
}

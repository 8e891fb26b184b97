// HTTP metrics source - reqwest adapter for the metrics endpoint
use crate::application::metrics_source::MetricsSource;
use crate::domain::error::FetchError;
use crate::domain::sample::Sample;
use async_trait::async_trait;
use chrono::Local;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpMetricsSource {
    client: reqwest::Client,
    url: String,
    series_names: Vec<String>,
}

impl HttpMetricsSource {
    pub fn new(url: String, series_names: Vec<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            url,
            series_names,
        })
    }
}

#[async_trait]
impl MetricsSource for HttpMetricsSource {
    async fn fetch(&self) -> Result<Sample, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| FetchError::NetworkFailure(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::NonSuccessStatus(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::NetworkFailure(e.to_string()))?;

        let payload: serde_json::Value = serde_json::from_slice(&body)
            .map_err(|e| FetchError::malformed(format!("invalid JSON: {}", e)))?;

        Sample::from_payload(&payload, &self.series_names, Local::now())
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

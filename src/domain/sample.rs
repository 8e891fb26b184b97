// Sample domain model - one observation fetched from the metrics source
use super::error::FetchError;
use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Name of the monotonic counter field in the metrics payload.
pub const COUNTER_FIELD: &str = "requestCount";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub timestamp: DateTime<Local>,
    pub values: BTreeMap<String, f64>,
    pub request_count: u64,
}

impl Sample {
    pub fn new(timestamp: DateTime<Local>, values: BTreeMap<String, f64>, request_count: u64) -> Self {
        Self {
            timestamp,
            values,
            request_count,
        }
    }

    /// Parse a metrics payload, keeping only the configured series.
    ///
    /// Numeric fields may be JSON numbers or decimal strings ("12.34").
    /// Every configured series and the counter must be present.
    pub fn from_payload(
        payload: &Value,
        series_names: &[String],
        timestamp: DateTime<Local>,
    ) -> Result<Self, FetchError> {
        let object = payload
            .as_object()
            .ok_or_else(|| FetchError::malformed("payload is not a JSON object"))?;

        let mut values = BTreeMap::new();
        for name in series_names {
            let raw = object
                .get(name)
                .ok_or_else(|| FetchError::malformed(format!("missing field '{}'", name)))?;
            values.insert(name.clone(), parse_number(name, raw)?);
        }

        let raw_counter = object
            .get(COUNTER_FIELD)
            .ok_or_else(|| FetchError::malformed(format!("missing field '{}'", COUNTER_FIELD)))?;
        let request_count = parse_counter(raw_counter)?;

        Ok(Self::new(timestamp, values, request_count))
    }

    /// Label used on the shared time axis.
    pub fn label(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }

    pub fn value(&self, series: &str) -> Option<f64> {
        self.values.get(series).copied()
    }
}

fn parse_number(field: &str, raw: &Value) -> Result<f64, FetchError> {
    let parsed = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(FetchError::malformed(format!(
            "field '{}' is not numeric: {}",
            field, raw
        ))),
    }
}

fn parse_counter(raw: &Value) -> Result<u64, FetchError> {
    let parsed = match raw {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| {
        FetchError::malformed(format!(
            "field '{}' is not a non-negative integer: {}",
            COUNTER_FIELD, raw
        ))
    })
}

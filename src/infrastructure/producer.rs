// Metrics producer - simulated metrics endpoint backing /metrics
use rand::Rng;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsPayload {
    pub cpu_usage: String,
    pub latency: String,
    pub memory_usage: String,
    pub request_count: u64,
}

/// Produces randomized metrics and counts the requests it has served.
#[derive(Debug, Default)]
pub struct MetricsProducer {
    request_counter: AtomicU64,
}

impl MetricsProducer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one request and build its payload.
    pub fn next_payload(&self) -> MetricsPayload {
        let request_count = self.request_counter.fetch_add(1, Ordering::Relaxed) + 1;
        let mut rng = rand::thread_rng();

        MetricsPayload {
            cpu_usage: format!("{:.2}", rng.gen_range(0.0..100.0)),
            latency: format!("{:.2}", rng.gen_range(50.0..500.0)),
            memory_usage: format!("{:.2}", rng.gen_range(0.0..80.0)),
            request_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(value: &str) -> f64 {
        let (_, fraction) = value.split_once('.').unwrap();
        assert_eq!(fraction.len(), 2, "{} should carry two decimals", value);
        value.parse().unwrap()
    }

    #[test]
    fn test_counter_increments_per_request() {
        let producer = MetricsProducer::new();
        let counts: Vec<u64> = (0..5).map(|_| producer.next_payload().request_count).collect();
        assert_eq!(counts, vec![1, 2, 3, 4, 5]);

        let other = MetricsProducer::new();
        assert_eq!(other.next_payload().request_count, 1);
    }

    #[test]
    fn test_values_in_range() {
        let producer = MetricsProducer::new();
        for _ in 0..200 {
            let payload = producer.next_payload();
            let cpu = parse(&payload.cpu_usage);
            let latency = parse(&payload.latency);
            let memory = parse(&payload.memory_usage);

            assert!((0.0..=100.0).contains(&cpu));
            assert!((50.0..=500.0).contains(&latency));
            assert!((0.0..=80.0).contains(&memory));
        }
    }

    #[test]
    fn test_payload_field_names() {
        let payload = MetricsProducer::new().next_payload();
        let json = serde_json::to_value(&payload).unwrap();

        for field in ["cpuUsage", "latency", "memoryUsage", "requestCount"] {
            assert!(json.get(field).is_some(), "missing {}", field);
        }
        assert!(json["requestCount"].is_u64());
        assert!(json["cpuUsage"].is_string());
    }
}

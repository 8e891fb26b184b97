// Router construction
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    health_check, index, metrics, reset_window, snapshot, stream_snapshots,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(health_check))
        .route("/metrics", get(metrics))
        .route("/api/snapshot", get(snapshot))
        .route("/api/snapshot/stream", get(stream_snapshots))
        .route("/api/window/reset", post(reset_window))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::window_manager::WindowManager;
    use crate::domain::sample::Sample;
    use crate::infrastructure::producer::MetricsProducer;
    use crate::presentation::shutdown;
    use chrono::Local;
    use serde_json::{json, Value};
    use std::time::Duration;
    use tokio::sync::watch;
    use tokio::task::JoinHandle;

    fn names() -> Vec<String> {
        vec!["cpuUsage".into(), "latency".into(), "memoryUsage".into()]
    }

    struct TestServer {
        base: String,
        state: Arc<AppState>,
        shutdown: watch::Sender<bool>,
        handle: JoinHandle<()>,
    }

    async fn serve() -> TestServer {
        let (shutdown, shutdown_rx) = shutdown::channel();
        let state = Arc::new(AppState {
            producer: Arc::new(MetricsProducer::new()),
            window: Arc::new(WindowManager::new(&names(), 3, 3)),
            shutdown: shutdown_rx.clone(),
        });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = build_router(state.clone());
        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown::wait_for_shutdown(shutdown_rx))
                .await
                .unwrap();
        });
        TestServer {
            base: format!("http://{}", addr),
            state,
            shutdown,
            handle,
        }
    }

    /// Read from an event stream until `frames` complete frames have arrived.
    async fn read_frames(response: &mut reqwest::Response, frames: usize, buffer: &mut String) {
        while buffer.matches("\n\n").count() < frames {
            let chunk = tokio::time::timeout(Duration::from_secs(5), response.chunk())
                .await
                .expect("timed out waiting for an event")
                .unwrap()
                .expect("event stream ended early");
            buffer.push_str(&String::from_utf8_lossy(&chunk));
        }
    }

    #[tokio::test]
    async fn test_metrics_endpoint_feeds_the_window() {
        let server = serve().await;
        let (base, state) = (&server.base, &server.state);
        let client = reqwest::Client::new();

        for expected in 1..=2u64 {
            let payload: Value = client
                .get(format!("{}/metrics", base))
                .send()
                .await
                .unwrap()
                .json()
                .await
                .unwrap();
            assert_eq!(payload["requestCount"], json!(expected));

            let sample = Sample::from_payload(&payload, &names(), Local::now()).unwrap();
            state.window.apply(sample).unwrap();
        }

        let snapshot: Value = client
            .get(format!("{}/api/snapshot", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(snapshot["state"], json!("filling"));
        assert_eq!(snapshot["timeAxis"].as_array().unwrap().len(), 2);
        assert_eq!(snapshot["series"][0]["name"], json!("cpuUsage"));
        assert_eq!(snapshot["series"][0]["values"].as_array().unwrap().len(), 2);
        assert_eq!(snapshot["latest"]["requestCount"], json!(2));
        assert_eq!(snapshot["stale"], json!(false));
    }

    #[tokio::test]
    async fn test_reset_endpoint() {
        let server = serve().await;
        let (base, state) = (&server.base, &server.state);
        let payload = serde_json::to_value(state.producer.next_payload()).unwrap();
        state
            .window
            .apply(Sample::from_payload(&payload, &names(), Local::now()).unwrap())
            .unwrap();

        let response = reqwest::Client::new()
            .post(format!("{}/api/window/reset", base))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["state"], json!("empty"));
        assert!(state.window.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_health_and_index() {
        let server = serve().await;
        let base = &server.base;
        let client = reqwest::Client::new();

        let health = client.get(format!("{}/healthz", base)).send().await.unwrap();
        assert_eq!(health.text().await.unwrap(), "ok");

        let page = client.get(format!("{}/", base)).send().await.unwrap();
        assert!(page.text().await.unwrap().contains("/api/snapshot/stream"));
    }

    #[tokio::test]
    async fn test_snapshot_stream_emits_current_then_updates() {
        let server = serve().await;
        let mut response = reqwest::Client::new()
            .get(format!("{}/api/snapshot/stream", server.base))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());

        let mut buffer = String::new();
        read_frames(&mut response, 1, &mut buffer).await;
        assert!(buffer.starts_with("event: snapshot\n"));
        assert!(buffer.contains("\"version\":0"));
        assert!(buffer.contains("\"state\":\"empty\""));

        let payload = serde_json::to_value(server.state.producer.next_payload()).unwrap();
        server
            .state
            .window
            .apply(Sample::from_payload(&payload, &names(), Local::now()).unwrap())
            .unwrap();

        read_frames(&mut response, 2, &mut buffer).await;
        let second = buffer.split("\n\n").nth(1).unwrap();
        assert!(second.starts_with("event: snapshot\n"));
        assert!(second.contains("\"version\":1"));
        assert!(second.contains("\"requestCount\":1"));
    }

    #[tokio::test]
    async fn test_shutdown_completes_with_open_stream() {
        let server = serve().await;
        let mut response = reqwest::Client::new()
            .get(format!("{}/api/snapshot/stream", server.base))
            .send()
            .await
            .unwrap();

        let mut buffer = String::new();
        read_frames(&mut response, 1, &mut buffer).await;

        server.shutdown.send(true).unwrap();

        tokio::time::timeout(Duration::from_secs(5), server.handle)
            .await
            .expect("server did not shut down while a stream was open")
            .unwrap();

        let rest = tokio::time::timeout(Duration::from_secs(5), response.chunk())
            .await
            .unwrap();
        assert!(!matches!(rest, Ok(Some(_))), "no events after shutdown");
    }
}

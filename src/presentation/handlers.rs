// HTTP request handlers
use crate::domain::snapshot::Snapshot;
use crate::infrastructure::producer::MetricsPayload;
use crate::presentation::app_state::AppState;
use crate::presentation::shutdown::wait_for_shutdown;
use axum::{
    extract::State,
    response::{
        sse::{Event, KeepAlive, Sse},
        Html,
    },
    Json,
};
use futures::Stream;
use std::sync::Arc;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Simulated metrics endpoint polled by the sampler
pub async fn metrics(State(state): State<Arc<AppState>>) -> Json<MetricsPayload> {
    let payload = state.producer.next_payload();
    tracing::info!(
        cpu_usage = %payload.cpu_usage,
        latency = %payload.latency,
        memory_usage = %payload.memory_usage,
        request_count = payload.request_count,
        "metrics requested"
    );
    Json(payload)
}

/// Current window snapshot
pub async fn snapshot(State(state): State<Arc<AppState>>) -> Json<Snapshot> {
    Json(Snapshot::clone(&state.window.snapshot()))
}

/// Server-sent events: the current snapshot, then one event per publication.
/// The stream ends on shutdown so graceful shutdown can drain connections.
pub async fn stream_snapshots(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let mut rx = state.window.subscribe();
    let shutdown = state.shutdown.clone();

    let stream = async_stream::stream! {
        loop {
            let snapshot = rx.borrow_and_update().clone();
            yield Event::default().event("snapshot").json_data(&*snapshot);

            tokio::select! {
                changed = rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                _ = wait_for_shutdown(shutdown.clone()) => break,
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Clear the window and return the empty snapshot
pub async fn reset_window(State(state): State<Arc<AppState>>) -> Json<Snapshot> {
    state.window.reset();
    Json(Snapshot::clone(&state.window.snapshot()))
}

/// Chart page
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

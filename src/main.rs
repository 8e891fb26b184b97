// Main entry point - Dependency injection, sampler and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::application::sampler::Sampler;
use crate::application::window_manager::WindowManager;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::http_source::HttpMetricsSource;
use crate::infrastructure::producer::MetricsProducer;
use crate::presentation::app_state::AppState;
use crate::presentation::routes::build_router;
use crate::presentation::shutdown;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_dashboard_config()?;
    let addr = config.server.socket_addr()?;

    // Window state and the metrics source it is fed from
    let window = Arc::new(WindowManager::new(
        &config.sampler.series_names,
        config.sampler.window_size,
        config.sampler.stale_after_failures,
    ));
    let source = Arc::new(HttpMetricsSource::new(
        config.sampler.source_url.clone(),
        config.sampler.series_names.clone(),
        config.sampler.request_timeout(),
    )?);

    // One shutdown signal for the server, open event streams and the sampler
    let (shutdown_tx, shutdown_rx) = shutdown::channel();
    tokio::spawn(shutdown::trigger_on_ctrl_c(shutdown_tx));

    let state = Arc::new(AppState {
        producer: Arc::new(MetricsProducer::new()),
        window: window.clone(),
        shutdown: shutdown_rx.clone(),
    });
    let router = build_router(state);

    // Bind before polling so a self-hosted source is reachable on the first tick
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "metrics dashboard listening");

    let mut sampler = Sampler::new();
    let on_sample = window.clone();
    let on_error = window.clone();
    sampler.start(
        config.sampler.interval(),
        source,
        move |sample| {
            if let Err(e) = on_sample.apply(sample) {
                tracing::warn!(error = %e, "sample rejected");
            }
        },
        move |error| on_error.apply_error(&error),
    );

    let sampler_shutdown = shutdown_rx.clone();
    let sampler_task = tokio::spawn(async move {
        shutdown::wait_for_shutdown(sampler_shutdown).await;
        sampler.stop();
        debug_assert!(!sampler.is_running());
    });

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown::wait_for_shutdown(shutdown_rx))
        .await?;

    sampler_task.await?;
    tracing::info!("metrics dashboard stopped");
    Ok(())
}

// Application state for HTTP handlers
use crate::application::window_manager::WindowManager;
use crate::infrastructure::producer::MetricsProducer;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Clone)]
pub struct AppState {
    pub producer: Arc<MetricsProducer>,
    pub window: Arc<WindowManager>,
    pub shutdown: watch::Receiver<bool>,
}

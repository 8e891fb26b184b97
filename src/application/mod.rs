// Application layer - Polling and window management use cases
pub mod metrics_source;
pub mod sampler;
pub mod window_manager;

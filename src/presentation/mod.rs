// Presentation layer - HTTP handlers and routing
pub mod app_state;
pub mod handlers;
pub mod routes;
pub mod shutdown;

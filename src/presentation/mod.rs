// Presentation layer - HTTP surface over the dashboard host
pub mod app_state;
pub mod handlers;

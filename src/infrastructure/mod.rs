// Infrastructure layer - External dependencies and adapters
pub mod chart_engine;
pub mod config;
pub mod preference_file;
pub mod request_channel;

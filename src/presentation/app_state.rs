// Application state for HTTP handlers
use crate::application::host::HostHandle;
use crate::infrastructure::chart_engine::MemoryChartEngine;
use crate::infrastructure::request_channel::BroadcastRequestSink;

#[derive(Clone)]
pub struct AppState {
    pub host: HostHandle,
    pub requests: BroadcastRequestSink,
    pub charts: MemoryChartEngine,
}

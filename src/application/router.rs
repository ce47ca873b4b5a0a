// Event router - inbound parsing, subscription table and outbound requests
use crate::domain::event::{Event, EventKind, Request};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error("inbound message is not JSON: {0}")]
    NotJson(#[source] serde_json::Error),

    #[error("inbound message has no type tag")]
    MissingType,

    #[error("unknown event kind '{0}'")]
    UnknownKind(String),

    #[error("malformed {kind} payload: {source}")]
    Malformed {
        kind: EventKind,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("nobody is listening for outbound requests")]
    NoListeners,
}

/// Outbound side of the collector channel.
pub trait RequestSink: Send + Sync {
    fn send(&self, request: Request) -> Result<(), SendError>;
}

/// Fire-and-forget request handle. Cloned into every dashlet at
/// construction.
#[derive(Clone)]
pub struct Requester {
    sink: Arc<dyn RequestSink>,
}

impl Requester {
    pub fn new(sink: Arc<dyn RequestSink>) -> Self {
        Self { sink }
    }

    /// Best effort: a failed send is logged and dropped, the next tick
    /// asks again.
    pub fn request(&self, request: Request) {
        if let Err(e) = self.sink.send(request) {
            tracing::debug!("Dropped outbound {}: {}", request.name(), e);
        }
    }

    pub fn request_flow_count(&self) {
        self.request(Request::FlowCount);
    }

    pub fn request_throughput(&self) {
        self.request(Request::Throughput);
    }

    pub fn request_full_throughput(&self) {
        self.request(Request::FullThroughput);
    }

    pub fn request_rtt_histo(&self) {
        self.request(Request::RttHisto);
    }

    pub fn request_network_tree_summary(&self) {
        self.request(Request::NetworkTreeSummary);
    }

    pub fn request_top10_downloaders(&self) {
        self.request(Request::Top10Downloaders);
    }
}

pub struct EventRouter {
    requester: Requester,
    subscriptions: BTreeMap<EventKind, BTreeSet<usize>>,
}

impl EventRouter {
    pub fn new(sink: Arc<dyn RequestSink>) -> Self {
        Self {
            requester: Requester::new(sink),
            subscriptions: BTreeMap::new(),
        }
    }

    pub fn requester(&self) -> Requester {
        self.requester.clone()
    }

    /// Parse a raw inbound message into a typed event.
    pub fn parse(raw: &str) -> Result<Event, RouterError> {
        let value: serde_json::Value = serde_json::from_str(raw).map_err(RouterError::NotJson)?;
        let tag = value
            .get("type")
            .and_then(|t| t.as_str())
            .ok_or(RouterError::MissingType)?;
        let kind: EventKind = tag
            .parse()
            .map_err(|_| RouterError::UnknownKind(tag.to_string()))?;
        serde_json::from_value(value).map_err(|source| RouterError::Malformed { kind, source })
    }

    /// Parse, or log and drop. Bad input is never fatal.
    pub fn on_inbound_message(&self, raw: &str) -> Option<Event> {
        match Self::parse(raw) {
            Ok(event) => Some(event),
            Err(e) => {
                tracing::warn!("Dropping inbound message: {}", e);
                None
            }
        }
    }

    pub fn subscribe(&mut self, slot: usize, kinds: &[EventKind]) {
        for kind in kinds {
            self.subscriptions.entry(*kind).or_default().insert(slot);
        }
    }

    /// Subscribed slots for `kind`, in slot order.
    pub fn subscribers(&self, kind: EventKind) -> Vec<usize> {
        self.subscriptions
            .get(&kind)
            .map(|slots| slots.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.subscriptions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::RecordingSink;

    fn router() -> (EventRouter, RecordingSink) {
        let sink = RecordingSink::default();
        (EventRouter::new(Arc::new(sink.clone())), sink)
    }

    #[test]
    fn test_parse_errors_are_classified() {
        assert!(matches!(EventRouter::parse("not json"), Err(RouterError::NotJson(_))));
        assert!(matches!(EventRouter::parse(r#"{"count":1}"#), Err(RouterError::MissingType)));
        assert!(matches!(
            EventRouter::parse(r#"{"type":"CpuUsage","cpus":[]}"#),
            Err(RouterError::UnknownKind(k)) if k == "CpuUsage"
        ));
        assert!(matches!(
            EventRouter::parse(r#"{"type":"FlowCount","count":"many"}"#),
            Err(RouterError::Malformed { kind: EventKind::FlowCount, .. })
        ));
    }

    #[test]
    fn test_unknown_inbound_is_dropped() {
        let (router, _) = router();
        assert!(router.on_inbound_message(r#"{"type":"Nope"}"#).is_none());
        assert_eq!(
            router.on_inbound_message(r#"{"type":"FlowCount","count":7}"#),
            Some(Event::FlowCount { count: 7 })
        );
    }

    #[test]
    fn test_subscribers_are_slot_ordered() {
        let (mut router, _) = router();
        router.subscribe(2, &[EventKind::Throughput]);
        router.subscribe(0, &[EventKind::Throughput, EventKind::RttHisto]);
        router.subscribe(1, &[]);
        assert_eq!(router.subscribers(EventKind::Throughput), vec![0, 2]);
        assert_eq!(router.subscribers(EventKind::FlowCount), Vec::<usize>::new());
        assert_eq!(router.subscribers(EventKind::RttHisto), vec![0]);
        router.clear();
        assert!(router.subscribers(EventKind::Throughput).is_empty());
    }

    #[test]
    fn test_request_family_reaches_sink() {
        let (router, sink) = router();
        let requester = router.requester();
        requester.request_flow_count();
        requester.request_full_throughput();
        requester.request_top10_downloaders();
        assert_eq!(
            sink.requests(),
            vec![Request::FlowCount, Request::FullThroughput, Request::Top10Downloaders]
        );
    }

    #[test]
    fn test_failed_send_is_not_fatal() {
        let sink = RecordingSink::failing();
        let router = EventRouter::new(Arc::new(sink.clone()));
        router.requester().request_throughput();
        assert!(sink.requests().is_empty());
    }
}

// Event and request domain models for the collector feed
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kinds of inbound event. Routing only ever looks at this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    FlowCount,
    Throughput,
    ThroughputFull,
    RttHisto,
    NetworkTreeSummary,
    Top10Downloaders,
}

impl EventKind {
    pub const ALL: [EventKind; 6] = [
        EventKind::FlowCount,
        EventKind::Throughput,
        EventKind::ThroughputFull,
        EventKind::RttHisto,
        EventKind::NetworkTreeSummary,
        EventKind::Top10Downloaders,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::FlowCount => "FlowCount",
            EventKind::Throughput => "Throughput",
            EventKind::ThroughputFull => "ThroughputFull",
            EventKind::RttHisto => "RttHisto",
            EventKind::NetworkTreeSummary => "NetworkTreeSummary",
            EventKind::Top10Downloaders => "Top10Downloaders",
        }
    }

    /// The outbound request that makes the collector produce this kind.
    pub fn request(&self) -> Request {
        match self {
            EventKind::FlowCount => Request::FlowCount,
            EventKind::Throughput => Request::Throughput,
            EventKind::ThroughputFull => Request::FullThroughput,
            EventKind::RttHisto => Request::RttHisto,
            EventKind::NetworkTreeSummary => Request::NetworkTreeSummary,
            EventKind::Top10Downloaders => Request::Top10Downloaders,
        }
    }

    /// Whether the periodic tick should re-request this kind. The full
    /// throughput history is a backfill and is only requested on mount.
    pub fn refresh_on_tick(&self) -> bool {
        !matches!(self, EventKind::ThroughputFull)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEventKind(pub String);

impl FromStr for EventKind {
    type Err = UnknownEventKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownEventKind(s.to_string()))
    }
}

/// One sample of the throughput feed, `[down, up]` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThroughputEntry {
    pub bps: [u64; 2],
    pub pps: [u64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkTreeEntry {
    pub name: String,
    pub current_throughput: [u64; 2],
    pub max_throughput: [u64; 2],
    #[serde(default)]
    pub rtts: Vec<f32>,
    #[serde(default)]
    pub parents: Vec<usize>,
    #[serde(default)]
    pub immediate_parent: Option<usize>,
    #[serde(rename = "type", default)]
    pub node_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpStatsWithPlan {
    pub ip_address: String,
    pub circuit_id: String,
    pub bits_per_second: [u64; 2],
    pub packets_per_second: [u64; 2],
    pub median_tcp_rtt: f32,
    pub tcp_retransmits: [u64; 2],
    #[serde(default)]
    pub plan: Vec<u32>,
    #[serde(default)]
    pub tc_handle: u32,
}

/// A typed inbound event. The payload shape is fixed by the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    FlowCount {
        count: u64,
    },
    Throughput {
        pps: [u64; 2],
        bps: [u64; 2],
    },
    ThroughputFull {
        entries: Vec<ThroughputEntry>,
    },
    RttHisto {
        entries: Vec<u32>,
    },
    NetworkTreeSummary {
        entries: Vec<(usize, NetworkTreeEntry)>,
    },
    Top10Downloaders {
        entries: Vec<IpStatsWithPlan>,
    },
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::FlowCount { .. } => EventKind::FlowCount,
            Event::Throughput { .. } => EventKind::Throughput,
            Event::ThroughputFull { .. } => EventKind::ThroughputFull,
            Event::RttHisto { .. } => EventKind::RttHisto,
            Event::NetworkTreeSummary { .. } => EventKind::NetworkTreeSummary,
            Event::Top10Downloaders { .. } => EventKind::Top10Downloaders,
        }
    }
}

/// Parameterless outbound triggers. Responses arrive later as ordinary
/// inbound events; there is no correlation id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    #[serde(rename = "requestFlowCount")]
    FlowCount,
    #[serde(rename = "requestThroughput")]
    Throughput,
    #[serde(rename = "requestFullThroughput")]
    FullThroughput,
    #[serde(rename = "requestRttHisto")]
    RttHisto,
    #[serde(rename = "requestNetworkTreeSummary")]
    NetworkTreeSummary,
    #[serde(rename = "requestTop10Downloaders")]
    Top10Downloaders,
}

impl Request {
    pub fn name(&self) -> &'static str {
        match self {
            Request::FlowCount => "requestFlowCount",
            Request::Throughput => "requestThroughput",
            Request::FullThroughput => "requestFullThroughput",
            Request::RttHisto => "requestRttHisto",
            Request::NetworkTreeSummary => "requestNetworkTreeSummary",
            Request::Top10Downloaders => "requestTop10Downloaders",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_str() {
        for kind in EventKind::ALL {
            assert_eq!(kind.as_str().parse::<EventKind>(), Ok(kind));
        }
        assert!("Bogus".parse::<EventKind>().is_err());
    }

    #[test]
    fn test_parse_throughput() {
        let raw = r#"{"type":"Throughput","pps":[100,200],"bps":[1000,2000]}"#;
        let event: Event = serde_json::from_str(raw).unwrap();
        assert_eq!(
            event,
            Event::Throughput {
                pps: [100, 200],
                bps: [1000, 2000]
            }
        );
        assert_eq!(event.kind(), EventKind::Throughput);
    }

    #[test]
    fn test_parse_network_tree_summary() {
        let raw = r#"{"type":"NetworkTreeSummary","entries":[[3,{
            "name":"Tower 1","current_throughput":[5000,2000],"max_throughput":[1,1],
            "rtts":[12.0,18.0],"parents":[0,3],"immediate_parent":0,"type":"site"}]]}"#;
        let event: Event = serde_json::from_str(raw).unwrap();
        match event {
            Event::NetworkTreeSummary { entries } => {
                assert_eq!(entries.len(), 1);
                assert_eq!(entries[0].0, 3);
                assert_eq!(entries[0].1.name, "Tower 1");
                assert_eq!(entries[0].1.node_type.as_deref(), Some("site"));
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_parse_top10_with_null_type_fields() {
        let raw = r#"{"type":"Top10Downloaders","entries":[{
            "ip_address":"10.0.0.1","circuit_id":"c1","bits_per_second":[10,20],
            "packets_per_second":[1,2],"median_tcp_rtt":15.5,"tcp_retransmits":[0,1],
            "plan":[0,0],"tc_handle":65537}]}"#;
        let event: Event = serde_json::from_str(raw).unwrap();
        assert_eq!(event.kind(), EventKind::Top10Downloaders);
    }

    #[test]
    fn test_request_serializes_as_named_trigger() {
        let json = serde_json::to_string(&Request::FullThroughput).unwrap();
        assert_eq!(json, r#"{"type":"requestFullThroughput"}"#);
        assert_eq!(EventKind::ThroughputFull.request(), Request::FullThroughput);
        assert!(!EventKind::ThroughputFull.refresh_on_tick());
        assert!(EventKind::RttHisto.refresh_on_tick());
    }
}

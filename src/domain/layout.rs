// Page layouts and the responsive rules for dashlet containers
use serde::Deserialize;

/// The built-in panels a page layout can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashletKind {
    FlowCount,
    Throughput,
    ThroughputGraph,
    RttHisto,
    NetworkTree,
    Top10Downloaders,
}

/// Widest span a row can hold.
pub const MAX_SPAN: u8 = 12;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DashletSpec {
    pub kind: DashletKind,
    /// Requested column span. Kept wide so a bad value in the config only
    /// affects this dashlet, see [`DashletSpec::span`].
    #[serde(default)]
    pub size: Option<i64>,
}

impl DashletSpec {
    pub fn new(kind: DashletKind) -> Self {
        Self { kind, size: None }
    }

    pub fn sized(kind: DashletKind, size: u8) -> Self {
        Self {
            kind,
            size: Some(i64::from(size)),
        }
    }

    /// The requested span when it is one a row can hold. `None` means the
    /// dashlet uses its own default.
    pub fn span(&self) -> Option<u8> {
        match u8::try_from(self.size?) {
            Ok(span @ 1..=MAX_SPAN) => Some(span),
            _ => None,
        }
    }
}

/// A navigable page: an anchor and its dashlets in slot order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PageDefinition {
    pub anchor: String,
    #[serde(default)]
    pub dashlets: Vec<DashletSpec>,
}

impl PageDefinition {
    /// The stock dashboard: counters across the top, graphs, then tables.
    pub fn dashboard() -> Self {
        Self {
            anchor: "dashboard".to_string(),
            dashlets: vec![
                DashletSpec::sized(DashletKind::FlowCount, 2),
                DashletSpec::sized(DashletKind::Throughput, 4),
                DashletSpec::sized(DashletKind::ThroughputGraph, 6),
                DashletSpec::sized(DashletKind::RttHisto, 6),
                DashletSpec::sized(DashletKind::NetworkTree, 6),
                DashletSpec::sized(DashletKind::Top10Downloaders, 6),
            ],
        }
    }
}

/// Column-span classes for a dashlet of `size` (1-12). Anything outside
/// that range gets the minimal default span.
pub fn size_classes(size: u8) -> Vec<&'static str> {
    match size {
        1 => vec!["col-xs-12", "col-sm-12", "col-md-6", "col-lg-3", "col-xl-1", "col-xxl-1"],
        2 => vec!["col-xs-12", "col-sm-12", "col-md-6", "col-lg-3", "col-xl-2", "col-xxl-2"],
        3 => vec!["col-xs-12", "col-sm-12", "col-md-6", "col-lg-3", "col-xl-3", "col-xxl-3"],
        4 => vec!["col-xs-12", "col-sm-12", "col-md-6", "col-lg-6", "col-xl-4", "col-xxl-4"],
        5 => vec!["col-xs-12", "col-sm-12", "col-md-6", "col-lg-6", "col-xl-5", "col-xxl-5"],
        6 => vec!["col-xs-12", "col-sm-12", "col-md-6", "col-lg-6", "col-xl-6", "col-xxl-6"],
        7 => vec!["col-xs-12", "col-sm-12", "col-md-12", "col-lg-12", "col-xl-7", "col-xxl-7"],
        8 => vec!["col-xs-12", "col-sm-12", "col-md-12", "col-lg-12", "col-xl-8", "col-xxl-8"],
        9 => vec!["col-xs-12", "col-sm-12", "col-md-12", "col-lg-12", "col-xl-9", "col-xxl-9"],
        10 => vec!["col-xs-12", "col-sm-12", "col-md-12", "col-lg-12", "col-xl-10", "col-xxl-10"],
        11 => vec!["col-xs-12", "col-sm-12", "col-md-12", "col-lg-12", "col-xl-11", "col-xxl-11"],
        12 => vec!["col-xs-12", "col-sm-12", "col-md-12", "col-lg-12", "col-xl-12", "col-xxl-12"],
        _ => vec!["col-3"],
    }
}

/// Viewport width buckets matching the column classes above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Breakpoint {
    Xs,
    Sm,
    Md,
    Lg,
    Xl,
    Xxl,
}

impl Breakpoint {
    pub fn from_width(width: u32) -> Self {
        match width {
            0..=575 => Breakpoint::Xs,
            576..=767 => Breakpoint::Sm,
            768..=991 => Breakpoint::Md,
            992..=1199 => Breakpoint::Lg,
            1200..=1399 => Breakpoint::Xl,
            _ => Breakpoint::Xxl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_classes() {
        assert_eq!(size_classes(4)[4], "col-xl-4");
        assert_eq!(size_classes(12).len(), 6);
    }

    #[test]
    fn test_out_of_range_size_fails_closed() {
        assert_eq!(size_classes(0), vec!["col-3"]);
        assert_eq!(size_classes(13), vec!["col-3"]);
    }

    #[test]
    fn test_dashlet_spec_from_toml() {
        let page: PageDefinition = toml::from_str(
            r#"
            anchor = "overview"
            [[dashlets]]
            kind = "network_tree"
            size = 12
            [[dashlets]]
            kind = "flow_count"
            "#,
        )
        .unwrap();
        assert_eq!(page.anchor, "overview");
        assert_eq!(page.dashlets[0], DashletSpec::sized(DashletKind::NetworkTree, 12));
        assert_eq!(page.dashlets[1], DashletSpec::new(DashletKind::FlowCount));
    }

    #[test]
    fn test_out_of_range_span_falls_back() {
        let page: PageDefinition = toml::from_str(
            r#"
            anchor = "overview"
            [[dashlets]]
            kind = "rtt_histo"
            size = 300
            [[dashlets]]
            kind = "flow_count"
            size = -1
            [[dashlets]]
            kind = "throughput"
            size = 12
            "#,
        )
        .unwrap();
        assert_eq!(page.dashlets[0].span(), None);
        assert_eq!(page.dashlets[1].span(), None);
        assert_eq!(page.dashlets[2].span(), Some(12));
        assert_eq!(DashletSpec::new(DashletKind::Throughput).span(), None);
    }

    #[test]
    fn test_breakpoints() {
        assert_eq!(Breakpoint::from_width(320), Breakpoint::Xs);
        assert_eq!(Breakpoint::from_width(576), Breakpoint::Sm);
        assert_eq!(Breakpoint::from_width(1199), Breakpoint::Lg);
        assert_eq!(Breakpoint::from_width(1920), Breakpoint::Xxl);
    }
}

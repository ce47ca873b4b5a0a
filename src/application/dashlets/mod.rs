//! Built-in dashlets for the network dashboard.
//!
//! Each one owns exactly the subtree under its `dash_<slot>` container and
//! finds its own elements by id inside it.

mod flow_count;
mod network_tree;
mod rtt_histo;
mod throughput;
mod throughput_graph;
mod top_downloaders;

pub use flow_count::FlowCountDashlet;
pub use network_tree::NetworkTreeDashlet;
pub use rtt_histo::RttHistoDashlet;
pub use throughput::ThroughputDashlet;
pub use throughput_graph::ThroughputGraphDashlet;
pub use top_downloaders::TopDownloadersDashlet;

use crate::application::dashlet::{Dashlet, DashletContext, DashletError, DashletFactory};
use crate::domain::capacity::CapacityBand;
use crate::domain::document::Element;
use crate::domain::layout::{DashletKind, DashletSpec, MAX_SPAN};

/// Factory for the dashlets a page layout can name.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinDashlets;

impl DashletFactory for BuiltinDashlets {
    fn create(
        &self,
        spec: &DashletSpec,
        ctx: DashletContext,
    ) -> Result<Box<dyn Dashlet>, DashletError> {
        let span = spec.span();
        if let (None, Some(size)) = (span, spec.size) {
            tracing::warn!(
                "Ignoring size {} for {:?} in slot {}, spans run 1 to {}",
                size,
                spec.kind,
                ctx.slot,
                MAX_SPAN
            );
        }
        let dashlet: Box<dyn Dashlet> = match spec.kind {
            DashletKind::FlowCount => Box::new(FlowCountDashlet::new(ctx, span)),
            DashletKind::Throughput => Box::new(ThroughputDashlet::new(ctx, span)),
            DashletKind::ThroughputGraph => Box::new(ThroughputGraphDashlet::new(ctx, span)),
            DashletKind::RttHisto => Box::new(RttHistoDashlet::new(ctx, span)),
            DashletKind::NetworkTree => Box::new(NetworkTreeDashlet::new(ctx, span)),
            DashletKind::Top10Downloaders => Box::new(TopDownloadersDashlet::new(ctx, span)),
        };
        Ok(dashlet)
    }
}

/// Capacity marker: a coloured dot, or a grey ring when there is nothing
/// to measure against.
pub(crate) fn marker(band: Option<CapacityBand>) -> Element {
    match band {
        Some(band) => Element::new("span")
            .class("capacity-marker")
            .attr("data-band", band.color())
            .attr("style", format!("color: {}", band.color()))
            .text("⬤"),
        None => Element::new("span")
            .class("capacity-marker")
            .attr("data-band", "none")
            .attr("style", "color: darkgray")
            .text("○"),
    }
}

pub(crate) fn table(headings: &[&str], rows: Vec<Element>) -> Element {
    let mut head = Element::new("thead");
    for heading in headings {
        head = head.child(Element::new("th").text(*heading));
    }
    let mut body = Element::new("tbody");
    body.children = rows;
    Element::new("table")
        .class("table")
        .class("table-striped")
        .class("table-sm")
        .class("table-tiny")
        .child(head)
        .child(body)
}

pub(crate) fn cell(text: impl Into<String>) -> Element {
    Element::new("td").text(text)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::application::dashlet::{Dashlet, DashletContext, SetupTrigger};
    use crate::application::router::Requester;
    use crate::application::testing::RecordingSink;
    use crate::domain::document::Element;
    use crate::domain::theme::Theme;
    use crate::infrastructure::chart_engine::MemoryChartEngine;
    use std::sync::Arc;

    pub struct Harness {
        pub ctx: DashletContext,
        pub sink: RecordingSink,
        pub charts: MemoryChartEngine,
    }

    pub fn harness(slot: usize) -> Harness {
        let sink = RecordingSink::default();
        let charts = MemoryChartEngine::new();
        let ctx = DashletContext {
            slot,
            requester: Requester::new(Arc::new(sink.clone())),
            charts: Arc::new(charts.clone()),
            theme: Theme::Light,
        };
        Harness { ctx, sink, charts }
    }

    /// Build the container and run setup as the registry would.
    pub fn mount(dashlet: &mut dyn Dashlet) -> Element {
        let mut container = dashlet.build_container();
        dashlet
            .setup(SetupTrigger::Tick, &mut container)
            .expect("setup");
        container
    }
}

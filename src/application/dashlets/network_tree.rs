use super::{cell, marker, table};
use crate::application::dashlet::{Dashlet, DashletContext, DashletError};
use crate::domain::capacity::{mean, rtt_display, scale_number, Capacity};
use crate::domain::document::Element;
use crate::domain::event::{Event, EventKind, NetworkTreeEntry};

const SUBSCRIPTIONS: [EventKind; 1] = [EventKind::NetworkTreeSummary];

/// Catch-all node the collector uses for unattached traffic. It has no
/// meaningful capacity.
const OTHERS: &str = "Others";

/// Top-level sites with their throughput against capacity.
pub struct NetworkTreeDashlet {
    ctx: DashletContext,
    size: u8,
}

impl NetworkTreeDashlet {
    pub fn new(ctx: DashletContext, size: Option<u8>) -> Self {
        Self {
            ctx,
            size: size.unwrap_or(6),
        }
    }

    fn table_id(&self) -> String {
        self.ctx.element_id("tree")
    }
}

fn row(entry: &NetworkTreeEntry) -> Element {
    let mut tr = Element::new("tr").child(cell(&entry.name));

    let capacity = if entry.name == OTHERS {
        None
    } else {
        Capacity::new(entry.current_throughput, entry.max_throughput)
    };
    let down = scale_number(entry.current_throughput[0] as f64 * 8.0, 1);
    let up = scale_number(entry.current_throughput[1] as f64 * 8.0, 1);
    tr = tr.child(
        Element::new("td")
            .child(marker(capacity.map(|c| c.band())))
            .child(Element::new("span").text(format!(" {} / {}", down, up))),
    );
    tr = match capacity {
        Some(c) => tr.child(cell(format!("{:.0}% / {:.0}%", c.down * 100.0, c.up * 100.0))),
        None => tr.child(cell("-")),
    };

    match mean(&entry.rtts) {
        Some(rtt) => {
            let (label, color) = rtt_display(rtt);
            tr.child(Element::new("td").child(
                Element::new("span")
                    .attr("style", format!("color: {}", color))
                    .text(label),
            ))
        }
        None => tr.child(cell("-")),
    }
}

impl Dashlet for NetworkTreeDashlet {
    fn slot(&self) -> usize {
        self.ctx.slot
    }

    fn size(&self) -> u8 {
        self.size
    }

    fn title(&self) -> &str {
        "Network Tree"
    }

    fn subscribe_to(&self) -> &[EventKind] {
        &SUBSCRIPTIONS
    }

    fn body(&self) -> Vec<Element> {
        vec![Element::new("div").with_id(self.table_id())]
    }

    fn on_message(&mut self, event: &Event, container: &mut Element) -> Result<(), DashletError> {
        let Event::NetworkTreeSummary { entries } = event else {
            return Ok(());
        };
        let id = self.table_id();
        let target = container
            .find_mut(&id)
            .ok_or(DashletError::MissingElement(id))?;
        let rows = entries.iter().map(|(_, entry)| row(entry)).collect();
        target.replace_children(vec![table(&["Site", "Throughput", "Capacity", "RTT"], rows)]);
        Ok(())
    }

    fn on_tick(&mut self, _container: &mut Element) -> Result<(), DashletError> {
        self.ctx.requester.request_network_tree_summary();
        Ok(())
    }
}

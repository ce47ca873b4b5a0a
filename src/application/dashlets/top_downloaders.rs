use super::{cell, marker, table};
use crate::application::dashlet::{Dashlet, DashletContext, DashletError};
use crate::domain::capacity::{rtt_display, scale_number, Plan};
use crate::domain::document::Element;
use crate::domain::event::{Event, EventKind, IpStatsWithPlan};

const SUBSCRIPTIONS: [EventKind; 1] = [EventKind::Top10Downloaders];

/// The ten busiest circuits, coloured against their plan when one is set.
pub struct TopDownloadersDashlet {
    ctx: DashletContext,
    size: u8,
}

impl TopDownloadersDashlet {
    pub fn new(ctx: DashletContext, size: Option<u8>) -> Self {
        Self {
            ctx,
            size: size.unwrap_or(6),
        }
    }

    fn table_id(&self) -> String {
        self.ctx.element_id("top10")
    }
}

fn row(stats: &IpStatsWithPlan) -> Element {
    let plan = Plan::from_slice(&stats.plan);
    let band = plan
        .and_then(|p| p.capacity(stats.bits_per_second))
        .map(|c| c.band());
    let throughput = format!(
        " {} / {}",
        scale_number(stats.bits_per_second[0] as f64, 1),
        scale_number(stats.bits_per_second[1] as f64, 1)
    );
    let (rtt, rtt_color) = rtt_display(stats.median_tcp_rtt as f64);

    Element::new("tr")
        .child(cell(&stats.ip_address))
        .child(
            Element::new("td")
                .child(marker(band))
                .child(Element::new("span").text(throughput)),
        )
        .child(Element::new("td").child(
            Element::new("span")
                .attr("style", format!("color: {}", rtt_color))
                .text(rtt),
        ))
        .child(cell(format!(
            "{} / {}",
            stats.tcp_retransmits[0], stats.tcp_retransmits[1]
        )))
        .child(match plan {
            Some(p) => cell(format!("{} / {}", p.down, p.up)),
            None => cell("-"),
        })
}

impl Dashlet for TopDownloadersDashlet {
    fn slot(&self) -> usize {
        self.ctx.slot
    }

    fn size(&self) -> u8 {
        self.size
    }

    fn title(&self) -> &str {
        "Top 10 Downloaders"
    }

    fn subscribe_to(&self) -> &[EventKind] {
        &SUBSCRIPTIONS
    }

    fn body(&self) -> Vec<Element> {
        vec![Element::new("div").with_id(self.table_id())]
    }

    fn on_message(&mut self, event: &Event, container: &mut Element) -> Result<(), DashletError> {
        let Event::Top10Downloaders { entries } = event else {
            return Ok(());
        };
        let id = self.table_id();
        let target = container
            .find_mut(&id)
            .ok_or(DashletError::MissingElement(id))?;
        let rows = entries.iter().map(row).collect();
        target.replace_children(vec![table(
            &["Circuit", "Throughput", "RTT", "TCP Re-xmit", "Plan"],
            rows,
        )]);
        Ok(())
    }

    fn on_tick(&mut self, _container: &mut Element) -> Result<(), DashletError> {
        self.ctx.requester.request_top10_downloaders();
        Ok(())
    }
}

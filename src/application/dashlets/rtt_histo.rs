use crate::application::chart::Chart;
use crate::application::dashlet::{Dashlet, DashletContext, DashletError, SetupTrigger};
use crate::domain::chart::{ChartKind, SeriesData, TimeSeriesPoint};
use crate::domain::document::Element;
use crate::domain::event::{Event, EventKind};

const SUBSCRIPTIONS: [EventKind; 1] = [EventKind::RttHisto];

/// Width of one histogram bucket.
const BUCKET_MS: i64 = 10;

pub struct RttHistoDashlet {
    ctx: DashletContext,
    size: u8,
    chart: Option<Box<dyn Chart>>,
}

impl RttHistoDashlet {
    pub fn new(ctx: DashletContext, size: Option<u8>) -> Self {
        Self {
            ctx,
            size: size.unwrap_or(6),
            chart: None,
        }
    }
}

impl Dashlet for RttHistoDashlet {
    fn slot(&self) -> usize {
        self.ctx.slot
    }

    fn size(&self) -> u8 {
        self.size
    }

    fn title(&self) -> &str {
        "TCP Round-Trip Time Histogram"
    }

    fn subscribe_to(&self) -> &[EventKind] {
        &SUBSCRIPTIONS
    }

    fn body(&self) -> Vec<Element> {
        vec![self.ctx.graph_div()]
    }

    fn setup(&mut self, _trigger: SetupTrigger<'_>, container: &mut Element) -> Result<(), DashletError> {
        let chart = self
            .ctx
            .charts
            .attach(&self.ctx.graph_id(), container, ChartKind::Bar, self.ctx.theme)?;
        if let Some(old) = self.chart.replace(chart) {
            old.dispose();
        }
        Ok(())
    }

    fn on_message(&mut self, event: &Event, container: &mut Element) -> Result<(), DashletError> {
        let Event::RttHisto { entries } = event else {
            return Ok(());
        };
        // Nothing to draw into until setup has attached a chart.
        let Some(chart) = self.chart.as_mut() else {
            return Ok(());
        };
        let points = entries
            .iter()
            .enumerate()
            .map(|(i, n)| TimeSeriesPoint::new(i as i64 * BUCKET_MS, *n as f64))
            .collect();
        chart.set_series(vec![SeriesData::new("RTT", None, points)]);
        chart.render(container)?;
        Ok(())
    }

    fn on_tick(&mut self, _container: &mut Element) -> Result<(), DashletError> {
        self.ctx.requester.request_rtt_histo();
        Ok(())
    }

    fn dispose(&mut self) {
        if let Some(chart) = self.chart.take() {
            chart.dispose();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashlets::fixtures::{harness, mount};

    #[test]
    fn test_histogram_renders_bars() {
        let h = harness(3);
        let mut dashlet = RttHistoDashlet::new(h.ctx.clone(), None);
        let mut container = mount(&mut dashlet);
        let event = Event::RttHisto {
            entries: vec![0, 4, 9, 2],
        };
        dashlet.on_message(&event, &mut container).unwrap();

        let svg = &container.find("dash_3_graph").unwrap().children[0];
        let bars = svg.children.iter().filter(|c| c.tag == "rect").count();
        assert_eq!(bars, 4);
    }

    #[test]
    fn test_message_before_setup_is_ignored() {
        let h = harness(3);
        let mut dashlet = RttHistoDashlet::new(h.ctx.clone(), None);
        let mut container = dashlet.build_container();
        let event = Event::RttHisto { entries: vec![1] };
        dashlet.on_message(&event, &mut container).unwrap();
        assert!(container.find("dash_3_graph").unwrap().children.is_empty());
    }
}

use crate::application::chart::Chart;
use crate::application::dashlet::{Dashlet, DashletContext, DashletError, SetupTrigger};
use crate::domain::chart::{ChartKind, SeriesData, TimeSeriesPoint};
use crate::domain::document::Element;
use crate::domain::event::{Event, EventKind, ThroughputEntry};
use chrono::Utc;
use std::collections::VecDeque;

const SUBSCRIPTIONS: [EventKind; 2] = [EventKind::Throughput, EventKind::ThroughputFull];

/// Samples kept for the graph, one per collector second.
pub const HISTORY_LEN: usize = 300;
const SAMPLE_SPACING_MS: i64 = 1000;

/// Rolling bits-per-second graph. A full-history event replaces whatever
/// has been collected so far.
pub struct ThroughputGraphDashlet {
    ctx: DashletContext,
    size: u8,
    chart: Option<Box<dyn Chart>>,
    history: VecDeque<(i64, ThroughputEntry)>,
}

impl ThroughputGraphDashlet {
    pub fn new(ctx: DashletContext, size: Option<u8>) -> Self {
        Self {
            ctx,
            size: size.unwrap_or(6),
            chart: None,
            history: VecDeque::with_capacity(HISTORY_LEN),
        }
    }

    fn push(&mut self, time_ms: i64, entry: ThroughputEntry) {
        if self.history.len() == HISTORY_LEN {
            self.history.pop_front();
        }
        self.history.push_back((time_ms, entry));
    }

    /// Backfilled samples carry no timestamps; space them a second apart
    /// ending now.
    fn replace(&mut self, entries: &[ThroughputEntry]) {
        self.history.clear();
        let now = Utc::now().timestamp_millis();
        let skip = entries.len().saturating_sub(HISTORY_LEN);
        let kept = &entries[skip..];
        for (i, entry) in kept.iter().enumerate() {
            let age = (kept.len() - 1 - i) as i64;
            self.push(now - age * SAMPLE_SPACING_MS, entry.clone());
        }
    }

    fn series(&self) -> Vec<SeriesData> {
        let side = |idx: usize| -> Vec<TimeSeriesPoint> {
            self.history
                .iter()
                .map(|(t, e)| TimeSeriesPoint::new(*t, e.bps[idx] as f64))
                .collect()
        };
        vec![
            SeriesData::new("Download", Some("#4992ff"), side(0)),
            SeriesData::new("Upload", Some("#7cffb2"), side(1)),
        ]
    }

    fn redraw(&mut self, container: &mut Element) -> Result<(), DashletError> {
        let series = self.series();
        let Some(chart) = self.chart.as_mut() else {
            return Ok(());
        };
        chart.set_series(series);
        chart.render(container)?;
        Ok(())
    }
}

impl Dashlet for ThroughputGraphDashlet {
    fn slot(&self) -> usize {
        self.ctx.slot
    }

    fn size(&self) -> u8 {
        self.size
    }

    fn title(&self) -> &str {
        "Throughput (bits/s)"
    }

    fn subscribe_to(&self) -> &[EventKind] {
        &SUBSCRIPTIONS
    }

    fn body(&self) -> Vec<Element> {
        vec![self.ctx.graph_div()]
    }

    fn setup(&mut self, trigger: SetupTrigger<'_>, container: &mut Element) -> Result<(), DashletError> {
        let chart = self
            .ctx
            .charts
            .attach(&self.ctx.graph_id(), container, ChartKind::Line, self.ctx.theme)?;
        if let Some(old) = self.chart.replace(chart) {
            old.dispose();
        }
        // Live samples came first, so the backfill is missing.
        if matches!(trigger, SetupTrigger::Event(Event::Throughput { .. })) {
            self.ctx.requester.request_full_throughput();
        }
        Ok(())
    }

    fn on_message(&mut self, event: &Event, container: &mut Element) -> Result<(), DashletError> {
        match event {
            Event::Throughput { pps, bps } => {
                let entry = ThroughputEntry { bps: *bps, pps: *pps };
                self.push(Utc::now().timestamp_millis(), entry);
            }
            Event::ThroughputFull { entries } => self.replace(entries),
            _ => return Ok(()),
        }
        self.redraw(container)
    }

    fn on_tick(&mut self, _container: &mut Element) -> Result<(), DashletError> {
        self.ctx.requester.request_throughput();
        Ok(())
    }

    fn dispose(&mut self) {
        if let Some(chart) = self.chart.take() {
            chart.dispose();
        }
    }
}

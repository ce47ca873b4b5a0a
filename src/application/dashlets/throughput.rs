use crate::application::dashlet::{Dashlet, DashletContext, DashletError};
use crate::domain::capacity::scale_number;
use crate::domain::document::Element;
use crate::domain::event::{Event, EventKind};

const SUBSCRIPTIONS: [EventKind; 1] = [EventKind::Throughput];

/// Current packets and bits per second, down / up.
pub struct ThroughputDashlet {
    ctx: DashletContext,
    size: u8,
}

impl ThroughputDashlet {
    pub fn new(ctx: DashletContext, size: Option<u8>) -> Self {
        Self {
            ctx,
            size: size.unwrap_or(4),
        }
    }

    fn set(&self, container: &mut Element, name: &str, pair: [u64; 2]) -> Result<(), DashletError> {
        let id = self.ctx.element_id(name);
        let target = container
            .find_mut(&id)
            .ok_or(DashletError::MissingElement(id))?;
        target.set_text(format!(
            "{} / {}",
            scale_number(pair[0] as f64, 0),
            scale_number(pair[1] as f64, 0)
        ));
        Ok(())
    }

    fn row(&self, label: &str, name: &str) -> Element {
        Element::new("div")
            .class("dashlet-row")
            .child(Element::new("span").class("dashlet-label").text(label))
            .child(Element::new("span").with_id(self.ctx.element_id(name)).text("-"))
    }
}

impl Dashlet for ThroughputDashlet {
    fn slot(&self) -> usize {
        self.ctx.slot
    }

    fn size(&self) -> u8 {
        self.size
    }

    fn title(&self) -> &str {
        "Throughput"
    }

    fn subscribe_to(&self) -> &[EventKind] {
        &SUBSCRIPTIONS
    }

    fn body(&self) -> Vec<Element> {
        vec![self.row("Packets/s", "pps"), self.row("Bits/s", "bps")]
    }

    fn on_message(&mut self, event: &Event, container: &mut Element) -> Result<(), DashletError> {
        if let Event::Throughput { pps, bps } = event {
            self.set(container, "pps", *pps)?;
            self.set(container, "bps", *bps)?;
        }
        Ok(())
    }

    fn on_tick(&mut self, _container: &mut Element) -> Result<(), DashletError> {
        self.ctx.requester.request_throughput();
        Ok(())
    }
}

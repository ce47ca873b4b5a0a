use crate::application::dashlet::{Dashlet, DashletContext, DashletError};
use crate::domain::document::Element;
use crate::domain::event::{Event, EventKind};

const SUBSCRIPTIONS: [EventKind; 1] = [EventKind::FlowCount];

/// Number of flows the daemon is currently tracking.
pub struct FlowCountDashlet {
    ctx: DashletContext,
    size: u8,
}

impl FlowCountDashlet {
    pub fn new(ctx: DashletContext, size: Option<u8>) -> Self {
        Self {
            ctx,
            size: size.unwrap_or(2),
        }
    }

    fn counter_id(&self) -> String {
        self.ctx.element_id("flows")
    }
}

impl Dashlet for FlowCountDashlet {
    fn slot(&self) -> usize {
        self.ctx.slot
    }

    fn size(&self) -> u8 {
        self.size
    }

    fn title(&self) -> &str {
        "Tracked Flows"
    }

    fn subscribe_to(&self) -> &[EventKind] {
        &SUBSCRIPTIONS
    }

    fn body(&self) -> Vec<Element> {
        vec![Element::new("h4")
            .with_id(self.counter_id())
            .class("dashlet-value")
            .text("-")]
    }

    fn on_message(&mut self, event: &Event, container: &mut Element) -> Result<(), DashletError> {
        let Event::FlowCount { count } = event else {
            return Ok(());
        };
        let id = self.counter_id();
        let target = container
            .find_mut(&id)
            .ok_or(DashletError::MissingElement(id))?;
        target.set_text(count.to_string());
        Ok(())
    }

    fn on_tick(&mut self, _container: &mut Element) -> Result<(), DashletError> {
        self.ctx.requester.request_flow_count();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashlets::fixtures::{harness, mount};
    use crate::domain::event::Request;

    #[test]
    fn test_counter_updates() {
        let h = harness(0);
        let mut dashlet = FlowCountDashlet::new(h.ctx.clone(), None);
        let mut container = mount(&mut dashlet);

        dashlet
            .on_message(&Event::FlowCount { count: 1234 }, &mut container)
            .unwrap();
        assert_eq!(container.find("dash_0_flows").unwrap().text.as_deref(), Some("1234"));
    }

    #[test]
    fn test_missing_counter_is_an_error() {
        let h = harness(0);
        let mut dashlet = FlowCountDashlet::new(h.ctx.clone(), None);
        let mut container = Element::new("div").with_id("dash_0");
        let result = dashlet.on_message(&Event::FlowCount { count: 1 }, &mut container);
        assert!(matches!(result, Err(DashletError::MissingElement(_))));
    }

    #[test]
    fn test_tick_requests_flow_count() {
        let h = harness(0);
        let mut dashlet = FlowCountDashlet::new(h.ctx.clone(), None);
        let mut container = mount(&mut dashlet);
        dashlet.on_tick(&mut container).unwrap();
        assert_eq!(h.sink.requests(), vec![Request::FlowCount]);
    }
}

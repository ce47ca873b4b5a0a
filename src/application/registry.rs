// Dashlet registry - a composed page and its event fan-out
use crate::application::chart::ChartFactory;
use crate::application::dashlet::{DashletContext, DashletFactory, DashletSlot};
use crate::application::router::EventRouter;
use crate::domain::document::Document;
use crate::domain::event::{Event, EventKind, Request};
use crate::domain::layout::DashletSpec;
use crate::domain::theme::Theme;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Factories a page is composed from.
#[derive(Clone)]
pub struct Toolkit {
    pub dashlets: Arc<dyn DashletFactory>,
    pub charts: Arc<dyn ChartFactory>,
}

pub struct Page {
    anchor: String,
    slots: Vec<DashletSlot>,
}

impl Page {
    /// Instantiate, build and attach every dashlet, then register their
    /// subscriptions. A dashlet that cannot be built leaves its slot empty;
    /// the others keep their positional slot numbers.
    pub fn compose(
        anchor: &str,
        specs: &[DashletSpec],
        toolkit: &Toolkit,
        theme: Theme,
        router: &mut EventRouter,
        document: &mut Document,
    ) -> Page {
        let mut slots = Vec::with_capacity(specs.len());
        for (slot, spec) in specs.iter().enumerate() {
            let ctx = DashletContext {
                slot,
                requester: router.requester(),
                charts: toolkit.charts.clone(),
                theme,
            };
            match toolkit.dashlets.create(spec, ctx) {
                Ok(dashlet) => slots.push(DashletSlot::new(dashlet)),
                Err(e) => tracing::warn!("Skipping slot {} ({:?}) on {}: {}", slot, spec.kind, anchor, e),
            }
        }

        let containers: Vec<_> = slots.iter().map(|s| s.build_container()).collect();
        for (slot, container) in slots.iter_mut().zip(containers) {
            let attached = document.append(container);
            if !attached {
                tracing::warn!("Container {} could not be attached", slot.container_id());
            }
            slot.mark_attached(attached);
        }

        for slot in &slots {
            router.subscribe(slot.slot(), slot.subscriptions());
        }

        tracing::debug!("Composed page {} with {} dashlets", anchor, slots.len());
        Page {
            anchor: anchor.to_string(),
            slots,
        }
    }

    pub fn anchor(&self) -> &str {
        &self.anchor
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Deliver `event` to its subscribers in slot order. Returns how many
    /// dashlets handled it.
    pub fn dispatch(&mut self, event: &Event, router: &EventRouter, document: &mut Document) -> usize {
        let mut delivered = 0;
        for slot_no in router.subscribers(event.kind()) {
            let Some(slot) = self.slots.iter_mut().find(|s| s.slot() == slot_no) else {
                continue;
            };
            let Some(container) = document.container_mut(slot.container_id()) else {
                tracing::debug!("No container for {}, skipping {}", slot.container_id(), event.kind());
                continue;
            };
            match slot.deliver(event, container) {
                Ok(()) => delivered += 1,
                Err(e) => tracing::warn!(
                    "Dashlet {} failed on {}: {}",
                    slot.container_id(),
                    event.kind(),
                    e
                ),
            }
        }
        delivered
    }

    /// Run the periodic hook on every dashlet that is ready for it.
    pub fn tick(&mut self, document: &mut Document) -> usize {
        let mut ticked = 0;
        for slot in &mut self.slots {
            let Some(container) = document.container_mut(slot.container_id()) else {
                tracing::debug!("No container for {}, skipping tick", slot.container_id());
                continue;
            };
            match slot.tick(container) {
                Ok(true) => ticked += 1,
                Ok(false) => {}
                Err(e) => tracing::warn!("Dashlet {} failed on tick: {}", slot.container_id(), e),
            }
        }
        ticked
    }

    /// Requests covering every subscribed kind, one per kind. With
    /// `initial` unset, backfill-only kinds are left out.
    pub fn data_requests(&self, initial: bool) -> Vec<Request> {
        requests_for(self.slots.iter(), initial)
    }

    /// Tick requests on behalf of attached dashlets still waiting for the
    /// event that sets them up. Their own tick hook does not run yet, so a
    /// lost initial request is repeated from here until data arrives.
    pub fn pending_requests(&self) -> Vec<Request> {
        requests_for(
            self.slots.iter().filter(|s| s.is_attached() && !s.is_setup()),
            false,
        )
    }

    /// Dispose every dashlet in slot order and detach its container.
    /// Consumes the page, so nothing can be dispatched to it afterwards.
    pub fn teardown(mut self, router: &mut EventRouter, document: &mut Document) -> usize {
        let mut disposed = 0;
        for slot in &mut self.slots {
            if slot.dispose() {
                disposed += 1;
            }
            document.remove(slot.container_id());
        }
        router.clear();
        tracing::debug!("Tore down page {} ({} dashlets)", self.anchor, disposed);
        disposed
    }
}

fn requests_for<'a>(slots: impl Iterator<Item = &'a DashletSlot>, initial: bool) -> Vec<Request> {
    let kinds: BTreeSet<EventKind> = slots
        .flat_map(|s| s.subscriptions().iter().copied())
        .filter(|k| initial || k.refresh_on_tick())
        .collect();
    kinds.into_iter().map(|k| k.request()).collect()
}

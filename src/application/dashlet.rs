// Dashlet contract - one self-contained panel on a page
use crate::application::chart::{ChartError, ChartFactory};
use crate::application::router::Requester;
use crate::domain::document::Element;
use crate::domain::event::{Event, EventKind};
use crate::domain::layout::{size_classes, DashletSpec};
use crate::domain::theme::Theme;
use std::sync::Arc;

pub const DEFAULT_SIZE: u8 = 3;

#[derive(Debug, thiserror::Error)]
pub enum DashletError {
    #[error(transparent)]
    Chart(#[from] ChartError),

    #[error("element #{0} is missing from the dashlet container")]
    MissingElement(String),

    #[error("container for slot {0} is not attached")]
    NotAttached(usize),
}

/// What caused a dashlet's one-time setup.
#[derive(Debug, Clone, Copy)]
pub enum SetupTrigger<'a> {
    Event(&'a Event),
    Tick,
}

/// Everything a dashlet is handed at construction.
#[derive(Clone)]
pub struct DashletContext {
    pub slot: usize,
    pub requester: Requester,
    pub charts: Arc<dyn ChartFactory>,
    pub theme: Theme,
}

impl DashletContext {
    pub fn dashlet_id(&self) -> String {
        dashlet_id(self.slot)
    }

    /// Id of the child element a chart attaches to.
    pub fn graph_id(&self) -> String {
        format!("{}_graph", self.dashlet_id())
    }

    /// Id for a named child element of this dashlet.
    pub fn element_id(&self, name: &str) -> String {
        format!("{}_{}", self.dashlet_id(), name)
    }

    pub fn graph_div(&self) -> Element {
        Element::new("div").with_id(self.graph_id()).class("dashgraph")
    }
}

pub fn dashlet_id(slot: usize) -> String {
    format!("dash_{}", slot)
}

pub trait Dashlet: Send {
    fn slot(&self) -> usize;

    /// Column span, 1 to 12.
    fn size(&self) -> u8 {
        DEFAULT_SIZE
    }

    fn title(&self) -> &str;

    /// Event kinds this dashlet wants. Empty means tick-driven only.
    fn subscribe_to(&self) -> &[EventKind] {
        &[]
    }

    /// Elements placed under the title when the container is built.
    fn body(&self) -> Vec<Element> {
        Vec::new()
    }

    /// A new, detached container for this dashlet.
    fn build_container(&self) -> Element {
        let mut div = Element::new("div").with_id(dashlet_id(self.slot()));
        for class in size_classes(self.size()) {
            div = div.class(class);
        }
        let mut div = div
            .class("dashbox")
            .child(Element::new("h5").class("dashbox-title").text(self.title()));
        div.children.extend(self.body());
        div
    }

    /// One-time resource acquisition, run against the attached container.
    fn setup(
        &mut self,
        _trigger: SetupTrigger<'_>,
        _container: &mut Element,
    ) -> Result<(), DashletError> {
        Ok(())
    }

    fn on_message(&mut self, event: &Event, container: &mut Element) -> Result<(), DashletError>;

    fn on_tick(&mut self, _container: &mut Element) -> Result<(), DashletError> {
        Ok(())
    }

    /// Release owned rendering resources. Safe to call without setup.
    fn dispose(&mut self) {}
}

/// Builds dashlets for page layouts.
pub trait DashletFactory: Send + Sync {
    fn create(
        &self,
        spec: &DashletSpec,
        ctx: DashletContext,
    ) -> Result<Box<dyn Dashlet>, DashletError>;
}

/// A composed dashlet and the lifecycle flags the registry keeps for it.
pub struct DashletSlot {
    slot: usize,
    container_id: String,
    subscriptions: Vec<EventKind>,
    dashlet: Box<dyn Dashlet>,
    attached: bool,
    setup_done: bool,
    disposed: bool,
}

impl DashletSlot {
    pub fn new(dashlet: Box<dyn Dashlet>) -> Self {
        let slot = dashlet.slot();
        let subscriptions = dashlet.subscribe_to().to_vec();
        Self {
            slot,
            container_id: dashlet_id(slot),
            subscriptions,
            dashlet,
            attached: false,
            setup_done: false,
            disposed: false,
        }
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    pub fn subscriptions(&self) -> &[EventKind] {
        &self.subscriptions
    }

    pub fn build_container(&self) -> Element {
        self.dashlet.build_container()
    }

    pub fn mark_attached(&mut self, attached: bool) {
        self.attached = attached;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn is_setup(&self) -> bool {
        self.setup_done
    }

    /// Run setup if it has not completed yet. Returns whether setup ran.
    /// A failed setup leaves the flag clear so the next trigger retries.
    pub fn setup_once(
        &mut self,
        trigger: SetupTrigger<'_>,
        container: &mut Element,
    ) -> Result<bool, DashletError> {
        if self.setup_done || self.disposed {
            return Ok(false);
        }
        if !self.attached {
            return Err(DashletError::NotAttached(self.slot));
        }
        self.dashlet.setup(trigger, container)?;
        self.setup_done = true;
        Ok(true)
    }

    pub fn deliver(&mut self, event: &Event, container: &mut Element) -> Result<(), DashletError> {
        if self.disposed {
            return Ok(());
        }
        self.setup_once(SetupTrigger::Event(event), container)?;
        self.dashlet.on_message(event, container)
    }

    /// Tick the dashlet. Returns false when it was skipped because setup
    /// is still waiting on its first event.
    pub fn tick(&mut self, container: &mut Element) -> Result<bool, DashletError> {
        if self.disposed {
            return Ok(false);
        }
        if !self.setup_done {
            if !self.subscriptions.is_empty() {
                return Ok(false);
            }
            self.setup_once(SetupTrigger::Tick, container)?;
        }
        self.dashlet.on_tick(container)?;
        Ok(true)
    }

    /// Dispose once. Returns whether this call did the disposal.
    pub fn dispose(&mut self) -> bool {
        if self.disposed {
            return false;
        }
        self.dashlet.dispose();
        self.disposed = true;
        true
    }
}

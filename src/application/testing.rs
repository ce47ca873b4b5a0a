// Recording test doubles shared by the application tests
use crate::application::dashlet::{
    Dashlet, DashletContext, DashletError, DashletFactory, SetupTrigger,
};
use crate::application::router::{RequestSink, SendError};
use crate::domain::document::Element;
use crate::domain::event::{Event, EventKind, Request};
use crate::domain::layout::DashletSpec;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Setup(usize),
    Message(usize, EventKind),
    Tick(usize),
    Dispose(usize),
}

/// Shared, ordered log of dashlet calls.
#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<Call>>>);

impl Journal {
    pub fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, f: impl Fn(&Call) -> bool) -> usize {
        self.0.lock().unwrap().iter().filter(|c| f(c)).count()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

pub struct RecordingDashlet {
    slot: usize,
    title: String,
    subscriptions: Vec<EventKind>,
    journal: Journal,
    fail_messages: bool,
}

impl RecordingDashlet {
    pub fn new(slot: usize, subscriptions: &[EventKind], journal: Journal) -> Self {
        Self {
            slot,
            title: format!("Recording {}", slot),
            subscriptions: subscriptions.to_vec(),
            journal,
            fail_messages: false,
        }
    }

    pub fn failing(mut self) -> Self {
        self.fail_messages = true;
        self
    }
}

impl Dashlet for RecordingDashlet {
    fn slot(&self) -> usize {
        self.slot
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn subscribe_to(&self) -> &[EventKind] {
        &self.subscriptions
    }

    fn setup(&mut self, _trigger: SetupTrigger<'_>, _container: &mut Element) -> Result<(), DashletError> {
        self.journal.push(Call::Setup(self.slot));
        Ok(())
    }

    fn on_message(&mut self, event: &Event, _container: &mut Element) -> Result<(), DashletError> {
        self.journal.push(Call::Message(self.slot, event.kind()));
        if self.fail_messages {
            return Err(DashletError::MissingElement(format!("dash_{}_body", self.slot)));
        }
        Ok(())
    }

    fn on_tick(&mut self, _container: &mut Element) -> Result<(), DashletError> {
        self.journal.push(Call::Tick(self.slot));
        Ok(())
    }

    fn dispose(&mut self) {
        self.journal.push(Call::Dispose(self.slot));
    }
}

/// Builds recording dashlets, one per slot, with per-slot subscriptions.
#[derive(Default)]
pub struct RecordingFactory {
    pub journal: Journal,
    subscriptions: HashMap<usize, Vec<EventKind>>,
    failing: BTreeSet<usize>,
    broken: BTreeSet<usize>,
}

impl RecordingFactory {
    pub fn with_subscriptions(mut self, slot: usize, kinds: &[EventKind]) -> Self {
        self.subscriptions.insert(slot, kinds.to_vec());
        self
    }

    /// The dashlet at `slot` errors on every message.
    pub fn with_failing(mut self, slot: usize) -> Self {
        self.failing.insert(slot);
        self
    }

    /// The dashlet at `slot` cannot be built at all.
    pub fn with_broken(mut self, slot: usize) -> Self {
        self.broken.insert(slot);
        self
    }
}

impl DashletFactory for RecordingFactory {
    fn create(&self, _spec: &DashletSpec, ctx: DashletContext) -> Result<Box<dyn Dashlet>, DashletError> {
        if self.broken.contains(&ctx.slot) {
            return Err(DashletError::MissingElement(format!("dash_{}", ctx.slot)));
        }
        let subs = self.subscriptions.get(&ctx.slot).cloned().unwrap_or_default();
        let dashlet = RecordingDashlet::new(ctx.slot, &subs, self.journal.clone());
        if self.failing.contains(&ctx.slot) {
            Ok(Box::new(dashlet.failing()))
        } else {
            Ok(Box::new(dashlet))
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    requests: Arc<Mutex<Vec<Request>>>,
    fail: bool,
}

impl RecordingSink {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.requests.lock().unwrap().clear();
    }
}

impl RequestSink for RecordingSink {
    fn send(&self, request: Request) -> Result<(), SendError> {
        if self.fail {
            return Err(SendError::NoListeners);
        }
        self.requests.lock().unwrap().push(request);
        Ok(())
    }
}

// Lifecycle manager - mounts, rebuilds and disposes pages
use crate::application::preferences::PreferenceStore;
use crate::application::registry::{Page, Toolkit};
use crate::application::router::{EventRouter, RequestSink};
use crate::domain::document::Document;
use crate::domain::event::Event;
use crate::domain::layout::{Breakpoint, PageDefinition};
use crate::domain::theme::{Theme, THEME_KEY};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("no page is registered for anchor '{0}'")]
    UnknownAnchor(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    Unmounted,
    Mounted,
    Disposing,
}

impl PageState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageState::Unmounted => "unmounted",
            PageState::Mounted => "mounted",
            PageState::Disposing => "disposing",
        }
    }
}

pub struct LifecycleManager {
    pages: Vec<PageDefinition>,
    toolkit: Toolkit,
    router: EventRouter,
    document: Document,
    preferences: Box<dyn PreferenceStore>,
    theme: Theme,
    breakpoint: Option<Breakpoint>,
    state: PageState,
    current: Option<Page>,
    generation: u64,
}

impl LifecycleManager {
    pub fn new(
        pages: Vec<PageDefinition>,
        toolkit: Toolkit,
        sink: Arc<dyn RequestSink>,
        preferences: Box<dyn PreferenceStore>,
    ) -> Self {
        let theme = Theme::parse(preferences.get(THEME_KEY).as_deref());
        Self {
            pages,
            toolkit,
            router: EventRouter::new(sink),
            document: Document::new(),
            preferences,
            theme,
            breakpoint: None,
            state: PageState::Unmounted,
            current: None,
            generation: 0,
        }
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Number of compositions so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn current_anchor(&self) -> Option<&str> {
        self.current.as_ref().map(|p| p.anchor())
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Show the page registered under `anchor`. Navigating to the page
    /// that is already mounted only asks for fresh data.
    pub fn navigate(&mut self, anchor: &str) -> Result<(), LifecycleError> {
        let index = self
            .pages
            .iter()
            .position(|p| p.anchor == anchor)
            .ok_or_else(|| LifecycleError::UnknownAnchor(anchor.to_string()))?;

        if self.state == PageState::Mounted && self.current_anchor() == Some(anchor) {
            tracing::debug!("Page {} already mounted, refreshing data", anchor);
            self.request_data(false);
            return Ok(());
        }

        self.dispose_current();
        self.mount(index);
        Ok(())
    }

    fn mount(&mut self, index: usize) {
        let def = &self.pages[index];
        let page = Page::compose(
            &def.anchor,
            &def.dashlets,
            &self.toolkit,
            self.theme,
            &mut self.router,
            &mut self.document,
        );
        self.generation += 1;
        tracing::info!(
            "Mounted page {} (generation {}, {} dashlets)",
            page.anchor(),
            self.generation,
            page.len()
        );
        self.current = Some(page);
        self.state = PageState::Mounted;
        self.request_data(true);
    }

    fn request_data(&self, initial: bool) {
        if let Some(page) = &self.current {
            let requester = self.router.requester();
            for request in page.data_requests(initial) {
                requester.request(request);
            }
        }
    }

    fn dispose_current(&mut self) {
        if let Some(page) = self.current.take() {
            self.state = PageState::Disposing;
            let anchor = page.anchor().to_string();
            let disposed = page.teardown(&mut self.router, &mut self.document);
            tracing::info!("Disposed page {} ({} dashlets)", anchor, disposed);
        }
        self.state = PageState::Unmounted;
    }

    /// Tear the mounted page down and compose it again.
    fn rebuild(&mut self, reason: &str) -> bool {
        let Some(anchor) = self.current_anchor().map(str::to_string) else {
            return false;
        };
        let Some(index) = self.pages.iter().position(|p| p.anchor == anchor) else {
            return false;
        };
        tracing::info!("Rebuilding page {}: {}", anchor, reason);
        self.dispose_current();
        self.mount(index);
        true
    }

    /// Persist and apply a theme. Charts cannot repaint in place, so a
    /// mounted page is rebuilt.
    pub fn set_theme(&mut self, theme: Theme) -> Theme {
        if theme == self.theme {
            return theme;
        }
        if let Err(e) = self.preferences.set(THEME_KEY, theme.as_str()) {
            tracing::warn!("Could not persist theme {}: {}", theme, e);
        }
        self.theme = theme;
        self.rebuild("theme switch");
        theme
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.set_theme(self.theme.toggled())
    }

    /// Track the viewport width. Returns true when crossing a breakpoint
    /// rebuilt the page.
    pub fn resize(&mut self, width: u32) -> bool {
        let breakpoint = Breakpoint::from_width(width);
        let previous = self.breakpoint.replace(breakpoint);
        match previous {
            Some(prev) if prev != breakpoint => self.rebuild("breakpoint change"),
            _ => false,
        }
    }

    /// Route a raw inbound message. Returns the number of deliveries.
    pub fn on_inbound(&mut self, raw: &str) -> usize {
        match self.router.on_inbound_message(raw) {
            Some(event) => self.dispatch(&event),
            None => 0,
        }
    }

    pub fn dispatch(&mut self, event: &Event) -> usize {
        match self.current.as_mut() {
            Some(page) => page.dispatch(event, &self.router, &mut self.document),
            None => 0,
        }
    }

    /// Tick the mounted page, then re-request data for dashlets that have
    /// not seen their first event yet.
    pub fn tick(&mut self) -> usize {
        let Some(page) = self.current.as_mut() else {
            return 0;
        };
        let ticked = page.tick(&mut self.document);
        let requester = self.router.requester();
        for request in page.pending_requests() {
            requester.request(request);
        }
        ticked
    }

    pub fn unmount(&mut self) {
        self.dispose_current();
    }

    pub fn render_html(&self) -> String {
        format!(
            "<main data-bs-theme=\"{}\" data-page=\"{}\">{}</main>",
            self.theme,
            self.current_anchor().unwrap_or(""),
            self.document.render_html()
        )
    }
}

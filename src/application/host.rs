// Dashboard host - the single task that owns every page and dashlet
use crate::application::lifecycle::{LifecycleError, LifecycleManager, PageState};
use crate::domain::theme::Theme;
use std::ops::ControlFlow;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::MissedTickBehavior;

const COMMAND_CAPACITY: usize = 256;

#[derive(Debug, thiserror::Error)]
#[error("dashboard host has stopped")]
pub struct HostStopped;

/// Read-only view of the mounted page.
#[derive(Debug, Clone)]
pub struct PageSnapshot {
    pub anchor: Option<String>,
    pub state: PageState,
    pub theme: Theme,
    pub generation: u64,
    pub html: String,
}

pub enum HostCommand {
    Inbound(String),
    Navigate {
        anchor: String,
        reply: oneshot::Sender<Result<(), LifecycleError>>,
    },
    ToggleTheme {
        reply: oneshot::Sender<Theme>,
    },
    Resize {
        width: u32,
        reply: oneshot::Sender<bool>,
    },
    Snapshot {
        reply: oneshot::Sender<PageSnapshot>,
    },
    Shutdown,
}

/// Cloneable handle for talking to the host task.
#[derive(Clone)]
pub struct HostHandle {
    tx: mpsc::Sender<HostCommand>,
}

impl HostHandle {
    pub fn channel() -> (Self, mpsc::Receiver<HostCommand>) {
        let (tx, rx) = mpsc::channel(COMMAND_CAPACITY);
        (Self { tx }, rx)
    }

    pub async fn inbound(&self, raw: String) -> Result<(), HostStopped> {
        self.send(HostCommand::Inbound(raw)).await
    }

    pub async fn navigate(&self, anchor: &str) -> Result<Result<(), LifecycleError>, HostStopped> {
        let (reply, rx) = oneshot::channel();
        self.send(HostCommand::Navigate {
            anchor: anchor.to_string(),
            reply,
        })
        .await?;
        rx.await.map_err(|_| HostStopped)
    }

    pub async fn toggle_theme(&self) -> Result<Theme, HostStopped> {
        let (reply, rx) = oneshot::channel();
        self.send(HostCommand::ToggleTheme { reply }).await?;
        rx.await.map_err(|_| HostStopped)
    }

    pub async fn resize(&self, width: u32) -> Result<bool, HostStopped> {
        let (reply, rx) = oneshot::channel();
        self.send(HostCommand::Resize { width, reply }).await?;
        rx.await.map_err(|_| HostStopped)
    }

    pub async fn snapshot(&self) -> Result<PageSnapshot, HostStopped> {
        let (reply, rx) = oneshot::channel();
        self.send(HostCommand::Snapshot { reply }).await?;
        rx.await.map_err(|_| HostStopped)
    }

    pub async fn shutdown(&self) {
        let _ = self.tx.send(HostCommand::Shutdown).await;
    }

    async fn send(&self, command: HostCommand) -> Result<(), HostStopped> {
        self.tx.send(command).await.map_err(|_| HostStopped)
    }
}

/// Run the dispatch loop until shutdown. Commands and ticks are handled
/// one at a time on this task, so dashlets never run concurrently.
pub async fn run(
    mut lifecycle: LifecycleManager,
    mut commands: mpsc::Receiver<HostCommand>,
    tick_every: Duration,
) {
    let mut ticker = tokio::time::interval(tick_every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick fires immediately.
    ticker.tick().await;

    loop {
        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else { break };
                if handle(&mut lifecycle, command).is_break() {
                    break;
                }
            }
            _ = ticker.tick() => {
                let ticked = lifecycle.tick();
                tracing::trace!("Ticked {} dashlets", ticked);
            }
        }
    }

    lifecycle.unmount();
    tracing::info!("Dashboard host stopped");
}

fn handle(lifecycle: &mut LifecycleManager, command: HostCommand) -> ControlFlow<()> {
    match command {
        HostCommand::Inbound(raw) => {
            lifecycle.on_inbound(&raw);
        }
        HostCommand::Navigate { anchor, reply } => {
            let _ = reply.send(lifecycle.navigate(&anchor));
        }
        HostCommand::ToggleTheme { reply } => {
            let _ = reply.send(lifecycle.toggle_theme());
        }
        HostCommand::Resize { width, reply } => {
            let _ = reply.send(lifecycle.resize(width));
        }
        HostCommand::Snapshot { reply } => {
            let _ = reply.send(PageSnapshot {
                anchor: lifecycle.current_anchor().map(str::to_string),
                state: lifecycle.state(),
                theme: lifecycle.theme(),
                generation: lifecycle.generation(),
                html: lifecycle.render_html(),
            });
        }
        HostCommand::Shutdown => return ControlFlow::Break(()),
    }
    ControlFlow::Continue(())
}

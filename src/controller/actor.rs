//! Async driver for [`PreviewController`].
//!
//! ```text
//! PreviewHandle ──PreviewCommand──► PreviewActor ◄──SurfaceEvent── channel
//!      ▲                                 │
//!      └──── watch<PreviewStatus> ◄──────┘    sleep_until(next_deadline)
//! ```

use std::time::{Duration, Instant};

use tokio::sync::{mpsc, watch};

use super::{PreviewController, PreviewStatus};
use crate::debug;
use crate::settings::{Device, SettingChange, SettingsTree};

const CHANNEL_BUFFER: usize = 32;

/// Sleep used when no timer is armed.
const IDLE_SLEEP: Duration = Duration::from_secs(86400);

/// Messages to the preview actor
#[derive(Debug)]
pub enum PreviewCommand {
    /// Load the surface at the current address
    Navigate,
    /// User-requested reload after a failure
    Retry,
    UpdateSettings(SettingsTree),
    SelectiveRefresh(Vec<SettingChange>),
    SetDevice(Device),
    /// Container size in CSS pixels
    SetViewport { width: u32, height: u32 },
    Save,
    Reset,
    /// Dispose the controller and stop
    Shutdown,
}

/// Preview Actor - owns the controller and fires its timers
pub struct PreviewActor {
    controller: PreviewController,
    inbox: mpsc::Receiver<PreviewCommand>,
    events: mpsc::UnboundedReceiver<super::SurfaceEvent>,
}

impl PreviewActor {
    pub fn new(mut controller: PreviewController) -> (Self, PreviewHandle) {
        let (tx, inbox) = mpsc::channel(CHANNEL_BUFFER);
        let status = controller.subscribe();
        // Already taken: a closed receiver keeps that branch idle.
        let events = controller
            .take_events()
            .unwrap_or_else(|| mpsc::unbounded_channel().1);

        let actor = Self {
            controller,
            inbox,
            events,
        };
        (actor, PreviewHandle { tx, status })
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        loop {
            let deadline = self
                .controller
                .next_deadline()
                .unwrap_or_else(|| Instant::now() + IDLE_SLEEP);

            tokio::select! {
                biased;
                command = self.inbox.recv() => match command {
                    Some(PreviewCommand::Shutdown) | None => {
                        debug!("preview"; "shutting down");
                        self.controller.dispose();
                        break;
                    }
                    Some(command) => self.apply(command),
                },
                Some(event) = self.events.recv() => self.controller.handle_event(event),
                _ = tokio::time::sleep_until(deadline.into()) => self.controller.poll(Instant::now()),
            }
        }
    }

    fn apply(&mut self, command: PreviewCommand) {
        let now = Instant::now();
        let controller = &mut self.controller;
        match command {
            PreviewCommand::Navigate => controller.navigate(now),
            PreviewCommand::Retry => controller.retry(now),
            PreviewCommand::UpdateSettings(tree) => controller.update_settings(tree, now),
            PreviewCommand::SelectiveRefresh(changes) => controller.selective_refresh(changes),
            PreviewCommand::SetDevice(device) => controller.set_device(device),
            PreviewCommand::SetViewport { width, height } => {
                controller.set_viewport(width, height);
            }
            PreviewCommand::Save => controller.save(),
            PreviewCommand::Reset => controller.reset(),
            PreviewCommand::Shutdown => controller.dispose(),
        }
    }
}

/// Cloneable handle to a running [`PreviewActor`].
#[derive(Debug, Clone)]
pub struct PreviewHandle {
    tx: mpsc::Sender<PreviewCommand>,
    status: watch::Receiver<PreviewStatus>,
}

impl PreviewHandle {
    /// Queue a command. Returns `false` once the actor has stopped.
    pub async fn send(&self, command: PreviewCommand) -> bool {
        self.tx.send(command).await.is_ok()
    }

    pub async fn update_settings(&self, tree: SettingsTree) -> bool {
        self.send(PreviewCommand::UpdateSettings(tree)).await
    }

    pub async fn shutdown(&self) -> bool {
        self.send(PreviewCommand::Shutdown).await
    }

    /// Latest published status.
    pub fn status(&self) -> PreviewStatus {
        self.status.borrow().clone()
    }

    /// Status receiver for change notification.
    pub fn watch(&self) -> watch::Receiver<PreviewStatus> {
        self.status.clone()
    }
}

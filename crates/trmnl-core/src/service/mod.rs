//! The screen service: a single task that owns the [`RefreshController`] and
//! processes refresh triggers one at a time.
//!
//! Manual refreshes, token changes and timer firings all arrive as messages,
//! so a trigger that shows up while a refresh is in flight waits for it to
//! settle instead of interleaving state writes. A token change therefore can
//! never be overwritten by the response to a request made with the old token.

pub mod errors;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::TrmnlConfig;
use crate::errors::ConfigError;
use crate::screen::{RefreshController, RefreshScheduler, ScreenState, StateStore, TimerFired};
use crate::settings::SettingsFile;
use crate::transport::{HttpTransport, ReqwestTransport};

pub use errors::ServiceError;

/// Commands queued before callers start waiting.
const COMMAND_CAPACITY: usize = 32;

/// Acknowledgement returned to control-surface callers.
///
/// Always `ok: true` once the command was processed, whatever the refresh
/// outcome; the outcome itself is in the broadcast state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub ok: bool,
}

enum ScreenCommand {
    SetAccessToken {
        token: String,
        reply: oneshot::Sender<Ack>,
    },
    ManualRefresh {
        reply: oneshot::Sender<Ack>,
    },
}

/// Control surface for a UI layer. Cheap to clone.
#[derive(Clone)]
pub struct ScreenHandle {
    commands: mpsc::Sender<ScreenCommand>,
    store: StateStore,
}

impl ScreenHandle {
    pub fn get_state(&self) -> ScreenState {
        self.store.snapshot()
    }

    /// Push channel fired on every state mutation.
    pub fn subscribe(&self) -> broadcast::Receiver<ScreenState> {
        self.store.subscribe()
    }

    /// Persist the token, broadcast it, then refresh immediately.
    pub async fn set_access_token(&self, token: impl Into<String>) -> Result<Ack, ServiceError> {
        let (reply, rx) = oneshot::channel();
        self.send(ScreenCommand::SetAccessToken {
            token: token.into(),
            reply,
        })
        .await?;
        rx.await.map_err(|_| ServiceError::Stopped)
    }

    /// Refresh now, bypassing the timer.
    pub async fn manual_refresh(&self) -> Result<Ack, ServiceError> {
        let (reply, rx) = oneshot::channel();
        self.send(ScreenCommand::ManualRefresh { reply }).await?;
        rx.await.map_err(|_| ServiceError::Stopped)
    }

    async fn send(&self, command: ScreenCommand) -> Result<(), ServiceError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| ServiceError::Stopped)
    }
}

pub struct ScreenService<T> {
    controller: RefreshController<T>,
    commands: mpsc::Receiver<ScreenCommand>,
    timers: mpsc::UnboundedReceiver<TimerFired>,
}

impl<T: HttpTransport> ScreenService<T> {
    /// Wire a service around `transport`, seeding state from `settings`.
    pub fn new(
        transport: Arc<T>,
        api_url: impl Into<String>,
        settings: SettingsFile,
    ) -> (Self, ScreenHandle) {
        let store = StateStore::new(ScreenState::from_settings(&settings.load()));
        let (scheduler, timers) = RefreshScheduler::channel();
        let controller =
            RefreshController::new(transport, api_url, store.clone(), scheduler, settings);
        let (commands_tx, commands) = mpsc::channel(COMMAND_CAPACITY);

        let service = Self {
            controller,
            commands,
            timers,
        };
        let handle = ScreenHandle {
            commands: commands_tx,
            store,
        };
        (service, handle)
    }

    /// Process triggers until `shutdown` is cancelled.
    ///
    /// Refreshes once at startup when a token is already configured.
    pub async fn run(mut self, shutdown: CancellationToken) {
        info!(event = "core.service.started");

        if self.controller.store().snapshot().has_token() {
            self.controller.refresh().await;
        }

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                Some(command) = self.commands.recv() => self.handle_command(command).await,
                Some(fired) = self.timers.recv() => self.handle_timer(fired).await,
                else => break,
            }
        }

        self.controller.shutdown();
        info!(event = "core.service.stopped");
    }

    /// Run a single refresh without entering the loop and return the
    /// settled state. `token`, when given, is applied and persisted first.
    ///
    /// For one-shot callers such as the CLI; no timer outlives the call.
    pub async fn refresh_once(mut self, token: Option<&str>) -> ScreenState {
        if let Some(token) = token {
            self.controller.set_access_token(token);
        }
        self.controller.refresh().await;
        self.controller.shutdown();
        self.controller.store().snapshot()
    }

    async fn handle_command(&mut self, command: ScreenCommand) {
        match command {
            ScreenCommand::SetAccessToken { token, reply } => {
                self.controller.set_access_token(&token);
                self.controller.refresh().await;
                Self::acknowledge(reply);
            }
            ScreenCommand::ManualRefresh { reply } => {
                info!(event = "core.service.manual_refresh");
                self.controller.refresh().await;
                Self::acknowledge(reply);
            }
        }
    }

    async fn handle_timer(&mut self, fired: TimerFired) {
        if !self.controller.accepts_timer(fired) {
            debug!(
                event = "core.service.stale_timer_ignored",
                generation = fired.generation
            );
            return;
        }
        self.controller.refresh().await;
    }

    fn acknowledge(reply: oneshot::Sender<Ack>) {
        if reply.send(Ack { ok: true }).is_err() {
            debug!(
                event = "core.service.ack_dropped",
                "Caller stopped waiting for acknowledgement"
            );
        }
    }
}

impl ScreenService<ReqwestTransport> {
    /// Build a service that talks to the real API.
    pub fn connect(
        config: &TrmnlConfig,
        settings: SettingsFile,
    ) -> Result<(Self, ScreenHandle), ConfigError> {
        let transport = Arc::new(ReqwestTransport::new(config)?);
        Ok(Self::new(transport, config.api.url(), settings))
    }
}

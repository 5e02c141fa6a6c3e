//! The refresh cycle.
//!
//! One call to [`RefreshController::refresh`] walks
//! `Validating → FetchingDescriptor → FetchingImage → Settled`, writing to the
//! [`StateStore`] at each transition. Every outcome except a missing token
//! ends by arming the next timer.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use super::errors::RefreshError;
use super::fetcher::ImageFetcher;
use super::parser::{self, ResponseBody};
use super::scheduler::{RefreshScheduler, TimerFired};
use super::store::StateStore;
use super::types::{STATUS_REFRESHING, STATUS_UP_TO_DATE};
use crate::errors::TrmnlError;
use crate::settings::SettingsFile;
use crate::transport::{HttpRequest, HttpTransport, RequestKind};

/// Header carrying the device access token on API requests.
pub const ACCESS_TOKEN_HEADER: &str = "access-token";

/// What the API told us to show.
struct ResolvedScreen {
    image_url: String,
    refresh_rate_seconds: u64,
}

pub struct RefreshController<T> {
    transport: Arc<T>,
    fetcher: ImageFetcher<T>,
    api_url: String,
    store: StateStore,
    scheduler: RefreshScheduler,
    settings: SettingsFile,
}

impl<T: HttpTransport> RefreshController<T> {
    pub fn new(
        transport: Arc<T>,
        api_url: impl Into<String>,
        store: StateStore,
        scheduler: RefreshScheduler,
        settings: SettingsFile,
    ) -> Self {
        Self {
            fetcher: ImageFetcher::new(transport.clone()),
            transport,
            api_url: api_url.into(),
            store,
            scheduler,
            settings,
        }
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn scheduler(&self) -> &RefreshScheduler {
        &self.scheduler
    }

    /// Whether a timer firing should trigger a refresh.
    pub fn accepts_timer(&self, fired: TimerFired) -> bool {
        self.scheduler.is_current(fired)
    }

    /// Store, persist and broadcast a new access token. Does not refresh.
    pub fn set_access_token(&mut self, token: &str) {
        let token = token.trim().to_string();

        if let Err(e) = self.settings.set_access_token(&token) {
            error!(
                event = "core.refresh.token_persist_failed",
                error_code = e.error_code(),
                error = %e
            );
        }

        self.store.update(|state| state.access_token = token.clone());

        info!(
            event = "core.refresh.token_updated",
            configured = !token.is_empty()
        );
    }

    /// Stop the timer. Called on shutdown.
    pub fn shutdown(&mut self) {
        self.scheduler.cancel();
    }

    /// Run one refresh cycle with the current token. Never fails; the
    /// outcome is observable only through the state store.
    pub async fn refresh(&mut self) {
        let token = self.store.snapshot().access_token.trim().to_string();
        if token.is_empty() {
            self.halt_without_token();
            return;
        }

        info!(event = "core.refresh.started");
        self.store.update(|state| {
            state.is_loading = true;
            state.status_text = STATUS_REFRESHING.to_string();
        });

        let screen = match self.resolve_screen(&token).await {
            Ok(screen) => screen,
            Err(e) => {
                self.settle_failed(&e);
                return;
            }
        };

        let image = self.fetcher.fetch(&screen.image_url).await;
        self.settle_resolved(screen, image);
    }

    fn halt_without_token(&mut self) {
        let error = RefreshError::MissingToken;
        self.store.update(|state| {
            state.status_text = error.to_string();
            state.image_url.clear();
            state.image_data_url.clear();
            state.is_loading = false;
        });
        self.scheduler.cancel();

        info!(
            event = "core.refresh.halted",
            error_code = error.error_code(),
            "No access token configured, polling stopped"
        );
    }

    async fn resolve_screen(&self, token: &str) -> Result<ResolvedScreen, RefreshError> {
        let request =
            HttpRequest::get(RequestKind::Api, &self.api_url).header(ACCESS_TOKEN_HEADER, token);
        let response = self.transport.get(request).await?;

        let descriptor = parser::parse(&ResponseBody::from(response.body.as_slice()));
        let status = descriptor.effective_status(response.status);
        if status != 200.0 {
            return Err(RefreshError::ApiStatus { status });
        }

        let image_url = descriptor
            .image_url()
            .ok_or(RefreshError::MissingImageUrl)?
            .to_string();

        Ok(ResolvedScreen {
            image_url,
            refresh_rate_seconds: descriptor.effective_refresh_rate(),
        })
    }

    /// The API could not be used; keep the previous screen and rate.
    fn settle_failed(&mut self, error: &RefreshError) {
        let status_text = match error {
            RefreshError::Network { .. } => format!("Network error: {error}"),
            _ => error.to_string(),
        };

        let snapshot = self.store.update(|state| {
            state.status_text = status_text;
            state.is_loading = false;
        });
        let armed = self.scheduler.schedule_next(snapshot.refresh_rate_seconds);

        warn!(
            event = "core.refresh.failed",
            error_code = error.error_code(),
            error = %error,
            next_refresh_secs = armed.as_secs()
        );
    }

    /// The API named a screen; record it whether or not the image arrived.
    fn settle_resolved(&mut self, screen: ResolvedScreen, image: Result<String, RefreshError>) {
        let previous_rate = self.store.snapshot().refresh_rate_seconds;
        let now = Utc::now();

        let (image_data_url, status_text) = match image {
            Ok(data_url) => (data_url, STATUS_UP_TO_DATE.to_string()),
            Err(e) => {
                warn!(
                    event = "core.refresh.image_failed",
                    error_code = e.error_code(),
                    error = %e,
                    image_url = %screen.image_url
                );
                (String::new(), format!("Image load failed: {e}"))
            }
        };
        let image_loaded = !image_data_url.is_empty();

        let snapshot = self.store.update(|state| {
            state.image_url = screen.image_url;
            state.image_data_url = image_data_url;
            state.refresh_rate_seconds = screen.refresh_rate_seconds;
            state.last_fetched_at = Some(match state.last_fetched_at {
                Some(previous) => previous.max(now),
                None => now,
            });
            state.status_text = status_text;
            state.is_loading = false;
        });

        if snapshot.refresh_rate_seconds != previous_rate
            && let Err(e) = self
                .settings
                .set_refresh_rate_seconds(snapshot.refresh_rate_seconds)
        {
            error!(
                event = "core.refresh.rate_persist_failed",
                error_code = e.error_code(),
                error = %e
            );
        }

        let armed = self.scheduler.schedule_next(snapshot.refresh_rate_seconds);

        info!(
            event = "core.refresh.completed",
            image_url = %snapshot.image_url,
            image_loaded = image_loaded,
            next_refresh_secs = armed.as_secs()
        );
    }
}

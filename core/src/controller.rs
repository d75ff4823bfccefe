use log::{debug, info, warn};

use crate::api::{Ack, ApiError, StreamApi};
use crate::player::{PauseOutcome, PlayerChange, PlayerError, PlayerFactory, PlayerHandle};
use crate::source::{ResolvedSource, SourceEndpoints, SourceSelector, StreamSource};
use crate::status::StatusLine;

/// Result of a status refresh
#[derive(Debug)]
pub enum StatusOutcome {
    /// The server reported this status
    Reported(String),
    /// The request failed and the status line shows the error indicator
    Failed(ApiError),
}

impl StatusOutcome {
    pub fn is_reported(&self) -> bool {
        matches!(self, StatusOutcome::Reported(_))
    }
}

/// Everything `start_stream` did
#[derive(Debug)]
pub struct StartReport {
    pub control: Result<Ack, ApiError>,
    pub player: Result<PlayerChange, PlayerError>,
    pub status: StatusOutcome,
}

/// Everything `stop_stream` did
#[derive(Debug)]
pub struct StopReport {
    pub control: Result<Ack, ApiError>,
    pub pause: PauseOutcome,
    pub status: StatusOutcome,
}

/// Page-level controller of the stream panel
///
/// Owns the API client, the player handle, the source selection and the
/// status line. Every action reports what happened instead of swallowing it.
pub struct PanelController<A, F> {
    api: A,
    factory: F,
    endpoints: SourceEndpoints,
    selector: SourceSelector,
    player: PlayerHandle,
    status: StatusLine,
}

impl<A, F> PanelController<A, F>
where
    A: StreamApi,
    F: PlayerFactory,
{
    pub fn new(api: A, factory: F, endpoints: SourceEndpoints, selected: Option<StreamSource>) -> Self {
        Self {
            api,
            factory,
            endpoints,
            selector: SourceSelector::new(selected),
            player: PlayerHandle::new(),
            status: StatusLine::new(),
        }
    }

    /// Initial status refresh when the panel opens
    pub async fn refresh_on_load(&mut self) -> StatusOutcome {
        self.check_status().await
    }

    /// Start the remote stream, bind the player to the selected source and refresh status
    pub async fn start_stream(&mut self) -> StartReport {
        let control = self.api.start().await;
        log_control("start", &control);

        let player = self.ensure_player();
        let status = self.check_status().await;

        StartReport {
            control,
            player,
            status,
        }
    }

    /// Stop the remote stream, pause the player when it can pause and refresh status
    pub async fn stop_stream(&mut self) -> StopReport {
        let control = self.api.stop().await;
        log_control("stop", &control);

        let pause = self.player.pause();
        match &pause {
            PauseOutcome::Paused => debug!("Player paused"),
            PauseOutcome::Unsupported => debug!("Player cannot pause, leaving it running"),
            PauseOutcome::NoPlayer => debug!("No player to pause"),
            PauseOutcome::Failed(e) => warn!("Failed to pause player: {}", e),
        }

        let status = self.check_status().await;

        StopReport {
            control,
            pause,
            status,
        }
    }

    /// Fetch the server status into the status line
    pub async fn check_status(&mut self) -> StatusOutcome {
        match self.api.status().await {
            Ok(status) => {
                debug!("Stream status: {}", status);
                self.status.report(&status);
                StatusOutcome::Reported(status)
            }
            Err(e) => {
                warn!("Status request failed: {}", e);
                self.status.error();
                StatusOutcome::Failed(e)
            }
        }
    }

    /// Ask the camera to refocus
    pub async fn trigger_focus(&mut self) -> Result<Ack, ApiError> {
        let control = self.api.focus().await;
        log_control("focus", &control);
        control
    }

    /// Check a source option and point the player at it
    ///
    /// Re-checking the option that is already checked leaves a running player alone.
    pub fn select_source(&mut self, source: StreamSource) -> Result<PlayerChange, PlayerError> {
        if self.selector.checked() == Some(source) && self.player.is_created() {
            debug!("Source {} already selected", source);
            return Ok(PlayerChange::Unchanged);
        }
        self.selector.check(source);
        info!("Source changed to {}", source);
        self.ensure_player()
    }

    fn ensure_player(&mut self) -> Result<PlayerChange, PlayerError> {
        let change = self
            .endpoints
            .resolve(&self.selector)
            .map_err(PlayerError::from)
            .and_then(|resolved| self.player.ensure(&self.factory, &resolved));
        if let Err(e) = &change {
            warn!("Player update failed: {}", e);
        }
        change
    }

    pub fn status_text(&self) -> &str {
        self.status.text()
    }

    pub fn status_line(&self) -> &StatusLine {
        &self.status
    }

    pub fn selected_source(&self) -> Option<StreamSource> {
        self.selector.checked()
    }

    /// The source that `start_stream` would bind, if any is checked
    pub fn resolved_source(&self) -> Option<ResolvedSource> {
        self.endpoints.resolve(&self.selector).ok()
    }

    pub fn endpoints(&self) -> &SourceEndpoints {
        &self.endpoints
    }

    pub fn player_created(&self) -> bool {
        self.player.is_created()
    }

    pub fn player_url(&self) -> Option<&str> {
        self.player.current_url()
    }

    /// Stop the player before exiting
    pub fn shutdown(&mut self) -> anyhow::Result<()> {
        self.player.shutdown()
    }
}

fn log_control(action: &str, control: &Result<Ack, ApiError>) {
    match control {
        Ok(ack) => debug!(
            "{} acknowledged with HTTP {} {}",
            action,
            ack.http_status,
            ack.message.as_deref().unwrap_or("")
        ),
        Err(e) => warn!("{} request failed: {}", action, e),
    }
}

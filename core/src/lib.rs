pub mod api;
pub mod config;
pub mod controller;
pub mod player;
pub mod source;
pub mod status;

// Re-exports
pub use api::{Ack, ApiError, Endpoint, HttpStreamApi, StreamApi};
pub use config::{ConfigError, PanelConfig};
pub use controller::{PanelController, StartReport, StatusOutcome, StopReport};
pub use player::{
    ExternalPlayerConfig, ExternalPlayerFactory, PauseOutcome, Player, PlayerChange, PlayerError,
    PlayerFactory, PlayerHandle,
};
pub use source::{ResolvedSource, SourceEndpoints, SourceError, SourceSelector, StreamSource};
pub use status::StatusLine;

/// Controller wired to the HTTP API and an external media player
pub type DefaultController = PanelController<HttpStreamApi, ExternalPlayerFactory>;

/// Build a controller from configuration
pub fn create_panel(config: &PanelConfig) -> Result<DefaultController, ApiError> {
    let api = HttpStreamApi::new(&config.server_url, config.request_timeout())?;
    let factory = ExternalPlayerFactory::new(config.player.clone());
    Ok(PanelController::new(
        api,
        factory,
        config.sources.clone(),
        config.default_source,
    ))
}

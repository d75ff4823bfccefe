mod external;

pub use external::{ExternalPlayer, ExternalPlayerConfig, ExternalPlayerFactory, detect_player_program};

use log::{debug, info};
use thiserror::Error;

use crate::source::{ResolvedSource, SourceError, StreamSource};

/// Options a player is created with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerOptions {
    /// Media URL to play
    pub url: String,
    /// Delivery format of the URL
    pub kind: StreamSource,
}

impl From<&ResolvedSource> for PlayerOptions {
    fn from(resolved: &ResolvedSource) -> Self {
        Self {
            url: resolved.url.clone(),
            kind: resolved.source,
        }
    }
}

/// Optional capability of a player to pause playback
pub trait Pause {
    fn pause(&mut self) -> anyhow::Result<()>;
}

/// A playback component owned by the panel
pub trait Player: Send {
    /// Redirect playback to another URL without recreating the player
    fn switch_url(&mut self, url: &str) -> anyhow::Result<()>;

    /// URL currently bound to the player
    fn current_url(&self) -> &str;

    /// Pause capability, if the player has one
    fn pause_capability(&mut self) -> Option<&mut dyn Pause> {
        None
    }

    /// Stop playback and release resources
    fn stop(&mut self) -> anyhow::Result<()>;
}

/// Creates players
pub trait PlayerFactory: Send + Sync {
    fn create(&self, options: &PlayerOptions) -> anyhow::Result<Box<dyn Player>>;
}

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// What `PlayerHandle::ensure` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerChange {
    /// A new player was created
    Created,
    /// The existing player was switched to a new URL
    Switched,
    /// The player already plays the requested source
    Unchanged,
}

/// Result of asking the player to pause
#[derive(Debug)]
pub enum PauseOutcome {
    Paused,
    /// The player has no pause capability
    Unsupported,
    /// No player has been created yet
    NoPlayer,
    Failed(anyhow::Error),
}

/// Owner of the single player instance
///
/// The player is created on first use and redirected afterwards, so at most
/// one instance exists for the lifetime of the handle.
#[derive(Default)]
pub struct PlayerHandle {
    player: Option<Box<dyn Player>>,
}

impl PlayerHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the player for `resolved`, or switch the existing one to it
    pub fn ensure(
        &mut self,
        factory: &dyn PlayerFactory,
        resolved: &ResolvedSource,
    ) -> Result<PlayerChange, PlayerError> {
        if let Some(player) = self.player.as_mut() {
            debug!("Switching player to {} ({})", resolved.url, resolved.type_tag());
            player.switch_url(&resolved.url)?;
            return Ok(PlayerChange::Switched);
        }

        info!("Creating player for {} ({})", resolved.url, resolved.type_tag());
        let player = factory.create(&PlayerOptions::from(resolved))?;
        self.player = Some(player);
        Ok(PlayerChange::Created)
    }

    /// Pause the player if it exists and can pause
    pub fn pause(&mut self) -> PauseOutcome {
        let Some(player) = self.player.as_mut() else {
            return PauseOutcome::NoPlayer;
        };
        match player.pause_capability() {
            Some(pausable) => match pausable.pause() {
                Ok(()) => PauseOutcome::Paused,
                Err(e) => PauseOutcome::Failed(e),
            },
            None => PauseOutcome::Unsupported,
        }
    }

    pub fn is_created(&self) -> bool {
        self.player.is_some()
    }

    pub fn current_url(&self) -> Option<&str> {
        self.player.as_ref().map(|p| p.current_url())
    }

    /// Stop the player at shutdown
    pub fn shutdown(&mut self) -> anyhow::Result<()> {
        match self.player.as_mut() {
            Some(player) => player.stop(),
            None => Ok(()),
        }
    }
}

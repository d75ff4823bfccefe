use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;

use anyhow::{Context, Result, anyhow};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::player::{Pause, Player, PlayerFactory, PlayerOptions};
use crate::source::StreamSource;

/// Media players tried when none is configured, with their version flag
const KNOWN_PLAYERS: [(&str, &str); 3] = [("mpv", "--version"), ("ffplay", "-version"), ("vlc", "--version")];

/// Configuration for the external player process
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalPlayerConfig {
    /// Player executable (None for auto-detect)
    pub program: Option<String>,
    /// Extra arguments placed before the media URL
    pub args: Vec<String>,
}

/// Find an installed media player
pub fn detect_player_program() -> Option<String> {
    for (program, version_flag) in KNOWN_PLAYERS {
        if let Ok(status) = Command::new(program)
            .arg(version_flag)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
        {
            if status.success() {
                debug!("Found media player: {}", program);
                return Some(program.to_string());
            }
        }
    }
    None
}

/// A player that runs a media player program on the stream URL
///
/// The process cannot be paused in place: pausing terminates it, and the next
/// `switch_url` starts playback again.
pub struct ExternalPlayer {
    program: String,
    args: Vec<String>,
    url: String,
    kind: StreamSource,
    child: Option<Child>,
}

impl ExternalPlayer {
    /// Start `program` playing `options.url`
    pub fn spawn(program: impl Into<String>, args: Vec<String>, options: &PlayerOptions) -> Result<Self> {
        let mut player = Self {
            program: program.into(),
            args,
            url: options.url.clone(),
            kind: options.kind,
            child: None,
        };
        player.launch()?;
        Ok(player)
    }

    pub fn kind(&self) -> StreamSource {
        self.kind
    }

    /// Whether the player process is still running
    pub fn is_running(&mut self) -> bool {
        match self.child.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }

    fn launch(&mut self) -> Result<()> {
        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(&self.url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to start media player `{}`", self.program))?;
        info!("Started {} (pid {}) on {}", self.program, child.id(), self.url);
        self.child = Some(child);
        Ok(())
    }

    fn terminate(&mut self) -> Result<()> {
        if let Some(mut child) = self.child.take() {
            if let Ok(Some(status)) = child.try_wait() {
                debug!("Media player already exited with {}", status);
                return Ok(());
            }
            child.kill().context("Failed to stop media player")?;
            let status = child.wait().context("Failed to reap media player")?;
            debug!("Media player stopped ({})", status);
        }
        Ok(())
    }
}

impl Pause for ExternalPlayer {
    fn pause(&mut self) -> Result<()> {
        self.terminate()
    }
}

impl Player for ExternalPlayer {
    fn switch_url(&mut self, url: &str) -> Result<()> {
        self.terminate()?;
        self.url = url.to_string();
        self.launch()
    }

    fn current_url(&self) -> &str {
        &self.url
    }

    fn pause_capability(&mut self) -> Option<&mut dyn Pause> {
        Some(self)
    }

    fn stop(&mut self) -> Result<()> {
        self.terminate()
    }
}

impl Drop for ExternalPlayer {
    fn drop(&mut self) {
        if let Err(e) = self.terminate() {
            warn!("Error stopping media player: {}", e);
        }
    }
}

/// Creates `ExternalPlayer`s from configuration
pub struct ExternalPlayerFactory {
    config: ExternalPlayerConfig,
    /// Auto-detection result, probed at most once
    detected: OnceLock<Option<String>>,
}

impl ExternalPlayerFactory {
    pub fn new(config: ExternalPlayerConfig) -> Self {
        Self {
            config,
            detected: OnceLock::new(),
        }
    }

    fn program(&self) -> Result<String> {
        if let Some(program) = &self.config.program {
            return Ok(program.clone());
        }
        self.detected.get_or_init(detect_player_program).clone().ok_or_else(|| {
            anyhow!("No media player found. Install mpv, ffplay or vlc, or set `player.program` in the config")
        })
    }
}

impl PlayerFactory for ExternalPlayerFactory {
    fn create(&self, options: &PlayerOptions) -> Result<Box<dyn Player>> {
        let program = self.program()?;
        let player = ExternalPlayer::spawn(program, self.config.args.clone(), options)?;
        Ok(Box::new(player))
    }
}

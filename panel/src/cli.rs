use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use directories::ProjectDirs;
use panel_core::{PanelConfig, StreamSource};

/// Terminal control panel for a remote camera stream
#[derive(Debug, Parser)]
#[command(name = "stream-panel", version)]
pub struct Cli {
    /// Config file (defaults to config.json in the user config directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Base URL of the stream control server
    #[arg(short, long)]
    pub server: Option<String>,

    /// Source checked on startup (flv or hls)
    #[arg(long)]
    pub source: Option<StreamSource>,

    /// Media player program used for playback
    #[arg(long)]
    pub player: Option<String>,

    /// Log file for the interactive panel
    #[arg(long, default_value = "stream_panel.log")]
    pub log_file: PathBuf,

    /// Run a single control request and exit
    #[command(subcommand)]
    pub command: Option<HeadlessCommand>,
}

/// One-shot control requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum HeadlessCommand {
    /// Start the stream
    Start,
    /// Stop the stream
    Stop,
    /// Print the stream status
    Status,
    /// Trigger a camera focus adjustment
    Focus,
}

impl HeadlessCommand {
    pub fn name(self) -> &'static str {
        match self {
            HeadlessCommand::Start => "start",
            HeadlessCommand::Stop => "stop",
            HeadlessCommand::Status => "status",
            HeadlessCommand::Focus => "focus",
        }
    }
}

impl Cli {
    /// Config file location: explicit flag, else the per-user config directory
    pub fn config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(|| {
            ProjectDirs::from("", "", "stream-panel").map(|dirs| dirs.config_dir().join("config.json"))
        })
    }

    /// Defaults, then the config file, then command line flags
    pub fn resolve_config(&self) -> Result<PanelConfig> {
        let path = self.config_path();
        let mut config = PanelConfig::load_or_default(path.as_deref()).context("Failed to load configuration")?;
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut PanelConfig) {
        if let Some(server) = &self.server {
            config.server_url = server.clone();
        }
        if let Some(source) = self.source {
            config.default_source = Some(source);
        }
        if let Some(player) = &self.player {
            config.player.program = Some(player.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "stream-panel",
            "--server",
            "http://cam.local:8000",
            "--source",
            "hls",
            "--player",
            "ffplay",
        ]);
        let mut config = PanelConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.server_url, "http://cam.local:8000");
        assert_eq!(config.default_source, Some(StreamSource::Hls));
        assert_eq!(config.player.program.as_deref(), Some("ffplay"));
        assert_eq!(cli.command, None);
    }

    #[test]
    fn test_headless_subcommand_and_explicit_config() {
        let cli = Cli::parse_from(["stream-panel", "--config", "/tmp/panel.json", "status"]);
        assert_eq!(cli.command, Some(HeadlessCommand::Status));
        assert_eq!(cli.config_path(), Some(PathBuf::from("/tmp/panel.json")));
    }

    #[test]
    fn test_unknown_source_is_rejected() {
        assert!(Cli::try_parse_from(["stream-panel", "--source", "dash"]).is_err());
    }

    #[test]
    fn test_resolve_config_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "server_url": "http://from-file:8000/" }"#).unwrap();

        let cli = Cli::parse_from(["stream-panel", "--config", path.to_str().unwrap()]);
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.server_url, "http://from-file:8000/");
    }
}

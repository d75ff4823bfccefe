use std::fs;
use std::path::Path;
use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::DEFAULT_SERVER_URL;
use crate::player::ExternalPlayerConfig;
use crate::source::{SourceEndpoints, StreamSource};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Panel configuration
///
/// Missing fields in a config file keep their default values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Base URL of the stream control server
    pub server_url: String,
    /// Media endpoints for each source
    pub sources: SourceEndpoints,
    /// Source checked when the panel opens
    pub default_source: Option<StreamSource>,
    /// External media player settings
    pub player: ExternalPlayerConfig,
    /// Per-request timeout in seconds (None waits indefinitely)
    pub request_timeout_secs: Option<u64>,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            sources: SourceEndpoints::default(),
            default_source: Some(StreamSource::Flv),
            player: ExternalPlayerConfig::default(),
            request_timeout_secs: None,
        }
    }
}

impl PanelConfig {
    /// Parse a config from JSON text
    pub fn from_json(path: &str, text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    /// Load a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        Self::from_json(&display, &text)
    }

    /// Defaults overlaid with the user file, if there is one
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) if path.exists() => {
                debug!("Loading config from {}", path.display());
                Self::load(path)
            }
            Some(path) => {
                debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = PanelConfig::from_json(
            "inline",
            r#"{ "server_url": "http://cam.local:8000/", "sources": { "hls_url": "http://cam.local/a.m3u8" } }"#,
        )
        .unwrap();

        assert_eq!(config.server_url, "http://cam.local:8000/");
        assert_eq!(config.sources.hls_url, "http://cam.local/a.m3u8");
        assert_eq!(config.sources.flv_url, crate::source::DEFAULT_FLV_URL);
        assert_eq!(config.default_source, Some(StreamSource::Flv));
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "default_source": "hls", "player": {{ "program": "mpv", "args": ["--mute"] }}, "request_timeout_secs": 5 }}"#
        )
        .unwrap();

        let config = PanelConfig::load_or_default(Some(file.path())).unwrap();
        assert_eq!(config.default_source, Some(StreamSource::Hls));
        assert_eq!(config.player.program.as_deref(), Some("mpv"));
        assert_eq!(config.player.args, vec!["--mute".to_string()]);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = PanelConfig::load_or_default(Some(&dir.path().join("config.json"))).unwrap();
        assert_eq!(config, PanelConfig::default());
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let result = PanelConfig::from_json("broken.json", "{ server_url: ");
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }
}

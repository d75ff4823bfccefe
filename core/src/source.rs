use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default FLV progressive endpoint of the media server
pub const DEFAULT_FLV_URL: &str = "http://192.168.101.191:8080/live/livestream.flv";
/// Default HLS playlist endpoint of the media server
pub const DEFAULT_HLS_URL: &str = "http://192.168.101.191:8080/live/livestream.m3u8";

/// Delivery format of the live stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamSource {
    /// FLV progressive download
    Flv,
    /// HLS segmented playlist
    Hls,
}

impl StreamSource {
    /// All sources in radio-group order
    pub const ALL: [StreamSource; 2] = [StreamSource::Flv, StreamSource::Hls];

    /// Type tag handed to the player
    pub fn type_tag(self) -> &'static str {
        match self {
            StreamSource::Flv => "flv",
            StreamSource::Hls => "hls",
        }
    }

    /// Human readable label for the radio option
    pub fn label(self) -> &'static str {
        match self {
            StreamSource::Flv => "FLV",
            StreamSource::Hls => "HLS",
        }
    }
}

impl fmt::Display for StreamSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_tag())
    }
}

impl FromStr for StreamSource {
    type Err = SourceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "flv" => Ok(StreamSource::Flv),
            "hls" => Ok(StreamSource::Hls),
            _ => Err(SourceError::UnknownValue(value.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("no stream source is selected")]
    NothingSelected,
    #[error("unknown stream source: {0:?} (expected \"flv\" or \"hls\")")]
    UnknownValue(String),
}

/// Mutually exclusive source choice, the equivalent of a radio group
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceSelector {
    checked: Option<StreamSource>,
}

impl SourceSelector {
    pub fn new(checked: Option<StreamSource>) -> Self {
        Self { checked }
    }

    /// Check one option, unchecking the other
    pub fn check(&mut self, source: StreamSource) {
        self.checked = Some(source);
    }

    pub fn clear(&mut self) {
        self.checked = None;
    }

    pub fn checked(&self) -> Option<StreamSource> {
        self.checked
    }

    /// Move to the next option, wrapping around; checks the first one if none is checked
    pub fn cycle(&mut self) -> StreamSource {
        let next = match self.checked {
            Some(StreamSource::Flv) => StreamSource::Hls,
            Some(StreamSource::Hls) | None => StreamSource::Flv,
        };
        self.checked = Some(next);
        next
    }
}

/// A source mapped to its concrete endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    pub source: StreamSource,
    pub url: String,
}

impl ResolvedSource {
    pub fn type_tag(&self) -> &'static str {
        self.source.type_tag()
    }
}

/// Endpoint URLs for each delivery format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceEndpoints {
    pub flv_url: String,
    pub hls_url: String,
}

impl Default for SourceEndpoints {
    fn default() -> Self {
        Self {
            flv_url: DEFAULT_FLV_URL.to_string(),
            hls_url: DEFAULT_HLS_URL.to_string(),
        }
    }
}

impl SourceEndpoints {
    /// URL for a given source
    pub fn url_for(&self, source: StreamSource) -> &str {
        match source {
            StreamSource::Flv => &self.flv_url,
            StreamSource::Hls => &self.hls_url,
        }
    }

    /// URL of the checked source
    pub fn resolve_url(&self, selector: &SourceSelector) -> Result<&str, SourceError> {
        let source = selector.checked().ok_or(SourceError::NothingSelected)?;
        Ok(self.url_for(source))
    }

    /// Type tag of the checked source
    pub fn resolve_type(&self, selector: &SourceSelector) -> Result<&'static str, SourceError> {
        selector
            .checked()
            .map(StreamSource::type_tag)
            .ok_or(SourceError::NothingSelected)
    }

    /// Resolve the checked source into a URL and type pair
    pub fn resolve(&self, selector: &SourceSelector) -> Result<ResolvedSource, SourceError> {
        let source = selector.checked().ok_or(SourceError::NothingSelected)?;
        Ok(ResolvedSource {
            source,
            url: self.url_for(source).to_string(),
        })
    }
}

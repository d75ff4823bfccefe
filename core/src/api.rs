use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Url;
use serde_json::Value;
use thiserror::Error;

/// Default base URL of the stream control server
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000/";

/// Control endpoints exposed under `api/stream/`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    Stop,
    Status,
    Focus,
}

impl Endpoint {
    /// Path relative to the server base URL
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Start => "api/stream/start",
            Endpoint::Stop => "api/stream/stop",
            Endpoint::Status => "api/stream/status",
            Endpoint::Focus => "api/stream/focus",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid server url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },
    #[error("malformed response from {endpoint}: {reason}")]
    Malformed { endpoint: Endpoint, reason: String },
}

/// Outcome of a control request that was answered by the server
///
/// The HTTP status is recorded but never interpreted: a non-2xx answer is
/// still an acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ack {
    pub http_status: u16,
    /// Text of the server's `{"status": ...}` reply, if it sent one
    pub message: Option<String>,
}

impl Ack {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.http_status)
    }
}

/// The stream control server
#[async_trait]
pub trait StreamApi: Send + Sync {
    /// Ask the server to start streaming
    async fn start(&self) -> Result<Ack, ApiError>;
    /// Ask the server to stop streaming
    async fn stop(&self) -> Result<Ack, ApiError>;
    /// Fetch the current stream status string
    async fn status(&self) -> Result<String, ApiError>;
    /// Ask the camera to refocus
    async fn focus(&self) -> Result<Ack, ApiError>;
}

/// Render the `status` field of a status reply as display text
///
/// Strings are shown as-is, any other JSON value as its JSON text.
pub fn parse_status_body(endpoint: Endpoint, body: &[u8]) -> Result<String, ApiError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| ApiError::Malformed {
        endpoint,
        reason: e.to_string(),
    })?;

    match value.get("status") {
        Some(Value::String(status)) => Ok(status.clone()),
        Some(other) => Ok(other.to_string()),
        None => Err(ApiError::Malformed {
            endpoint,
            reason: "response has no `status` field".to_string(),
        }),
    }
}

/// `StreamApi` over HTTP
pub struct HttpStreamApi {
    client: reqwest::Client,
    base: Url,
}

impl HttpStreamApi {
    /// Create a client for the server at `base_url`
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        // Url::join drops the last path segment unless the base ends with '/'
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base = Url::parse(&normalized).map_err(|e| ApiError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ApiError::Client)?;

        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Full URL of an endpoint
    pub fn endpoint_url(&self, endpoint: Endpoint) -> Result<Url, ApiError> {
        self.base
            .join(endpoint.path())
            .map_err(|e| ApiError::InvalidUrl {
                url: self.base.to_string(),
                reason: e.to_string(),
            })
    }

    async fn get(&self, endpoint: Endpoint) -> Result<reqwest::Response, ApiError> {
        let url = self.endpoint_url(endpoint)?;
        debug!("GET {}", url);
        self.client
            .get(url)
            .send()
            .await
            .map_err(|source| ApiError::Transport { endpoint, source })
    }

    async fn trigger(&self, endpoint: Endpoint) -> Result<Ack, ApiError> {
        let response = self.get(endpoint).await?;
        let http_status = response.status();
        if !http_status.is_success() {
            warn!("{} answered with HTTP {}", endpoint, http_status);
        }

        // The acknowledgement body is informational only
        let message = match response.bytes().await {
            Ok(body) => parse_status_body(endpoint, &body).ok(),
            Err(e) => {
                debug!("Could not read {} reply body: {}", endpoint, e);
                None
            }
        };

        Ok(Ack {
            http_status: http_status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl StreamApi for HttpStreamApi {
    async fn start(&self) -> Result<Ack, ApiError> {
        self.trigger(Endpoint::Start).await
    }

    async fn stop(&self) -> Result<Ack, ApiError> {
        self.trigger(Endpoint::Stop).await
    }

    async fn status(&self) -> Result<String, ApiError> {
        let response = self.get(Endpoint::Status).await?;
        let body = response
            .bytes()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: Endpoint::Status,
                source,
            })?;
        parse_status_body(Endpoint::Status, &body)
    }

    async fn focus(&self) -> Result<Ack, ApiError> {
        self.trigger(Endpoint::Focus).await
    }
}

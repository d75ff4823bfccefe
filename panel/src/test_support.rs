//! Fakes for exercising the panel without a server or media player.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use panel_core::{
    Ack, ApiError, Endpoint, PanelController, Player, PlayerFactory, SourceEndpoints, StreamApi, StreamSource,
    player::PlayerOptions,
};

use crate::app::App;

/// API that always answers the same way
pub struct FakeApi {
    status: Option<String>,
    controls_fail: bool,
}

impl FakeApi {
    pub fn reporting(status: &str) -> Self {
        Self {
            status: Some(status.to_string()),
            controls_fail: false,
        }
    }

    /// Every status request fails
    pub fn failing() -> Self {
        Self {
            status: None,
            controls_fail: false,
        }
    }

    /// Start, stop and focus requests fail
    pub fn with_failing_controls(mut self) -> Self {
        self.controls_fail = true;
        self
    }

    fn ack(&self, endpoint: Endpoint) -> Result<Ack, ApiError> {
        if self.controls_fail {
            return Err(ApiError::Malformed {
                endpoint,
                reason: "connection reset".to_string(),
            });
        }
        Ok(Ack {
            http_status: 200,
            message: None,
        })
    }
}

#[async_trait]
impl StreamApi for FakeApi {
    async fn start(&self) -> Result<Ack, ApiError> {
        self.ack(Endpoint::Start)
    }

    async fn stop(&self) -> Result<Ack, ApiError> {
        self.ack(Endpoint::Stop)
    }

    async fn status(&self) -> Result<String, ApiError> {
        self.status.clone().ok_or_else(|| ApiError::Malformed {
            endpoint: Endpoint::Status,
            reason: "not json".to_string(),
        })
    }

    async fn focus(&self) -> Result<Ack, ApiError> {
        self.ack(Endpoint::Focus)
    }
}

struct NullPlayer {
    url: String,
}

impl Player for NullPlayer {
    fn switch_url(&mut self, url: &str) -> anyhow::Result<()> {
        self.url = url.to_string();
        Ok(())
    }

    fn current_url(&self) -> &str {
        &self.url
    }

    fn stop(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Factory for players that do nothing, counting creations
#[derive(Clone, Default)]
pub struct NullPlayerFactory {
    created: Arc<AtomicUsize>,
}

impl NullPlayerFactory {
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl PlayerFactory for NullPlayerFactory {
    fn create(&self, options: &PlayerOptions) -> anyhow::Result<Box<dyn Player>> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(NullPlayer {
            url: options.url.clone(),
        }))
    }
}

pub fn test_app(api: FakeApi, selected: Option<StreamSource>) -> App<FakeApi, NullPlayerFactory> {
    let controller = PanelController::new(api, NullPlayerFactory::default(), SourceEndpoints::default(), selected);
    App::new(controller, "http://127.0.0.1:8000/")
}

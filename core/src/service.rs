//! Async operations over a `Transport`.
//!
//! # Design
//! `ServiceClient` pairs the sans-IO `SweetisticsClient` with a transport and
//! performs exactly one round trip per call. It has no mutable state, so one
//! instance can serve any number of concurrent calls.
//!
//! Read-style operations always return an outcome; a transport failure there
//! becomes `success: false` with a `request failed: ...` reason. `post` is the
//! exception and returns `Err(TransportError)` when the exchange itself fails,
//! since there is no response to describe. Once a status has arrived, a body
//! that breaks off is reported like any other unparseable body.

use serde_json::Map;
use tracing::{debug, warn};

use crate::client::SweetisticsClient;
use crate::config::ClientConfig;
use crate::error::{ConfigError, TransportError};
use crate::http::HttpRequest;
use crate::normalize::{normalize, normalize_post, parse_failure, Envelope};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{PostOutcome, SingleOutcome, TimelineOutcome};

/// Async client for the Sweetistics API.
#[derive(Debug, Clone)]
pub struct ServiceClient<T = ReqwestTransport> {
    api: SweetisticsClient,
    transport: T,
}

impl ServiceClient<ReqwestTransport> {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, ReqwestTransport::new())
    }

    /// Validate the settings and build a client over the default transport.
    pub fn connect(
        base_url: &str,
        api_key: &str,
        user_agent: Option<&str>,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(ClientConfig::new(base_url, api_key, user_agent)?))
    }
}

impl<T: Transport> ServiceClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            api: SweetisticsClient::new(config),
            transport,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        self.api.config()
    }

    /// Post `text`, optionally as a reply. Not idempotent: each successful
    /// call creates a new message.
    pub async fn post(
        &self,
        text: &str,
        reply_to: Option<&str>,
    ) -> Result<PostOutcome, TransportError> {
        let request = self.api.build_post(text, reply_to)?;
        debug!(url = %request.url, reply = reply_to.is_some(), "posting message");
        match self.transport.execute(request).await {
            Ok(response) => Ok(normalize_post(&response)),
            Err(TransportError::Body(detail)) => {
                warn!("post response body incomplete: {detail}");
                Ok(PostOutcome::failed(parse_failure(&detail)))
            }
            Err(e) => {
                warn!("post transport failed: {e}");
                Err(e)
            }
        }
    }

    pub async fn read(&self, id: &str) -> SingleOutcome {
        self.fetch(self.api.build_read(id)).await
    }

    pub async fn replies(&self, id: &str) -> TimelineOutcome {
        self.fetch(self.api.build_replies(id)).await
    }

    pub async fn thread(&self, id: &str) -> TimelineOutcome {
        self.fetch(self.api.build_thread(id)).await
    }

    pub async fn search(&self, query: &str, count: u32) -> TimelineOutcome {
        self.fetch(self.api.build_search(query, count)).await
    }

    async fn fetch<E: Envelope>(&self, request: HttpRequest) -> E {
        debug!(method = request.method.as_str(), url = %request.url, "fetching");
        match self.transport.execute(request).await {
            Ok(response) => normalize(&response),
            Err(TransportError::Body(detail)) => {
                warn!("response body incomplete: {detail}");
                E::failed(parse_failure(&detail), Map::new())
            }
            Err(e) => {
                warn!("request failed: {e}");
                E::failed(format!("request failed: {e}"), Map::new())
            }
        }
    }
}

//! Stateless request builder and response parser for the Sweetistics API.
//!
//! # Design
//! `SweetisticsClient` holds only its `ClientConfig`. Every operation is split
//! into a `build_*` method producing an `HttpRequest` and a `parse_*` method
//! consuming an `HttpResponse`; the I/O in between belongs to a `Transport`
//! (see `ServiceClient`) or to any other host.

use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::normalize::{normalize, normalize_post};
use crate::types::{PostOutcome, PostTweet, SingleOutcome, TimelineOutcome};

const JSON: &str = "application/json";

/// Synchronous, stateless client for the Sweetistics API.
#[derive(Debug, Clone)]
pub struct SweetisticsClient {
    config: ClientConfig,
}

impl SweetisticsClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `POST /api/actions/tweet`. An empty `reply_to` is treated as absent.
    pub fn build_post(
        &self,
        text: &str,
        reply_to: Option<&str>,
    ) -> Result<HttpRequest, TransportError> {
        let body = serde_json::to_string(&PostTweet {
            text,
            reply_to_tweet_id: reply_to.filter(|id| !id.is_empty()),
        })?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}/api/actions/tweet", self.config.base_url()),
            headers: self.headers(&[("content-type", JSON)]),
            body: Some(body),
        })
    }

    pub fn build_read(&self, id: &str) -> HttpRequest {
        self.get(format!("/api/twitter/tweet/{}", urlencoding::encode(id)))
    }

    pub fn build_replies(&self, id: &str) -> HttpRequest {
        self.get(format!("/api/twitter/tweet/{}/replies", urlencoding::encode(id)))
    }

    pub fn build_thread(&self, id: &str) -> HttpRequest {
        self.get(format!("/api/twitter/tweet/{}/thread", urlencoding::encode(id)))
    }

    pub fn build_search(&self, query: &str, count: u32) -> HttpRequest {
        self.get(format!(
            "/api/twitter/search?q={}&count={count}",
            urlencoding::encode(query)
        ))
    }

    pub fn parse_post(&self, response: HttpResponse) -> PostOutcome {
        normalize_post(&response)
    }

    pub fn parse_read(&self, response: HttpResponse) -> SingleOutcome {
        normalize(&response)
    }

    /// Shared by replies, thread and search.
    pub fn parse_timeline(&self, response: HttpResponse) -> TimelineOutcome {
        normalize(&response)
    }

    fn get(&self, path: String) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}{path}", self.config.base_url()),
            headers: self.headers(&[("accept", JSON)]),
            body: None,
        }
    }

    /// Default headers with `extra` merged over them, last write wins.
    /// `authorization` always comes from the config.
    fn headers(&self, extra: &[(&str, &str)]) -> Vec<(String, String)> {
        let mut headers = vec![(
            "authorization".to_string(),
            format!("Bearer {}", self.config.api_key()),
        )];
        if let Some(agent) = self.config.user_agent() {
            headers.push(("user-agent".to_string(), agent.to_string()));
        }
        for (name, value) in extra {
            if name.eq_ignore_ascii_case("authorization") {
                continue;
            }
            headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
            headers.push((name.to_string(), value.to_string()));
        }
        headers
    }
}

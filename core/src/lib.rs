//! Typed client for the Sweetistics social-posting API.
//!
//! # Overview
//! Posts messages, reads single messages, replies and threads, and runs
//! searches. Responses are untrusted JSON; every call ends in one of a few
//! outcome types (`PostOutcome`, `SingleOutcome`, `TimelineOutcome`) with a
//! `success` flag and either a payload or a human-readable `reason`.
//!
//! # Design
//! - `SweetisticsClient` is sans-IO: `build_*` produces an `HttpRequest`,
//!   `parse_*` consumes an `HttpResponse`.
//! - `ServiceClient` runs those through a `Transport` (reqwest by default)
//!   and exposes the async operations.
//! - Expected failures are data. Only client construction (`ConfigError`)
//!   and a post that never reached the service (`TransportError`) are `Err`.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod normalize;
pub mod service;
pub mod transport;
pub mod types;

pub use client::SweetisticsClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::{ConfigError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use normalize::Envelope;
pub use service::ServiceClient;
pub use transport::{ReqwestTransport, Transport};
pub use types::{Author, Message, PostOutcome, SingleOutcome, TimelineOutcome};

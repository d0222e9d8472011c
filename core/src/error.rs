//! Error types for the Sweetistics client.
//!
//! # Design
//! Only two things are ever returned as `Err`: a client that cannot be
//! constructed (`ConfigError`) and a post whose exchange never completed
//! (`TransportError`). Every other failure, including a read whose transport
//! failed, is reported as `success: false` inside the outcome value. A body
//! cut off after the status line (`TransportError::Body`) counts as a response
//! that failed to parse, not as a failed exchange.

/// Errors raised while building a `ClientConfig`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The API key was empty or whitespace-only.
    #[error("Sweetistics API key is required")]
    MissingApiKey,

    /// A required environment variable was not set.
    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),
}

/// Failure to complete an HTTP exchange at all.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// reqwest could not send the request.
    #[error("HTTP transport failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The status arrived but the body could not be read to the end.
    #[error("response body incomplete: {0}")]
    Body(String),

    /// Any other transport-level failure (used by non-reqwest transports).
    #[error("connection failed: {0}")]
    Connection(String),

    /// The request payload could not be encoded as JSON.
    #[error("request serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_human_readable() {
        assert_eq!(
            ConfigError::MissingApiKey.to_string(),
            "Sweetistics API key is required"
        );
        assert_eq!(
            ConfigError::MissingEnv("SWEETISTICS_API_KEY").to_string(),
            "environment variable SWEETISTICS_API_KEY is not set"
        );
        assert_eq!(
            TransportError::Connection("refused".into()).to_string(),
            "connection failed: refused"
        );
        assert_eq!(
            TransportError::Body("unexpected EOF".into()).to_string(),
            "response body incomplete: unexpected EOF"
        );
    }
}

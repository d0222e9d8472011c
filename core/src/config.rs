//! Client configuration: base address, credential, optional user agent.

use std::fmt;

use crate::error::ConfigError;

/// Address used when the caller supplies an empty base URL.
pub const DEFAULT_BASE_URL: &str = "https://sweetistics.com";

/// Connection settings for one client.
///
/// Populated either explicitly through [`ClientConfig::new`] or from the
/// environment through [`ClientConfig::from_env`]:
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `SWEETISTICS_BASE_URL` | `https://sweetistics.com` | Service base address |
/// | `SWEETISTICS_API_KEY` | (required) | Bearer credential |
/// | `SWEETISTICS_USER_AGENT` | (absent) | `user-agent` header value |
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    api_key: String,
    user_agent: Option<String>,
}

impl ClientConfig {
    /// Fails with [`ConfigError::MissingApiKey`] when `api_key` is blank. An
    /// empty `user_agent` is dropped so no empty header is sent.
    pub fn new(
        base_url: &str,
        api_key: &str,
        user_agent: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(Self {
            base_url: normalize_base_url(base_url),
            api_key: api_key.to_string(),
            user_agent: user_agent
                .filter(|agent| !agent.is_empty())
                .map(str::to_string),
        })
    }

    /// Read the `SWEETISTICS_*` variables listed above.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key =
            lookup("SWEETISTICS_API_KEY").ok_or(ConfigError::MissingEnv("SWEETISTICS_API_KEY"))?;
        let base_url = lookup("SWEETISTICS_BASE_URL").unwrap_or_default();
        let user_agent = lookup("SWEETISTICS_USER_AGENT");
        Self::new(&base_url, &api_key, user_agent.as_deref())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }
}

// Keep the credential out of logs.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Trim, fall back to [`DEFAULT_BASE_URL`] when empty, drop one trailing `/`.
///
/// No other validation happens here; a malformed address shows up later as a
/// transport failure.
pub fn normalize_base_url(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return DEFAULT_BASE_URL.to_string();
    }
    trimmed.strip_suffix('/').unwrap_or(trimmed).to_string()
}

//! Configuration module for the Postmark client.
//!
//! Holds the server token, endpoint and timeout, plus the send defaults the
//! mail backend reads from the host environment (default sender, open
//! tracking, and whether sends report message ids instead of counts).

use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

use crate::auth::key_hint;
use crate::errors::{PostmarkError, PostmarkResult};
use crate::types::MessageDefaults;

/// Default base URL for the Postmark API.
pub const DEFAULT_BASE_URL: &str = "https://api.postmarkapp.com";

/// Default request timeout (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the Postmark client.
#[derive(Clone)]
pub struct PostmarkConfig {
    /// Server API token (stored securely).
    pub(crate) api_key: SecretString,
    /// Base URL for API requests.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Sender used when a message has none.
    pub default_sender: Option<String>,
    /// Open tracking applied when a message does not set it.
    pub track_opens: bool,
    /// Whether the mail backend returns message ids instead of a count.
    pub return_message_id: bool,
}

impl PostmarkConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> PostmarkConfigBuilder {
        PostmarkConfigBuilder::new()
    }

    /// Creates a configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `POSTMARK_API_KEY` (required): server API token
    /// - `POSTMARK_SENDER` (optional): default sender address
    /// - `POSTMARK_TRACK_OPENS` (optional): `true`/`false`
    /// - `POSTMARK_RETURN_MESSAGE_ID` (optional): `true`/`false`
    /// - `POSTMARK_BASE_URL` (optional): custom base URL
    /// - `POSTMARK_TIMEOUT` (optional): request timeout in seconds
    pub fn from_env() -> PostmarkResult<Self> {
        let api_key =
            std::env::var("POSTMARK_API_KEY").map_err(|_| PostmarkError::Configuration {
                message: "POSTMARK_API_KEY environment variable not set".to_string(),
            })?;

        let mut builder = PostmarkConfigBuilder::new().api_key(api_key);

        if let Ok(sender) = std::env::var("POSTMARK_SENDER") {
            builder = builder.default_sender(sender);
        }

        if let Some(track_opens) = env_flag("POSTMARK_TRACK_OPENS") {
            builder = builder.track_opens(track_opens);
        }

        if let Some(return_message_id) = env_flag("POSTMARK_RETURN_MESSAGE_ID") {
            builder = builder.return_message_id(return_message_id);
        }

        if let Ok(base_url) = std::env::var("POSTMARK_BASE_URL") {
            builder = builder.base_url(base_url);
        }

        if let Ok(timeout_str) = std::env::var("POSTMARK_TIMEOUT") {
            if let Ok(timeout_secs) = timeout_str.parse::<u64>() {
                builder = builder.timeout(Duration::from_secs(timeout_secs));
            }
        }

        builder.build()
    }

    /// Returns the API key (exposing the secret).
    pub(crate) fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Returns the API key hint (last 4 characters) for debugging.
    pub fn api_key_hint(&self) -> String {
        key_hint(self.api_key.expose_secret())
    }

    /// Returns the defaults applied to every outgoing message.
    pub fn message_defaults(&self) -> MessageDefaults {
        MessageDefaults {
            sender: self.default_sender.clone(),
            track_opens: self.track_opens,
        }
    }
}

impl std::fmt::Debug for PostmarkConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostmarkConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("default_sender", &self.default_sender)
            .field("track_opens", &self.track_opens)
            .field("return_message_id", &self.return_message_id)
            .finish()
    }
}

/// Builder for `PostmarkConfig`.
#[derive(Default)]
pub struct PostmarkConfigBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    default_sender: Option<String>,
    track_opens: bool,
    return_message_id: bool,
}

impl PostmarkConfigBuilder {
    /// Creates a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the server API token.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the default sender address.
    pub fn default_sender(mut self, sender: impl Into<String>) -> Self {
        self.default_sender = Some(sender.into());
        self
    }

    /// Sets the default open-tracking flag.
    pub fn track_opens(mut self, track_opens: bool) -> Self {
        self.track_opens = track_opens;
        self
    }

    /// Makes the mail backend return message ids instead of a count.
    pub fn return_message_id(mut self, enabled: bool) -> Self {
        self.return_message_id = enabled;
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> PostmarkResult<PostmarkConfig> {
        let api_key = self.api_key.ok_or_else(|| PostmarkError::Configuration {
            message: "API key is required".to_string(),
        })?;

        if api_key.is_empty() {
            return Err(PostmarkError::Configuration {
                message: "API key cannot be empty".to_string(),
            });
        }

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let parsed = url::Url::parse(&base_url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(PostmarkError::Configuration {
                message: "Base URL must start with http:// or https://".to_string(),
            });
        }

        Ok(PostmarkConfig {
            api_key: SecretString::new(api_key),
            base_url,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            default_sender: self.default_sender,
            track_opens: self.track_opens,
            return_message_id: self.return_message_id,
        })
    }
}

fn env_flag(name: &str) -> Option<bool> {
    let value = std::env::var(name).ok()?;
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            tracing::warn!(variable = name, value = %value, "Ignoring unrecognised boolean setting");
            None
        }
    }
}

//! Authentication module for the Postmark client.
//!
//! Postmark authenticates server calls with the `X-Postmark-Server-Token`
//! header rather than a bearer token.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;

use crate::errors::PostmarkError;

/// Header carrying the server API token.
pub const SERVER_TOKEN_HEADER: &str = "X-Postmark-Server-Token";

/// Authentication provider trait.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Apply authentication to request headers.
    fn apply_auth(&self, headers: &mut HashMap<String, String>);

    /// Validate the credentials.
    fn validate(&self) -> Result<(), PostmarkError>;
}

/// Server token authentication provider.
pub struct ServerTokenAuth {
    api_key: SecretString,
}

impl ServerTokenAuth {
    /// Creates a new server token provider.
    pub fn new(api_key: SecretString) -> Self {
        Self { api_key }
    }

    /// Creates from a string API key.
    pub fn from_string(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
        }
    }

    /// Gets a hint of the API key for debugging (last 4 characters).
    pub fn key_hint(&self) -> String {
        key_hint(self.api_key.expose_secret())
    }
}

/// Masks a token down to its last four characters.
pub(crate) fn key_hint(key: &str) -> String {
    let count = key.chars().count();
    if count > 4 {
        let tail: String = key.chars().skip(count - 4).collect();
        format!("...{tail}")
    } else {
        "****".to_string()
    }
}

#[async_trait]
impl AuthProvider for ServerTokenAuth {
    fn apply_auth(&self, headers: &mut HashMap<String, String>) {
        headers.insert(
            SERVER_TOKEN_HEADER.to_string(),
            self.api_key.expose_secret().clone(),
        );
    }

    fn validate(&self) -> Result<(), PostmarkError> {
        if self.api_key.expose_secret().is_empty() {
            return Err(PostmarkError::Configuration {
                message: "API key cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}

impl std::fmt::Debug for ServerTokenAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerTokenAuth")
            .field("api_key", &"[REDACTED]")
            .field("key_hint", &self.key_hint())
            .finish()
    }
}

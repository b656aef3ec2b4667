//! Postmark API client.
//!
//! Provides the main client interface for sending email and fetching bounce
//! dumps.

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{AuthProvider, ServerTokenAuth};
use crate::config::{PostmarkConfig, PostmarkConfigBuilder};
use crate::errors::{PostmarkError, PostmarkResult};
use crate::services::{BounceService, EmailService};
use crate::transport::{HttpTransport, HttpTransportImpl};

/// The main Postmark client.
///
/// # Example
///
/// ```rust,no_run
/// use postmark_client::{Message, PostmarkClient};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = PostmarkClient::builder()
///         .api_key("your-server-token")
///         .default_sender("noreply@example.com")
///         .build()?;
///
///     let message = Message::builder()
///         .to("receiver@example.com")
///         .subject("Hello")
///         .text_body("Hello from Postmark")
///         .build();
///
///     let response = client.emails().send(&message).await?;
///     println!("{:?}", response.message_id);
///     Ok(())
/// }
/// ```
pub struct PostmarkClient {
    config: PostmarkConfig,
    email_service: EmailService,
    bounce_service: BounceService,
}

impl PostmarkClient {
    /// Creates a new client builder.
    pub fn builder() -> PostmarkClientBuilder {
        PostmarkClientBuilder::new()
    }

    /// Creates a client from environment variables.
    ///
    /// See [`PostmarkConfig::from_env`] for the variables read.
    pub fn from_env() -> PostmarkResult<Self> {
        let config = PostmarkConfig::from_env()?;
        PostmarkClientBuilder::from_config(config).build()
    }

    /// Creates a client from a server API token.
    pub fn from_api_key(api_key: impl Into<String>) -> PostmarkResult<Self> {
        PostmarkClientBuilder::new().api_key(api_key).build()
    }

    /// Returns the email service.
    pub fn emails(&self) -> &EmailService {
        &self.email_service
    }

    /// Returns the bounce service.
    pub fn bounces(&self) -> &BounceService {
        &self.bounce_service
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PostmarkConfig {
        &self.config
    }
}

impl std::fmt::Debug for PostmarkClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostmarkClient")
            .field("config", &self.config)
            .finish()
    }
}

/// Builder for the Postmark client.
pub struct PostmarkClientBuilder {
    config_builder: PostmarkConfigBuilder,
    transport: Option<Arc<dyn HttpTransport>>,
    auth: Option<Arc<dyn AuthProvider>>,
}

impl PostmarkClientBuilder {
    /// Creates a new client builder.
    pub fn new() -> Self {
        Self {
            config_builder: PostmarkConfigBuilder::new(),
            transport: None,
            auth: None,
        }
    }

    /// Creates a builder from an existing configuration.
    pub fn from_config(config: PostmarkConfig) -> Self {
        let mut config_builder = PostmarkConfigBuilder::new()
            .api_key(config.api_key())
            .base_url(&config.base_url)
            .timeout(config.timeout)
            .track_opens(config.track_opens)
            .return_message_id(config.return_message_id);

        if let Some(sender) = config.default_sender {
            config_builder = config_builder.default_sender(sender);
        }

        Self {
            config_builder,
            transport: None,
            auth: None,
        }
    }

    /// Sets the server API token.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.api_key(api_key);
        self
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.base_url(base_url);
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config_builder = self.config_builder.timeout(timeout);
        self
    }

    /// Sets the default sender address.
    pub fn default_sender(mut self, sender: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.default_sender(sender);
        self
    }

    /// Sets the default open-tracking flag.
    pub fn track_opens(mut self, track_opens: bool) -> Self {
        self.config_builder = self.config_builder.track_opens(track_opens);
        self
    }

    /// Makes the mail backend return message ids instead of a count.
    pub fn return_message_id(mut self, enabled: bool) -> Self {
        self.config_builder = self.config_builder.return_message_id(enabled);
        self
    }

    /// Sets a custom transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets a custom auth provider.
    pub fn auth(mut self, auth: Arc<dyn AuthProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Builds the client.
    pub fn build(self) -> PostmarkResult<PostmarkClient> {
        let config = self.config_builder.build()?;

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(t) => t,
            None => Arc::new(
                HttpTransportImpl::new(&config.base_url, config.timeout).map_err(|e| {
                    PostmarkError::Configuration {
                        message: e.to_string(),
                    }
                })?,
            ),
        };

        let auth: Arc<dyn AuthProvider> = match self.auth {
            Some(a) => a,
            None => Arc::new(ServerTokenAuth::from_string(config.api_key())),
        };
        auth.validate()?;

        let email_service = EmailService::new(
            Arc::clone(&transport),
            Arc::clone(&auth),
            config.message_defaults(),
        );
        let bounce_service = BounceService::new(transport, auth);

        tracing::debug!(
            base_url = %config.base_url,
            api_key = %config.api_key_hint(),
            "Postmark client created"
        );

        Ok(PostmarkClient {
            config,
            email_service,
            bounce_service,
        })
    }
}

impl Default for PostmarkClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

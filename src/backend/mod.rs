//! Mail backend for host frameworks.
//!
//! A host framework hands over its outbound messages as [`OutboundEmail`]
//! values; [`PostmarkBackend`] converts them, sends them through the
//! Postmark client and reports either how many were accepted or their
//! message ids.
//!
//! ```rust,no_run
//! use postmark_client::backend::{EmailBackend, OutboundEmail, PostmarkBackend};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = PostmarkBackend::from_env()?;
//!
//!     let email = OutboundEmail::new("Welcome", "Hello there")
//!         .from_email("noreply@example.com")
//!         .to("receiver@example.com")
//!         .attach_alternative("<b>Hello</b> there", "text/html");
//!
//!     let outcome = backend.send_messages(&[email]).await?;
//!     println!("accepted {}", outcome.count());
//!     Ok(())
//! }
//! ```

mod outbound;

pub use outbound::{ContentSubtype, OutboundAttachment, OutboundEmail, PostmarkOptions};

use async_trait::async_trait;
use tracing::instrument;

use crate::client::PostmarkClient;
use crate::errors::PostmarkResult;
use crate::types::{Message, SendResponse};

/// What a send reports back to the host framework.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Number of messages Postmark accepted.
    Count(usize),
    /// Message ids of accepted messages, in submission order.
    MessageIds(Vec<String>),
}

impl SendOutcome {
    /// Returns the number of accepted messages.
    pub fn count(&self) -> usize {
        match self {
            SendOutcome::Count(count) => *count,
            SendOutcome::MessageIds(ids) => ids.len(),
        }
    }

    /// Returns the message ids, if ids were requested.
    pub fn message_ids(&self) -> Option<&[String]> {
        match self {
            SendOutcome::Count(_) => None,
            SendOutcome::MessageIds(ids) => Some(ids),
        }
    }
}

/// Outbound-mail contract a host framework calls into.
#[async_trait]
pub trait EmailBackend: Send + Sync + std::fmt::Debug {
    /// Sends a group of messages.
    async fn send_messages(&self, messages: &[OutboundEmail]) -> PostmarkResult<SendOutcome>;

    /// Sends one message.
    async fn send_message(&self, message: &OutboundEmail) -> PostmarkResult<SendOutcome> {
        self.send_messages(std::slice::from_ref(message)).await
    }

    /// Returns the backend name.
    fn backend_name(&self) -> &'static str;
}

/// [`EmailBackend`] that delivers through Postmark.
///
/// Messages without any recipient are skipped. What is left goes out as a
/// single send for one message or a batch send for several; nothing is
/// sent when no message is left.
pub struct PostmarkBackend {
    client: PostmarkClient,
    return_message_id: bool,
}

impl PostmarkBackend {
    /// Creates a backend, taking the result shape from the client's configuration.
    pub fn new(client: PostmarkClient) -> Self {
        let return_message_id = client.config().return_message_id;
        Self {
            client,
            return_message_id,
        }
    }

    /// Creates a backend from environment variables.
    pub fn from_env() -> PostmarkResult<Self> {
        Ok(Self::new(PostmarkClient::from_env()?))
    }

    /// Overrides whether sends report message ids instead of a count.
    pub fn with_return_message_id(mut self, enabled: bool) -> Self {
        self.return_message_id = enabled;
        self
    }

    /// Returns the underlying client.
    pub fn client(&self) -> &PostmarkClient {
        &self.client
    }

    fn outcome(&self, responses: &[SendResponse]) -> SendOutcome {
        let accepted = responses.iter().filter(|r| r.is_success());
        if self.return_message_id {
            SendOutcome::MessageIds(accepted.filter_map(|r| r.message_id.clone()).collect())
        } else {
            SendOutcome::Count(accepted.count())
        }
    }
}

#[async_trait]
impl EmailBackend for PostmarkBackend {
    #[instrument(skip(self, messages), fields(count = messages.len()))]
    async fn send_messages(&self, messages: &[OutboundEmail]) -> PostmarkResult<SendOutcome> {
        if messages.is_empty() {
            return Ok(SendOutcome::Count(0));
        }

        let prepared: Vec<Message> = messages
            .iter()
            .filter(|m| m.has_recipients())
            .map(OutboundEmail::to_message)
            .collect();

        let skipped = messages.len() - prepared.len();
        if skipped > 0 {
            tracing::debug!(skipped, "Skipping messages without recipients");
        }

        // Single or batch is decided by how many messages were given.
        let responses = match (messages.len(), prepared.as_slice()) {
            (_, []) => Vec::new(),
            (1, [single]) => vec![self.client.emails().send(single).await?],
            (_, batch) => self.client.emails().send_batch(batch).await?,
        };

        Ok(self.outcome(&responses))
    }

    fn backend_name(&self) -> &'static str {
        "postmark"
    }
}

impl std::fmt::Debug for PostmarkBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostmarkBackend")
            .field("client", &self.client)
            .field("return_message_id", &self.return_message_id)
            .finish()
    }
}

//! Email service.

use std::sync::Arc;
use tracing::instrument;

use super::{parse_response, with_default_headers};
use crate::auth::AuthProvider;
use crate::errors::PostmarkResult;
use crate::transport::{HttpRequest, HttpTransport};
use crate::types::{EmailPayload, Message, MessageDefaults, SendResponse};

/// Largest number of messages Postmark accepts in one batch call.
pub const MAX_BATCH_MESSAGES: usize = 500;

/// Email service for single and batch sends.
pub struct EmailService {
    transport: Arc<dyn HttpTransport>,
    auth: Arc<dyn AuthProvider>,
    defaults: MessageDefaults,
}

impl EmailService {
    /// Creates a new email service.
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        auth: Arc<dyn AuthProvider>,
        defaults: MessageDefaults,
    ) -> Self {
        Self {
            transport,
            auth,
            defaults,
        }
    }

    /// Returns the defaults applied to outgoing messages.
    pub fn defaults(&self) -> &MessageDefaults {
        &self.defaults
    }

    /// Validates a message and builds its payload without sending it.
    pub fn build_payload(&self, message: &Message) -> PostmarkResult<EmailPayload> {
        EmailPayload::build(message, &self.defaults)
    }

    /// Sends a single message.
    ///
    /// Template messages go to `/email/withTemplate`, everything else to
    /// `/email`. Validation failures return before any request is made.
    #[instrument(skip(self, message), fields(recipients = message.to.len() + message.cc.len() + message.bcc.len()))]
    pub async fn send(&self, message: &Message) -> PostmarkResult<SendResponse> {
        let payload = self.build_payload(message)?;
        let path = if payload.uses_template() {
            "email/withTemplate"
        } else {
            "email"
        };

        let body = serde_json::to_vec(&payload)?;
        let request = with_default_headers(HttpRequest::post(path).with_body(body), self.auth.as_ref());

        let response = self.transport.send(request).await?;
        let result: SendResponse = parse_response(response)?;

        tracing::info!(
            message_id = result.message_id.as_deref().unwrap_or_default(),
            error_code = result.error_code,
            "Message submitted"
        );

        Ok(result)
    }

    /// Sends messages through `/email/batch`.
    ///
    /// Every message is validated before the first request. Results are in
    /// input order; more than [`MAX_BATCH_MESSAGES`] messages are sent as
    /// consecutive calls, and a failing call fails the whole batch.
    #[instrument(skip(self, messages), fields(count = messages.len()))]
    pub async fn send_batch(&self, messages: &[Message]) -> PostmarkResult<Vec<SendResponse>> {
        if messages.is_empty() {
            return Ok(Vec::new());
        }

        let payloads = messages
            .iter()
            .map(|m| self.build_payload(m))
            .collect::<PostmarkResult<Vec<_>>>()?;

        let mut results = Vec::with_capacity(payloads.len());
        for chunk in payloads.chunks(MAX_BATCH_MESSAGES) {
            let body = serde_json::to_vec(chunk)?;
            let request =
                with_default_headers(HttpRequest::post("email/batch").with_body(body), self.auth.as_ref());

            let response = self.transport.send(request).await?;
            let chunk_results: Vec<SendResponse> = parse_response(response)?;
            results.extend(chunk_results);
        }

        tracing::info!(
            submitted = results.len(),
            accepted = results.iter().filter(|r| r.is_success()).count(),
            "Batch submitted"
        );

        Ok(results)
    }
}

impl std::fmt::Debug for EmailService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailService")
            .field("defaults", &self.defaults)
            .finish()
    }
}

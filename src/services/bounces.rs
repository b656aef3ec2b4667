//! Bounce service.

use std::sync::Arc;
use tracing::instrument;

use super::{parse_response, with_default_headers};
use crate::auth::AuthProvider;
use crate::errors::PostmarkResult;
use crate::transport::{HttpRequest, HttpTransport};
use crate::types::BounceDump;

/// Bounce service.
pub struct BounceService {
    transport: Arc<dyn HttpTransport>,
    auth: Arc<dyn AuthProvider>,
}

impl BounceService {
    /// Creates a new bounce service.
    pub fn new(transport: Arc<dyn HttpTransport>, auth: Arc<dyn AuthProvider>) -> Self {
        Self { transport, auth }
    }

    /// Fetches the raw source of a bounced message.
    #[instrument(skip(self))]
    pub async fn dump(&self, bounce_id: u64) -> PostmarkResult<BounceDump> {
        let request = with_default_headers(
            HttpRequest::get(format!("bounces/{}/dump", bounce_id)),
            self.auth.as_ref(),
        );

        let response = self.transport.send(request).await?;
        parse_response(response)
    }
}

impl std::fmt::Debug for BounceService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BounceService").finish()
    }
}

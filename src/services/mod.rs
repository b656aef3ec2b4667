//! Service implementations for the Postmark API.
//!
//! [`EmailService`] sends single and batch messages; [`BounceService`]
//! fetches bounce dumps. Both share request construction and response
//! classification from this module.

mod bounces;
mod email;

pub use bounces::BounceService;
pub use email::{EmailService, MAX_BATCH_MESSAGES};

use crate::auth::AuthProvider;
use crate::errors::{ApiErrorResponse, PostmarkError, PostmarkResult, INACTIVE_RECIPIENT_ERROR_CODE};
use crate::transport::{HttpRequest, HttpResponse};

/// Adds the JSON and auth headers every Postmark call carries.
pub(crate) fn with_default_headers(mut request: HttpRequest, auth: &dyn AuthProvider) -> HttpRequest {
    let headers = &mut request.headers;
    headers.insert("Accept".to_string(), "application/json".to_string());
    headers.insert("Content-Type".to_string(), "application/json".to_string());
    auth.apply_auth(headers);
    request
}

/// Parses a 2xx body, or classifies the failure.
pub(crate) fn parse_response<T: serde::de::DeserializeOwned>(
    response: HttpResponse,
) -> PostmarkResult<T> {
    if !response.is_success() {
        return Err(parse_error_response(&response));
    }

    response.json().map_err(|e| PostmarkError::Serialization {
        message: format!("Failed to parse response: {}", e),
    })
}

/// Classifies a non-2xx response.
pub(crate) fn parse_error_response(response: &HttpResponse) -> PostmarkError {
    let body = response.json::<ApiErrorResponse>().ok();
    let message = body
        .as_ref()
        .map(|b| b.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            let text = response.text();
            if text.is_empty() {
                format!("HTTP error: {}", response.status)
            } else {
                text
            }
        });

    match response.status {
        422 => match body.map(|b| b.error_code) {
            Some(INACTIVE_RECIPIENT_ERROR_CODE) => PostmarkError::InactiveRecipient { message },
            error_code => PostmarkError::UnprocessableEntity {
                error_code,
                message,
            },
        },
        401 => PostmarkError::Unauthorized { message },
        500..=599 => PostmarkError::Server {
            status_code: response.status,
            message,
        },
        status => PostmarkError::Http { status, message },
    }
}

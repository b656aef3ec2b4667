//! Error types for the Postmark client.
//!
//! Covers local validation failures (raised before any request is made),
//! provider rejections classified from the HTTP status and Postmark
//! `ErrorCode`, and transport failures.

use std::fmt;
use thiserror::Error;

use crate::transport::TransportError;

/// Result type alias for Postmark operations.
pub type PostmarkResult<T> = Result<T, PostmarkError>;

/// Postmark `ErrorCode` for an inactive (suppressed) recipient.
pub const INACTIVE_RECIPIENT_ERROR_CODE: i64 = 406;

/// Error type for Postmark client operations.
#[derive(Debug, Error)]
pub enum PostmarkError {
    /// Configuration error (missing API key, invalid base URL, etc.)
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message describing the configuration issue.
        message: String,
    },

    /// A required message field is missing or incomplete.
    #[error("Missing value for {field}: {}", .field.description())]
    MissingValue {
        /// The field that failed validation.
        field: MissingField,
    },

    /// A metadata value is not a plain string.
    #[error("Metadata value for '{key}' must be a string, found {found}")]
    InvalidMetadata {
        /// The offending metadata key.
        key: String,
        /// The JSON kind that was found instead.
        found: &'static str,
    },

    /// The recipient is inactive or on a suppression list.
    #[error("Inactive recipient: {message}")]
    InactiveRecipient {
        /// Message text returned by Postmark.
        message: String,
    },

    /// Postmark rejected the payload (HTTP 422).
    #[error("Unprocessable entity (ErrorCode {error_code:?}): {message}")]
    UnprocessableEntity {
        /// Postmark error code, when the body could be parsed.
        error_code: Option<i64>,
        /// Message text returned by Postmark.
        message: String,
    },

    /// The server token was rejected (HTTP 401).
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Message text returned by Postmark.
        message: String,
    },

    /// Server error (5xx status codes).
    #[error("Server error (HTTP {status_code}): {message}")]
    Server {
        /// HTTP status code.
        status_code: u16,
        /// Error message.
        message: String,
    },

    /// Any other non-2xx response.
    #[error("Unexpected HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },

    /// Network failure before a response could be read.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Serialization/deserialization error.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message.
        message: String,
    },
}

/// Message fields checked before a send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    /// Non-template messages need a subject.
    Subject,
    /// At least one `To` or `Bcc` recipient.
    Recipients,
    /// A template id or alias needs a template model, and only one of them may be set.
    TemplatePairing,
    /// A template model needs a template id or alias.
    TemplateReference,
    /// No sender on the message and no default sender configured.
    Sender,
}

impl MissingField {
    /// Returns the short field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            MissingField::Subject => "subject",
            MissingField::Recipients => "recipients",
            MissingField::TemplatePairing => "template pairing",
            MissingField::TemplateReference => "template reference",
            MissingField::Sender => "sender",
        }
    }

    /// Returns a human-readable description of the failed check.
    pub fn description(&self) -> &'static str {
        match self {
            MissingField::Subject => "cannot send an e-mail without a subject",
            MissingField::Recipients => {
                "cannot send an e-mail without at least one recipient (to or bcc)"
            }
            MissingField::TemplatePairing => {
                "a template e-mail needs exactly one of template_id or template_alias, together with template_model"
            }
            MissingField::TemplateReference => {
                "cannot send a template e-mail without either a template_id or template_alias"
            }
            MissingField::Sender => "cannot send an e-mail without a sender",
        }
    }
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PostmarkError {
    /// Creates a missing value error.
    pub fn missing(field: MissingField) -> Self {
        PostmarkError::MissingValue { field }
    }

    /// Returns the missing field, if this is a validation failure.
    pub fn missing_field(&self) -> Option<MissingField> {
        match self {
            PostmarkError::MissingValue { field } => Some(*field),
            _ => None,
        }
    }

    /// Returns true if the error was raised locally, before any request.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            PostmarkError::MissingValue { .. }
                | PostmarkError::InvalidMetadata { .. }
                | PostmarkError::Configuration { .. }
        )
    }

    /// Returns the HTTP status code for provider errors.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            PostmarkError::InactiveRecipient { .. } | PostmarkError::UnprocessableEntity { .. } => {
                Some(422)
            }
            PostmarkError::Unauthorized { .. } => Some(401),
            PostmarkError::Server { status_code, .. } => Some(*status_code),
            PostmarkError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Error body returned by Postmark on non-2xx responses.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ApiErrorResponse {
    /// Postmark error code (non-zero).
    #[serde(rename = "ErrorCode")]
    pub error_code: i64,
    /// Human-readable error text.
    #[serde(rename = "Message", default)]
    pub message: String,
}

impl From<serde_json::Error> for PostmarkError {
    fn from(err: serde_json::Error) -> Self {
        PostmarkError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for PostmarkError {
    fn from(err: url::ParseError) -> Self {
        PostmarkError::Configuration {
            message: format!("Invalid URL: {}", err),
        }
    }
}

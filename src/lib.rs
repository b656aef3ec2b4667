//! Postmark Client Library
//!
//! An async Rust client for the Postmark transactional email API. Sends
//! single, template and batch messages, fetches bounce dumps, and ships a
//! mail backend that host frameworks can hand their outbound messages to.
//!
//! # Features
//!
//! - **Local validation**: subject, recipients and template references are
//!   checked before anything goes on the wire
//! - **Typed errors**: inactive recipients, rejected payloads and server
//!   failures map to distinct [`PostmarkError`] variants
//! - **Attachments**: caller-built files and MIME parts, including inline
//!   images referenced by content id
//! - **Mail backend**: [`backend::PostmarkBackend`] returns an accepted count
//!   or the Postmark message ids
//! - **Observability**: `tracing` spans on every call
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use postmark_client::{Message, Metadata, PostmarkClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PostmarkClient::builder()
//!         .api_key("your-server-token")
//!         .build()?;
//!
//!     let message = Message::builder()
//!         .sender("sender@example.com")
//!         .to("receiver@example.com")
//!         .subject("Order confirmation")
//!         .html_body("<p>Thanks for your order.</p>")
//!         .metadata(Metadata::new().with("order", "1234"))
//!         .build();
//!
//!     let response = client.emails().send(&message).await?;
//!     println!("sent {:?}", response.message_id);
//!     Ok(())
//! }
//! ```
//!
//! # Templates
//!
//! ```rust,no_run
//! use postmark_client::{Message, PostmarkClient};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PostmarkClient::from_env()?;
//!
//!     let message = Message::builder()
//!         .to("receiver@example.com")
//!         .template_alias("welcome")
//!         .template_model(json!({"name": "Ada"}))
//!         .build();
//!
//!     client.emails().send(&message).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod auth;
pub mod backend;
pub mod client;
pub mod config;
pub mod errors;
pub mod observability;
pub mod services;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use backend::{EmailBackend, OutboundEmail, PostmarkBackend, SendOutcome};
pub use client::{PostmarkClient, PostmarkClientBuilder};
pub use config::PostmarkConfig;
pub use errors::{MissingField, PostmarkError, PostmarkResult};

// Type re-exports
pub use types::{
    Attachment, BounceDump, Header, Message, MessageBuilder, Metadata, MimePart, SendResponse,
    Template,
};

/// Mock implementations for testing.
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

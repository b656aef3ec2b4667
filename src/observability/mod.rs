//! Observability module for the Postmark client.
//!
//! Services emit `tracing` spans and events; this module holds the helpers
//! they share and an optional subscriber setup.

mod logging;

pub use logging::{log_request, log_response, LogFormat, LogLevel, LoggingConfig};

//! Message, payload and response types.

mod attachment;
mod message;
mod metadata;
mod payload;
mod response;

pub use attachment::{
    Attachment, AttachmentContent, AttachmentPayload, FileAttachment, MimePart,
    DEFAULT_MIME_FILENAME,
};
pub use message::{Header, Message, MessageBuilder, Template};
pub use metadata::Metadata;
pub use payload::{EmailPayload, HeaderPayload};
pub use response::{BounceDump, SendResponse};

/// Per-client defaults applied when a message leaves a field unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageDefaults {
    /// Sender used when the message has none.
    pub sender: Option<String>,
    /// When true, messages that do not set open tracking get `TrackOpens: true`.
    pub track_opens: bool,
}

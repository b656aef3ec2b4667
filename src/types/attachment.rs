//! Attachment types.
//!
//! Two shapes are accepted: caller-built attachments (name, content,
//! content type and an optional content id) and MIME parts taken from an
//! already-assembled message. They differ in how the `ContentID` is derived:
//!
//! | Source | `ContentID` |
//! |---|---|
//! | caller attachment without id | omitted |
//! | caller attachment with id | the id exactly as given |
//! | MIME part without `Content-ID` | omitted |
//! | MIME part with `Content-ID` | id without angle brackets |
//! | same, with an `inline` disposition | `cid:` + id without angle brackets, unless already prefixed |

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;

/// Name used for MIME parts that carry no filename.
pub const DEFAULT_MIME_FILENAME: &str = "attachment.txt";

/// Content of a caller-built attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentContent {
    /// Content that is already base64 text.
    Encoded(String),
    /// Raw bytes, encoded when the payload is built.
    Bytes(Vec<u8>),
}

impl AttachmentContent {
    /// Returns the base64 text for the payload.
    pub fn to_base64(&self) -> String {
        match self {
            AttachmentContent::Encoded(text) => text.clone(),
            AttachmentContent::Bytes(bytes) => STANDARD.encode(bytes),
        }
    }
}

/// Caller-built attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttachment {
    /// Attachment name.
    pub name: String,
    /// Attachment content.
    pub content: AttachmentContent,
    /// MIME content type.
    pub content_type: String,
    /// Content id for inline references, forwarded verbatim.
    pub content_id: Option<String>,
}

/// A MIME part lifted from an assembled message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MimePart {
    /// Filename from the part's `Content-Type`/`Content-Disposition` parameters.
    pub filename: Option<String>,
    /// MIME content type.
    pub content_type: String,
    /// Decoded part body.
    pub data: Vec<u8>,
    /// Raw `Content-ID` header, usually `<id@host>`.
    pub content_id: Option<String>,
    /// Raw `Content-Disposition` header.
    pub disposition: Option<String>,
}

impl MimePart {
    /// Creates a MIME part.
    pub fn new(content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            filename: None,
            content_type: content_type.into(),
            data,
            content_id: None,
            disposition: None,
        }
    }

    /// Sets the filename parameter.
    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Sets the `Content-ID` header.
    pub fn content_id(mut self, content_id: impl Into<String>) -> Self {
        self.content_id = Some(content_id.into());
        self
    }

    /// Sets the `Content-Disposition` header.
    pub fn disposition(mut self, disposition: impl Into<String>) -> Self {
        self.disposition = Some(disposition.into());
        self
    }

    /// Returns true if the disposition marks the part inline.
    pub fn is_inline(&self) -> bool {
        self.disposition
            .as_deref()
            .map(|d| d.trim_start().to_ascii_lowercase().starts_with("inline"))
            .unwrap_or(false)
    }

    /// Returns the content id to send, following the table in the module docs.
    pub fn payload_content_id(&self) -> Option<String> {
        let raw = self.content_id.as_deref()?.trim();
        let stripped = raw
            .strip_prefix('<')
            .and_then(|s| s.strip_suffix('>'))
            .unwrap_or(raw);

        if self.is_inline() && !stripped.starts_with("cid:") {
            Some(format!("cid:{}", stripped))
        } else {
            Some(stripped.to_string())
        }
    }
}

/// An attachment on a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attachment {
    /// Caller-built attachment.
    File(FileAttachment),
    /// MIME part from an assembled message.
    Mime(MimePart),
}

impl Attachment {
    /// Creates an attachment from content that is already base64 text.
    pub fn new(
        name: impl Into<String>,
        content: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Attachment::File(FileAttachment {
            name: name.into(),
            content: AttachmentContent::Encoded(content.into()),
            content_type: content_type.into(),
            content_id: None,
        })
    }

    /// Creates an attachment from raw bytes.
    pub fn from_bytes(
        name: impl Into<String>,
        data: Vec<u8>,
        content_type: impl Into<String>,
    ) -> Self {
        Attachment::File(FileAttachment {
            name: name.into(),
            content: AttachmentContent::Bytes(data),
            content_type: content_type.into(),
            content_id: None,
        })
    }

    /// Creates an attachment from raw bytes, guessing the content type from the name.
    pub fn guess_from_bytes(name: impl Into<String>, data: Vec<u8>) -> Self {
        let name = name.into();
        let content_type = mime_guess::from_path(&name)
            .first_or_octet_stream()
            .to_string();
        Self::from_bytes(name, data, content_type)
    }

    /// Sets the content id of a caller-built attachment.
    ///
    /// The id is sent exactly as given, so inline images referenced as
    /// `cid:...` in HTML should pass the prefixed form. MIME parts keep the
    /// id from their own `Content-ID` header and are left untouched.
    pub fn with_content_id(self, content_id: impl Into<String>) -> Self {
        match self {
            Attachment::File(mut file) => {
                file.content_id = Some(content_id.into());
                Attachment::File(file)
            }
            mime @ Attachment::Mime(_) => mime,
        }
    }

    /// Returns the payload representation.
    pub fn to_payload(&self) -> AttachmentPayload {
        match self {
            Attachment::File(file) => AttachmentPayload {
                name: file.name.clone(),
                content: file.content.to_base64(),
                content_type: file.content_type.clone(),
                content_id: file.content_id.clone(),
            },
            Attachment::Mime(part) => AttachmentPayload {
                name: part
                    .filename
                    .clone()
                    .unwrap_or_else(|| DEFAULT_MIME_FILENAME.to_string()),
                content: STANDARD.encode(&part.data),
                content_type: part.content_type.clone(),
                content_id: part.payload_content_id(),
            },
        }
    }
}

impl From<MimePart> for Attachment {
    fn from(part: MimePart) -> Self {
        Attachment::Mime(part)
    }
}

impl From<FileAttachment> for Attachment {
    fn from(file: FileAttachment) -> Self {
        Attachment::File(file)
    }
}

/// Attachment as sent to Postmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachmentPayload {
    /// Attachment name.
    #[serde(rename = "Name")]
    pub name: String,
    /// Base64 content.
    #[serde(rename = "Content")]
    pub content: String,
    /// MIME content type.
    #[serde(rename = "ContentType")]
    pub content_type: String,
    /// Content id, omitted for plain attachments.
    #[serde(rename = "ContentID", skip_serializing_if = "Option::is_none")]
    pub content_id: Option<String>,
}

//! Framework-side message model and its conversion to a Postmark [`Message`].

use crate::types::{Attachment, Message, Metadata, MimePart};

const REPLY_TO_HEADER: &str = "Reply-To";
const MESSAGE_STREAM_HEADER: &str = "X-PM-Message-Stream";
const TAG_HEADER: &str = "X-PM-Tag";
const TRACK_OPENS_HEADER: &str = "X-PM-TrackOpens";
const METADATA_HEADER_PREFIX: &str = "X-PM-Metadata-";

/// How the main body of an [`OutboundEmail`] is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContentSubtype {
    /// Plain text; an HTML alternative may be attached.
    #[default]
    Plain,
    /// The body itself is HTML.
    Html,
}

/// An attachment on a framework message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundAttachment {
    /// A file given as name, raw content and an optional MIME type.
    File {
        /// File name.
        filename: String,
        /// Raw content.
        content: Vec<u8>,
        /// MIME type, guessed from the file name when absent.
        mimetype: Option<String>,
        /// Content id for inline use, sent as given.
        content_id: Option<String>,
    },
    /// A prebuilt MIME part.
    Mime(MimePart),
}

impl OutboundAttachment {
    /// Creates a file attachment.
    pub fn file(filename: impl Into<String>, content: Vec<u8>, mimetype: Option<&str>) -> Self {
        OutboundAttachment::File {
            filename: filename.into(),
            content,
            mimetype: mimetype.map(str::to_string),
            content_id: None,
        }
    }

    fn to_attachment(&self) -> Attachment {
        match self {
            OutboundAttachment::File {
                filename,
                content,
                mimetype,
                content_id,
            } => {
                let attachment = match mimetype {
                    Some(mimetype) => Attachment::from_bytes(filename.clone(), content.clone(), mimetype.clone()),
                    None => Attachment::guess_from_bytes(filename.clone(), content.clone()),
                };
                match content_id {
                    Some(id) => attachment.with_content_id(id.clone()),
                    None => attachment,
                }
            }
            OutboundAttachment::Mime(part) => Attachment::Mime(part.clone()),
        }
    }
}

/// Postmark-specific settings carried on a framework message.
///
/// Set fields take precedence over the equivalent `X-PM-*` headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostmarkOptions {
    /// Message stream.
    pub message_stream: Option<String>,
    /// Tag.
    pub tag: Option<String>,
    /// Open tracking.
    pub track_opens: Option<bool>,
    /// Metadata, merged over any `X-PM-Metadata-*` headers.
    pub metadata: Option<Metadata>,
}

/// An outbound message as a host mail framework describes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutboundEmail {
    /// Sender address.
    pub from_email: Option<String>,
    /// `To` recipients.
    pub to: Vec<String>,
    /// `Cc` recipients.
    pub cc: Vec<String>,
    /// `Bcc` recipients.
    pub bcc: Vec<String>,
    /// Reply-to addresses.
    pub reply_to: Vec<String>,
    /// Subject line.
    pub subject: String,
    /// Main body.
    pub body: String,
    /// Interpretation of `body`.
    pub content_subtype: ContentSubtype,
    /// Alternative bodies as `(content, mimetype)`.
    pub alternatives: Vec<(String, String)>,
    /// Attachments.
    pub attachments: Vec<OutboundAttachment>,
    /// Extra headers in insertion order.
    pub extra_headers: Vec<(String, String)>,
    /// Postmark-specific settings.
    pub postmark: PostmarkOptions,
}

impl OutboundEmail {
    /// Creates a message with a subject and body.
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            ..Self::default()
        }
    }

    /// Sets the sender.
    pub fn from_email(mut self, from_email: impl Into<String>) -> Self {
        self.from_email = Some(from_email.into());
        self
    }

    /// Adds a `To` recipient.
    pub fn to(mut self, address: impl Into<String>) -> Self {
        self.to.push(address.into());
        self
    }

    /// Adds a `Cc` recipient.
    pub fn cc(mut self, address: impl Into<String>) -> Self {
        self.cc.push(address.into());
        self
    }

    /// Adds a `Bcc` recipient.
    pub fn bcc(mut self, address: impl Into<String>) -> Self {
        self.bcc.push(address.into());
        self
    }

    /// Adds a reply-to address.
    pub fn reply_to(mut self, address: impl Into<String>) -> Self {
        self.reply_to.push(address.into());
        self
    }

    /// Sets the content subtype.
    pub fn content_subtype(mut self, subtype: ContentSubtype) -> Self {
        self.content_subtype = subtype;
        self
    }

    /// Attaches an alternative body.
    pub fn attach_alternative(mut self, content: impl Into<String>, mimetype: impl Into<String>) -> Self {
        self.alternatives.push((content.into(), mimetype.into()));
        self
    }

    /// Adds an attachment.
    pub fn attach(mut self, attachment: OutboundAttachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Adds an extra header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.push((name.into(), value.into()));
        self
    }

    /// Sets the Postmark-specific settings.
    pub fn postmark(mut self, options: PostmarkOptions) -> Self {
        self.postmark = options;
        self
    }

    /// Returns true if the message has any recipient at all.
    pub fn has_recipients(&self) -> bool {
        !self.to.is_empty() || !self.cc.is_empty() || !self.bcc.is_empty()
    }

    /// Returns the first `text/html` alternative.
    pub fn html_alternative(&self) -> Option<&str> {
        self.alternatives
            .iter()
            .find(|(_, mimetype)| is_html(mimetype))
            .map(|(content, _)| content.as_str())
    }

    /// Converts to a Postmark message.
    ///
    /// `Reply-To` and the reserved `X-PM-*` headers are consumed here and
    /// not forwarded as custom headers.
    pub fn to_message(&self) -> Message {
        let (text_body, html_body) = match self.content_subtype {
            ContentSubtype::Html => (None, Some(self.body.clone())),
            ContentSubtype::Plain => (
                Some(self.body.clone()),
                self.html_alternative().map(str::to_string),
            ),
        };

        let mut message = Message {
            sender: self.from_email.clone(),
            to: self.to.clone(),
            cc: self.cc.clone(),
            bcc: self.bcc.clone(),
            subject: Some(self.subject.clone()),
            text_body,
            html_body,
            reply_to: (!self.reply_to.is_empty()).then(|| self.reply_to.join(",")),
            attachments: self.attachments.iter().map(OutboundAttachment::to_attachment).collect(),
            ..Message::default()
        };

        let mut metadata = Metadata::new();
        for (name, value) in &self.extra_headers {
            if name.eq_ignore_ascii_case(REPLY_TO_HEADER) {
                message.reply_to = Some(value.clone());
            } else if name.eq_ignore_ascii_case(MESSAGE_STREAM_HEADER) {
                message.message_stream = Some(value.clone());
            } else if name.eq_ignore_ascii_case(TAG_HEADER) {
                message.tag = Some(value.clone());
            } else if name.eq_ignore_ascii_case(TRACK_OPENS_HEADER) {
                message.track_opens = parse_flag(name, value);
            } else if let Some(key) = strip_prefix_ignore_case(name, METADATA_HEADER_PREFIX) {
                metadata.insert(key, value.clone());
            } else {
                message.set_header(name.clone(), value.clone());
            }
        }

        let options = &self.postmark;
        if let Some(stream) = &options.message_stream {
            message.message_stream = Some(stream.clone());
        }
        if let Some(tag) = &options.tag {
            message.tag = Some(tag.clone());
        }
        if let Some(track_opens) = options.track_opens {
            message.track_opens = Some(track_opens);
        }
        if let Some(extra) = &options.metadata {
            metadata.extend(extra.clone());
        }
        if !metadata.is_empty() {
            message.metadata = Some(metadata);
        }

        message
    }
}

fn is_html(mimetype: &str) -> bool {
    match mimetype.parse::<mime::Mime>() {
        Ok(parsed) => parsed.essence_str() == mime::TEXT_HTML.essence_str(),
        Err(_) => mimetype.trim().eq_ignore_ascii_case("text/html"),
    }
}

fn strip_prefix_ignore_case<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    let head = name.get(..prefix.len())?;
    let key = &name[prefix.len()..];
    (head.eq_ignore_ascii_case(prefix) && !key.is_empty()).then_some(key)
}

fn parse_flag(name: &str, value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => {
            tracing::warn!(header = name, value, "Ignoring unrecognised open-tracking header");
            None
        }
    }
}

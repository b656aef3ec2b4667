//! Outgoing message and its builder.

use serde_json::Value;

use super::attachment::Attachment;
use super::metadata::Metadata;
use crate::errors::{MissingField, PostmarkError, PostmarkResult};

/// A custom message header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Header name.
    pub name: String,
    /// Header value.
    pub value: String,
}

impl Header {
    /// Creates a header.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Template reference a message resolves to before it is sent.
#[derive(Debug, Clone, PartialEq)]
pub enum Template {
    /// Plain message, no template.
    None,
    /// Template referenced by numeric id.
    ById {
        /// Template id.
        id: u64,
        /// Template model.
        model: Value,
    },
    /// Template referenced by alias.
    ByAlias {
        /// Template alias.
        alias: String,
        /// Template model.
        model: Value,
    },
}

/// An email message.
///
/// Fields are kept as the caller set them; [`Message::validate`] checks them
/// in a fixed order before anything is serialized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Message {
    /// Sender address. Falls back to the configured default sender.
    pub sender: Option<String>,
    /// `To` recipients.
    pub to: Vec<String>,
    /// `Cc` recipients.
    pub cc: Vec<String>,
    /// `Bcc` recipients.
    pub bcc: Vec<String>,
    /// Subject line.
    pub subject: Option<String>,
    /// Tag used for categorising messages in Postmark.
    pub tag: Option<String>,
    /// HTML body.
    pub html_body: Option<String>,
    /// Plain-text body.
    pub text_body: Option<String>,
    /// Reply-to address.
    pub reply_to: Option<String>,
    /// Custom headers, names unique ignoring case.
    pub headers: Vec<Header>,
    /// Attachments.
    pub attachments: Vec<Attachment>,
    /// Metadata.
    pub metadata: Option<Metadata>,
    /// Message stream id.
    pub message_stream: Option<String>,
    /// Open tracking override.
    pub track_opens: Option<bool>,
    /// Template id.
    pub template_id: Option<u64>,
    /// Template alias.
    pub template_alias: Option<String>,
    /// Template model.
    pub template_model: Option<Value>,
}

impl Message {
    /// Creates a message builder.
    pub fn builder() -> MessageBuilder {
        MessageBuilder::default()
    }

    /// Sets a header, replacing any existing header with the same name.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|h| h.name.eq_ignore_ascii_case(&name))
        {
            Some(existing) => {
                existing.name = name;
                existing.value = value;
            }
            None => self.headers.push(Header { name, value }),
        }
    }

    /// Returns a header value, matching the name case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    /// Returns true if any template field is set.
    pub fn has_template_fields(&self) -> bool {
        self.template_id.is_some() || self.template_alias.is_some() || self.template_model.is_some()
    }

    /// Returns true if the message has at least one `To` or `Bcc` recipient.
    pub fn has_recipients(&self) -> bool {
        !self.to.is_empty() || !self.bcc.is_empty()
    }

    /// Checks the message, stopping at the first failure.
    ///
    /// Order: subject, recipients, template reference. Metadata is typed and
    /// checked when it is built; the sender is checked once defaults apply.
    pub fn validate(&self) -> PostmarkResult<Template> {
        let subject_missing = self.subject.as_deref().map_or(true, str::is_empty);
        if subject_missing && !self.has_template_fields() {
            return Err(PostmarkError::missing(MissingField::Subject));
        }

        if !self.has_recipients() {
            return Err(PostmarkError::missing(MissingField::Recipients));
        }

        self.resolve_template()
    }

    fn resolve_template(&self) -> PostmarkResult<Template> {
        match (
            self.template_id,
            self.template_alias.as_ref(),
            self.template_model.as_ref(),
        ) {
            (None, None, None) => Ok(Template::None),
            (Some(id), None, Some(model)) => Ok(Template::ById {
                id,
                model: model.clone(),
            }),
            (None, Some(alias), Some(model)) => Ok(Template::ByAlias {
                alias: alias.clone(),
                model: model.clone(),
            }),
            (None, None, Some(_)) => Err(PostmarkError::missing(MissingField::TemplateReference)),
            _ => Err(PostmarkError::missing(MissingField::TemplatePairing)),
        }
    }
}

/// Builder for [`Message`].
#[derive(Debug, Clone, Default)]
pub struct MessageBuilder {
    message: Message,
}

impl MessageBuilder {
    /// Sets the sender address.
    pub fn sender(mut self, sender: impl Into<String>) -> Self {
        self.message.sender = Some(sender.into());
        self
    }

    /// Adds a `To` recipient.
    pub fn to(mut self, address: impl Into<String>) -> Self {
        self.message.to.push(address.into());
        self
    }

    /// Adds several `To` recipients.
    pub fn to_all<I, S>(mut self, addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.message.to.extend(addresses.into_iter().map(Into::into));
        self
    }

    /// Adds a `Cc` recipient.
    pub fn cc(mut self, address: impl Into<String>) -> Self {
        self.message.cc.push(address.into());
        self
    }

    /// Adds a `Bcc` recipient.
    pub fn bcc(mut self, address: impl Into<String>) -> Self {
        self.message.bcc.push(address.into());
        self
    }

    /// Sets the subject.
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.message.subject = Some(subject.into());
        self
    }

    /// Sets the tag.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.message.tag = Some(tag.into());
        self
    }

    /// Sets the HTML body.
    pub fn html_body(mut self, body: impl Into<String>) -> Self {
        self.message.html_body = Some(body.into());
        self
    }

    /// Sets the plain-text body.
    pub fn text_body(mut self, body: impl Into<String>) -> Self {
        self.message.text_body = Some(body.into());
        self
    }

    /// Sets the reply-to address.
    pub fn reply_to(mut self, address: impl Into<String>) -> Self {
        self.message.reply_to = Some(address.into());
        self
    }

    /// Sets a custom header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.message.set_header(name, value);
        self
    }

    /// Adds an attachment.
    pub fn attachment(mut self, attachment: impl Into<Attachment>) -> Self {
        self.message.attachments.push(attachment.into());
        self
    }

    /// Sets the metadata.
    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.message.metadata = Some(metadata);
        self
    }

    /// Sets the message stream.
    pub fn message_stream(mut self, stream: impl Into<String>) -> Self {
        self.message.message_stream = Some(stream.into());
        self
    }

    /// Sets open tracking.
    pub fn track_opens(mut self, track_opens: bool) -> Self {
        self.message.track_opens = Some(track_opens);
        self
    }

    /// Sets the template id.
    pub fn template_id(mut self, id: u64) -> Self {
        self.message.template_id = Some(id);
        self
    }

    /// Sets the template alias.
    pub fn template_alias(mut self, alias: impl Into<String>) -> Self {
        self.message.template_alias = Some(alias.into());
        self
    }

    /// Sets the template model.
    pub fn template_model(mut self, model: Value) -> Self {
        self.message.template_model = Some(model);
        self
    }

    /// Sets all template fields from a resolved reference.
    pub fn template(mut self, template: Template) -> Self {
        let (id, alias, model) = match template {
            Template::None => (None, None, None),
            Template::ById { id, model } => (Some(id), None, Some(model)),
            Template::ByAlias { alias, model } => (None, Some(alias), Some(model)),
        };
        self.message.template_id = id;
        self.message.template_alias = alias;
        self.message.template_model = model;
        self
    }

    /// Returns the message. Validation happens at send time.
    pub fn build(self) -> Message {
        self.message
    }
}

//! Wire payload for `/email`, `/email/withTemplate` and `/email/batch`.

use serde::Serialize;
use serde_json::Value;

use super::attachment::AttachmentPayload;
use super::message::{Message, Template};
use super::metadata::Metadata;
use super::MessageDefaults;
use crate::errors::{MissingField, PostmarkError, PostmarkResult};

/// Header as sent to Postmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct HeaderPayload {
    /// Header name.
    pub name: String,
    /// Header value.
    pub value: String,
}

/// A single message as sent to Postmark. Unset fields are omitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EmailPayload {
    /// Sender address.
    pub from: String,
    /// Comma-joined `To` recipients.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Comma-joined `Cc` recipients.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cc: Option<String>,
    /// Comma-joined `Bcc` recipients.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bcc: Option<String>,
    /// Subject line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// HTML body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_body: Option<String>,
    /// Plain-text body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_body: Option<String>,
    /// Reply-to address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    /// Custom headers.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<HeaderPayload>,
    /// Attachments.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<AttachmentPayload>,
    /// Metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// Message stream.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_stream: Option<String>,
    /// Open tracking.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_opens: Option<bool>,
    /// Template id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<u64>,
    /// Template alias.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_alias: Option<String>,
    /// Template model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_model: Option<Value>,
}

impl EmailPayload {
    /// Validates a message and builds its payload.
    pub fn build(message: &Message, defaults: &MessageDefaults) -> PostmarkResult<Self> {
        let template = message.validate()?;

        let from = message
            .sender
            .clone()
            .or_else(|| defaults.sender.clone())
            .ok_or_else(|| PostmarkError::missing(MissingField::Sender))?;

        let track_opens = message
            .track_opens
            .or_else(|| defaults.track_opens.then_some(true));

        let (template_id, template_alias, template_model) = match template {
            Template::None => (None, None, None),
            Template::ById { id, model } => (Some(id), None, Some(model)),
            Template::ByAlias { alias, model } => (None, Some(alias), Some(model)),
        };

        Ok(Self {
            from,
            to: join_addresses(&message.to),
            cc: join_addresses(&message.cc),
            bcc: join_addresses(&message.bcc),
            subject: message.subject.clone(),
            tag: message.tag.clone(),
            html_body: message.html_body.clone(),
            text_body: message.text_body.clone(),
            reply_to: message.reply_to.clone(),
            headers: message
                .headers
                .iter()
                .map(|h| HeaderPayload {
                    name: h.name.clone(),
                    value: h.value.clone(),
                })
                .collect(),
            attachments: message.attachments.iter().map(|a| a.to_payload()).collect(),
            metadata: message.metadata.clone().filter(|m| !m.is_empty()),
            message_stream: message.message_stream.clone(),
            track_opens,
            template_id,
            template_alias,
            template_model,
        })
    }

    /// Returns true if the payload references a template.
    pub fn uses_template(&self) -> bool {
        self.template_id.is_some() || self.template_alias.is_some()
    }
}

fn join_addresses(addresses: &[String]) -> Option<String> {
    if addresses.is_empty() {
        None
    } else {
        Some(addresses.join(","))
    }
}

//! Response types.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer};

/// Result of a single accepted message.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SendResponse {
    /// Recipient addresses.
    #[serde(default)]
    pub to: Option<String>,
    /// Time Postmark accepted the message. `None` when absent or not an
    /// RFC 3339 timestamp, as on some rejected batch entries.
    #[serde(default, deserialize_with = "deserialize_submitted_at")]
    pub submitted_at: Option<DateTime<FixedOffset>>,
    /// Postmark message id.
    #[serde(rename = "MessageID", default)]
    pub message_id: Option<String>,
    /// Postmark error code, 0 on success.
    pub error_code: i64,
    /// Status text.
    #[serde(default)]
    pub message: String,
}

impl SendResponse {
    /// Returns true if Postmark accepted the message.
    pub fn is_success(&self) -> bool {
        self.error_code == 0
    }
}

/// Reads `SubmittedAt` without failing the surrounding body.
fn deserialize_submitted_at<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|value| DateTime::parse_from_rfc3339(value).ok()))
}

/// Raw source of a bounced message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BounceDump {
    /// Raw message source. Empty once Postmark no longer retains it.
    #[serde(rename = "Body", default)]
    pub body: String,
}

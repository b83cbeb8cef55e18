use serde::Deserialize;

/// Notification event that carries task payloads as message bodies.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SnsEvent {
    #[serde(rename = "Records")]
    pub records: Vec<SnsEventRecord>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SnsEventRecord {
    #[serde(rename = "Sns")]
    pub sns: SnsMessage,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SnsMessage {
    #[serde(rename = "MessageId")]
    pub message_id: Option<String>,
    #[serde(rename = "Message")]
    pub message: String,
}

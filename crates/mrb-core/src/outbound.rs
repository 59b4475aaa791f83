use async_trait::async_trait;

use crate::{
    domain::{ChatId, MessageId, MessageRef},
    Result,
};

/// Outgoing payload, mirroring the relayable inbound kinds plus URL-backed
/// photos for canned menu responses.
#[derive(Clone, Debug, PartialEq)]
pub enum OutboundPayload {
    Text(String),
    Photo { file_id: String, caption: Option<String> },
    PhotoUrl { url: String, caption: Option<String> },
    Video { file_id: String, caption: Option<String> },
    Audio { file_id: String, caption: Option<String> },
    Voice { file_id: String, caption: Option<String> },
    Document { file_id: String, caption: Option<String> },
    Sticker { file_id: String },
    Contact { phone_number: String, first_name: String },
    Location { latitude: f64, longitude: f64 },
    Venue { latitude: f64, longitude: f64, title: String, address: String },
}

/// Port for the outbound side of the relay.
///
/// Telegram is the first implementation; every call is a single
/// attempt-and-report with the adapter's send timeout applied. The router
/// never retries.
#[async_trait]
pub trait OutboundSender: Send + Sync {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageRef>;

    /// Send `text` together with a persistent reply keyboard built from `labels`.
    async fn send_menu(&self, chat_id: ChatId, text: &str, labels: &[String]) -> Result<MessageRef>;

    /// Forward a raw message, returning a reference to the forwarded copy.
    async fn forward(&self, to: ChatId, from: ChatId, message_id: MessageId)
        -> Result<MessageRef>;

    /// Send an arbitrary payload, optionally as a reply to `reply_to`.
    async fn send(
        &self,
        chat_id: ChatId,
        payload: &OutboundPayload,
        reply_to: Option<MessageId>,
    ) -> Result<MessageRef>;
}

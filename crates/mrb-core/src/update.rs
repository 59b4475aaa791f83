use crate::domain::{ChatId, MessageId, UserId, UserProfile};
use crate::outbound::OutboundPayload;

/// Messenger-agnostic inbound message.
///
/// Telegram-specific fields live in the Telegram adapter; the classifier and
/// router only ever see this shape.
#[derive(Clone, Debug)]
pub struct InboundMessage {
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub from: UserProfile,
    pub kind: MessageKind,
    pub reply_to: Option<RepliedTo>,
}

/// The message the sender replied to, if any.
///
/// `forwarded_from` is the original sender of the replied-to message when the
/// transport exposes it (absent for users with forward privacy enabled).
#[derive(Clone, Copy, Debug)]
pub struct RepliedTo {
    pub message_id: MessageId,
    pub forwarded_from: Option<UserId>,
}

/// Closed payload-kind enum, dispatched once at the adapter boundary instead
/// of being re-derived in every handler.
#[derive(Clone, Debug, PartialEq)]
pub enum MessageKind {
    Text(String),
    Photo { file_id: String, caption: Option<String> },
    Video { file_id: String, caption: Option<String> },
    Audio { file_id: String, caption: Option<String> },
    Voice { file_id: String, caption: Option<String> },
    Document { file_id: String, caption: Option<String> },
    Sticker { file_id: String },
    Contact { phone_number: String, first_name: String },
    Location { latitude: f64, longitude: f64 },
    Venue { latitude: f64, longitude: f64, title: String, address: String },
    Other,
}

impl MessageKind {
    pub fn text(&self) -> Option<&str> {
        match self {
            MessageKind::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Outbound equivalent of this payload, kind preserved.
    /// `None` for kinds the relay cannot re-send.
    pub fn to_outbound(&self) -> Option<OutboundPayload> {
        let payload = match self {
            MessageKind::Text(t) => OutboundPayload::Text(t.clone()),
            MessageKind::Photo { file_id, caption } => OutboundPayload::Photo {
                file_id: file_id.clone(),
                caption: caption.clone(),
            },
            MessageKind::Video { file_id, caption } => OutboundPayload::Video {
                file_id: file_id.clone(),
                caption: caption.clone(),
            },
            MessageKind::Audio { file_id, caption } => OutboundPayload::Audio {
                file_id: file_id.clone(),
                caption: caption.clone(),
            },
            MessageKind::Voice { file_id, caption } => OutboundPayload::Voice {
                file_id: file_id.clone(),
                caption: caption.clone(),
            },
            MessageKind::Document { file_id, caption } => OutboundPayload::Document {
                file_id: file_id.clone(),
                caption: caption.clone(),
            },
            MessageKind::Sticker { file_id } => OutboundPayload::Sticker {
                file_id: file_id.clone(),
            },
            MessageKind::Contact {
                phone_number,
                first_name,
            } => OutboundPayload::Contact {
                phone_number: phone_number.clone(),
                first_name: first_name.clone(),
            },
            MessageKind::Location {
                latitude,
                longitude,
            } => OutboundPayload::Location {
                latitude: *latitude,
                longitude: *longitude,
            },
            MessageKind::Venue {
                latitude,
                longitude,
                title,
                address,
            } => OutboundPayload::Venue {
                latitude: *latitude,
                longitude: *longitude,
                title: title.clone(),
                address: address.clone(),
            },
            MessageKind::Other => return None,
        };
        Some(payload)
    }
}

use teloxide::types::{ForwardedFrom, Message};

use mrb_core::{
    domain::{ChatId, MessageId, UserId, UserProfile},
    errors::Error,
    update::{InboundMessage, MessageKind, RepliedTo},
    Result,
};

/// Map a teloxide message into the core inbound model.
///
/// Media-kind dispatch happens exactly once, here. Messages without a sender
/// (channel posts, service messages) are malformed for relay purposes.
pub fn map_message(msg: &Message) -> Result<InboundMessage> {
    let Some(user) = msg.from() else {
        return Err(Error::MalformedUpdate("message without a sender".to_string()));
    };

    let from = UserProfile {
        user_id: UserId(user.id.0 as i64),
        first_name: user.first_name.clone(),
        username: user.username.clone(),
    };

    let reply_to = msg.reply_to_message().map(|replied| RepliedTo {
        message_id: MessageId(replied.id.0),
        forwarded_from: forwarded_from_user(replied),
    });

    Ok(InboundMessage {
        chat_id: ChatId(msg.chat.id.0),
        message_id: MessageId(msg.id.0),
        from,
        kind: message_kind(msg),
        reply_to,
    })
}

/// The original sender of a forwarded message, when Telegram exposes it.
/// Users with forward privacy enabled surface only a sender name.
fn forwarded_from_user(msg: &Message) -> Option<UserId> {
    match msg.forward_from() {
        Some(ForwardedFrom::User(user)) => Some(UserId(user.id.0 as i64)),
        _ => None,
    }
}

fn message_kind(msg: &Message) -> MessageKind {
    if let Some(text) = msg.text() {
        return MessageKind::Text(text.to_string());
    }

    let caption = msg.caption().map(|c| c.to_string());

    if let Some(photos) = msg.photo() {
        if let Some(largest) = photos.last() {
            return MessageKind::Photo {
                file_id: largest.file.id.clone(),
                caption,
            };
        }
    }
    if let Some(video) = msg.video() {
        return MessageKind::Video {
            file_id: video.file.id.clone(),
            caption,
        };
    }
    if let Some(audio) = msg.audio() {
        return MessageKind::Audio {
            file_id: audio.file.id.clone(),
            caption,
        };
    }
    if let Some(voice) = msg.voice() {
        return MessageKind::Voice {
            file_id: voice.file.id.clone(),
            caption,
        };
    }
    if let Some(doc) = msg.document() {
        return MessageKind::Document {
            file_id: doc.file.id.clone(),
            caption,
        };
    }
    if let Some(sticker) = msg.sticker() {
        return MessageKind::Sticker {
            file_id: sticker.file.id.clone(),
        };
    }
    if let Some(contact) = msg.contact() {
        return MessageKind::Contact {
            phone_number: contact.phone_number.clone(),
            first_name: contact.first_name.clone(),
        };
    }
    if let Some(venue) = msg.venue() {
        return MessageKind::Venue {
            latitude: venue.location.latitude,
            longitude: venue.location.longitude,
            title: venue.title.clone(),
            address: venue.address.clone(),
        };
    }
    if let Some(location) = msg.location() {
        return MessageKind::Location {
            latitude: location.latitude,
            longitude: location.longitude,
        };
    }

    MessageKind::Other
}

use crate::domain::ChatId;
use crate::menu::{MenuCatalog, MenuEntry};
use crate::update::{InboundMessage, RepliedTo};

/// Recognized commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
}

/// The single classification step for an inbound update.
///
/// Admin-identity checks happen here and nowhere else; handlers receive an
/// already-tagged variant.
#[derive(Clone, Debug)]
pub enum Classification<'a> {
    Command(Command),
    MenuSelection(&'a MenuEntry),
    /// Admin replied to some message; resolution happens in the router and
    /// may still fail with a not-found notice.
    AdminReply(RepliedTo),
    /// Admin message that is not a reply: acknowledged, never relayed.
    AdminIdle,
    UserMessage,
}

/// Classify one inbound message. Exactly one variant applies.
pub fn classify<'a>(
    msg: &InboundMessage,
    admin_chat: ChatId,
    menu: &'a MenuCatalog,
) -> Classification<'a> {
    if msg.chat_id == admin_chat {
        return match msg.reply_to {
            Some(reply) => Classification::AdminReply(reply),
            None => Classification::AdminIdle,
        };
    }

    if let Some(text) = msg.kind.text() {
        if let Some(cmd) = parse_command(text) {
            return Classification::Command(cmd);
        }
        if let Some(entry) = menu.find(text) {
            return Classification::MenuSelection(entry);
        }
    }

    Classification::UserMessage
}

/// Telegram may send `/cmd@botname arg1 ...`; only the command name matters.
fn parse_command(text: &str) -> Option<Command> {
    let first = text.trim().split_whitespace().next()?;
    if !first.starts_with('/') {
        return None;
    }
    let name = first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase();

    match name.as_str() {
        "start" => Some(Command::Start),
        "help" => Some(Command::Help),
        _ => None,
    }
}

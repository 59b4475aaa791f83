use std::sync::Arc;

use tracing::{info, warn};

use crate::classify::{classify, Classification, Command};
use crate::domain::{ChatId, MessageId, MessageRef, UserProfile};
use crate::menu::{CannedResponse, MenuCatalog, MenuEntry};
use crate::outbound::{OutboundPayload, OutboundSender};
use crate::store::{RoutingLink, Session, SessionStore};
use crate::update::{InboundMessage, RepliedTo};
use crate::Result;

/// User- and admin-facing notices.
pub mod notices {
    pub const WELCOME: &str = "Welcome to the Market Bot! Choose an option below:";
    pub const HELP: &str =
        "Pick an option from the keyboard, or just send a message and it will be \
         passed on to the shop.";
    pub const FORWARDED: &str = "✅ Your message has been forwarded to the admin!";
    pub const FORWARD_FAILED: &str = "❌ Sorry, there was an error while sending your message.";
    pub const RECIPIENT_NOT_FOUND: &str =
        "⚠️ Could not find the recipient for this reply. The conversation may have expired.";
    pub const DELIVERED: &str = "✅ Reply delivered.";
    pub const DELIVERY_FAILED: &str = "❌ Could not deliver the reply.";
    pub const UNSUPPORTED_KIND: &str = "⚠️ This kind of message can't be relayed.";
    pub const ADMIN_IDLE: &str = "Reply directly to a forwarded message to answer the customer.";
}

/// What the router did with one update. Business failures (forward failed,
/// recipient not found) are outcomes, not errors: the sender already got a
/// notice and the transport layer must still see success.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Outcome {
    MenuShown,
    HelpShown,
    CannedReply,
    Forwarded(MessageRef),
    ForwardFailed,
    Relayed(ChatId),
    RelayFailed,
    RecipientNotFound,
    UnsupportedKind,
    AdminAcknowledged,
}

/// Core relay logic: classify one update, read/write the session store,
/// execute the outbound action. Processes each update to completion; the
/// store is the only shared mutable resource.
pub struct RelayRouter {
    admin_chat: ChatId,
    menu: MenuCatalog,
    store: Arc<dyn SessionStore>,
    sender: Arc<dyn OutboundSender>,
}

impl RelayRouter {
    pub fn new(
        admin_chat: ChatId,
        menu: MenuCatalog,
        store: Arc<dyn SessionStore>,
        sender: Arc<dyn OutboundSender>,
    ) -> Self {
        Self {
            admin_chat,
            menu,
            store,
            sender,
        }
    }

    pub async fn handle(&self, msg: &InboundMessage) -> Result<Outcome> {
        match classify(msg, self.admin_chat, &self.menu) {
            Classification::Command(Command::Start) => self.handle_start(msg).await,
            Classification::Command(Command::Help) => {
                self.sender.send_text(msg.chat_id, notices::HELP).await?;
                Ok(Outcome::HelpShown)
            }
            Classification::MenuSelection(entry) => self.handle_menu(msg, entry).await,
            Classification::AdminReply(reply) => self.handle_admin_reply(msg, reply).await,
            Classification::AdminIdle => {
                self.sender
                    .send_text(self.admin_chat, notices::ADMIN_IDLE)
                    .await?;
                Ok(Outcome::AdminAcknowledged)
            }
            Classification::UserMessage => self.handle_user_message(msg).await,
        }
    }

    async fn handle_start(&self, msg: &InboundMessage) -> Result<Outcome> {
        self.sender
            .send_menu(msg.chat_id, notices::WELCOME, &self.menu.labels())
            .await?;
        self.store
            .put_session(Session::new(msg.from.user_id, msg.chat_id))
            .await?;

        // Best-effort profile report to the admin. /start is user-triggered,
        // so duplicate starts produce duplicate reports.
        let report = profile_report(&msg.from);
        if let Err(e) = self.sender.send_text(self.admin_chat, &report).await {
            warn!("profile report for user {} failed: {e}", msg.from.user_id.0);
        }

        info!("menu shown to chat {}", msg.chat_id.0);
        Ok(Outcome::MenuShown)
    }

    async fn handle_menu(&self, msg: &InboundMessage, entry: &MenuEntry) -> Result<Outcome> {
        match &entry.response {
            CannedResponse::Text { text } => {
                self.sender.send_text(msg.chat_id, text).await?;
            }
            CannedResponse::Photo { url, caption } => {
                let payload = OutboundPayload::PhotoUrl {
                    url: url.clone(),
                    caption: Some(caption.clone()),
                };
                self.sender.send(msg.chat_id, &payload, None).await?;
            }
        }
        Ok(Outcome::CannedReply)
    }

    async fn handle_user_message(&self, msg: &InboundMessage) -> Result<Outcome> {
        let forwarded = match self
            .sender
            .forward(self.admin_chat, msg.chat_id, msg.message_id)
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!("forward from chat {} failed: {e}", msg.chat_id.0);
                self.sender
                    .send_text(msg.chat_id, notices::FORWARD_FAILED)
                    .await?;
                return Ok(Outcome::ForwardFailed);
            }
        };

        // Record both routing strategies: the link resolves a direct reply to
        // this forwarded copy, the session is the latest-wins fallback.
        self.store
            .put_link(
                forwarded.message_id,
                RoutingLink {
                    user_chat_id: msg.chat_id,
                    user_message_id: msg.message_id,
                },
            )
            .await?;
        let mut session = Session::new(msg.from.user_id, msg.chat_id);
        session.last_routed_message_id = Some(msg.message_id);
        self.store.put_session(session).await?;

        self.sender
            .send_text(msg.chat_id, notices::FORWARDED)
            .await?;

        info!(
            "forwarded message {} from chat {} as {}",
            msg.message_id.0, msg.chat_id.0, forwarded.message_id.0
        );
        Ok(Outcome::Forwarded(forwarded))
    }

    async fn handle_admin_reply(&self, msg: &InboundMessage, reply: RepliedTo) -> Result<Outcome> {
        // Links are one-shot, but only a successful delivery may consume
        // one; every bail-out below puts it back so the admin can retry.
        let link = self.store.take_link(reply.message_id).await?;

        // Most specific signal first: the forwarded-from identity on the
        // replied message is authoritative, the stored mappings can go stale.
        let (target_chat, reply_to) = match (reply.forwarded_from, link) {
            (Some(origin), link) => {
                let session = self.store.get_session(origin).await?;
                let chat = session
                    .as_ref()
                    .map(|s| s.chat_id)
                    .unwrap_or(ChatId(origin.0));
                let reply_to = link
                    .map(|l| l.user_message_id)
                    .or_else(|| session.as_ref().and_then(|s| s.last_routed_message_id));
                (chat, reply_to)
            }
            (None, Some(link)) => (link.user_chat_id, Some(link.user_message_id)),
            (None, None) => {
                warn!(
                    "admin reply to message {} matched no recipient",
                    reply.message_id.0
                );
                self.sender
                    .send_text(self.admin_chat, notices::RECIPIENT_NOT_FOUND)
                    .await?;
                return Ok(Outcome::RecipientNotFound);
            }
        };

        let Some(payload) = msg.kind.to_outbound() else {
            self.restore_link(reply.message_id, link).await;
            self.sender
                .send_text(self.admin_chat, notices::UNSUPPORTED_KIND)
                .await?;
            return Ok(Outcome::UnsupportedKind);
        };

        match self.sender.send(target_chat, &payload, reply_to).await {
            Ok(_) => {
                self.sender
                    .send_text(self.admin_chat, notices::DELIVERED)
                    .await?;
                info!("relayed admin reply to chat {}", target_chat.0);
                Ok(Outcome::Relayed(target_chat))
            }
            Err(e) => {
                warn!("relay to chat {} failed: {e}", target_chat.0);
                self.restore_link(reply.message_id, link).await;
                self.sender
                    .send_text(self.admin_chat, notices::DELIVERY_FAILED)
                    .await?;
                Ok(Outcome::RelayFailed)
            }
        }
    }

    /// Put a taken link back after a delivery that did not go through.
    /// Best-effort: the session fallback still covers a lost link.
    async fn restore_link(&self, forwarded: MessageId, link: Option<RoutingLink>) {
        let Some(link) = link else {
            return;
        };
        if let Err(e) = self.store.put_link(forwarded, link).await {
            warn!(
                "could not restore link for forwarded message {}: {e}",
                forwarded.0
            );
        }
    }
}

fn profile_report(user: &UserProfile) -> String {
    let handle = user
        .username
        .as_deref()
        .map(|u| format!("@{u}"))
        .unwrap_or_else(|| "no handle".to_string());
    format!(
        "👤 {} (id {}, {})\n{}",
        user.first_name,
        user.user_id.0,
        handle,
        user.profile_link()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessageId, UserId};
    use crate::errors::Error;
    use crate::store::MemorySessionStore;
    use crate::update::MessageKind;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
    use std::sync::Mutex;

    const ADMIN: ChatId = ChatId(999);

    #[derive(Clone, Debug, PartialEq)]
    enum Sent {
        Text {
            chat: ChatId,
            text: String,
        },
        Menu {
            chat: ChatId,
            labels: Vec<String>,
        },
        Forward {
            to: ChatId,
            from: ChatId,
            message_id: MessageId,
        },
        Payload {
            chat: ChatId,
            payload: OutboundPayload,
            reply_to: Option<MessageId>,
        },
    }

    /// Records every outbound call; assigns message ids from 1000 up.
    #[derive(Default)]
    struct RecordingSender {
        sent: Mutex<Vec<Sent>>,
        next_id: AtomicI32,
        fail_forwards: bool,
        failing_sends_left: AtomicUsize,
    }

    impl RecordingSender {
        fn new() -> Self {
            Self {
                next_id: AtomicI32::new(1000),
                ..Self::default()
            }
        }

        fn failing_forwards() -> Self {
            Self {
                fail_forwards: true,
                ..Self::new()
            }
        }

        fn failing_sends(n: usize) -> Self {
            Self {
                failing_sends_left: AtomicUsize::new(n),
                ..Self::new()
            }
        }

        fn sent(&self) -> Vec<Sent> {
            self.sent.lock().unwrap().clone()
        }

        fn texts_to(&self, chat: ChatId) -> Vec<String> {
            self.sent()
                .into_iter()
                .filter_map(|s| match s {
                    Sent::Text { chat: c, text } if c == chat => Some(text),
                    _ => None,
                })
                .collect()
        }

        fn record(&self, sent: Sent, chat: ChatId) -> MessageRef {
            self.sent.lock().unwrap().push(sent);
            MessageRef {
                chat_id: chat,
                message_id: MessageId(self.next_id.fetch_add(1, Ordering::SeqCst)),
            }
        }
    }

    #[async_trait]
    impl OutboundSender for RecordingSender {
        async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageRef> {
            Ok(self.record(
                Sent::Text {
                    chat: chat_id,
                    text: text.to_string(),
                },
                chat_id,
            ))
        }

        async fn send_menu(
            &self,
            chat_id: ChatId,
            _text: &str,
            labels: &[String],
        ) -> Result<MessageRef> {
            Ok(self.record(
                Sent::Menu {
                    chat: chat_id,
                    labels: labels.to_vec(),
                },
                chat_id,
            ))
        }

        async fn forward(
            &self,
            to: ChatId,
            from: ChatId,
            message_id: MessageId,
        ) -> Result<MessageRef> {
            if self.fail_forwards {
                return Err(Error::Transport("forward refused".to_string()));
            }
            Ok(self.record(
                Sent::Forward {
                    to,
                    from,
                    message_id,
                },
                to,
            ))
        }

        async fn send(
            &self,
            chat_id: ChatId,
            payload: &OutboundPayload,
            reply_to: Option<MessageId>,
        ) -> Result<MessageRef> {
            if self
                .failing_sends_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(Error::Transport("send refused".to_string()));
            }
            Ok(self.record(
                Sent::Payload {
                    chat: chat_id,
                    payload: payload.clone(),
                    reply_to,
                },
                chat_id,
            ))
        }
    }

    fn router(sender: Arc<RecordingSender>, store: Arc<MemorySessionStore>) -> RelayRouter {
        RelayRouter::new(ADMIN, MenuCatalog::default(), store, sender)
    }

    fn user_msg(chat: i64, message_id: i32, kind: MessageKind) -> InboundMessage {
        InboundMessage {
            chat_id: ChatId(chat),
            message_id: MessageId(message_id),
            from: UserProfile {
                user_id: UserId(chat),
                first_name: "Customer".to_string(),
                username: Some("customer42".to_string()),
            },
            kind,
            reply_to: None,
        }
    }

    fn user_text(chat: i64, message_id: i32, text: &str) -> InboundMessage {
        user_msg(chat, message_id, MessageKind::Text(text.to_string()))
    }

    fn admin_reply(
        replied_to: i32,
        forwarded_from: Option<i64>,
        kind: MessageKind,
    ) -> InboundMessage {
        InboundMessage {
            chat_id: ADMIN,
            message_id: MessageId(9000),
            from: UserProfile {
                user_id: UserId(ADMIN.0),
                first_name: "Admin".to_string(),
                username: None,
            },
            kind,
            reply_to: Some(RepliedTo {
                message_id: MessageId(replied_to),
                forwarded_from: forwarded_from.map(UserId),
            }),
        }
    }

    #[tokio::test]
    async fn start_shows_menu_upserts_session_and_reports_profile() {
        let sender = Arc::new(RecordingSender::new());
        let store = Arc::new(MemorySessionStore::default());
        let r = router(sender.clone(), store.clone());

        let outcome = r.handle(&user_text(42, 1, "/start")).await.unwrap();
        assert_eq!(outcome, Outcome::MenuShown);

        let sent = sender.sent();
        assert!(matches!(&sent[0], Sent::Menu { chat, labels }
            if *chat == ChatId(42) && labels.contains(&"🛒 Book Items".to_string())));

        let report = &sender.texts_to(ADMIN)[0];
        assert!(report.contains("Customer"));
        assert!(report.contains("42"));
        assert!(report.contains("@customer42"));
        assert!(report.contains("t.me/customer42"));

        let session = store.get_session(UserId(42)).await.unwrap().unwrap();
        assert_eq!(session.chat_id, ChatId(42));
    }

    #[tokio::test]
    async fn menu_selection_never_touches_the_store() {
        let sender = Arc::new(RecordingSender::new());
        let store = Arc::new(MemorySessionStore::default());
        let r = router(sender.clone(), store.clone());

        for _ in 0..2 {
            let outcome = r.handle(&user_text(42, 2, "🛒 Book Items")).await.unwrap();
            assert_eq!(outcome, Outcome::CannedReply);
        }

        assert!(store.get_session(UserId(42)).await.unwrap().is_none());
        assert_eq!(sender.texts_to(ChatId(42)).len(), 2);
        assert!(sender.texts_to(ChatId(42))[0].contains("reply to this message"));
    }

    #[tokio::test]
    async fn photo_menu_entries_send_the_canned_image() {
        let sender = Arc::new(RecordingSender::new());
        let store = Arc::new(MemorySessionStore::default());
        let r = router(sender.clone(), store.clone());

        r.handle(&user_text(42, 2, "📍 Location")).await.unwrap();

        let sent = sender.sent();
        assert!(matches!(&sent[0], Sent::Payload {
            chat,
            payload: OutboundPayload::PhotoUrl { caption: Some(c), .. },
            reply_to: None,
        } if *chat == ChatId(42) && c.contains("123 Market St")));
    }

    #[tokio::test]
    async fn forwarded_message_creates_one_resolvable_link_and_session() {
        let sender = Arc::new(RecordingSender::new());
        let store = Arc::new(MemorySessionStore::default());
        let r = router(sender.clone(), store.clone());

        let outcome = r.handle(&user_text(42, 5, "Hello")).await.unwrap();
        let Outcome::Forwarded(fwd) = outcome else {
            panic!("expected forward, got {outcome:?}");
        };
        assert_eq!(fwd.chat_id, ADMIN);

        // Forward went to the admin, ack went to the user.
        assert!(matches!(sender.sent()[0], Sent::Forward { to, from, message_id }
            if to == ADMIN && from == ChatId(42) && message_id == MessageId(5)));
        assert_eq!(sender.texts_to(ChatId(42)), vec![notices::FORWARDED]);

        let link = store.take_link(fwd.message_id).await.unwrap().unwrap();
        assert_eq!(link.user_chat_id, ChatId(42));
        assert_eq!(link.user_message_id, MessageId(5));

        let session = store.get_session(UserId(42)).await.unwrap().unwrap();
        assert_eq!(session.last_routed_message_id, Some(MessageId(5)));
    }

    #[tokio::test]
    async fn forward_failure_acks_failure_and_records_nothing() {
        let sender = Arc::new(RecordingSender::failing_forwards());
        let store = Arc::new(MemorySessionStore::default());
        let r = router(sender.clone(), store.clone());

        let outcome = r.handle(&user_text(42, 5, "Hello")).await.unwrap();
        assert_eq!(outcome, Outcome::ForwardFailed);

        assert_eq!(sender.texts_to(ChatId(42)), vec![notices::FORWARD_FAILED]);
        assert!(store.get_session(UserId(42)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn admin_reply_round_trip() {
        let sender = Arc::new(RecordingSender::new());
        let store = Arc::new(MemorySessionStore::default());
        let r = router(sender.clone(), store.clone());

        let Outcome::Forwarded(fwd) = r.handle(&user_text(42, 5, "Hello")).await.unwrap() else {
            panic!("expected forward");
        };

        let reply = admin_reply(fwd.message_id.0, None, MessageKind::Text("Hi back".into()));
        let outcome = r.handle(&reply).await.unwrap();
        assert_eq!(outcome, Outcome::Relayed(ChatId(42)));

        // Delivered verbatim, as a reply to the user's original message.
        let relayed = sender
            .sent()
            .into_iter()
            .find_map(|s| match s {
                Sent::Payload {
                    chat,
                    payload,
                    reply_to,
                } if chat == ChatId(42) => Some((payload, reply_to)),
                _ => None,
            })
            .expect("payload sent to user");
        assert_eq!(relayed.0, OutboundPayload::Text("Hi back".to_string()));
        assert_eq!(relayed.1, Some(MessageId(5)));

        assert!(sender.texts_to(ADMIN).contains(&notices::DELIVERED.to_string()));

        // The link was consumed by the match.
        assert!(store.take_link(fwd.message_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn admin_reply_preserves_media_kind() {
        let sender = Arc::new(RecordingSender::new());
        let store = Arc::new(MemorySessionStore::default());
        let r = router(sender.clone(), store.clone());

        let Outcome::Forwarded(fwd) = r.handle(&user_text(42, 5, "Hello")).await.unwrap() else {
            panic!("expected forward");
        };

        let reply = admin_reply(
            fwd.message_id.0,
            None,
            MessageKind::Photo {
                file_id: "price-list".to_string(),
                caption: Some("Today's prices".to_string()),
            },
        );
        r.handle(&reply).await.unwrap();

        assert!(sender.sent().iter().any(|s| matches!(s, Sent::Payload {
            chat,
            payload: OutboundPayload::Photo { file_id, .. },
            ..
        } if *chat == ChatId(42) && file_id == "price-list")));
    }

    #[tokio::test]
    async fn admin_reply_to_untracked_message_notifies_and_sends_nothing() {
        let sender = Arc::new(RecordingSender::new());
        let store = Arc::new(MemorySessionStore::default());
        let r = router(sender.clone(), store.clone());

        let reply = admin_reply(555, None, MessageKind::Text("Hi back".into()));
        let outcome = r.handle(&reply).await.unwrap();
        assert_eq!(outcome, Outcome::RecipientNotFound);

        assert_eq!(
            sender.texts_to(ADMIN),
            vec![notices::RECIPIENT_NOT_FOUND.to_string()]
        );
        assert!(!sender
            .sent()
            .iter()
            .any(|s| matches!(s, Sent::Payload { .. })));
    }

    #[tokio::test]
    async fn forwarded_from_identity_beats_the_link_table() {
        let sender = Arc::new(RecordingSender::new());
        let store = Arc::new(MemorySessionStore::default());
        let r = router(sender.clone(), store.clone());

        // Session says user 42 is reachable via chat 4242 (e.g. a newer
        // conversation); there is no link for the replied message.
        let mut session = Session::new(UserId(42), ChatId(4242));
        session.last_routed_message_id = Some(MessageId(7));
        store.put_session(session).await.unwrap();

        let reply = admin_reply(12345, Some(42), MessageKind::Text("Hi".into()));
        let outcome = r.handle(&reply).await.unwrap();
        assert_eq!(outcome, Outcome::Relayed(ChatId(4242)));

        // Without a session, the forward origin itself is the private chat.
        let reply = admin_reply(12346, Some(77), MessageKind::Text("Hi".into()));
        let outcome = r.handle(&reply).await.unwrap();
        assert_eq!(outcome, Outcome::Relayed(ChatId(77)));
    }

    #[tokio::test]
    async fn admin_idle_message_is_acknowledged_only() {
        let sender = Arc::new(RecordingSender::new());
        let store = Arc::new(MemorySessionStore::default());
        let r = router(sender.clone(), store.clone());

        let mut msg = user_text(ADMIN.0, 1, "hello there");
        msg.from.user_id = UserId(ADMIN.0);
        let outcome = r.handle(&msg).await.unwrap();
        assert_eq!(outcome, Outcome::AdminAcknowledged);

        assert_eq!(sender.texts_to(ADMIN), vec![notices::ADMIN_IDLE.to_string()]);
        assert_eq!(sender.sent().len(), 1);
    }

    #[tokio::test]
    async fn book_items_then_follow_up_round_trip() {
        let sender = Arc::new(RecordingSender::new());
        let store = Arc::new(MemorySessionStore::default());
        let r = router(sender.clone(), store.clone());

        // Menu selection: canned reply only, nothing forwarded.
        r.handle(&user_text(42, 10, "🛒 Book Items")).await.unwrap();
        assert!(!sender
            .sent()
            .iter()
            .any(|s| matches!(s, Sent::Forward { .. })));

        // Follow-up order text is forwarded.
        let Outcome::Forwarded(fwd) = r
            .handle(&user_text(42, 11, "2 loaves of bread"))
            .await
            .unwrap()
        else {
            panic!("expected forward");
        };

        // Admin answers the forwarded copy; user 42 receives it verbatim.
        let reply = admin_reply(
            fwd.message_id.0,
            None,
            MessageKind::Text("Ready at 5pm".into()),
        );
        assert_eq!(r.handle(&reply).await.unwrap(), Outcome::Relayed(ChatId(42)));
        assert!(sender.sent().iter().any(|s| matches!(s, Sent::Payload {
            chat,
            payload: OutboundPayload::Text(t),
            ..
        } if *chat == ChatId(42) && t == "Ready at 5pm")));
    }

    #[tokio::test]
    async fn failed_delivery_keeps_the_link_for_retry() {
        let sender = Arc::new(RecordingSender::failing_sends(1));
        let store = Arc::new(MemorySessionStore::default());
        let r = router(sender.clone(), store.clone());

        let Outcome::Forwarded(fwd) = r.handle(&user_text(42, 5, "Hello")).await.unwrap() else {
            panic!("expected forward");
        };

        // First attempt fails in transport; the link must survive it.
        let reply = admin_reply(fwd.message_id.0, None, MessageKind::Text("Hi back".into()));
        assert_eq!(r.handle(&reply).await.unwrap(), Outcome::RelayFailed);
        assert!(sender
            .texts_to(ADMIN)
            .contains(&notices::DELIVERY_FAILED.to_string()));

        // Retrying the identical reply now goes through.
        assert_eq!(r.handle(&reply).await.unwrap(), Outcome::Relayed(ChatId(42)));
        assert!(sender.sent().iter().any(|s| matches!(s, Sent::Payload {
            chat,
            reply_to: Some(MessageId(5)),
            ..
        } if *chat == ChatId(42))));

        // The successful delivery consumed the link.
        assert!(store.take_link(fwd.message_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unsupported_admin_payload_is_reported_not_relayed() {
        let sender = Arc::new(RecordingSender::new());
        let store = Arc::new(MemorySessionStore::default());
        let r = router(sender.clone(), store.clone());

        let Outcome::Forwarded(fwd) = r.handle(&user_text(42, 5, "Hello")).await.unwrap() else {
            panic!("expected forward");
        };

        let reply = admin_reply(fwd.message_id.0, None, MessageKind::Other);
        assert_eq!(r.handle(&reply).await.unwrap(), Outcome::UnsupportedKind);
        assert!(sender
            .texts_to(ADMIN)
            .contains(&notices::UNSUPPORTED_KIND.to_string()));

        // The link is still there for a sendable follow-up reply.
        let reply = admin_reply(fwd.message_id.0, None, MessageKind::Text("Hi".into()));
        assert_eq!(r.handle(&reply).await.unwrap(), Outcome::Relayed(ChatId(42)));
    }
}

//! Telegram adapter (teloxide).
//!
//! Implements the `mrb-core` OutboundSender port over the Telegram Bot API
//! and maps incoming teloxide updates into the core inbound model.

use std::time::Duration;

use async_trait::async_trait;

use teloxide::{prelude::*, types::InputFile};

use tokio::time::{sleep, timeout};

pub mod dispatch;
pub mod inbound;
pub mod keyboards;

pub use dispatch::run;

use mrb_core::{
    domain::{ChatId, MessageId, MessageRef},
    errors::Error,
    outbound::{OutboundPayload, OutboundSender},
    Result,
};

#[derive(Clone)]
pub struct TelegramSender {
    bot: Bot,
    send_timeout: Duration,
}

impl TelegramSender {
    pub fn new(bot: Bot, send_timeout: Duration) -> Self {
        Self { bot, send_timeout }
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn tg_msg_id(message_id: MessageId) -> teloxide::types::MessageId {
        teloxide::types::MessageId(message_id.0)
    }

    fn map_err(e: teloxide::RequestError) -> Error {
        Error::Transport(format!("telegram error: {e}"))
    }

    /// Single attempt-and-report with the configured timeout. The only retry
    /// is Telegram's own RetryAfter backoff; delivery is never re-attempted
    /// beyond that.
    async fn with_retry<T, Fut>(&self, mut op: impl FnMut() -> Fut) -> Result<T>
    where
        Fut: std::future::IntoFuture<Output = std::result::Result<T, teloxide::RequestError>>,
        Fut::IntoFuture: Send,
    {
        const MAX_RETRIES: usize = 1;
        let mut attempts = 0usize;
        loop {
            let Ok(result) = timeout(self.send_timeout, op()).await else {
                return Err(Error::Transport(format!(
                    "send timed out after {:?}",
                    self.send_timeout
                )));
            };
            match result {
                Ok(v) => return Ok(v),
                Err(e) => match e {
                    teloxide::RequestError::RetryAfter(d) if attempts < MAX_RETRIES => {
                        attempts += 1;
                        sleep(d).await;
                        continue;
                    }
                    other => return Err(Self::map_err(other)),
                },
            }
        }
    }

    fn msg_ref(chat_id: ChatId, msg: &Message) -> MessageRef {
        MessageRef {
            chat_id,
            message_id: MessageId(msg.id.0),
        }
    }
}

#[async_trait]
impl OutboundSender for TelegramSender {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageRef> {
        let msg = self
            .with_retry(|| self.bot.send_message(Self::tg_chat(chat_id), text.to_string()))
            .await?;
        Ok(Self::msg_ref(chat_id, &msg))
    }

    async fn send_menu(
        &self,
        chat_id: ChatId,
        text: &str,
        labels: &[String],
    ) -> Result<MessageRef> {
        let markup = keyboards::menu_keyboard(labels);
        let msg = self
            .with_retry(|| {
                self.bot
                    .send_message(Self::tg_chat(chat_id), text.to_string())
                    .reply_markup(markup.clone())
            })
            .await?;
        Ok(Self::msg_ref(chat_id, &msg))
    }

    async fn forward(
        &self,
        to: ChatId,
        from: ChatId,
        message_id: MessageId,
    ) -> Result<MessageRef> {
        let msg = self
            .with_retry(|| {
                self.bot
                    .forward_message(Self::tg_chat(to), Self::tg_chat(from), Self::tg_msg_id(message_id))
            })
            .await?;
        Ok(Self::msg_ref(to, &msg))
    }

    async fn send(
        &self,
        chat_id: ChatId,
        payload: &OutboundPayload,
        reply_to: Option<MessageId>,
    ) -> Result<MessageRef> {
        let chat = Self::tg_chat(chat_id);
        let reply_to = reply_to.map(Self::tg_msg_id);

        macro_rules! captioned {
            ($send:ident, $file_id:expr, $caption:expr) => {
                self.with_retry(|| {
                    let mut req = self.bot.$send(chat, InputFile::file_id($file_id.clone()));
                    if let Some(c) = $caption.clone() {
                        req = req.caption(c);
                    }
                    if let Some(id) = reply_to {
                        req = req.reply_to_message_id(id);
                    }
                    req
                })
                .await?
            };
        }

        let msg = match payload {
            OutboundPayload::Text(text) => {
                self.with_retry(|| {
                    let mut req = self.bot.send_message(chat, text.clone());
                    if let Some(id) = reply_to {
                        req = req.reply_to_message_id(id);
                    }
                    req
                })
                .await?
            }
            OutboundPayload::Photo { file_id, caption } => captioned!(send_photo, file_id, caption),
            OutboundPayload::PhotoUrl { url, caption } => {
                let parsed = url::Url::parse(url)
                    .map_err(|e| Error::Config(format!("invalid photo url {url}: {e}")))?;
                self.with_retry(|| {
                    let mut req = self.bot.send_photo(chat, InputFile::url(parsed.clone()));
                    if let Some(c) = caption.clone() {
                        req = req.caption(c);
                    }
                    if let Some(id) = reply_to {
                        req = req.reply_to_message_id(id);
                    }
                    req
                })
                .await?
            }
            OutboundPayload::Video { file_id, caption } => captioned!(send_video, file_id, caption),
            OutboundPayload::Audio { file_id, caption } => captioned!(send_audio, file_id, caption),
            OutboundPayload::Voice { file_id, caption } => captioned!(send_voice, file_id, caption),
            OutboundPayload::Document { file_id, caption } => {
                captioned!(send_document, file_id, caption)
            }
            OutboundPayload::Sticker { file_id } => {
                self.with_retry(|| {
                    let mut req = self.bot.send_sticker(chat, InputFile::file_id(file_id.clone()));
                    if let Some(id) = reply_to {
                        req = req.reply_to_message_id(id.0);
                    }
                    req
                })
                .await?
            }
            OutboundPayload::Contact {
                phone_number,
                first_name,
            } => {
                self.with_retry(|| {
                    let mut req =
                        self.bot
                            .send_contact(chat, phone_number.clone(), first_name.clone());
                    if let Some(id) = reply_to {
                        req = req.reply_to_message_id(id);
                    }
                    req
                })
                .await?
            }
            OutboundPayload::Location {
                latitude,
                longitude,
            } => {
                self.with_retry(|| {
                    let mut req = self.bot.send_location(chat, *latitude, *longitude);
                    if let Some(id) = reply_to {
                        req = req.reply_to_message_id(id);
                    }
                    req
                })
                .await?
            }
            OutboundPayload::Venue {
                latitude,
                longitude,
                title,
                address,
            } => {
                self.with_retry(|| {
                    let mut req = self.bot.send_venue(
                        chat,
                        *latitude,
                        *longitude,
                        title.clone(),
                        address.clone(),
                    );
                    if let Some(id) = reply_to {
                        req = req.reply_to_message_id(id);
                    }
                    req
                })
                .await?
            }
        };

        Ok(Self::msg_ref(chat_id, &msg))
    }
}

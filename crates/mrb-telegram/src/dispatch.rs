use std::{net::SocketAddr, sync::Arc};

use teloxide::{
    dispatching::Dispatcher,
    dptree,
    error_handlers::LoggingErrorHandler,
    prelude::*,
    update_listeners::webhooks,
};

use tracing::{debug, error, info, warn};

use mrb_core::{config::Config, router::RelayRouter, store::SessionStore};

use crate::inbound;
use crate::TelegramSender;

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub router: Arc<RelayRouter>,
}

/// Build the dispatcher and serve updates until shutdown.
///
/// Webhook mode when `WEBHOOK_URL` is configured, long polling otherwise.
pub async fn run(cfg: Arc<Config>, store: Arc<dyn SessionStore>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    // Basic startup info.
    if let Ok(me) = bot.get_me().await {
        info!(bot = %me.username(), admin_chat = cfg.admin_chat_id.0, "market relay bot started");
    }

    let sender = Arc::new(TelegramSender::new(bot.clone(), cfg.send_timeout));
    let router = Arc::new(RelayRouter::new(
        cfg.admin_chat_id,
        cfg.menu.clone(),
        store,
        sender,
    ));

    let state = Arc::new(AppState {
        cfg: cfg.clone(),
        router,
    });

    let handler = dptree::entry().branch(Update::filter_message().endpoint(handle_message));

    let mut dispatcher = Dispatcher::builder(bot.clone(), handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build();

    match &cfg.webhook_url {
        Some(raw) => {
            let url = url::Url::parse(raw)
                .map_err(|e| anyhow::anyhow!("invalid WEBHOOK_URL {raw}: {e}"))?;
            let addr = SocketAddr::from(([0, 0, 0, 0], cfg.webhook_port));
            info!(%url, %addr, "serving updates over webhook");
            let listener = webhooks::axum(bot, webhooks::Options::new(addr, url)).await?;
            dispatcher
                .dispatch_with_listener(
                    listener,
                    LoggingErrorHandler::with_custom_text("update listener error"),
                )
                .await;
        }
        None => {
            info!("serving updates over long polling");
            dispatcher.dispatch().await;
        }
    }

    Ok(())
}

/// Single message entrypoint. Always returns Ok so Telegram records the
/// update as handled; an error here would make webhook delivery re-try the
/// same update forever.
async fn handle_message(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let inbound = match inbound::map_message(&msg) {
        Ok(inbound) => inbound,
        Err(e) => {
            warn!(chat = msg.chat.id.0, "skipping update: {e}");
            return Ok(());
        }
    };

    let chat_id = inbound.chat_id;
    match state.router.handle(&inbound).await {
        Ok(outcome) => {
            debug!(chat = chat_id.0, ?outcome, "handled message");
        }
        Err(e) => {
            error!(chat = chat_id.0, "failed to handle message: {e}");
            // Best-effort notice; the update is still considered handled.
            let _ = bot
                .send_message(
                    teloxide::types::ChatId(chat_id.0),
                    mrb_core::router::notices::FORWARD_FAILED,
                )
                .await;
        }
    }

    Ok(())
}

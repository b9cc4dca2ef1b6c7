//! Telegram adapter (teloxide).
//!
//! Implements the `hostwatch-core` MessagingPort over the Telegram Bot API and
//! feeds inbound chat commands into the monitor loop.

use std::sync::Arc;

use async_trait::async_trait;

use teloxide::prelude::*;

pub mod handlers;
pub mod router;

use hostwatch_core::{
    domain::ChatId,
    errors::Error,
    messaging::{
        port::{MessagingPort, MessengerConnector},
        throttled::{ThrottleConfig, ThrottledMessenger},
    },
    Result,
};

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn map_err(e: teloxide::RequestError) -> Error {
        Error::External(format!("telegram error: {e}"))
    }
}

#[async_trait]
impl MessagingPort for TelegramMessenger {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<()> {
        // Single attempt: a failed notification is not retried.
        self.bot
            .send_message(Self::tg_chat(chat_id), text.to_string())
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }
}

/// Builds a throttled Telegram messenger for a bot token.
#[derive(Clone, Debug, Default)]
pub struct TelegramConnector {
    throttle: ThrottleConfig,
}

impl TelegramConnector {
    pub fn new(throttle: ThrottleConfig) -> Self {
        Self { throttle }
    }
}

impl MessengerConnector for TelegramConnector {
    fn connect(&self, bot_token: &str) -> Arc<dyn MessagingPort> {
        let raw: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(Bot::new(bot_token)));
        Arc::new(ThrottledMessenger::new(raw, self.throttle))
    }
}

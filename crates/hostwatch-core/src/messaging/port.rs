use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    domain::ChatId,
    Result,
};

/// Cross-messenger port for outbound notifications.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    /// Send one plain-text message.
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<()>;
}

/// Builds a messenger bound to a bot credential.
///
/// Credentials can change at runtime (`/setcredentials`), so the notifier asks
/// the connector for a fresh messenger instead of holding a fixed one.
pub trait MessengerConnector: Send + Sync {
    fn connect(&self, bot_token: &str) -> Arc<dyn MessagingPort>;
}

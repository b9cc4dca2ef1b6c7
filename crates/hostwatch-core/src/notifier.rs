use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    domain::Credentials,
    messaging::port::{MessagingPort, MessengerConnector},
};

struct Destination {
    credentials: Credentials,
    messenger: Arc<dyn MessagingPort>,
}

/// Sends status text to the one configured chat.
///
/// Credentials are process-local and replaced wholesale by `set_credentials`;
/// the monitor loop is the only owner, so no locking is involved.
pub struct Notifier {
    connector: Arc<dyn MessengerConnector>,
    destination: Option<Destination>,
}

impl Notifier {
    pub fn new(connector: Arc<dyn MessengerConnector>) -> Self {
        Self {
            connector,
            destination: None,
        }
    }

    pub fn with_credentials(
        connector: Arc<dyn MessengerConnector>,
        credentials: Credentials,
    ) -> Self {
        let mut notifier = Self::new(connector);
        notifier.set_credentials(credentials);
        notifier
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.destination.as_ref().map(|d| &d.credentials)
    }

    /// Replace the bot credential and destination chat. Last writer wins.
    pub fn set_credentials(&mut self, credentials: Credentials) {
        let messenger = self.connector.connect(&credentials.bot_token);
        info!(chat_id = %credentials.chat_id, "notification destination updated");
        self.destination = Some(Destination {
            credentials,
            messenger,
        });
    }

    /// Best-effort send. Silently skipped without credentials; failures are
    /// logged and otherwise ignored.
    pub async fn notify(&self, text: &str) {
        let Some(dest) = self.destination.as_ref() else {
            debug!("no credentials set, dropping notification");
            return;
        };

        if let Err(e) = dest.messenger.send_text(dest.credentials.chat_id, text).await {
            warn!(chat_id = %dest.credentials.chat_id, error = %e, "notification failed");
        }
    }
}

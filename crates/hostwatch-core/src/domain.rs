use std::fmt;

/// Chat id of a notification destination (numeric, Telegram-style).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bot credential plus the chat that receives notifications.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub bot_token: String,
    pub chat_id: ChatId,
}

impl Credentials {
    pub fn new(bot_token: impl Into<String>, chat_id: ChatId) -> Self {
        Self {
            bot_token: bot_token.into(),
            chat_id,
        }
    }
}

// Tokens arrive as plaintext chat arguments; keep them out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_debug_redacts_token() {
        let c = Credentials::new("123:secret", ChatId(42));
        let s = format!("{c:?}");
        assert!(!s.contains("secret"));
        assert!(s.contains("42"));
    }
}

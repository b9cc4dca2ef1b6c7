//! In-crate fakes shared by the unit tests.

use std::{
    collections::HashSet,
    path::PathBuf,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;

use crate::{
    domain::ChatId,
    messaging::port::{MessagingPort, MessengerConnector},
    probe::Prober,
    Error, Result,
};

/// Unique scratch path under /tmp (not created).
pub fn tmp_path(prefix: &str) -> PathBuf {
    static SEQ: AtomicUsize = AtomicUsize::new(0);
    let ts = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let pid = std::process::id();
    let seq = SEQ.fetch_add(1, Ordering::SeqCst);
    PathBuf::from(format!("/tmp/{prefix}-{pid}-{ts}-{seq}"))
}

#[derive(Default)]
pub struct FakeMessenger {
    fail: bool,
    sends: Mutex<Vec<(ChatId, String)>>,
}

impl FakeMessenger {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<(ChatId, String)> {
        self.sends.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent().into_iter().map(|(_, t)| t).collect()
    }
}

#[async_trait]
impl MessagingPort for FakeMessenger {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<()> {
        if self.fail {
            return Err(Error::External("send failed".to_string()));
        }
        self.sends.lock().unwrap().push((chat_id, text.to_string()));
        Ok(())
    }
}

/// Hands out one shared `FakeMessenger` and records every token it was asked for.
#[derive(Default)]
pub struct FakeConnector {
    pub messenger: Arc<FakeMessenger>,
    pub tokens: Mutex<Vec<String>>,
}

impl FakeConnector {
    pub fn tokens(&self) -> Vec<String> {
        self.tokens.lock().unwrap().clone()
    }
}

impl MessengerConnector for FakeConnector {
    fn connect(&self, bot_token: &str) -> Arc<dyn MessagingPort> {
        self.tokens.lock().unwrap().push(bot_token.to_string());
        self.messenger.clone()
    }
}

/// Records probed hosts in order; hosts in `down` report unreachable.
#[derive(Default)]
pub struct FakeProber {
    down: HashSet<String>,
    probed: Mutex<Vec<String>>,
}

impl FakeProber {
    pub fn with_down(hosts: &[&str]) -> Self {
        Self {
            down: hosts.iter().map(|h| h.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn probed(&self) -> Vec<String> {
        self.probed.lock().unwrap().clone()
    }
}

#[async_trait]
impl Prober for FakeProber {
    async fn probe(&self, host: &str) -> bool {
        self.probed.lock().unwrap().push(host.to_string());
        !self.down.contains(host)
    }
}

//! Command dispatch and sweeps: probe hosts, report each result to chat.

use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    commands::{Command, CommandKind, USAGE_MESSAGE},
    config::parse_chat_id,
    domain::Credentials,
    domain_list::{normalize_host, DomainList},
    notifier::Notifier,
    probe::Prober,
    Error,
};

const FILE_NOT_FOUND_MESSAGE: &str = "File not found";
const MISSING_DOMAIN_MESSAGE: &str = "Please provide a domain.";
const MISSING_CHECK_DOMAIN_MESSAGE: &str = "Please provide a domain to check.";
const MISSING_CREDENTIALS_MESSAGE: &str = "Please provide bot token and chat ID.";
const CREDENTIALS_SET_MESSAGE: &str = "Success!";

/// What started a sweep. Only an explicit `/checklist` reports a missing list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SweepTrigger {
    Scheduled,
    Command,
}

pub struct Monitor {
    list: DomainList,
    prober: Arc<dyn Prober>,
    notifier: Notifier,
}

impl Monitor {
    pub fn new(list: DomainList, prober: Arc<dyn Prober>, notifier: Notifier) -> Self {
        Self {
            list,
            prober,
            notifier,
        }
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub async fn handle(&mut self, cmd: Command) {
        info!(command = ?cmd.kind, args = cmd.args.len(), "handling command");

        match &cmd.kind {
            CommandKind::AddDomain => match cmd.arg(0) {
                Some(raw) => self.add_domain(raw).await,
                None => self.notifier.notify(MISSING_DOMAIN_MESSAGE).await,
            },
            CommandKind::CheckDomain => match cmd.arg(0) {
                Some(raw) => self.check_domain(raw).await,
                None => self.notifier.notify(MISSING_CHECK_DOMAIN_MESSAGE).await,
            },
            CommandKind::CheckList => {
                self.sweep(SweepTrigger::Command).await;
            }
            CommandKind::Help => self.notifier.notify(USAGE_MESSAGE).await,
            CommandKind::SetCredentials => self.set_credentials(&cmd.args).await,
            CommandKind::Unknown(name) => {
                self.notifier
                    .notify(&format!("Unknown command: /{name}"))
                    .await
            }
        }
    }

    async fn add_domain(&self, raw: &str) {
        let host = match self.list.append(raw) {
            Ok(host) => host,
            Err(Error::InvalidHost(_)) => {
                self.notifier.notify(MISSING_DOMAIN_MESSAGE).await;
                return;
            }
            Err(e) => {
                warn!(path = %self.list.path().display(), error = %e, "failed to append domain");
                self.notifier
                    .notify(&format!("Failed to add domain: {e}"))
                    .await;
                return;
            }
        };

        info!(host = %host, "domain added");
        self.notifier
            .notify(&format!("Added domain: {host}"))
            .await;
        self.check_host(&host).await;
    }

    async fn check_domain(&self, raw: &str) {
        let host = normalize_host(raw);
        if host.is_empty() {
            self.notifier.notify(MISSING_CHECK_DOMAIN_MESSAGE).await;
            return;
        }

        self.notifier
            .notify(&format!("Checking domain: {host}"))
            .await;
        self.check_host(&host).await;
    }

    async fn set_credentials(&mut self, args: &[String]) {
        let [token, chat_id] = args else {
            self.notifier.notify(MISSING_CREDENTIALS_MESSAGE).await;
            return;
        };
        let Some(chat_id) = parse_chat_id(chat_id) else {
            warn!("set-credentials with non-numeric chat id");
            self.notifier.notify(MISSING_CREDENTIALS_MESSAGE).await;
            return;
        };

        self.notifier
            .set_credentials(Credentials::new(token.clone(), chat_id));
        self.notifier.notify(CREDENTIALS_SET_MESSAGE).await;
    }

    /// Probe one (already normalized) host and report the result.
    pub async fn check_host(&self, host: &str) -> bool {
        let online = self.prober.probe(host).await;
        info!(host, online, "probe finished");

        let status = if online { "online" } else { "offline" };
        self.notifier.notify(&format!("{host} is {status}")).await;
        online
    }

    /// Probe every host in the list, in file order. Returns the number of probes.
    pub async fn sweep(&self, trigger: SweepTrigger) -> usize {
        let hosts = match self.list.read_all() {
            Ok(hosts) => hosts,
            Err(Error::NotFound { path }) => {
                info!(path = %path.display(), ?trigger, "domain list not found, nothing to check");
                if trigger == SweepTrigger::Command {
                    self.notifier.notify(FILE_NOT_FOUND_MESSAGE).await;
                }
                return 0;
            }
            Err(e) => {
                warn!(error = %e, "failed to open domain list");
                self.notifier
                    .notify(&format!("Failed to read domain list: {e}"))
                    .await;
                return 0;
            }
        };

        info!(?trigger, "sweep started");
        let mut probes = 0usize;
        for host in hosts {
            let host = match host {
                Ok(h) => h,
                Err(e) => {
                    warn!(error = %e, "failed to read domain list");
                    self.notifier
                        .notify(&format!("Failed to read domain list: {e}"))
                        .await;
                    break;
                }
            };
            self.check_host(&host).await;
            probes += 1;
        }
        info!(?trigger, probes, "sweep finished");

        probes
    }
}

//! Host reachability probes.
//!
//! Every failure (timeout, DNS, permissions, spawn error, non-zero exit) is
//! reported as `false`; callers never see why a host was unreachable.

use std::{future::Future, io, path::PathBuf, process::Stdio, sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::{net::TcpStream, process::Command, time::timeout};
use tracing::debug;

use crate::config::Config;

/// Extra time granted to the `ping` process beyond its own wait flag
/// (name resolution, process startup).
const PING_GRACE: Duration = Duration::from_millis(500);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProbeMethod {
    /// ICMP echo via the system `ping` binary.
    Icmp,
    /// TCP connect to a fixed port.
    Tcp,
}

impl ProbeMethod {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "icmp" | "ping" => Some(Self::Icmp),
            "tcp" => Some(Self::Tcp),
            _ => None,
        }
    }
}

#[async_trait]
pub trait Prober: Send + Sync {
    /// One reachability test. `true` means the host answered in time.
    async fn probe(&self, host: &str) -> bool;
}

pub fn build_prober(cfg: &Config) -> Arc<dyn Prober> {
    match cfg.probe_method {
        ProbeMethod::Icmp => Arc::new(PingProber::new(
            cfg.ping_path.clone(),
            cfg.probe_timeout,
        )),
        ProbeMethod::Tcp => Arc::new(TcpProber::new(cfg.tcp_probe_port, cfg.probe_timeout)),
    }
}

/// Only plain host names and IP literals are handed to a probe. Anything else
/// (leading `-`, whitespace, shell metacharacters) would be interpreted by
/// `ping` as options or garbage.
pub fn is_probeable_host(host: &str) -> bool {
    !host.is_empty()
        && !host.starts_with('-')
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | ':' | '_'))
}

/// ICMP echo through the system `ping` binary (setuid or capability-enabled,
/// so no raw-socket privileges are needed in-process).
#[derive(Clone, Debug)]
pub struct PingProber {
    ping_path: PathBuf,
    timeout: Duration,
}

impl PingProber {
    pub fn new(ping_path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            ping_path: ping_path.into(),
            timeout,
        }
    }

    fn command(&self, host: &str) -> Command {
        let mut cmd = Command::new(&self.ping_path);
        cmd.args(ping_args(self.timeout))
            .arg(host)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        cmd
    }
}

/// One echo request, waiting at most `timeout` for the reply.
#[cfg(windows)]
fn ping_args(timeout: Duration) -> [String; 4] {
    ["-n".into(), "1".into(), "-w".into(), timeout.as_millis().to_string()]
}

// BSD-style `ping` takes the wait in milliseconds.
#[cfg(any(target_os = "macos", target_os = "freebsd", target_os = "openbsd"))]
fn ping_args(timeout: Duration) -> [String; 4] {
    ["-c".into(), "1".into(), "-W".into(), timeout.as_millis().to_string()]
}

// iputils / busybox take whole seconds.
#[cfg(not(any(
    windows,
    target_os = "macos",
    target_os = "freebsd",
    target_os = "openbsd"
)))]
fn ping_args(timeout: Duration) -> [String; 4] {
    [
        "-c".into(),
        "1".into(),
        "-W".into(),
        timeout.as_secs().max(1).to_string(),
    ]
}

#[async_trait]
impl Prober for PingProber {
    async fn probe(&self, host: &str) -> bool {
        if !is_probeable_host(host) {
            debug!(host, "refusing to probe malformed host");
            return false;
        }

        let mut child = match self.command(host).spawn() {
            Ok(c) => c,
            Err(e) => {
                debug!(host, error = %e, "ping spawn failed");
                return false;
            }
        };

        match timeout(self.timeout + PING_GRACE, child.wait()).await {
            Ok(Ok(status)) => status.success(),
            Ok(Err(e)) => {
                debug!(host, error = %e, "ping wait failed");
                false
            }
            Err(_) => {
                debug!(host, "ping timed out");
                // kill_on_drop reaps it too; kill eagerly so the process does not linger.
                let _ = child.kill().await;
                false
            }
        }
    }
}

/// TCP connect probe, for hosts where ICMP is filtered or unavailable.
#[derive(Clone, Debug)]
pub struct TcpProber {
    port: u16,
    timeout: Duration,
}

impl TcpProber {
    pub fn new(port: u16, timeout: Duration) -> Self {
        Self { port, timeout }
    }
}

#[async_trait]
impl Prober for TcpProber {
    async fn probe(&self, host: &str) -> bool {
        if !is_probeable_host(host) {
            debug!(host, "refusing to probe malformed host");
            return false;
        }

        connects_within(
            self.timeout,
            TcpStream::connect((host, self.port)),
            host,
            self.port,
        )
        .await
    }
}

/// `true` only if `connect` resolves to a connection inside `budget`.
async fn connects_within<T>(
    budget: Duration,
    connect: impl Future<Output = io::Result<T>>,
    host: &str,
    port: u16,
) -> bool {
    match timeout(budget, connect).await {
        Ok(Ok(_stream)) => true,
        Ok(Err(e)) => {
            debug!(host, port, error = %e, "tcp connect failed");
            false
        }
        Err(_) => {
            debug!(host, port, "tcp connect timed out");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::tmp_path;

    #[test]
    fn probe_method_parses_aliases() {
        assert_eq!(ProbeMethod::parse("ICMP"), Some(ProbeMethod::Icmp));
        assert_eq!(ProbeMethod::parse("ping"), Some(ProbeMethod::Icmp));
        assert_eq!(ProbeMethod::parse(" tcp "), Some(ProbeMethod::Tcp));
        assert_eq!(ProbeMethod::parse("udp"), None);
    }

    #[test]
    fn probeable_host_rejects_option_like_and_odd_input() {
        assert!(is_probeable_host("example.com"));
        assert!(is_probeable_host("10.0.0.1"));
        assert!(is_probeable_host("::1"));
        assert!(!is_probeable_host(""));
        assert!(!is_probeable_host("-f"));
        assert!(!is_probeable_host("a.com; rm -rf /"));
        assert!(!is_probeable_host("a b"));
    }

    #[tokio::test]
    async fn ping_with_missing_binary_is_unreachable() {
        let p = PingProber::new(tmp_path("hw-no-such-ping"), Duration::from_millis(200));
        assert!(!p.probe("example.com").await);
    }

    #[cfg(unix)]
    fn script(prefix: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = tmp_path(prefix);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn ping_exit_status_decides_reachability() {
        let ok = script("hw-ping-ok", "exit 0");
        let nak = script("hw-ping-nak", "exit 1");

        assert!(PingProber::new(&ok, Duration::from_secs(2)).probe("example.com").await);
        assert!(!PingProber::new(&nak, Duration::from_secs(2)).probe("example.com").await);

        let _ = std::fs::remove_file(ok);
        let _ = std::fs::remove_file(nak);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn ping_timeout_reports_like_negative_reply() {
        let hang = script("hw-ping-hang", "exec sleep 30");
        let nak = script("hw-ping-nak2", "exit 1");

        let timed_out = PingProber::new(&hang, Duration::ZERO)
            .probe("example.com")
            .await;
        let refused = PingProber::new(&nak, Duration::ZERO)
            .probe("example.com")
            .await;
        assert_eq!(timed_out, refused);
        assert!(!timed_out);

        let _ = std::fs::remove_file(hang);
        let _ = std::fs::remove_file(nak);
    }

    #[tokio::test]
    async fn ping_never_runs_for_malformed_host() {
        // Even a binary that always succeeds must not be consulted.
        let p = PingProber::new("/bin/sh", Duration::from_secs(1));
        assert!(!p.probe("-c").await);
    }

    #[tokio::test]
    async fn tcp_probe_open_and_refused_ports() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let p = TcpProber::new(port, Duration::from_secs(2));
        assert!(p.probe("127.0.0.1").await);

        drop(listener);
        assert!(!p.probe("127.0.0.1").await);
    }

    #[tokio::test]
    async fn tcp_timeout_reports_like_refusal() {
        let budget = Duration::from_millis(20);

        let hung = std::future::pending::<io::Result<()>>();
        let refused = async { Err::<(), _>(io::Error::from(io::ErrorKind::ConnectionRefused)) };
        let accepted = async { Ok::<(), io::Error>(()) };

        assert!(!connects_within(budget, hung, "example.com", 443).await);
        assert!(!connects_within(budget, refused, "example.com", 443).await);
        assert!(connects_within(budget, accepted, "example.com", 443).await);
    }
}

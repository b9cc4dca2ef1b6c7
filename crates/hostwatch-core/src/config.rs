use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{domain::ChatId, errors::Error, probe::ProbeMethod, Result};

/// Startup values supplied on the command line. They win over the environment.
#[derive(Clone, Debug, Default)]
pub struct CliOverrides {
    pub token: Option<String>,
    pub chat_id: Option<String>,
    pub domain_list: Option<PathBuf>,
    pub check_interval_secs: Option<u64>,
}

/// Typed runtime configuration.
#[derive(Clone, Debug)]
pub struct Config {
    // Destination
    pub telegram_bot_token: String,
    pub telegram_chat_id: ChatId,

    // Domain list
    pub domain_list_path: PathBuf,

    // Scheduling
    pub check_interval: Duration,
    pub loop_tick: Duration,
    pub command_queue_capacity: usize,

    // Probing
    pub probe_method: ProbeMethod,
    pub probe_timeout: Duration,
    pub ping_path: PathBuf,
    pub tcp_probe_port: u16,
}

impl Config {
    pub fn load(cli: CliOverrides) -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        // Required: flag, then env.
        let telegram_bot_token = cli
            .token
            .or_else(|| env_str("TELEGRAM_BOT_TOKEN"))
            .and_then(non_empty);
        let chat_id_raw = cli
            .chat_id
            .or_else(|| env_str("TELEGRAM_CHAT_ID"))
            .and_then(non_empty);

        let (Some(telegram_bot_token), Some(chat_id_raw)) = (telegram_bot_token, chat_id_raw)
        else {
            return Err(Error::Config(
                "Please provide both --token and --chat_id (or TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID)"
                    .to_string(),
            ));
        };
        let telegram_chat_id = parse_chat_id(&chat_id_raw)
            .ok_or_else(|| Error::Config(format!("invalid chat id: {chat_id_raw}")))?;

        let domain_list_path = cli
            .domain_list
            .or_else(|| env_path("DOMAIN_LIST_PATH"))
            .unwrap_or_else(|| PathBuf::from("filelist.txt"));

        let check_interval = Duration::from_secs(
            cli.check_interval_secs
                .or_else(|| env_u64("CHECK_INTERVAL_SECS"))
                .unwrap_or(3600),
        );
        let loop_tick = Duration::from_millis(env_u64("LOOP_TICK_MS").unwrap_or(1000));
        let command_queue_capacity = env_usize("COMMAND_QUEUE_CAPACITY").unwrap_or(64).max(1);

        let probe_method = match env_str("PROBE_METHOD").and_then(non_empty) {
            Some(raw) => ProbeMethod::parse(&raw)
                .ok_or_else(|| Error::Config(format!("unknown PROBE_METHOD: {raw}")))?,
            None => ProbeMethod::Icmp,
        };
        let probe_timeout = Duration::from_millis(env_u64("PROBE_TIMEOUT_MS").unwrap_or(4000));
        let ping_path = env_path("PING_PATH")
            .or_else(|| which_in_path("ping"))
            .unwrap_or_else(|| PathBuf::from("/bin/ping"));
        let tcp_probe_port = env_u16("TCP_PROBE_PORT").unwrap_or(443);

        Ok(Self {
            telegram_bot_token,
            telegram_chat_id,
            domain_list_path,
            check_interval,
            loop_tick,
            command_queue_capacity,
            probe_method,
            probe_timeout,
            ping_path,
            tcp_probe_port,
        })
    }
}

pub fn parse_chat_id(raw: &str) -> Option<ChatId> {
    raw.trim().parse::<i64>().ok().map(ChatId)
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn env_u16(key: &str) -> Option<u16> {
    env_str(key).and_then(|s| s.trim().parse::<u16>().ok())
}

fn env_usize(key: &str) -> Option<usize> {
    env_str(key).and_then(|s| s.trim().parse::<usize>().ok())
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

pub(crate) fn which_in_path(binary: &str) -> Option<PathBuf> {
    let path = env::var_os("PATH")?;
    for dir in env::split_paths(&path) {
        let candidate = dir.join(binary);
        if is_executable_file(&candidate) {
            return Some(candidate);
        }
    }
    None
}

fn is_executable_file(p: &Path) -> bool {
    if !p.is_file() {
        return false;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(md) = fs::metadata(p) {
            return (md.permissions().mode() & 0o111) != 0;
        }
    }
    true
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s.trim().to_string())
    }
}

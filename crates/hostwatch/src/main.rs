use std::{path::PathBuf, sync::Arc};

use clap::Parser;

use hostwatch_core::config::{CliOverrides, Config};

/// Telegram host availability monitor.
#[derive(Parser, Debug)]
#[command(name = "hostwatch", version, about)]
struct Args {
    /// Telegram bot token (overrides TELEGRAM_BOT_TOKEN)
    #[arg(long)]
    token: Option<String>,

    /// Chat id that receives notifications (overrides TELEGRAM_CHAT_ID)
    #[arg(long = "chat-id", alias = "chat_id", allow_hyphen_values = true)]
    chat_id: Option<String>,

    /// Domain list file, one host per line (overrides DOMAIN_LIST_PATH)
    #[arg(long)]
    domain_list: Option<PathBuf>,

    /// Seconds between full sweeps (overrides CHECK_INTERVAL_SECS)
    #[arg(long)]
    interval_secs: Option<u64>,
}

impl From<Args> for CliOverrides {
    fn from(a: Args) -> Self {
        Self {
            token: a.token,
            chat_id: a.chat_id,
            domain_list: a.domain_list,
            check_interval_secs: a.interval_secs,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), hostwatch_core::Error> {
    let args = Args::parse();
    hostwatch_core::logging::init("hostwatch")?;

    let cfg = Arc::new(Config::load(args.into())?);

    hostwatch_telegram::router::run_polling(cfg)
        .await
        .map_err(|e| hostwatch_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}

use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};
use tokio::sync::mpsc;
use tracing::{info, warn};

use hostwatch_core::{
    commands::Command,
    config::Config,
    domain::Credentials,
    domain_list::DomainList,
    messaging::{port::MessengerConnector, throttled::ThrottleConfig},
    monitor::Monitor,
    notifier::Notifier,
    probe::build_prober,
    scheduler::MonitorLoop,
};

use crate::handlers;
use crate::TelegramConnector;

/// Shared with every update handler.
pub struct InboundState {
    pub commands: mpsc::Sender<Command>,
}

pub async fn run_polling(cfg: Arc<Config>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    match bot.get_me().await {
        Ok(me) => info!(bot = %me.username(), "hostwatch started"),
        Err(e) => warn!(error = %e, "could not fetch bot identity"),
    }
    info!(
        domain_list = %cfg.domain_list_path.display(),
        probe = ?cfg.probe_method,
        interval_secs = cfg.check_interval.as_secs(),
        "monitoring configuration"
    );

    let connector: Arc<dyn MessengerConnector> =
        Arc::new(TelegramConnector::new(ThrottleConfig::default()));
    let notifier = Notifier::with_credentials(
        connector,
        Credentials::new(cfg.telegram_bot_token.clone(), cfg.telegram_chat_id),
    );
    let monitor = Monitor::new(
        DomainList::new(cfg.domain_list_path.clone()),
        build_prober(&cfg),
        notifier,
    );

    let (tx, rx) = mpsc::channel(cfg.command_queue_capacity);
    let monitor_loop = MonitorLoop::new(monitor, cfg.check_interval, cfg.loop_tick);
    let worker = tokio::spawn(monitor_loop.run(rx));

    let state = Arc::new(InboundState { commands: tx });
    let handler = Update::filter_message().endpoint(handlers::handle_message);

    // Inbound polling stays on the startup token; `/setcredentials` only
    // redirects outbound notifications.
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    // The dispatcher (and with it the last command sender) is gone; the loop
    // finishes its current work and exits.
    worker.await?;
    info!("hostwatch stopped");

    Ok(())
}

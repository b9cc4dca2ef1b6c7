//! Telegram update handlers.
//!
//! Handlers only parse and enqueue; all probing and notifying happens on the
//! monitor loop, one command at a time.

use std::sync::Arc;

use teloxide::{prelude::*, types::Message};
use tracing::{debug, warn};

use hostwatch_core::commands::parse_command;

use crate::router::InboundState;

pub async fn handle_message(msg: Message, state: Arc<InboundState>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let Some(cmd) = parse_command(text) else {
        debug!(chat_id = msg.chat.id.0, "ignoring non-command message");
        return Ok(());
    };

    debug!(chat_id = msg.chat.id.0, command = ?cmd.kind, "queueing command");

    // Bounded queue: wait for room rather than dropping the command.
    if state.commands.send(cmd).await.is_err() {
        warn!("monitor loop is gone, command dropped");
    }

    Ok(())
}

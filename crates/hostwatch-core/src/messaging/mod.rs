//! Outbound chat messaging (Telegram today, any bot-style messenger later).

pub mod port;
pub mod throttled;

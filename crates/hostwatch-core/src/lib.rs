//! Core domain + application logic for the hostwatch availability monitor.
//!
//! This crate is framework-agnostic. The chat transport (Telegram today) lives
//! behind the `MessagingPort` trait and is implemented in adapter crates.

pub mod commands;
pub mod config;
pub mod domain;
pub mod domain_list;
pub mod errors;
pub mod logging;
pub mod messaging;
pub mod monitor;
pub mod notifier;
pub mod probe;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod testing;

pub use errors::{Error, Result};

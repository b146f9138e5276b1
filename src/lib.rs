//! Streamwatch — liveness watchdog for a YouTube broadcast.
//!
//! Polls the YouTube Data API for the channel's active broadcast and, after
//! a configured number of consecutive negative checks, sends one alert via
//! Telegram, Pushover, or the console.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod alert;
pub mod config;
pub mod http;
pub mod logging;
pub mod status;
pub mod watchdog;

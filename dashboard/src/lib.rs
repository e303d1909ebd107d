//! Momentum YES status dashboard.
//!
//! Polls the bot backend's status snapshot, renders it into a retained
//! element tree and serves that tree as an auto-refreshing HTML page.

pub mod client;
pub mod config;
pub mod format;
pub mod freshness;
pub mod page;
pub mod poller;
pub mod render;
pub mod server;
pub mod surface;
pub mod types;

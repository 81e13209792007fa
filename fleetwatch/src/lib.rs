//! fleetwatch: polls a fleet of hosts over SSH, parses their resource report,
//! diffs two remote log streams between polls and pushes alerts to Telegram.

pub mod config;
pub mod http;
pub mod notifier;
pub mod parser;
pub mod policy;
pub mod runner;
pub mod scheduler;
pub mod snapshot;
pub mod state;
pub mod types;

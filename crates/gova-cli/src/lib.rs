//! Gova Admin host
//!
//! Headless host for [`gova_core::AdminController`]: parses the command line,
//! loads configuration, connects the store and prints results.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod output;

pub use cli::{command, parse_assignment};
pub use commands::run;

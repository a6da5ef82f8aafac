//! Terminal host for `todo-core`.
//!
//! Reads lines from the user, turns them into `TodoApp` actions, executes
//! the resulting requests with ureq and prints notifications and the list.

pub mod command;
pub mod config;
pub mod shell;
pub mod transport;

pub use config::ShellConfig;
pub use shell::{Flow, Shell};
pub use transport::{Transport, UreqTransport};

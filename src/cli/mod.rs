//! Command-line host for the certificate workflows.
//!
//! The binary plays the part of the dashboard: it turns arguments and files
//! into form submissions, runs the library's workflows and tabs, and prints
//! the messages they produce.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{AddArgs, AnalyticsArgs, AssociateArgs, ChoicesArgs, Cli, Commands, ListArgs};
pub use commands::{Command, CommandDispatcher, CommandResult};

//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait and runs against a
//! [`Request`](crate::workflow::Request), so the same code path serves the
//! real controller and the in-memory one used in tests.
//!
//! Commands are dispatched via [`CommandDispatcher`], which loads nothing
//! itself: it receives validated settings and connects to the controller
//! only for commands that need it.

pub mod add;
pub mod analytics;
pub mod associate;
pub mod choices;
pub mod dispatcher;
pub mod display;
pub mod install_asset;
pub mod list;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};

//! User-facing notifications.
//!
//! Workflows and tabs report outcomes as short messages rather than errors:
//! a success after a commit, a warning when a listing degrades, an error
//! when the controller refused a change. The host decides how to show them.
//!
//! - [`Messages`] - the sink trait
//! - [`MessageLog`] - records messages (tests, or hosts that render later)
//! - [`ConsoleMessages`] - prints styled messages to the terminal
//!
//! # Example
//!
//! ```
//! use lbcerts::messages::{MessageLog, Messages};
//!
//! let mut log = MessageLog::new();
//! log.warning("Unable to retrieve certificates");
//!
//! assert!(log.has_warning("retrieve certificates"));
//! assert!(log.errors().is_empty());
//! ```

pub mod terminal;
pub mod log;

pub use self::terminal::{ConsoleMessages, MessageTheme};
pub use self::log::MessageLog;

use serde::Serialize;

/// Severity of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

/// Sink for user-facing messages.
pub trait Messages {
    /// Record a message at `level`.
    fn add(&mut self, level: Level, msg: &str);

    /// Informational message.
    fn info(&mut self, msg: &str) {
        self.add(Level::Info, msg);
    }

    /// Success message.
    fn success(&mut self, msg: &str) {
        self.add(Level::Success, msg);
    }

    /// Non-fatal warning.
    fn warning(&mut self, msg: &str) {
        self.add(Level::Warning, msg);
    }

    /// Error message.
    fn error(&mut self, msg: &str) {
        self.add(Level::Error, msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_methods_route_to_add() {
        let mut log = MessageLog::new();
        log.info("i");
        log.success("s");
        log.warning("w");
        log.error("e");

        let levels: Vec<_> = log.entries().iter().map(|(l, _)| *l).collect();
        assert_eq!(
            levels,
            vec![Level::Info, Level::Success, Level::Warning, Level::Error]
        );
    }

    #[test]
    fn level_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Level::Warning).unwrap(), "\"warning\"");
    }
}

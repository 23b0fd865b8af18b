//! Recording message sink.

use super::{Level, Messages};

/// Captures every message for later inspection.
#[derive(Debug, Default, Clone)]
pub struct MessageLog {
    entries: Vec<(Level, String)>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages in the order they were added.
    pub fn entries(&self) -> &[(Level, String)] {
        &self.entries
    }

    /// Messages at `level`.
    pub fn at(&self, level: Level) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.as_str())
            .collect()
    }

    pub fn successes(&self) -> Vec<&str> {
        self.at(Level::Success)
    }

    pub fn warnings(&self) -> Vec<&str> {
        self.at(Level::Warning)
    }

    pub fn errors(&self) -> Vec<&str> {
        self.at(Level::Error)
    }

    /// Check if a success containing `msg` was added.
    pub fn has_success(&self, msg: &str) -> bool {
        self.has(Level::Success, msg)
    }

    /// Check if a warning containing `msg` was added.
    pub fn has_warning(&self, msg: &str) -> bool {
        self.has(Level::Warning, msg)
    }

    /// Check if an error containing `msg` was added.
    pub fn has_error(&self, msg: &str) -> bool {
        self.has(Level::Error, msg)
    }

    fn has(&self, level: Level, msg: &str) -> bool {
        self.entries
            .iter()
            .any(|(l, m)| *l == level && m.contains(msg))
    }

    /// Drain all captured messages.
    pub fn take(&mut self) -> Vec<(Level, String)> {
        std::mem::take(&mut self.entries)
    }
}

impl Messages for MessageLog {
    fn add(&mut self, level: Level, msg: &str) {
        self.entries.push((level, msg.to_string()));
    }
}

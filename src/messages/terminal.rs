//! Terminal message sink.

use console::Style;

use super::{Level, Messages};

/// Styles for each message level.
#[derive(Debug, Clone)]
pub struct MessageTheme {
    pub info: Style,
    pub success: Style,
    pub warning: Style,
    pub error: Style,
}

impl MessageTheme {
    /// Colored theme.
    pub fn new() -> Self {
        Self {
            info: Style::new().magenta(),
            success: Style::new().green(),
            warning: Style::new().color256(208),
            error: Style::new().red().bold(),
        }
    }

    /// Theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            info: Style::new(),
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
        }
    }

    fn style(&self, level: Level) -> &Style {
        match level {
            Level::Info => &self.info,
            Level::Success => &self.success,
            Level::Warning => &self.warning,
            Level::Error => &self.error,
        }
    }
}

impl Default for MessageTheme {
    fn default() -> Self {
        Self::new()
    }
}

/// Prints messages to the terminal: info and success on stdout,
/// warnings and errors on stderr.
#[derive(Debug, Clone, Default)]
pub struct ConsoleMessages {
    theme: MessageTheme,
    quiet: bool,
}

impl ConsoleMessages {
    pub fn new(theme: MessageTheme) -> Self {
        Self {
            theme,
            quiet: false,
        }
    }

    /// Only print warnings and errors.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }
}

/// Prefix icon for a level.
fn icon(level: Level) -> &'static str {
    match level {
        Level::Info => "•",
        Level::Success => "✓",
        Level::Warning => "⚠",
        Level::Error => "✗",
    }
}

impl Messages for ConsoleMessages {
    fn add(&mut self, level: Level, msg: &str) {
        let line = self
            .theme
            .style(level)
            .apply_to(format!("{} {}", icon(level), msg));
        match level {
            Level::Info | Level::Success if !self.quiet => println!("{}", line),
            Level::Info | Level::Success => {}
            Level::Warning | Level::Error => eprintln!("{}", line),
        }
    }
}

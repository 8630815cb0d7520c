//! Terminal notifier: the CLI's stand-in for toast messages.

use poll_core::enums::NotifyLevel;
use poll_core::notify::Notifier;

/// Writes notifications to stderr so they never mix with command output.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleNotifier {
    quiet: bool,
}

impl ConsoleNotifier {
    pub const fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// The line printed for a notification, or `None` when suppressed.
    /// Errors are shown even in quiet mode.
    pub fn line(&self, level: NotifyLevel, message: &str) -> Option<String> {
        match level {
            NotifyLevel::Success if self.quiet => None,
            NotifyLevel::Success => Some(format!("✔ {message}")),
            NotifyLevel::Error => Some(format!("✖ {message}")),
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, level: NotifyLevel, message: &str) {
        if let Some(line) = self.line(level, message) {
            eprintln!("{line}");
        }
    }
}

use colored::Colorize;

use crate::document::accepted_formats_label;
use crate::render::SpinnerSlot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
}

/// A transient message, separate from the error panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub title: String,
    pub description: String,
}

impl Notification {
    fn new(level: Level, title: &str, description: impl Into<String>) -> Self {
        Self {
            level,
            title: title.to_string(),
            description: description.into(),
        }
    }

    pub fn invalid_format() -> Self {
        Self::new(
            Level::Error,
            "Invalid file format",
            format!("Please upload a {} file.", accepted_formats_label()),
        )
    }

    pub fn no_file_selected() -> Self {
        Self::new(
            Level::Error,
            "No file selected",
            "Please select a file to convert.",
        )
    }

    pub fn converted(filename: &str) -> Self {
        Self::new(
            Level::Success,
            "Conversion successful",
            format!("{} has been converted to Markdown.", filename),
        )
    }

    pub fn conversion_failed(message: &str) -> Self {
        Self::new(Level::Error, "Conversion failed", message)
    }

    pub fn copied() -> Self {
        Self::new(
            Level::Success,
            "Copied to clipboard",
            "Markdown content has been copied to clipboard.",
        )
    }
}

pub trait Notifier {
    fn notify(&self, notification: Notification);
}

/// Prints notifications to stderr so stdout stays clean for Markdown.
/// Lines are written with the loading spinner suspended.
#[derive(Debug, Default)]
pub struct TerminalNotifier {
    spinner: SpinnerSlot,
}

impl TerminalNotifier {
    pub fn new(spinner: SpinnerSlot) -> Self {
        Self { spinner }
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        let (icon, title) = match notification.level {
            Level::Success => ("✓".green(), notification.title.green().bold()),
            Level::Error => ("✗".red(), notification.title.red().bold()),
        };
        self.spinner.print(|| {
            eprintln!("{} {} {}", icon, title, notification.description.dimmed())
        });
    }
}

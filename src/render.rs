use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::controller::{FileSummary, ViewState};
use crate::document::accepted_formats_label;

pub const CONVERT_LABEL: &str = "Convert to Markdown";
pub const CONVERTING_LABEL: &str = "Converting...";

/// The upload card: selected file and the convert button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCard {
    pub selected: Option<FileSummary>,
    pub button_label: &'static str,
    pub button_enabled: bool,
}

/// What the terminal page shows for a given state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub upload: UploadCard,
    pub show_loading: bool,
    pub error: Option<String>,
    pub result: Option<String>,
}

impl Page {
    pub fn project(state: &ViewState) -> Self {
        let upload = UploadCard {
            selected: state.file.clone(),
            button_label: if state.loading {
                CONVERTING_LABEL
            } else {
                CONVERT_LABEL
            },
            button_enabled: state.file.is_some() && !state.loading,
        };

        Self {
            upload,
            show_loading: state.loading,
            error: state.error.clone().filter(|e| !e.is_empty()),
            result: state.result.clone().filter(|r| !r.is_empty()),
        }
    }

    /// Whether "Copy to Clipboard" should be offered
    pub fn can_copy(&self) -> bool {
        self.result.is_some()
    }
}

/// Draw the page to stdout
pub fn print_page(page: &Page) {
    println!("{}", "Upload Document".bold());
    println!(
        "  {}",
        format!("Convert {} files to Markdown", accepted_formats_label()).dimmed()
    );
    match &page.upload.selected {
        Some(file) => println!(
            "  {} {} {}",
            "Selected:".dimmed(),
            file.name.cyan(),
            format!("({} bytes)", file.size).dimmed()
        ),
        None => println!("  {}", "No file selected".dimmed()),
    }
    let button = format!("[ {} ]", page.upload.button_label);
    if page.upload.button_enabled {
        println!("  {}", button.green());
    } else {
        println!("  {}", button.bright_black());
    }

    if page.show_loading {
        println!("\n{}", CONVERTING_LABEL.bold());
    }

    if let Some(error) = &page.error {
        println!("\n{} {}", "Error:".red().bold(), error);
    }

    if let Some(result) = &page.result {
        println!("\n{}", "Markdown Result".bold());
        println!("{}", "─".repeat(50).dimmed());
        println!("{}", result);
        println!("{}", "─".repeat(50).dimmed());
    }
}

/// Render markdown text to the terminal using termimad
pub fn render_markdown(text: &str) {
    let skin = termimad::MadSkin::default();
    skin.print_text(text);
}

fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

/// The spinner currently on screen, shared with whatever else prints to
/// the terminal while it runs
#[derive(Debug, Clone, Default)]
pub struct SpinnerSlot(Arc<Mutex<Option<ProgressBar>>>);

impl SpinnerSlot {
    /// Run `print` with the spinner hidden so the two never share a line
    pub fn print(&self, print: impl FnOnce()) {
        let slot = self.lock();
        match slot.as_ref() {
            Some(bar) => bar.suspend(print),
            None => print(),
        }
    }

    pub fn is_spinning(&self) -> bool {
        self.lock().is_some()
    }

    fn start(&self, message: &str) {
        let mut slot = self.lock();
        if slot.is_none() {
            *slot = Some(create_spinner(message));
        }
    }

    fn stop(&self) {
        // Cleared under the lock so a concurrent print waits for it
        let mut slot = self.lock();
        if let Some(bar) = slot.take() {
            bar.finish_and_clear();
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<ProgressBar>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Show a spinner in `slot` whenever the controller is loading. Ends when
/// the controller is dropped.
pub fn spawn_loading_indicator(
    mut view: watch::Receiver<ViewState>,
    slot: SpinnerSlot,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let loading = view.borrow_and_update().loading;
            if loading {
                slot.start(CONVERTING_LABEL);
            } else {
                slot.stop();
            }
            if view.changed().await.is_err() {
                break;
            }
        }
        slot.stop();
    })
}

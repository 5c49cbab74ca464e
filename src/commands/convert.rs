use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

use crate::clipboard::SystemClipboard;
use crate::commands::terminal_controller;
use crate::config::Config;
use crate::controller::Submission;
use crate::document::{DocumentFormat, SelectedFile};
use crate::notify::{Notification, Notifier, TerminalNotifier};
use crate::render;

#[derive(Debug, Default)]
pub struct ConvertOptions {
    pub origin: Option<String>,
    pub copy: bool,
    pub output: Option<PathBuf>,
    pub preview: bool,
}

/// Convert a single document and print or save the Markdown.
///
/// Returns `Ok(false)` when the document was rejected or the conversion
/// failed; the reason has already been shown as a notification.
pub async fn run(path: PathBuf, options: ConvertOptions) -> Result<bool> {
    if DocumentFormat::from_path(&path).is_none() {
        TerminalNotifier::default().notify(Notification::invalid_format());
        return Ok(false);
    }

    let config = Config::load()?;
    let location = config.location(options.origin.as_deref())?;
    let copy = options.copy || config.copy_on_success();
    let clipboard = if copy {
        SystemClipboard::holding()
    } else {
        SystemClipboard::new()
    };
    let holds_selection = clipboard.holds_selection();

    let file = SelectedFile::read(&path).await?;

    let (mut controller, indicator) = terminal_controller(location, clipboard);
    let outcome = match controller.select_file(file) {
        Ok(()) => controller.submit().await,
        Err(_) => Submission::Skipped,
    };

    let Submission::Converted(conversion) = outcome else {
        drop(controller);
        let _ = indicator.await;
        return Ok(false);
    };

    match &options.output {
        Some(output) => {
            tokio::fs::write(output, &conversion.content)
                .await
                .with_context(|| format!("Failed to write Markdown to {}", output.display()))?;
            eprintln!(
                "{} Wrote {} chars to {}",
                "✓".green(),
                conversion.content.len(),
                output.display().to_string().cyan()
            );
        }
        None if options.preview => render::render_markdown(&conversion.content),
        None => println!("{}", conversion.content),
    }

    if copy {
        if holds_selection && cfg!(target_os = "linux") {
            eprintln!(
                "{}",
                "Keeping the Markdown on the clipboard until something else is copied (Ctrl+C to stop)"
                    .dimmed()
            );
        }
        controller
            .copy_result()
            .context("Failed to copy Markdown to clipboard")?;
    }

    drop(controller);
    let _ = indicator.await;

    Ok(true)
}

use anyhow::Result;
use colored::Colorize;
use inquire::{Select, Text};
use std::path::PathBuf;

use crate::clipboard::SystemClipboard;
use crate::commands::{optional, terminal_controller};
use crate::config::Config;
use crate::controller::Submission;
use crate::document::{SelectedFile, accepted_formats_label};
use crate::render::{self, CONVERT_LABEL, Page};

const SELECT: &str = "📂  Select document";
const COPY: &str = "📋  Copy to Clipboard";
const EXIT: &str = "🚪  Exit";

/// Interactive upload form: pick a document, convert it, copy the result
pub async fn run(origin: Option<String>) -> Result<()> {
    let config = Config::load()?;
    let location = config.location(origin.as_deref())?;
    let endpoint = location.endpoint()?;

    println!(
        "  {} {}\n",
        "Endpoint:".dimmed(),
        endpoint.as_str().cyan()
    );

    let (mut controller, indicator) = terminal_controller(location, SystemClipboard::new());
    let convert_option = format!("🔄  {}", CONVERT_LABEL);

    loop {
        let page = Page::project(&controller.state());
        render::print_page(&page);
        println!();

        let mut options = vec![SELECT];
        if page.upload.button_enabled {
            options.push(convert_option.as_str());
        }
        if page.can_copy() {
            options.push(COPY);
        }
        options.push(EXIT);

        let answer = Select::new("What would you like to do?", options)
            .with_help_message("Use arrow keys to navigate, Enter to select")
            .prompt();
        let Some(selection) = optional(answer)? else {
            break;
        };

        match selection {
            SELECT => {
                if let Some(path) = prompt_for_path()? {
                    match SelectedFile::read(&path).await {
                        // Rejections are already reported as a notification
                        Ok(file) => {
                            let _ = controller.select_file(file);
                        }
                        Err(e) => eprintln!("{} {:#}", "Error:".red(), e),
                    }
                }
            }
            s if s == convert_option => {
                let outcome = controller.submit().await;
                if matches!(outcome, Submission::Converted(_)) && config.copy_on_success() {
                    if let Err(e) = controller.copy_result() {
                        eprintln!("{} {}", "Error:".red(), e);
                    }
                }
            }
            COPY => {
                if let Err(e) = controller.copy_result() {
                    eprintln!("{} {}", "Error:".red(), e);
                }
            }
            EXIT => break,
            _ => {}
        }

        println!();
    }

    drop(controller);
    let _ = indicator.await;

    println!("{}", "👋 Bye!".cyan());

    Ok(())
}

fn prompt_for_path() -> Result<Option<PathBuf>> {
    let help = format!("{} (tab for path completion)", accepted_formats_label());
    let answer = Text::new("Document path:").with_help_message(&help).prompt();

    Ok(optional(answer)?
        .map(|path| path.trim().to_string())
        .filter(|path| !path.is_empty())
        .map(PathBuf::from))
}

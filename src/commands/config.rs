use anyhow::Result;
use colored::Colorize;
use inquire::{Confirm, Select, Text};

use crate::commands::optional;
use crate::config::{Config, ORIGIN_ENV};
use crate::endpoint::{DEFAULT_ORIGIN, PageLocation};

pub async fn run() -> Result<()> {
    println!();
    println!(
        "    {}",
        "╭──────────────────────────────────────────────────────╮".bright_black()
    );
    println!(
        "    {}                  {}                  {}",
        "│".bright_black(),
        "⚙️  SETTINGS ⚙️".bold().white(),
        "│".bright_black()
    );
    println!(
        "    {}",
        "╰──────────────────────────────────────────────────────╯".bright_black()
    );
    println!();

    let mut config = Config::load()?;

    let options = vec![
        "🌐  Set Origin         │ Where the converter is hosted",
        "📋  Copy On Success    │ Copy Markdown automatically",
        "📄  View Settings      │ See current configuration",
        "←   Back",
    ];

    loop {
        let answer = Select::new("What would you like to configure?", options.clone()).prompt();
        let Some(selection) = optional(answer)? else {
            break;
        };

        match selection {
            s if s.contains("Set Origin") => {
                if let Err(e) = set_origin(&mut config) {
                    eprintln!("{} {}", "Error:".red(), e);
                }
            }
            s if s.contains("Copy On Success") => {
                if let Err(e) = set_copy_on_success(&mut config) {
                    eprintln!("{} {}", "Error:".red(), e);
                }
            }
            s if s.contains("View Settings") => {
                view_config(&config);
            }
            s if s.contains("Back") => break,
            _ => {}
        }

        println!();
    }

    Ok(())
}

fn set_origin(config: &mut Config) -> Result<()> {
    let current = config.origin.clone().unwrap_or_else(|| DEFAULT_ORIGIN.to_string());

    let answer = Text::new("Origin URL:")
        .with_default(&current)
        .with_help_message("localhost talks to port 8000, other hosts to their api. subdomain")
        .prompt();

    let origin = optional(answer)?.unwrap_or_default().trim().to_string();
    if origin.is_empty() {
        println!("{}", "Cancelled.".dimmed());
        return Ok(());
    }

    let location = PageLocation::parse(&origin)?;
    config.origin = Some(origin);
    config.save()?;

    println!(
        "{} Origin saved, converting via {}",
        "✓".green(),
        location.endpoint()?.as_str().yellow()
    );

    Ok(())
}

fn set_copy_on_success(config: &mut Config) -> Result<()> {
    let answer = Confirm::new("Copy Markdown to the clipboard after each conversion?")
        .with_default(config.copy_on_success())
        .prompt();
    let Some(enabled) = optional(answer)? else {
        println!("{}", "Cancelled.".dimmed());
        return Ok(());
    };

    config.copy_on_success = Some(enabled);
    config.save()?;

    println!(
        "{} Copy on success {}",
        "✓".green(),
        if enabled { "enabled".green() } else { "disabled".yellow() }
    );

    Ok(())
}

fn view_config(config: &Config) {
    println!("\n{}", "Current Configuration:".bold());
    println!("{}", "─".repeat(30).dimmed());

    let origin = config.resolve_origin(None);
    let origin_note = if std::env::var(ORIGIN_ENV).is_ok() {
        format!("(set via {} env)", ORIGIN_ENV).yellow().to_string()
    } else if config.origin.is_some() {
        String::new()
    } else {
        "(default)".dimmed().to_string()
    };
    println!("  Origin: {} {}", origin, origin_note);

    match PageLocation::parse(&origin).map(|l| l.endpoint()) {
        Ok(Ok(endpoint)) => println!("  Endpoint: {}", endpoint.as_str().cyan()),
        _ => println!("  Endpoint: {}", "invalid origin".red()),
    }

    println!(
        "  Copy on success: {}",
        if config.copy_on_success() { "yes" } else { "no" }
    );

    if let Ok(path) = Config::config_path() {
        println!("  Config file: {}", path.display().to_string().dimmed());
    }
}

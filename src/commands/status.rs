use anyhow::{Context, Result};
use colored::Colorize;

use crate::client::HttpConverter;
use crate::config::Config;

/// Ask the conversion service to describe itself
pub async fn run(origin: Option<String>) -> Result<()> {
    let config = Config::load()?;
    let location = config.location(origin.as_deref())?;
    let root = location.service_root()?;
    let endpoint = location.endpoint()?;

    println!("  {} {}", "Service:".dimmed(), root.as_str().cyan());
    println!("  {} {}", "Endpoint:".dimmed(), endpoint.as_str().cyan());

    let info = HttpConverter::new()
        .service_info(&root)
        .await
        .with_context(|| format!("Conversion service at {} is not reachable", root))?;

    println!("\n{} {}", "✓".green(), info.message.bold());
    if let Some(usage) = &info.usage {
        println!("  {}", usage.dimmed());
    }
    if !info.supported_formats.is_empty() {
        println!(
            "  {} {}",
            "Formats:".dimmed(),
            info.supported_formats.join(", ").yellow()
        );
    }

    Ok(())
}

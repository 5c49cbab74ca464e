use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use colored::Colorize;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod client;
mod clipboard;
mod commands;
mod config;
mod controller;
mod document;
mod endpoint;
mod error;
mod notify;
mod render;

use commands::convert::ConvertOptions;

/// ASCII art banner for the application
const BANNER: &str = r#"
      _                ____              _
   __| | ___   ___ ___|___ \ _ __ ___   __| |
  / _` |/ _ \ / __/ __| __) | '_ ` _ \ / _` |
 | (_| | (_) | (__\__ \/ __/| | | | | | (_| |
  \__,_|\___/ \___|___/_____|_| |_| |_|\__,_|
"#;

/// Print the application banner
fn print_banner() {
    println!("{}", BANNER.cyan().bold());
}

#[derive(Parser)]
#[command(name = "docs2md")]
#[command(about = "Convert PDF, DOCX, XLSX, PPTX or HTML documents to Markdown")]
#[command(version)]
struct Cli {
    /// Show debug logs (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a document and print the Markdown
    Convert {
        /// Document to upload
        path: PathBuf,
        /// Origin the converter is hosted on, e.g. https://docs2md.example.com
        #[arg(long)]
        origin: Option<String>,
        /// Copy the Markdown to the clipboard
        #[arg(short, long)]
        copy: bool,
        /// Write the Markdown to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Render the Markdown for the terminal
        #[arg(long, conflicts_with = "output")]
        preview: bool,
    },
    /// Check that the conversion service is reachable
    Status {
        /// Origin the converter is hosted on
        #[arg(long)]
        origin: Option<String>,
    },
    /// Configure settings (origin, clipboard)
    Config,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "docs2md=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Convert {
            path,
            origin,
            copy,
            output,
            preview,
        }) => {
            let converted = commands::convert::run(
                path,
                ConvertOptions {
                    origin,
                    copy,
                    output,
                    preview,
                },
            )
            .await?;
            if !converted {
                return Ok(ExitCode::FAILURE);
            }
        }
        Some(Commands::Status { origin }) => {
            commands::status::run(origin).await?;
        }
        Some(Commands::Config) => {
            commands::config::run().await?;
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout());
        }
        None => {
            // No subcommand - show the interactive form
            print_banner();
            println!(
                "  {} {}\n",
                "Version:".dimmed(),
                env!("CARGO_PKG_VERSION").cyan()
            );
            commands::session::run(None).await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

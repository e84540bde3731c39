//! pipehub configuration tool.
//!
//! ```text
//! config.toml → load → validate ─┬→ check     (validated Config as JSON)
//!                                └→ generate  (GenerateConfig as JSON)
//! ```
//!
//! Any decode, validation or duration error is fatal: the message goes to
//! stderr and the process exits with status 1.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;

use pipehub::config::load_config;
use pipehub::observability::logging;

#[derive(Parser)]
#[command(name = "pipehub")]
#[command(about = "Validate pipehub configuration", long_about = None)]
struct Cli {
    /// Log level used when RUST_LOG is not set.
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode and validate a config file, then print it
    Check {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Print the plugin build configuration
    Generate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(&cli.log_level);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Check { config } => {
            let cfg = load_config(&config)?;
            // Surface a bad graceful-shutdown literal here rather than at stop time.
            let window = cfg.graceful_shutdown()?;
            tracing::info!(
                hosts = cfg.hosts.len(),
                pipes = cfg.pipes.len(),
                graceful_shutdown = ?window,
                "Configuration is valid"
            );
            print_json(&cfg)?;
        }
        Commands::Generate { config } => {
            let cfg = load_config(&config)?;
            print_json(&cfg.to_generate_config())?;
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

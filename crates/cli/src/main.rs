//! Customizer CLI - price evaluation, validation, and scaffolding tools.
//!
//! # Usage
//!
//! ```bash
//! # Compute the price for a configuration and a set of selections
//! customizer-cli price --config customizer.json --selections selections.json
//!
//! # Validate a configuration the way the editor does before saving
//! customizer-cli validate --config customizer.json
//!
//! # Write the default configuration skeleton
//! customizer-cli init --out customizer.json
//! ```
//!
//! # Commands
//!
//! - `price` - Evaluate the pricing engine against files
//! - `validate` - Report field-path validation errors (non-zero exit if any)
//! - `init` - Emit the default skeleton configuration

#![cfg_attr(not(test), forbid(unsafe_code))]
// CLI results go to stdout/stderr by contract.
#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "customizer-cli")]
#[command(author, version, about = "Product customizer tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the price for a configuration and a set of selections
    Price {
        /// Path to the configuration JSON (a block array)
        #[arg(short, long)]
        config: PathBuf,

        /// Path to the selections JSON (block id to value)
        #[arg(short, long)]
        selections: PathBuf,
    },
    /// Validate a configuration for persistence
    Validate {
        /// Path to the configuration JSON (a block array)
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Write the default configuration skeleton
    Init {
        /// Destination file (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Commands::Price { config, selections } => {
            println!("{}", commands::price::run(&config, &selections)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Validate { config } => {
            let report = commands::validate::run(&config)?;
            println!("{}", report.text);
            Ok(if report.valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Init { out } => {
            let skeleton = commands::init::skeleton_json();
            match out {
                Some(path) => {
                    std::fs::write(&path, skeleton)?;
                    println!("Wrote {}", path.display());
                }
                None => println!("{skeleton}"),
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

//! spoof-eval CLI - Audio deepfake detection benchmark tool

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

/// Audio deepfake detection benchmarking tool.
#[derive(Parser)]
#[command(name = "spoof-eval")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an evaluation from a YAML setup file
    Evaluate {
        /// Path to the evaluation setup YAML
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Recompute metrics from a previously written scores CSV
    Metrics {
        /// Input scores CSV (score,label columns)
        #[arg(short, long)]
        input: PathBuf,

        /// Fixed decision threshold (defaults to the EER cut point)
        #[arg(short, long)]
        threshold: Option<f64>,
    },

    /// Inspect manifest files
    Manifest {
        #[command(subcommand)]
        action: ManifestAction,
    },
}

#[derive(Subcommand)]
enum ManifestAction {
    /// Show row count, class balance, and columns of a manifest
    Info {
        /// Manifest CSV file
        path: PathBuf,

        /// Also check that the referenced audio files exist
        #[arg(long)]
        check_files: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Evaluate { config } => commands::evaluate::run(config, cli.verbose),
        Commands::Metrics { input, threshold } => {
            commands::metrics::run(input, threshold, cli.verbose)
        }
        Commands::Manifest { action } => match action {
            ManifestAction::Info { path, check_files } => {
                commands::manifest::run(path, check_files, cli.verbose)
            }
        },
    }
}

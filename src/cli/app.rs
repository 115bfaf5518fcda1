//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::synth;

#[derive(Parser)]
#[command(name = "stackplan")]
#[command(
    author,
    version,
    about = "Synthesizes deployment graphs for managed search ingestion stacks"
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the deployment template
    Synth {
        /// Deployment document (.toml, .json, .yaml or .yml)
        doc: PathBuf,

        /// Defaults file overriding the built-in baseline
        #[arg(long)]
        defaults: Option<PathBuf>,

        /// Known-network catalogue file
        #[arg(long)]
        networks: Option<PathBuf>,

        /// Write the template to a file instead of stdout
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,
    },

    /// Show the resource graph in creation order
    Graph {
        /// Deployment document (.toml, .json, .yaml or .yml)
        doc: PathBuf,

        /// Defaults file overriding the built-in baseline
        #[arg(long)]
        defaults: Option<PathBuf>,

        /// Known-network catalogue file
        #[arg(long)]
        networks: Option<PathBuf>,
    },

    /// Show the projected stack outputs
    Outputs {
        /// Deployment document (.toml, .json, .yaml or .yml)
        doc: PathBuf,

        /// Defaults file overriding the built-in baseline
        #[arg(long)]
        defaults: Option<PathBuf>,

        /// Known-network catalogue file
        #[arg(long)]
        networks: Option<PathBuf>,
    },

    /// Resolve the configuration and report the effective settings
    Validate {
        /// Deployment document (.toml, .json, .yaml or .yml)
        doc: PathBuf,

        /// Defaults file overriding the built-in baseline
        #[arg(long)]
        defaults: Option<PathBuf>,

        /// Known-network catalogue file
        #[arg(long)]
        networks: Option<PathBuf>,
    },
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.format, cli.verbose);

    output.verbose("stackplan starting");

    match cli.command {
        Commands::Synth {
            doc,
            defaults,
            networks,
            out,
        } => synth::synth(
            &output,
            &doc,
            defaults.as_deref(),
            networks.as_deref(),
            out.as_deref(),
        )?,

        Commands::Graph {
            doc,
            defaults,
            networks,
        } => synth::graph(&output, &doc, defaults.as_deref(), networks.as_deref())?,

        Commands::Outputs {
            doc,
            defaults,
            networks,
        } => synth::outputs(&output, &doc, defaults.as_deref(), networks.as_deref())?,

        Commands::Validate {
            doc,
            defaults,
            networks,
        } => synth::validate(&output, &doc, defaults.as_deref(), networks.as_deref())?,
    }

    output.verbose("Command completed successfully");
    Ok(())
}

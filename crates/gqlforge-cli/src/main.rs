//! gqlforge CLI - GraphQL schema generator for annotated Go types
//!
//! Commands:
//! - `gqlforge generate` - Scan Go sources and write the schema files
//! - `gqlforge check` - Resolve everything and list planned files, write nothing
//! - `gqlforge init` - Create a starter gqlforge.toml

use clap::{Parser, Subcommand};
use gqlforge_core::OutputStrategy;
use std::path::PathBuf;
use std::process::ExitCode;

mod check;
mod config_file;
mod generate;
mod init;
mod logging;
mod report;

use config_file::Overrides;

#[derive(Parser)]
#[command(name = "gqlforge")]
#[command(author, version, about = "GraphQL schema generator for annotated Go types", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct ConfigArgs {
    /// Path to gqlforge.toml or a JSON config (default: ./gqlforge.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Root specifier to scan, replaces the configured roots (repeatable)
    #[arg(short, long = "root")]
    roots: Vec<String>,

    /// Output directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output strategy (single, multiple, package)
    #[arg(short, long)]
    strategy: Option<OutputStrategy>,
}

impl ConfigArgs {
    fn overrides(self) -> (Option<PathBuf>, Overrides) {
        (
            self.config,
            Overrides {
                roots: self.roots,
                output: self.output,
                strategy: self.strategy,
            },
        )
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the GraphQL schema files
    Generate {
        #[command(flatten)]
        config: ConfigArgs,

        /// Print the generation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Scan and resolve, then list the files a run would write
    Check {
        #[command(flatten)]
        config: ConfigArgs,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a starter gqlforge.toml
    Init {
        /// Directory to create the file in (default: current directory)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Overwrite an existing gqlforge.toml
        #[arg(short, long)]
        force: bool,
    },
}

fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Generate { config, json } => {
            let (path, overrides) = config.overrides();
            generate::run(path.as_deref(), overrides, json)
        }
        Commands::Check { config, json } => {
            let (path, overrides) = config.overrides();
            check::run(path.as_deref(), overrides, json)
        }
        Commands::Init { path, force } => init::run(path, force),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(report::exit_code(&err))
        }
    }
}

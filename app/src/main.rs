#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod command;

use command::{
    CommandStrategy, ExtractInput, ExtractStrategy, InfoStrategy, InitStrategy, RenderInput,
    RenderStrategy, VersionStrategy,
};

#[derive(Parser)]
#[command(name = "subtab")]
#[command(about = "Tabulate subsidy programs found in assistant answers", long_about = None)]
struct Cli {
    /// Config file to use instead of ~/subtab/config.json
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Splice a records table into answers and print the sanitized result
    Render {
        /// Answer files; reads stdin when none are given
        files: Vec<PathBuf>,
    },
    /// Print extracted records as JSON
    Extract {
        /// Answer file; reads stdin when omitted
        file: Option<PathBuf>,
    },
    /// Initialize configuration
    Init,
    /// Show effective configuration
    Info,
    /// Show version
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Render { files } => RenderStrategy.execute(RenderInput {
            files,
            config: cli.config,
        }),
        Commands::Extract { file } => ExtractStrategy.execute(ExtractInput {
            file,
            config: cli.config,
        }),
        Commands::Init => InitStrategy.execute(()),
        Commands::Info => InfoStrategy.execute(cli.config),
        Commands::Version => VersionStrategy.execute(()),
    }
}

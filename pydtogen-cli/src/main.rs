use clap::{Parser, Subcommand};
use pydtogen_schema::Dialect;
use std::path::PathBuf;

mod commands;
mod config;

use config::OptionOverrides;

#[derive(Parser)]
#[command(name = "pydtogen")]
#[command(about = "Generate Pydantic DTO models from relational table definitions")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a Python module with one model per table (or per variant)
    Generate {
        /// YAML table files or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        #[command(flatten)]
        overrides: OptionOverrides,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check table files without generating code
    Validate {
        /// YAML table files or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        #[command(flatten)]
        overrides: OptionOverrides,
    },

    /// List the native column types known to the type catalog
    Types {
        /// Only list one dialect (generic, mysql, postgres, sqlite)
        #[arg(short, long)]
        dialect: Option<Dialect>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    match cli.command {
        Commands::Generate {
            paths,
            overrides,
            output,
        } => commands::generate::run(paths, overrides, output),
        Commands::Validate { paths, overrides } => commands::validate::run(paths, overrides),
        Commands::Types { dialect } => commands::types::run(dialect),
    }
}

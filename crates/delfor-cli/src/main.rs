//! # delfor
//!
//! Command-line front end of the DELFOR delivery-schedule engine: parse
//! interchanges to JSON, summarize them, or export their delivery rows.

use clap::{ArgAction, Parser, Subcommand};
use delfor_model::Dialect;
use std::path::PathBuf;

mod commands;
mod config;
mod logging;

use crate::commands::{ExportOptions, run_export, run_parse, run_summary};
use crate::config::AppConfig;

/// Exit code for input, parse task or export failures
const EXIT_FAILURE: i32 = 1;
/// Exit code for an unusable configuration
const EXIT_FATAL: i32 = 3;

#[derive(Parser)]
#[command(name = "delfor")]
#[command(about = "DELFOR delivery schedule engine")]
#[command(version)]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse interchanges and print their entities as JSON
    Parse {
        /// Interchange files; each one is parsed independently
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Partner dialect (cummins, minebea, trw)
        #[arg(short, long)]
        dialect: Option<Dialect>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print delivery statistics for an interchange
    Summary {
        input: PathBuf,

        #[arg(short, long)]
        dialect: Option<Dialect>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export the delivery rows of an interchange as CSV
    Export {
        input: PathBuf,

        output: PathBuf,

        #[arg(short, long)]
        dialect: Option<Dialect>,

        /// Field delimiter, overriding the configuration
        #[arg(long)]
        delimiter: Option<char>,

        /// Do not write a header row
        #[arg(long)]
        no_header: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let config = match cli.config.as_deref().map(AppConfig::load).transpose() {
        Ok(config) => config.unwrap_or_default(),
        Err(error) => {
            eprintln!("ERROR: {error}");
            std::process::exit(EXIT_FATAL);
        }
    };

    let result = match cli.command {
        Commands::Parse {
            inputs,
            dialect,
            pretty,
        } => run_parse(inputs, dialect.unwrap_or(config.default_dialect), pretty).await,
        Commands::Summary {
            input,
            dialect,
            json,
        } => run_summary(input, dialect.unwrap_or(config.default_dialect), json).await,
        Commands::Export {
            input,
            output,
            dialect,
            delimiter,
            no_header,
        } => {
            let options = ExportOptions {
                delimiter,
                no_header,
            };
            let dialect = dialect.unwrap_or(config.default_dialect);
            run_export(input, output, dialect, options, &config).await
        }
    };

    if let Err(error) = result {
        eprintln!("ERROR: {error:#}");
        std::process::exit(EXIT_FAILURE);
    }
}

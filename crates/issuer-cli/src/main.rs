//! # issuer CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use issuer_cli::schema::{run_schema, SchemaArgs};
use issuer_cli::types::{run_types, TypesArgs};
use issuer_cli::validate::{run_validate, ValidateArgs};

/// Credential schema toolkit.
///
/// Inspects credential schemas, validates credential documents against
/// them, and resolves the JSON-LD types bound to their subjects.
#[derive(Parser, Debug)]
#[command(name = "issuer", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    /// Ignored when RUST_LOG is set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a credential schema and print its normalized form.
    Schema(SchemaArgs),

    /// Validate a credential document or subject against a schema.
    Validate(ValidateArgs),

    /// Resolve the JSON-LD types of a schema's credential subject.
    Types(TypesArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match cli.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let result = match cli.command {
        Commands::Schema(args) => run_schema(&args),
        Commands::Validate(args) => run_validate(&args),
        Commands::Types(args) => run_types(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}

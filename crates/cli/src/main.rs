//! `propfill` command-line tool: UUID generation and inspection, and
//! copying loosely-typed JSON into a typed contact record.

use std::io;

use clap::{Parser, Subcommand};
use propfill_observability::LogFormat;

mod commands;
mod contact;

use commands::copy::CopyArgs;
use commands::uuid::UuidCommand;

#[derive(Parser)]
#[command(name = "propfill")]
#[command(about = "Typed property copying and UUID value objects", long_about = None)]
#[command(version)]
struct Cli {
    /// Log output format: json (default) or compact. Filtering uses RUST_LOG.
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate, inspect and convert UUIDs
    #[command(subcommand)]
    Uuid(UuidCommand),

    /// Copy a JSON object and/or key=value pairs into a contact record
    Copy(CopyArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.log_format {
        Some(format) => propfill_observability::init_with(format),
        None => propfill_observability::init(),
    }

    match cli.command {
        Commands::Uuid(command) => {
            for line in commands::uuid::run(command)? {
                println!("{line}");
            }
        }
        Commands::Copy(args) => {
            let contact = commands::copy::run(args, io::stdin().lock())?;
            println!("{}", serde_json::to_string_pretty(&contact)?);
        }
    }

    Ok(())
}

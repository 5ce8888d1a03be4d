//! group-widget CLI
//!
//! Commands:
//! - `group-widget inspect`: validate a group field and print its resolved definition
//! - `group-widget expand`: expand group fields in a palette and print the new palette
//!
//! Exit codes:
//! - 0: Success
//! - 1: Error (including invalid group definitions)

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("group_widget=debug,group_widget_cli=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Inspect { target, field } => commands::inspect(&target, &field),
        Commands::Expand {
            target,
            palette,
            field,
            records,
            dump_fields,
        } => commands::expand(
            cli.config.as_deref(),
            &target,
            &palette,
            field.as_deref(),
            records.as_deref(),
            dump_fields,
        ),
    };

    match result {
        Ok(output) => print!("{output}"),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    }
}

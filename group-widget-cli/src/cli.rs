//! CLI definition for the group-widget command-line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Inspect and expand group field definitions
#[derive(Parser, Debug)]
#[command(name = "group-widget")]
#[command(version)]
#[command(about = "Inspect and expand repeatable group fields of a DCA registry")]
pub struct Cli {
    /// Enable debug output to stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Widget settings file (YAML, TOML or JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Which table and row to work on.
#[derive(Args, Debug, Clone)]
pub struct Target {
    /// Registry file (YAML, or JSON by extension)
    #[arg(short, long)]
    pub registry: PathBuf,

    /// Table the group belongs to
    #[arg(short, long)]
    pub table: String,

    /// Id of the row being edited
    #[arg(long, default_value_t = 0)]
    pub row: u64,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a group and print its resolved definition
    Inspect {
        #[command(flatten)]
        target: Target,

        /// Group field name
        #[arg(short, long)]
        field: String,
    },
    /// Expand groups in a palette and print the result
    Expand {
        #[command(flatten)]
        target: Target,

        /// Palette to rewrite
        #[arg(short, long, default_value = "default")]
        palette: String,

        /// Expand only this group (default: every group in the palette)
        #[arg(short, long)]
        field: Option<String>,

        /// Stored group values used to count existing elements
        #[arg(long)]
        records: Option<PathBuf>,

        /// Also print the expanded table (palettes and fields) as YAML
        #[arg(long)]
        dump_fields: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_expand() {
        let cli = Cli::parse_from([
            "group-widget",
            "expand",
            "--registry",
            "dca.yaml",
            "--table",
            "tl_foo",
            "--row",
            "123",
            "--field",
            "my_group",
        ]);
        match cli.command {
            Commands::Expand {
                target,
                palette,
                field,
                records,
                dump_fields,
            } => {
                assert_eq!(target.table, "tl_foo");
                assert_eq!(target.row, 123);
                assert_eq!(palette, "default");
                assert_eq!(field.as_deref(), Some("my_group"));
                assert!(records.is_none());
                assert!(!dump_fields);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}

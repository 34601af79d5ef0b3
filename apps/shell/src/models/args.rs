//! # CLI Argument Definitions
//!
//! Subcommands of the `tilt` binary. Every command takes the config file as
//! its first argument.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tilt::domain::ValueTag;

/// The main CLI structure parsing command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "tilt")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Inspect and edit tilt config files")]
pub struct Cli {
    /// Log debug diagnostics to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the file in canonical form
    Show {
        file: PathBuf,
    },
    /// Report malformed lines and unknown sections
    Check {
        file: PathBuf,
    },
    /// Print one stored value
    Get {
        file: PathBuf,
        program: String,
        key: String,
    },
    /// Store a value; the file is created if missing
    Set {
        file: PathBuf,
        program: String,
        key: String,
        /// Raw value, or an already tagged one (`i_5`) when no kind is given
        value: String,
        /// Store the value as this kind
        #[arg(short, long)]
        kind: Option<Kind>,
    },
    /// Remove the file
    Delete {
        file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    #[value(name = "d", alias = "double")]
    Double,
    #[value(name = "i", alias = "int")]
    Integer,
    #[value(name = "b", alias = "boolean")]
    Boolean,
    #[value(name = "s", alias = "string")]
    Text,
}

impl From<Kind> for ValueTag {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Double => Self::Double,
            Kind::Integer => Self::Integer,
            Kind::Boolean => Self::Boolean,
            Kind::Text => Self::Text,
        }
    }
}

#![allow(clippy::print_stderr, clippy::print_stdout)]

pub mod handlers;
pub mod models;

use crate::handlers::{edit, inspect};
use crate::models::args::{Cli, Commands};
use anyhow::Result;
use clap::Parser;
use tilt_logger::{ConsoleTarget, LevelFilter, Logger};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _logger = Logger::builder()
        .name(env!("CARGO_PKG_NAME"))
        .console_target(ConsoleTarget::Stderr)
        .level(LevelFilter::WARN)
        .verbose(cli.verbose)
        .init()?;

    match cli.command {
        Commands::Show { file } => inspect::show(&file)?,
        Commands::Check { file } => inspect::check(&file)?,
        Commands::Get { file, program, key } => inspect::get(&file, &program, &key)?,
        Commands::Set { file, program, key, value, kind } => edit::set(&file, &program, &key, &value, kind)?,
        Commands::Delete { file } => edit::delete(&file)?,
    }

    Ok(())
}

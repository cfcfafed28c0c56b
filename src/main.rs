//! to-talkyard - Convert a WordPress export into Talkyard site data.

mod cli;
mod config;
mod convert;
mod emit;
mod export;
mod logger;
mod mapper;
mod scanner;
mod site;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use config::ConverterConfig;
use convert::convert_file;
use emit::emit_site;
use std::io::stdout;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::set_quiet(cli.quiet);

    let config = ConverterConfig::load(&cli).context("failed to load configuration")?;
    let conversion = convert_file(&cli.export_file, &config)?;

    emit_site(&conversion.builder, stdout().lock())?;
    conversion.report.log();

    Ok(())
}

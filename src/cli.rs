//! Command-line interface definitions.
//!
//! Defines all CLI arguments using clap.

use crate::config::MappingMode;
use clap::Parser;
use std::path::PathBuf;

/// Convert a WordPress export into Talkyard site data (JSON on stdout)
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// WordPress core XML export file (WXR) to convert
    #[arg(
        long = "wordpress-core-xml-export-file",
        visible_alias = "wordpressCoreXmlExportFile",
        value_name = "FILE"
    )]
    pub export_file: PathBuf,

    /// Config file path (default: to-talkyard.toml, used only if it exists)
    #[arg(short = 'C', long, default_value = "to-talkyard.toml")]
    pub config: PathBuf,

    /// How posts are mapped to pages, overrides `[mapping].mode`
    #[arg(short, long, value_enum)]
    pub mode: Option<MappingMode>,

    /// Suppress diagnostics on stderr
    #[arg(short, long)]
    pub quiet: bool,
}

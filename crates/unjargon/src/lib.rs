//! Library interface for the `unjargon` CLI.
//!
//! Exposes the argument parser and command implementations so they can be
//! tested directly. The entry point is in `main.rs`.
//!
//! # Structure
//!
//! - [`Cli`] - The root argument parser (clap derive)
//! - [`Commands`] - Available subcommands
//! - [`commands`] - Command implementations

pub mod commands;

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

/// Color output preference.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect terminal capabilities automatically.
    #[default]
    Auto,
    /// Always emit colors.
    Always,
    /// Never emit colors.
    Never,
}

impl ColorChoice {
    /// Configure global color output. Call once at startup.
    pub fn apply(self) {
        match self {
            Self::Auto => {} // owo-colors auto-detects by default
            Self::Always => owo_colors::set_override(true),
            Self::Never => owo_colors::set_override(false),
        }
    }
}

const ENV_HELP: &str = "\
ENVIRONMENT VARIABLES:
    RUST_LOG                    Log filter (e.g., debug, unjargon_core=trace)
    UNJARGON_LOG_PATH           Explicit log file path
    UNJARGON_LOG_DIR            Log directory
    UNJARGON_DICTIONARY_PATH    JSON dictionary to use instead of the bundled one
    UNJARGON_ENABLED            Set to false to skip annotation unless --force
";

/// Command-line interface definition for unjargon.
#[derive(Parser)]
#[command(name = "unjargon")]
#[command(about = "Translate pricing jargon in HTML pages into plain language", long_about = None)]
#[command(version, arg_required_else_help = true)]
#[command(after_long_help = ENV_HELP)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Print only the version number (for scripting)
    #[arg(long)]
    pub version_only: bool,

    /// Path to configuration file (overrides discovery)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Run as if started in DIR
    #[arg(short = 'C', long, global = true)]
    pub chdir: Option<PathBuf>,

    /// Only print errors (suppresses warnings/info)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// More detail (repeatable; e.g. -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Colorize output
    #[arg(long, global = true, value_enum, default_value_t)]
    pub color: ColorChoice,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,
}

/// Available subcommands for the CLI.
#[derive(Subcommand)]
pub enum Commands {
    /// Annotate jargon in HTML files
    Annotate(commands::annotate::AnnotateArgs),

    /// Translate a single term
    Lookup(commands::lookup::LookupArgs),

    /// List dictionary terms
    Terms(commands::terms::TermsArgs),

    /// Check whether a URL would be annotated
    Activation(commands::activation::ActivationArgs),

    /// Print the JSON Schema for dictionary files
    Schema(commands::schema::SchemaArgs),

    /// Show package information
    Info(commands::info::InfoArgs),
}

/// Returns the clap command, for help rendering and tests.
pub fn command() -> clap::Command {
    Cli::command()
}

//! Command-line host for icon-lens.
//!
//! This module handles argument parsing and dispatch. Subcommand
//! implementations live in the [`commands`] submodule.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// icon-lens - inline icon-font glyph decorations and icon-name completion
#[derive(Parser, Debug)]
#[command(name = "icon-lens")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (default: ~/.config/icon-lens/config.yaml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Workspace root checked for package.json in auto mode (default: current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Set debug log level (overrides config and RUST_LOG)
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevelArg>,
}

/// Log level argument for CLI
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevelArg {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevelArg::Off => log::LevelFilter::Off,
            LogLevelArg::Error => log::LevelFilter::Error,
            LogLevelArg::Warn => log::LevelFilter::Warn,
            LogLevelArg::Info => log::LevelFilter::Info,
            LogLevelArg::Debug => log::LevelFilter::Debug,
            LogLevelArg::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one decoration pass over FILE and print the assignments
    Scan {
        file: PathBuf,

        /// Print the refresh report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Keep FILE decorated, refreshing on edits and config changes
    Watch {
        file: PathBuf,

        /// Exit after the specified number of seconds
        #[arg(long, value_name = "SECONDS")]
        exit_after: Option<f64>,
    },

    /// Rasterize icons and print their artifact paths
    Render {
        #[arg(required = true, value_name = "ICON")]
        icons: Vec<String>,
    },

    /// Print completion items for the text before the cursor
    Complete {
        prefix: String,
    },

    /// Print the icon-name to codepoint table
    List,
}

/// Process CLI arguments, returning the exit code.
pub fn process_cli(cli: Cli) -> i32 {
    match commands::run(cli) {
        Ok(code) => code,
        Err(e) => {
            log::error!("{:#}", e);
            eprintln!("icon-lens: error: {e:#}");
            1
        }
    }
}

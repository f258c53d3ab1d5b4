//! Command-line interface definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_PATH;

/// linkboard - a self-hosted link dashboard
#[derive(Parser, Debug)]
#[command(name = "linkboard")]
#[command(version)]
#[command(about = "A self-hosted link dashboard", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file (optional; env vars still apply)
    #[arg(long, short = 'c', global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands. Without a command the server is started.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Print a sample config.toml with every default value
    GenerateConfig {
        /// Write to this file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// threadline - users, posts and threaded comments behind a JSON API
#[derive(Parser, Debug)]
#[command(name = "threadline")]
#[command(version)]
#[command(about = "Users, posts and threaded comments behind a JSON API", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Print or write an example configuration file
    Config {
        /// Output path (default: stdout)
        output_path: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

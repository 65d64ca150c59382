//! Command-line interface.

mod commands;

use clap::{Parser, Subcommand};

/// Worker Missions - workers, items and weight-limited missions over HTTP
#[derive(Parser)]
#[command(name = "worker-missions")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server (default)
    #[command(alias = "daemon")]
    Serve,

    /// Create a default config file with a fresh signing key
    #[command(alias = "--init")]
    Init,

    /// Print workers ranked by finished missions
    Report,

    /// Revoke every issued token of a worker
    Revoke {
        /// Email the worker registered with
        email: String,
    },
}

pub use commands::*;

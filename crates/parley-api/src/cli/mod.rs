//! CLI command definitions for the `parley` binary.
//!
//! Uses clap derive macros for argument parsing. Every command drives the
//! shared `SessionCache`; none talks to the backend directly.

pub mod config;
pub mod session;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Browse and manage chat sessions on a Parley backend.
#[derive(Parser)]
#[command(name = "parley", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans via OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    /// Backend base URL, overriding config.toml.
    #[arg(long, global = true, env = "PARLEY_BASE_URL")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List sessions, newest first.
    #[command(alias = "ls")]
    Sessions,

    /// Create a new session.
    New {
        /// Session title (the server picks a default if omitted).
        #[arg(long)]
        title: Option<String>,
    },

    /// Open a session and print its messages.
    Show {
        /// Session ID or app path (`/`, `/{id}`).
        target: String,
    },

    /// Rename a session.
    Rename {
        /// Session ID.
        id: String,

        /// New title.
        title: String,
    },

    /// Delete a session.
    #[command(alias = "rm")]
    Delete {
        /// Session ID.
        id: String,

        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },

    /// Show the effective client configuration.
    Config,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

impl Cli {
    /// Filter directives for the requested verbosity.
    pub fn log_directives(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "warn",
            1 => "info,parley=debug",
            _ => "trace",
        }
    }
}

//! Defines the command-line arguments and subcommands for the stanza-probe CLI.
//!
//! Flags mirror the settings in [`crate::config::ProbeConfig`]; a flag given on
//! the command line wins over the configuration file.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::fixtures::Fixture;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "stanza-probe",
    version,
    about = "Derive search-time regression probes from an add-on's configuration."
)]
pub struct ProbeArgs {
    /// YAML configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the add-on package.
    #[arg(long, global = true)]
    pub splunk_app: Option<PathBuf>,

    /// Address of the Splunk server.
    #[arg(long, global = true)]
    pub splunk_host: Option<String>,

    /// Splunk REST port.
    #[arg(long, global = true)]
    pub splunk_port: Option<u16>,

    /// Splunk login user.
    #[arg(long, global = true)]
    pub splunk_user: Option<String>,

    /// Splunk password.
    #[arg(long, global = true)]
    pub splunk_password: Option<String>,

    /// Diagnostics verbosity (written to stderr).
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the parameters derived for a fixture.
    Params {
        #[arg(value_enum)]
        fixture: Fixture,
        /// Emit JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Print the search each parameter of a fixture would run.
    Queries {
        #[arg(value_enum)]
        fixture: Fixture,
    },
    /// List the package's configuration files and their stanza counts.
    Inspect,
    /// Print the resolved configuration as YAML.
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

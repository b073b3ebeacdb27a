//! The stanza-probe command-line interface.
//!
//! This module is the entry point for all CLI commands and orchestrates the
//! library: configuration, package loading, derivation and output.

use std::process;

use clap::Parser;
use tracing::debug;

use crate::cli::args::{Command, ProbeArgs};
use crate::config::ProbeConfig;
use crate::conf::read_conf;
use crate::diagnostics::ProbeError;
use crate::err_msg;
use crate::fixtures::Fixture;
use crate::package::AddonPackage;
use crate::search::{parameter_query, policy_for};

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = ProbeArgs::parse();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::from(args.log_level))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = dispatch(args) {
        output::print_error(e);
        process::exit(1);
    }
}

fn dispatch(args: ProbeArgs) -> Result<(), ProbeError> {
    let config = resolve_config(&args)?;
    debug!(app = %config.splunk_app.display(), "resolved configuration");

    match args.command {
        Command::Params { fixture, json } => {
            let package = AddonPackage::open(&config.splunk_app)?;
            let params = fixture.parameters(&package);
            if json {
                let text = serde_json::to_string_pretty(&params).map_err(|e| {
                    err_msg!(Internal, "Failed to serialize parameters").with_cause(e)
                })?;
                println!("{text}");
            } else {
                output::print_params(&params);
            }
        }
        Command::Queries { fixture } => {
            let package = AddonPackage::open(&config.splunk_app)?;
            for param in fixture.parameters(&package) {
                let policy = policy_for(&param, &config.search);
                output::print_query(&param.id, &parameter_query(&param), policy);
            }
        }
        Command::Inspect => inspect(&config)?,
        Command::Config => print!("{}", config.to_yaml()?),
    }
    Ok(())
}

/// File values first, then any flag given on the command line.
fn resolve_config(args: &ProbeArgs) -> Result<ProbeConfig, ProbeError> {
    let mut config = match &args.config {
        Some(path) => ProbeConfig::load(path)?,
        None => ProbeConfig::default(),
    };
    if let Some(app) = &args.splunk_app {
        config.splunk_app = app.clone();
    }
    if let Some(host) = &args.splunk_host {
        config.splunk_host = host.clone();
    }
    if let Some(port) = args.splunk_port {
        config.splunk_port = port;
    }
    if let Some(user) = &args.splunk_user {
        config.splunk_user = user.clone();
    }
    if let Some(password) = &args.splunk_password {
        config.splunk_password = password.clone();
    }
    Ok(config)
}

/// Parses every `.conf` file in the package and reports stanza counts. One
/// unreadable file does not stop the listing.
fn inspect(config: &ProbeConfig) -> Result<(), ProbeError> {
    let package = AddonPackage::open(&config.splunk_app)?;
    let files = package.conf_files()?;
    println!("Found {} configuration files", files.len());
    for path in files {
        let sections = read_conf(&path).map(|conf| conf.len());
        let shown = path.strip_prefix(package.root()).unwrap_or(&path);
        output::print_conf_summary(shown, sections);
    }
    for fixture in Fixture::ALL {
        println!("  fixture {:<14} {:>5} parameters", fixture.name(), fixture.parameters(&package).len());
    }
    Ok(())
}

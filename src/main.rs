//! portside CLI - point-to-point resource synchronization tool
//!
//! Usage: portside <COMMAND>
//!
//! Commands:
//!   sync    Sync one named resource between environments
//!   all     Sync every configured resource between environments
//!   backup  Export one resource from a source environment into a file
//!   config  Inspect the resolved configuration

mod cli;
mod commands;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use portside::ui;

fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);
    install_interrupt_handler();

    let config_flag = cli.config.as_deref();
    let result = match &cli.command {
        Commands::Sync(cmd) => commands::cmd_sync(config_flag, cli.json, cmd),
        Commands::All(cmd) => commands::cmd_all(config_flag, cli.json, cmd),
        Commands::Backup(cmd) => commands::cmd_backup(config_flag, cli.json, cmd),
        Commands::Config(cmd) => commands::cmd_config(config_flag, cli.json, cmd),
    };

    if let Err(e) = result {
        ui::failure(&format!("{e:#}"));
        std::process::exit(1);
    }
}

/// Diagnostics go to stderr through tracing; `-v` raises the level,
/// RUST_LOG overrides it entirely.
fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "portside=warn",
        1 => "portside=info",
        2 => "portside=debug",
        _ => "portside=trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// A sync interrupted between phases can leave artifacts behind on either
/// side; say so before exiting.
fn install_interrupt_handler() {
    let result = ctrlc::set_handler(|| {
        ui::warn("interrupted: a sync in progress may have left artifacts on the source or target");
        std::process::exit(130);
    });
    if let Err(e) = result {
        tracing::debug!(error = %e, "could not install interrupt handler");
    }
}

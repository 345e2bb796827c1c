use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use portside::environment::{DEFAULT_SERVICE, LOCAL_ENVIRONMENT};
use portside::ssh::{SshFlags, DEFAULT_SSH_HOST, DEFAULT_SSH_PORT};

/// portside - point-to-point resource synchronization between environments
#[derive(Parser, Debug)]
#[command(name = "portside")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Structured JSON output
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file (default: .portside.yml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sync one named resource between environments
    Sync(SyncCmd),

    /// Sync every configured resource between environments
    All(AllCmd),

    /// Export one resource from a source environment into a local file
    Backup(BackupCmd),

    /// Inspect the resolved configuration
    Config(ConfigCmd),
}

/// SSH transport flags shared by the sync-like commands.
#[derive(Args, Debug, Clone)]
pub struct SshArgs {
    /// SSH endpoint host
    #[arg(long, default_value = DEFAULT_SSH_HOST)]
    pub ssh_host: String,

    /// SSH endpoint port
    #[arg(long, default_value = DEFAULT_SSH_PORT)]
    pub ssh_port: String,

    /// Private key file (agent lookup is used when unset)
    #[arg(long, default_value = "")]
    pub ssh_key: String,

    /// Verbose SSH sessions
    #[arg(long)]
    pub ssh_verbose: bool,

    /// Skip the SSH agent and use the key file only
    #[arg(long)]
    pub skip_agent: bool,

    /// Extra arguments passed to rsync transfers
    #[arg(long, default_value = "")]
    pub rsync_args: String,
}

impl SshArgs {
    pub fn to_flags(&self) -> SshFlags {
        SshFlags {
            host: self.ssh_host.clone(),
            port: self.ssh_port.clone(),
            private_key: self.ssh_key.clone(),
            verbose: self.ssh_verbose,
            skip_agent: self.skip_agent,
            rsync_args: self.rsync_args.clone(),
        }
    }
}

/// Environment selection shared by the sync-like commands.
#[derive(Args, Debug, Clone)]
pub struct EnvironmentArgs {
    /// Project name (falls back to PORTSIDE_PROJECT, then configuration)
    #[arg(short, long)]
    pub project: Option<String>,

    /// Source environment name
    #[arg(short = 's', long)]
    pub source_environment: String,

    /// Target environment name
    #[arg(short = 't', long, default_value = LOCAL_ENVIRONMENT)]
    pub target_environment: String,

    /// Service to run commands against
    #[arg(long, default_value = DEFAULT_SERVICE)]
    pub service: String,

    /// Control-plane API endpoint for SSH-portal lookups
    #[arg(long)]
    pub api_endpoint: Option<String>,

    /// Resolve per-environment SSH targets through the control-plane API
    #[arg(long)]
    pub ssh_portal: bool,
}

#[derive(Args, Debug)]
pub struct SyncCmd {
    /// Syncer to run (mariadb, postgres, mongodb, files, custom, or a
    /// configured alias)
    pub syncer: String,

    #[command(flatten)]
    pub environment: EnvironmentArgs,

    #[command(flatten)]
    pub ssh: SshArgs,

    /// Show what would run without executing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Leave the dump on the source side
    #[arg(long)]
    pub skip_source_cleanup: bool,

    /// Leave the transferred dump on the target side
    #[arg(long)]
    pub skip_target_cleanup: bool,

    /// Transfer only, do not import on the target
    #[arg(long)]
    pub skip_target_import: bool,

    /// Override the transfer resource name
    #[arg(long)]
    pub transfer_name: Option<String>,

    /// Kill any phase command still running after this many seconds
    #[arg(long)]
    pub command_timeout: Option<u64>,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct AllCmd {
    #[command(flatten)]
    pub environment: EnvironmentArgs,

    #[command(flatten)]
    pub ssh: SshArgs,

    /// Show what would run without executing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Kill any phase command still running after this many seconds
    #[arg(long)]
    pub command_timeout: Option<u64>,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct BackupCmd {
    /// Syncer to export
    pub syncer: String,

    #[command(flatten)]
    pub environment: EnvironmentArgs,

    #[command(flatten)]
    pub ssh: SshArgs,

    /// File the exported artifact is written to
    #[arg(short, long)]
    pub output: PathBuf,

    /// Show what would run without executing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Kill any phase command still running after this many seconds
    #[arg(long)]
    pub command_timeout: Option<u64>,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct ConfigCmd {}

//! Error types for portside
//!
//! Library errors use `thiserror`; the binary layer wraps them in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for portside operations
pub type PortsideResult<T> = Result<T, PortsideError>;

/// Main error type for portside operations
#[derive(Error, Debug)]
pub enum PortsideError {
    /// Command is a deliberate no-op for this resource kind
    #[error("command is not applicable for this syncer")]
    CommandNotApplicable,

    /// Template references a key absent from the substitution set
    #[error("unresolved placeholder '{key}' in command template '{template}'")]
    UnresolvedPlaceholder { key: String, template: String },

    /// Syncer identifier resolves to no registered plugin
    #[error("no syncer registered for '{id}'")]
    SyncerNotRegistered { id: String },

    /// A required configuration field is missing or empty
    #[error("syncer '{syncer}' is missing required configuration field '{field}'")]
    MissingConfigField { syncer: String, field: String },

    /// A syncer's configuration section does not match its expected shape
    #[error("invalid configuration for syncer '{syncer}': {message}")]
    InvalidSyncerConfig { syncer: String, message: String },

    /// Configuration file could not be parsed
    #[error("invalid configuration in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// No configuration file found in any searched location
    #[error("no configuration file found (searched {searched:?})")]
    ConfigNotFound { searched: Vec<PathBuf> },

    /// Source and target environments are both remote
    #[error("remote-to-remote transfers are unsupported (source '{src}', target '{target}')")]
    RemoteToRemote { src: String, target: String },

    /// SSH-portal returned no production-typed environment to use as default
    #[error("project '{project}' has no production environment to use as the default target")]
    NoDefaultEnvironment { project: String },

    /// Control-plane API request failed
    #[error("ssh-portal request failed: {message}")]
    Portal { message: String },

    /// rsync bootstrap onto a remote environment failed
    #[error("rsync bootstrap failed for environment '{environment}': {message}")]
    BootstrapFailed { environment: String, message: String },

    /// A phase command exited non-zero or the transport failed
    #[error("command failed with status {status}: {command}\n{stderr}")]
    CommandFailed {
        command: String,
        status: i32,
        stderr: String,
    },

    /// A phase command exceeded the configured deadline and was killed
    #[error("command timed out after {seconds}s: {command}")]
    CommandTimeout { command: String, seconds: u64 },

    /// One or more tasks in a batch run failed
    #[error("{failed} of {total} sync tasks failed")]
    TasksFailed { failed: usize, total: usize },

    /// Another portside invocation already holds the run lock
    #[error("another portside run is in progress (lock file {path})")]
    AlreadyRunning { path: PathBuf },

    /// Backup expected exactly one remaining local artifact
    #[error("backup produced no local artifact to relocate")]
    BackupArtifactMissing,

    /// Sync was aborted by user at the confirmation prompt
    #[error("sync aborted by user")]
    SyncAborted,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

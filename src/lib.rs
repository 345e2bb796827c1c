//! portside - point-to-point resource synchronization tool
//!
//! portside moves resources (relational databases, document stores,
//! filesystem trees, user-defined jobs) between a source and a target
//! deployment environment by sequencing remote dump, transfer, local
//! restore and cleanup over an SSH transport.

pub mod batch;
pub mod command;
pub mod config;
pub mod environment;
pub mod error;
pub mod exec;
pub mod orchestrator;
pub mod prerequisite;
pub mod resource;
pub mod runlock;
pub mod ssh;
pub mod syncers;
pub mod ui;

// Re-exports for convenience
pub use command::SyncCommand;
pub use config::{Config, LoadedConfig};
pub use environment::{Environment, LOCAL_ENVIRONMENT};
pub use error::{PortsideError, PortsideResult};
pub use exec::{Executor, ShellExecutor};
pub use orchestrator::{Orchestrator, SyncReport, SyncRunOptions, SyncTask};
pub use resource::TransferResource;
pub use ssh::{SshOptionWrapper, SshOptions};
pub use syncers::{default_registry, Syncer, SyncerRegistry};

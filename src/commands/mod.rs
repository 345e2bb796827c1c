//! Subcommand implementations
//!
//! Each command loads configuration, resolves environments and SSH options,
//! and drives the library layer. Shared plumbing lives in `context`.

mod all;
mod backup;
mod config;
mod context;
mod sync;

pub use all::cmd_all;
pub use backup::cmd_backup;
pub use config::cmd_config;
pub use sync::cmd_sync;

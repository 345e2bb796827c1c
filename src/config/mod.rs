//! Configuration module
//!
//! Hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (PORTSIDE_*)
//! 3. Configuration file (`.portside.yml` plus optional override file)
//! 4. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use loader::{discover, load_with_override, ConfigWarning, LoadedConfig};
pub use types::{ApiConfig, Config, SshConfig, SyncerEntry};

#[cfg(test)]
mod tests;

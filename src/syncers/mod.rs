//! Syncer plugins
//!
//! Every resource kind implements the [`Syncer`] trait: it produces the
//! remote-side extract command, the local-side restore command, the
//! prerequisite probe, and the transfer resource the phases move around.
//! The [`registry`] maps string identifiers (and configuration aliases) to
//! plugins that materialize configured syncers.

pub mod custom;
pub mod files;
pub mod mariadb;
pub mod mongodb;
pub mod postgres;
mod registry;

pub use custom::CustomPlugin;
pub use files::FilesPlugin;
pub use mariadb::MariadbPlugin;
pub use mongodb::MongodbPlugin;
pub use postgres::PostgresPlugin;
pub use registry::{default_registry, SyncerPlugin, SyncerRegistry};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::command::SyncCommand;
use crate::environment::Environment;
use crate::error::{PortsideError, PortsideResult};
use crate::resource::TransferResource;

/// Probe executed on a remote environment to discover its capabilities.
/// The output is the JSON document `portside config --json` prints.
pub const PROBE_COMMAND: &str = "portside config --json";

/// Capability set required of every resource-kind implementation.
pub trait Syncer: Send + std::fmt::Debug {
    /// Plugin identifier this syncer was built by.
    fn kind(&self) -> &'static str;

    /// Whether the prerequisite negotiator should probe environments for
    /// this syncer. Filesystem-style syncers transfer data directly and
    /// skip probing.
    fn requires_probe(&self) -> bool {
        true
    }

    fn probe_command(&self) -> SyncCommand {
        SyncCommand::new(PROBE_COMMAND)
    }

    /// Commands run on the source side to export the resource.
    fn remote_commands(&self, environment: &Environment) -> Vec<SyncCommand>;

    /// Commands run on the target side to import the resource.
    fn local_commands(&self, environment: &Environment) -> Vec<SyncCommand>;

    /// The artifact this syncer moves, as seen from `environment`.
    fn transfer_resource(&self, environment: &Environment) -> TransferResource;

    /// Paths removed during the cleanup phase on `environment`'s side.
    fn cleanup_paths(&self, environment: &Environment) -> Vec<String> {
        let resource = self.transfer_resource(environment);
        if resource.skip_cleanup {
            Vec::new()
        } else {
            vec![resource.name]
        }
    }

    /// Override the transfer resource name before any command is generated.
    /// Used by named-export workflows such as `backup`.
    fn set_transfer_name(&mut self, name: &str);
}

/// Connection settings shared by the relational database syncers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub port: String,
    #[serde(default)]
    pub database: String,
    #[serde(default)]
    pub ignore_tables: Vec<String>,
}

impl DatabaseConfig {
    /// Apply a sparse local override: empty fields inherit the remote
    /// value, non-empty fields replace it. Never a blend.
    pub fn merged_with(&self, local: &DatabaseConfig) -> DatabaseConfig {
        DatabaseConfig {
            hostname: override_field(&self.hostname, &local.hostname),
            username: override_field(&self.username, &local.username),
            password: override_field(&self.password, &local.password),
            port: override_field(&self.port, &local.port),
            database: override_field(&self.database, &local.database),
            ignore_tables: if local.ignore_tables.is_empty() {
                self.ignore_tables.clone()
            } else {
                local.ignore_tables.clone()
            },
        }
    }
}

pub(crate) fn override_field(remote: &str, local: &str) -> String {
    if local.is_empty() {
        remote.to_string()
    } else {
        local.to_string()
    }
}

/// Deserialize a syncer's `config`/`local` section, treating an absent
/// section as the default shape.
pub(crate) fn section<C>(value: &serde_yaml_ng::Value, syncer: &str) -> PortsideResult<C>
where
    C: DeserializeOwned + Default,
{
    if value.is_null() {
        return Ok(C::default());
    }
    serde_yaml_ng::from_value(value.clone()).map_err(|e| PortsideError::InvalidSyncerConfig {
        syncer: syncer.to_string(),
        message: e.to_string(),
    })
}

//! MongoDB syncer
//!
//! Uses `mongodump --archive` / `mongorestore --archive` with a single
//! archive file as the transfer resource.

use serde::{Deserialize, Serialize};

use crate::command::SyncCommand;
use crate::config::SyncerEntry;
use crate::environment::Environment;
use crate::error::PortsideResult;
use crate::resource::{unique_transfer_name, TransferResource};
use crate::syncers::{override_field, section, Syncer, SyncerPlugin};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MongodbConfig {
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub port: String,
    #[serde(default)]
    pub database: String,
}

impl MongodbConfig {
    pub fn merged_with(&self, local: &MongodbConfig) -> MongodbConfig {
        MongodbConfig {
            hostname: override_field(&self.hostname, &local.hostname),
            port: override_field(&self.port, &local.port),
            database: override_field(&self.database, &local.database),
        }
    }
}

#[derive(Debug)]
pub struct MongodbSyncer {
    remote: MongodbConfig,
    local: MongodbConfig,
    transfer_name: String,
}

impl MongodbSyncer {
    fn command(template: &str, config: &MongodbConfig, transfer_name: &str) -> SyncCommand {
        SyncCommand::new(template)
            .substitute("hostname", config.hostname.clone())
            .substitute("port", config.port.clone())
            .substitute("database", config.database.clone())
            .substitute("transfer_resource", transfer_name)
    }
}

impl Syncer for MongodbSyncer {
    fn kind(&self) -> &'static str {
        "mongodb"
    }

    fn remote_commands(&self, _environment: &Environment) -> Vec<SyncCommand> {
        vec![Self::command(
            "mongodump --host {{ hostname }} --port {{ port }} --db {{ database }} --archive={{ transfer_resource }}",
            &self.remote,
            &self.transfer_name,
        )]
    }

    fn local_commands(&self, _environment: &Environment) -> Vec<SyncCommand> {
        vec![Self::command(
            "mongorestore --host {{ hostname }} --port {{ port }} --drop --archive={{ transfer_resource }}",
            &self.local,
            &self.transfer_name,
        )]
    }

    fn transfer_resource(&self, _environment: &Environment) -> TransferResource {
        TransferResource::file(&self.transfer_name)
    }

    fn set_transfer_name(&mut self, name: &str) {
        self.transfer_name = name.to_string();
    }
}

pub struct MongodbPlugin;

impl SyncerPlugin for MongodbPlugin {
    fn id(&self) -> &'static str {
        "mongodb"
    }

    fn build(&self, name: &str, entry: &SyncerEntry) -> PortsideResult<Box<dyn Syncer>> {
        let remote: MongodbConfig = section(&entry.config, name)?;
        let overrides: MongodbConfig = section(&entry.local, name)?;
        let local = remote.merged_with(&overrides);

        Ok(Box::new(MongodbSyncer {
            remote,
            local,
            transfer_name: unique_transfer_name(name, "archive"),
        }))
    }
}

//! Filesystem syncer
//!
//! A filesystem sync is purely a transfer: there is no dump or restore
//! step, so the remote and local commands are no-ops and the configured
//! directory itself is the transfer resource. Directory resources are
//! never cleaned up (the directory is the user's data, not a transient
//! dump) and no prerequisite probe is needed.

use serde::{Deserialize, Serialize};

use crate::command::SyncCommand;
use crate::config::SyncerEntry;
use crate::environment::Environment;
use crate::error::{PortsideError, PortsideResult};
use crate::resource::TransferResource;
use crate::syncers::{override_field, section, Syncer, SyncerPlugin};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilesConfig {
    #[serde(default)]
    pub sync_directory: String,
    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Debug)]
pub struct FilesSyncer {
    remote: FilesConfig,
    local: FilesConfig,
}

impl Syncer for FilesSyncer {
    fn kind(&self) -> &'static str {
        "files"
    }

    fn requires_probe(&self) -> bool {
        false
    }

    fn remote_commands(&self, _environment: &Environment) -> Vec<SyncCommand> {
        vec![SyncCommand::no_op()]
    }

    fn local_commands(&self, _environment: &Environment) -> Vec<SyncCommand> {
        vec![SyncCommand::no_op()]
    }

    fn transfer_resource(&self, environment: &Environment) -> TransferResource {
        let config = if environment.is_local() {
            &self.local
        } else {
            &self.remote
        };
        TransferResource::directory(&config.sync_directory, config.exclude.clone())
    }

    fn set_transfer_name(&mut self, name: &str) {
        self.remote.sync_directory = name.to_string();
        self.local.sync_directory = name.to_string();
    }
}

pub struct FilesPlugin;

impl SyncerPlugin for FilesPlugin {
    fn id(&self) -> &'static str {
        "files"
    }

    fn build(&self, name: &str, entry: &SyncerEntry) -> PortsideResult<Box<dyn Syncer>> {
        let remote: FilesConfig = section(&entry.config, name)?;
        let overrides: FilesConfig = section(&entry.local, name)?;

        if remote.sync_directory.is_empty() {
            return Err(PortsideError::MissingConfigField {
                syncer: name.to_string(),
                field: "sync_directory".to_string(),
            });
        }

        let local = FilesConfig {
            sync_directory: override_field(&remote.sync_directory, &overrides.sync_directory),
            exclude: if overrides.exclude.is_empty() {
                remote.exclude.clone()
            } else {
                overrides.exclude.clone()
            },
        };

        Ok(Box::new(FilesSyncer { remote, local }))
    }
}

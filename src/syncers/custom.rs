//! User-defined syncer
//!
//! Commands come verbatim from configuration: an ordered list of source
//! commands, an ordered list of target commands, and an explicit transfer
//! resource name. There are no built-in defaults; an empty transfer
//! resource name is a resolution error. Commands may reference
//! `{{ transfer_resource }}`, `{{ project }}` and `{{ environment }}`.

use serde::{Deserialize, Serialize};

use crate::command::SyncCommand;
use crate::config::SyncerEntry;
use crate::environment::Environment;
use crate::error::{PortsideError, PortsideResult};
use crate::resource::TransferResource;
use crate::syncers::{section, Syncer, SyncerPlugin};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomConfig {
    #[serde(default)]
    pub transfer_resource: String,
    #[serde(default)]
    pub source_commands: Vec<String>,
    #[serde(default)]
    pub target_commands: Vec<String>,
}

#[derive(Debug)]
pub struct CustomSyncer {
    config: CustomConfig,
    transfer_name: String,
}

impl CustomSyncer {
    fn commands(&self, templates: &[String], environment: &Environment) -> Vec<SyncCommand> {
        templates
            .iter()
            .map(|template| {
                SyncCommand::new(template)
                    .substitute("transfer_resource", self.transfer_name.clone())
                    .substitute("project", environment.project.clone())
                    .substitute("environment", environment.name.clone())
            })
            .collect()
    }
}

impl Syncer for CustomSyncer {
    fn kind(&self) -> &'static str {
        "custom"
    }

    fn remote_commands(&self, environment: &Environment) -> Vec<SyncCommand> {
        self.commands(&self.config.source_commands, environment)
    }

    fn local_commands(&self, environment: &Environment) -> Vec<SyncCommand> {
        self.commands(&self.config.target_commands, environment)
    }

    fn transfer_resource(&self, _environment: &Environment) -> TransferResource {
        TransferResource::file(&self.transfer_name)
    }

    fn set_transfer_name(&mut self, name: &str) {
        self.transfer_name = name.to_string();
    }
}

pub struct CustomPlugin;

impl SyncerPlugin for CustomPlugin {
    fn id(&self) -> &'static str {
        "custom"
    }

    fn build(&self, name: &str, entry: &SyncerEntry) -> PortsideResult<Box<dyn Syncer>> {
        let config: CustomConfig = section(&entry.config, name)?;

        if config.transfer_resource.is_empty() {
            return Err(PortsideError::MissingConfigField {
                syncer: name.to_string(),
                field: "transfer_resource".to_string(),
            });
        }

        let transfer_name = config.transfer_resource.clone();
        Ok(Box::new(CustomSyncer {
            config,
            transfer_name,
        }))
    }
}

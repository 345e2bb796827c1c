//! MariaDB / MySQL syncer
//!
//! Dumps with `mysqldump` on the source side and restores with `mysql` on
//! the target side. The transfer resource is a uniquely named SQL file
//! under `/tmp`.

use crate::command::SyncCommand;
use crate::config::SyncerEntry;
use crate::environment::Environment;
use crate::error::PortsideResult;
use crate::resource::{unique_transfer_name, TransferResource};
use crate::syncers::{section, DatabaseConfig, Syncer, SyncerPlugin};

#[derive(Debug)]
pub struct MariadbSyncer {
    remote: DatabaseConfig,
    local: DatabaseConfig,
    transfer_name: String,
}

impl MariadbSyncer {
    fn command(template: &str, config: &DatabaseConfig, transfer_name: &str) -> SyncCommand {
        SyncCommand::new(template)
            .substitute("hostname", config.hostname.clone())
            .substitute("username", config.username.clone())
            .substitute("password", config.password.clone())
            .substitute("port", config.port.clone())
            .substitute("database", config.database.clone())
            .substitute("ignore_tables", ignore_table_flags(config))
            .substitute("transfer_resource", transfer_name)
    }
}

fn ignore_table_flags(config: &DatabaseConfig) -> String {
    config
        .ignore_tables
        .iter()
        .map(|table| format!(" --ignore-table={}.{}", config.database, table))
        .collect()
}

impl Syncer for MariadbSyncer {
    fn kind(&self) -> &'static str {
        "mariadb"
    }

    fn remote_commands(&self, _environment: &Environment) -> Vec<SyncCommand> {
        vec![Self::command(
            "mysqldump -h{{ hostname }} -u{{ username }} -p{{ password }} -P{{ port }}{{ ignore_tables }} {{ database }} > {{ transfer_resource }}",
            &self.remote,
            &self.transfer_name,
        )]
    }

    fn local_commands(&self, _environment: &Environment) -> Vec<SyncCommand> {
        vec![Self::command(
            "mysql -h{{ hostname }} -u{{ username }} -p{{ password }} -P{{ port }} {{ database }} < {{ transfer_resource }}",
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

pub struct MariadbPlugin;

impl SyncerPlugin for MariadbPlugin {
    fn id(&self) -> &'static str {
        "mariadb"
    }

    fn build(&self, name: &str, entry: &SyncerEntry) -> PortsideResult<Box<dyn Syncer>> {
        let remote: DatabaseConfig = section(&entry.config, name)?;
        let overrides: DatabaseConfig = section(&entry.local, name)?;
        let local = remote.merged_with(&overrides);

        Ok(Box::new(MariadbSyncer {
            remote,
            local,
            transfer_name: unique_transfer_name(name, "sql"),
        }))
    }
}

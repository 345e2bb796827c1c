//! PostgreSQL syncer
//!
//! Shares the relational connection shape with the MariaDB syncer but uses
//! the postgres client tooling: `pg_dump` with ownership stripped on the
//! source side, `psql` on the target side. The password travels through
//! `PGPASSWORD` rather than a flag.

use crate::command::SyncCommand;
use crate::config::SyncerEntry;
use crate::environment::Environment;
use crate::error::PortsideResult;
use crate::resource::{unique_transfer_name, TransferResource};
use crate::syncers::{section, DatabaseConfig, Syncer, SyncerPlugin};

#[derive(Debug)]
pub struct PostgresSyncer {
    remote: DatabaseConfig,
    local: DatabaseConfig,
    transfer_name: String,
}

impl PostgresSyncer {
    fn command(template: &str, config: &DatabaseConfig, transfer_name: &str) -> SyncCommand {
        SyncCommand::new(template)
            .substitute("hostname", config.hostname.clone())
            .substitute("username", config.username.clone())
            .substitute("password", config.password.clone())
            .substitute("port", config.port.clone())
            .substitute("database", config.database.clone())
            .substitute("exclude_tables", exclude_table_flags(config))
            .substitute("transfer_resource", transfer_name)
    }
}

fn exclude_table_flags(config: &DatabaseConfig) -> String {
    config
        .ignore_tables
        .iter()
        .map(|table| format!(" --exclude-table-data={table}"))
        .collect()
}

impl Syncer for PostgresSyncer {
    fn kind(&self) -> &'static str {
        "postgres"
    }

    fn remote_commands(&self, _environment: &Environment) -> Vec<SyncCommand> {
        vec![Self::command(
            "PGPASSWORD={{ password }} pg_dump -h{{ hostname }} -U{{ username }} -p{{ port }} -d{{ database }} --no-owner{{ exclude_tables }} -f {{ transfer_resource }}",
            &self.remote,
            &self.transfer_name,
        )]
    }

    fn local_commands(&self, _environment: &Environment) -> Vec<SyncCommand> {
        vec![Self::command(
            "PGPASSWORD={{ password }} psql -h{{ hostname }} -U{{ username }} -p{{ port }} -d{{ database }} -f {{ transfer_resource }}",
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

pub struct PostgresPlugin;

impl SyncerPlugin for PostgresPlugin {
    fn id(&self) -> &'static str {
        "postgres"
    }

    fn build(&self, name: &str, entry: &SyncerEntry) -> PortsideResult<Box<dyn Syncer>> {
        let remote: DatabaseConfig = section(&entry.config, name)?;
        let overrides: DatabaseConfig = section(&entry.local, name)?;
        let local = remote.merged_with(&overrides);

        Ok(Box::new(PostgresSyncer {
            remote,
            local,
            transfer_name: unique_transfer_name(name, "sql"),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn syncer() -> PostgresSyncer {
        PostgresSyncer {
            remote: DatabaseConfig {
                hostname: "pg".to_string(),
                username: "app".to_string(),
                password: "secret".to_string(),
                port: "5432".to_string(),
                database: "appdb".to_string(),
                ignore_tables: vec![],
            },
            local: DatabaseConfig {
                hostname: "localhost".to_string(),
                username: "app".to_string(),
                password: "devpass".to_string(),
                port: "5432".to_string(),
                database: "appdb".to_string(),
                ignore_tables: vec![],
            },
            transfer_name: "/tmp/dump.sql".to_string(),
        }
    }

    #[test]
    fn dump_command_strips_ownership() {
        let env = Environment::new("my-app", "staging");
        let rendered = syncer().remote_commands(&env)[0].get_command().unwrap();
        assert_eq!(
            rendered,
            "PGPASSWORD=secret pg_dump -hpg -Uapp -p5432 -dappdb --no-owner -f /tmp/dump.sql"
        );
    }

    #[test]
    fn restore_command_uses_local_config() {
        let env = Environment::local("my-app");
        let rendered = syncer().local_commands(&env)[0].get_command().unwrap();
        assert_eq!(
            rendered,
            "PGPASSWORD=devpass psql -hlocalhost -Uapp -p5432 -dappdb -f /tmp/dump.sql"
        );
    }

    #[test]
    fn excluded_tables_render_data_exclusion_flags() {
        let mut s = syncer();
        s.remote.ignore_tables = vec!["audit_log".to_string()];
        let env = Environment::new("my-app", "staging");
        let rendered = s.remote_commands(&env)[0].get_command().unwrap();
        assert!(rendered.contains("--no-owner --exclude-table-data=audit_log -f"));
    }
}

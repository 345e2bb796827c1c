//! Syncer plugin registry
//!
//! Maps a plugin identifier to a factory that materializes a configured
//! syncer. A configuration entry with an explicit `type` field is an alias:
//! the entry's own key names a logical sync backed by the plugin registered
//! under `type`, which lets one plugin serve several independent named
//! instances.
//!
//! The process-wide instance is built once and read-only afterwards; tests
//! construct private registries and register fakes without touching it.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::config::SyncerEntry;
use crate::error::{PortsideError, PortsideResult};
use crate::syncers::{
    CustomPlugin, FilesPlugin, MariadbPlugin, MongodbPlugin, PostgresPlugin, Syncer,
};

/// Factory for one resource kind.
pub trait SyncerPlugin: Send + Sync {
    fn id(&self) -> &'static str;

    /// Materialize a syncer from the configuration entry registered under
    /// `name` (the alias name when dispatched through a `type` field).
    fn build(&self, name: &str, entry: &SyncerEntry) -> PortsideResult<Box<dyn Syncer>>;
}

/// Explicit, injectable plugin registry.
pub struct SyncerRegistry {
    plugins: BTreeMap<String, Box<dyn SyncerPlugin>>,
}

impl SyncerRegistry {
    /// An empty registry. Tests use this to register fakes.
    pub fn new() -> Self {
        Self {
            plugins: BTreeMap::new(),
        }
    }

    /// A registry with every built-in resource kind registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(MariadbPlugin));
        registry.register(Box::new(PostgresPlugin));
        registry.register(Box::new(MongodbPlugin));
        registry.register(Box::new(FilesPlugin));
        registry.register(Box::new(CustomPlugin));
        registry
    }

    /// Register a plugin under its identifier. Last write wins.
    pub fn register(&mut self, plugin: Box<dyn SyncerPlugin>) {
        self.plugins.insert(plugin.id().to_string(), plugin);
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.plugins.contains_key(id)
    }

    /// Resolve `syncer_id` against the configured syncer entries.
    ///
    /// An entry named `syncer_id` with an explicit `type` dispatches to the
    /// plugin registered under that type, passing the alias name through.
    /// Otherwise `syncer_id` itself is the plugin identifier.
    pub fn resolve(
        &self,
        syncer_id: &str,
        syncers: &BTreeMap<String, SyncerEntry>,
    ) -> PortsideResult<Box<dyn Syncer>> {
        if let Some(entry) = syncers.get(syncer_id) {
            if let Some(kind) = &entry.kind {
                let plugin =
                    self.plugins
                        .get(kind)
                        .ok_or_else(|| PortsideError::SyncerNotRegistered {
                            id: kind.clone(),
                        })?;
                return plugin.build(syncer_id, entry);
            }
        }

        let plugin =
            self.plugins
                .get(syncer_id)
                .ok_or_else(|| PortsideError::SyncerNotRegistered {
                    id: syncer_id.to_string(),
                })?;

        match syncers.get(syncer_id) {
            Some(entry) => plugin.build(syncer_id, entry),
            None => plugin.build(syncer_id, &SyncerEntry::default()),
        }
    }
}

impl Default for SyncerRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

static REGISTRY: LazyLock<SyncerRegistry> = LazyLock::new(SyncerRegistry::with_builtins);

/// The process-wide registry. Built on first use, read-only afterwards.
pub fn default_registry() -> &'static SyncerRegistry {
    &REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::SyncCommand;
    use crate::environment::Environment;
    use crate::resource::TransferResource;

    #[derive(Debug)]
    struct FakeSyncer {
        name: String,
    }

    impl Syncer for FakeSyncer {
        fn kind(&self) -> &'static str {
            "fake"
        }

        fn remote_commands(&self, _environment: &Environment) -> Vec<SyncCommand> {
            vec![SyncCommand::new("echo fake")]
        }

        fn local_commands(&self, _environment: &Environment) -> Vec<SyncCommand> {
            vec![SyncCommand::no_op()]
        }

        fn transfer_resource(&self, _environment: &Environment) -> TransferResource {
            TransferResource::file(&format!("/tmp/{}.bin", self.name))
        }

        fn set_transfer_name(&mut self, _name: &str) {}
    }

    struct FakePlugin;

    impl SyncerPlugin for FakePlugin {
        fn id(&self) -> &'static str {
            "fake"
        }

        fn build(&self, name: &str, _entry: &SyncerEntry) -> PortsideResult<Box<dyn Syncer>> {
            Ok(Box::new(FakeSyncer {
                name: name.to_string(),
            }))
        }
    }

    #[test]
    fn resolve_by_plugin_identifier() {
        let mut registry = SyncerRegistry::new();
        registry.register(Box::new(FakePlugin));

        let syncer = registry.resolve("fake", &BTreeMap::new()).unwrap();
        assert_eq!(syncer.kind(), "fake");
    }

    #[test]
    fn resolve_alias_dispatches_on_type() {
        let mut registry = SyncerRegistry::new();
        registry.register(Box::new(FakePlugin));

        let mut syncers = BTreeMap::new();
        syncers.insert(
            "nightly-export".to_string(),
            SyncerEntry {
                kind: Some("fake".to_string()),
                ..Default::default()
            },
        );

        let syncer = registry.resolve("nightly-export", &syncers).unwrap();
        // The alias name is passed through as the configuration key
        let env = Environment::local("my-app");
        assert_eq!(
            syncer.transfer_resource(&env).name,
            "/tmp/nightly-export.bin"
        );
    }

    #[test]
    fn unknown_identifier_is_a_resolution_error() {
        let registry = SyncerRegistry::new();
        let err = registry.resolve("mariadb2", &BTreeMap::new()).unwrap_err();
        assert!(matches!(
            err,
            PortsideError::SyncerNotRegistered { ref id } if id == "mariadb2"
        ));
    }

    #[test]
    fn alias_with_unregistered_type_is_a_resolution_error() {
        let registry = SyncerRegistry::new();
        let mut syncers = BTreeMap::new();
        syncers.insert(
            "logs".to_string(),
            SyncerEntry {
                kind: Some("files".to_string()),
                ..Default::default()
            },
        );

        let err = registry.resolve("logs", &syncers).unwrap_err();
        assert!(matches!(
            err,
            PortsideError::SyncerNotRegistered { ref id } if id == "files"
        ));
    }

    #[test]
    fn register_is_last_write_wins() {
        struct OtherPlugin;
        impl SyncerPlugin for OtherPlugin {
            fn id(&self) -> &'static str {
                "fake"
            }
            fn build(&self, _name: &str, _entry: &SyncerEntry) -> PortsideResult<Box<dyn Syncer>> {
                Err(PortsideError::SyncerNotRegistered {
                    id: "replaced".to_string(),
                })
            }
        }

        let mut registry = SyncerRegistry::new();
        registry.register(Box::new(FakePlugin));
        registry.register(Box::new(OtherPlugin));

        assert!(registry.resolve("fake", &BTreeMap::new()).is_err());
    }

    #[test]
    fn default_registry_has_builtins() {
        let registry = default_registry();
        for id in ["mariadb", "postgres", "mongodb", "files", "custom"] {
            assert!(registry.is_registered(id), "missing builtin '{id}'");
        }
    }
}

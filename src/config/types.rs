//! Configuration structures
//!
//! The configuration file is YAML (`.portside.yml`). Per-syncer sections are
//! kept as raw YAML values here; each syncer plugin deserializes its own
//! shape out of them at resolution time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// SSH transport defaults from the configuration file.
///
/// These sit below environment variables and explicit flags in the
/// resolution order; see `ssh::options`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SshConfig {
    #[serde(default)]
    pub host: String,

    #[serde(default)]
    pub port: String,

    #[serde(default)]
    pub private_key: String,

    #[serde(default)]
    pub verbose: bool,

    #[serde(default)]
    pub skip_agent: bool,

    /// Extra arguments appended to every rsync transfer.
    #[serde(default)]
    pub rsync_args: String,
}

/// Control-plane (SSH-portal) integration settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiConfig {
    #[serde(default)]
    pub endpoint: String,

    /// When true, per-environment SSH targets are fetched from the
    /// control-plane API instead of the static `ssh` section.
    #[serde(default)]
    pub ssh_portal: bool,
}

/// One entry under `syncers`.
///
/// An entry with an explicit `type` field is an alias: a user-named logical
/// sync backed by the plugin registered under that type. Entries without
/// `type` are looked up by their own key.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SyncerEntry {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Remote-side values, syncer-specific shape.
    #[serde(default)]
    pub config: serde_yaml_ng::Value,

    /// Sparse local-side overrides; only non-empty fields replace the
    /// remote values.
    #[serde(default)]
    pub local: serde_yaml_ng::Value,
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub project: String,

    #[serde(default)]
    pub ssh: SshConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub syncers: BTreeMap<String, SyncerEntry>,
}

impl Config {
    /// Effective project name: flag, then `PORTSIDE_PROJECT`, then config.
    pub fn resolve_project(&self, flag: Option<&str>) -> String {
        if let Some(project) = flag {
            if !project.is_empty() {
                return project.to_string();
            }
        }
        if let Ok(project) = std::env::var("PORTSIDE_PROJECT") {
            if !project.is_empty() {
                return project;
            }
        }
        self.project.clone()
    }

    /// Effective API endpoint: flag, then `PORTSIDE_API_ENDPOINT`, then config.
    pub fn resolve_api_endpoint(&self, flag: Option<&str>) -> String {
        if let Some(endpoint) = flag {
            if !endpoint.is_empty() {
                return endpoint.to_string();
            }
        }
        if let Ok(endpoint) = std::env::var("PORTSIDE_API_ENDPOINT") {
            if !endpoint.is_empty() {
                return endpoint;
            }
        }
        self.api.endpoint.clone()
    }
}

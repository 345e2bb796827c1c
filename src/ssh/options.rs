//! SSH option resolution
//!
//! Host and port follow flag-if-non-default → environment variable →
//! config file → hard default. Key and verbose have no well-known default
//! to protect, so config values apply only as a fallback when the flag was
//! left unset. Each resolution is an ordered candidate list evaluated in
//! order, so the precedence policy itself is testable in isolation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::SshConfig;

/// Hard default SSH endpoint.
pub const DEFAULT_SSH_HOST: &str = "ssh.portside.cloud";
pub const DEFAULT_SSH_PORT: &str = "2022";

/// Resolved transport parameters for one environment. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SshOptions {
    pub host: String,
    pub port: String,
    pub private_key: String,
    pub verbose: bool,
    pub skip_agent: bool,
    pub rsync_args: String,
}

impl Default for SshOptions {
    fn default() -> Self {
        Self {
            host: DEFAULT_SSH_HOST.to_string(),
            port: DEFAULT_SSH_PORT.to_string(),
            private_key: String::new(),
            verbose: false,
            skip_agent: false,
            rsync_args: String::new(),
        }
    }
}

/// SSH-related values exactly as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct SshFlags {
    pub host: String,
    pub port: String,
    pub private_key: String,
    pub verbose: bool,
    pub skip_agent: bool,
    pub rsync_args: String,
}

/// Environment-variable overrides, read once per invocation.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub host: Option<String>,
    pub port: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            host: non_empty_var("PORTSIDE_SSH_HOST"),
            port: non_empty_var("PORTSIDE_SSH_PORT"),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// First candidate whose predicate holds.
fn first_applicable(candidates: &[(Option<&str>, bool)], default: &str) -> String {
    for (value, applies) in candidates {
        if *applies {
            if let Some(v) = value {
                return (*v).to_string();
            }
        }
    }
    default.to_string()
}

/// Resolve the effective SSH options for this invocation.
pub fn resolve_ssh_options(config: &SshConfig, flags: &SshFlags, env: &EnvOverrides) -> SshOptions {
    let host = first_applicable(
        &[
            (
                Some(flags.host.as_str()),
                !flags.host.is_empty() && flags.host != DEFAULT_SSH_HOST,
            ),
            (env.host.as_deref(), env.host.is_some()),
            (Some(config.host.as_str()), !config.host.is_empty()),
        ],
        DEFAULT_SSH_HOST,
    );

    let port = first_applicable(
        &[
            (
                Some(flags.port.as_str()),
                !flags.port.is_empty() && flags.port != DEFAULT_SSH_PORT,
            ),
            (env.port.as_deref(), env.port.is_some()),
            (Some(config.port.as_str()), !config.port.is_empty()),
        ],
        DEFAULT_SSH_PORT,
    );

    // Key and rsync-args: config applies only when the flag was left unset.
    let private_key = if flags.private_key.is_empty() {
        config.private_key.clone()
    } else {
        flags.private_key.clone()
    };
    let rsync_args = if flags.rsync_args.is_empty() {
        config.rsync_args.clone()
    } else {
        flags.rsync_args.clone()
    };

    SshOptions {
        host,
        port,
        private_key,
        verbose: flags.verbose || config.verbose,
        skip_agent: flags.skip_agent || config.skip_agent,
        rsync_args,
    }
}

/// Per-environment SSH options with a default fallback.
///
/// Lookup is pure and total: an environment without an explicit entry gets
/// the default, never an error.
#[derive(Debug, Clone)]
pub struct SshOptionWrapper {
    pub project: String,
    options: HashMap<String, SshOptions>,
    default: SshOptions,
}

impl SshOptionWrapper {
    pub fn new(project: &str, default: SshOptions) -> Self {
        Self {
            project: project.to_string(),
            options: HashMap::new(),
            default,
        }
    }

    pub fn insert(&mut self, environment: &str, options: SshOptions) {
        self.options.insert(environment.to_string(), options);
    }

    pub fn for_environment(&self, environment: &str) -> &SshOptions {
        self.options.get(environment).unwrap_or(&self.default)
    }

    pub fn default_options(&self) -> &SshOptions {
        &self.default
    }
}

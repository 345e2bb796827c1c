//! SSH-portal control-plane client
//!
//! When SSH-portal integration is enabled, each environment's actual deploy
//! target is fetched from the control-plane API instead of being read from
//! static configuration. The production-typed environment becomes the
//! wrapper default; a project without one cannot safely pick a fallback
//! target and is an explicit error.

use serde::Deserialize;

use crate::error::{PortsideError, PortsideResult};
use crate::ssh::options::{SshOptionWrapper, SshOptions};

pub const PRODUCTION_ENVIRONMENT_TYPE: &str = "production";

/// One environment as reported by the control plane.
#[derive(Debug, Clone, Deserialize)]
pub struct PortalEnvironment {
    pub name: String,
    #[serde(rename = "type")]
    pub environment_type: String,
    pub deploy_target: DeployTarget,
}

/// Deploy target endpoint for one environment.
#[derive(Debug, Clone, Deserialize)]
pub struct DeployTarget {
    #[serde(default)]
    pub ssh_host: String,
    #[serde(default)]
    pub ssh_port: String,
}

#[derive(Debug, Deserialize)]
struct EnvironmentsResponse {
    environments: Vec<PortalEnvironment>,
}

/// Blocking HTTP client for the control-plane API.
pub struct PortalClient {
    endpoint: String,
    http: reqwest::blocking::Client,
}

impl PortalClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            http: reqwest::blocking::Client::new(),
        }
    }

    /// Fetch the project's environments and their deploy targets.
    pub fn project_environments(&self, project: &str) -> PortsideResult<Vec<PortalEnvironment>> {
        let url = format!("{}/projects/{}/environments", self.endpoint, project);
        tracing::debug!(%url, "querying ssh-portal");

        let response = self
            .http
            .get(&url)
            .send()
            .map_err(|e| PortsideError::Portal {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(PortsideError::Portal {
                message: format!("{} returned {}", url, response.status()),
            });
        }

        let body: EnvironmentsResponse =
            response.json().map_err(|e| PortsideError::Portal {
                message: format!("malformed environments response: {e}"),
            })?;
        Ok(body.environments)
    }
}

/// Build a wrapper from control-plane environments.
///
/// Each entry carries that environment's own host/port but the invocation's
/// key, verbosity, agent and rsync settings. Pure; separated from the HTTP
/// fetch so it can be tested against fixture data.
pub fn wrapper_from_environments(
    project: &str,
    base: &SshOptions,
    environments: &[PortalEnvironment],
) -> PortsideResult<SshOptionWrapper> {
    let mut default = None;
    let mut entries = Vec::with_capacity(environments.len());

    for env in environments {
        let options = SshOptions {
            host: if env.deploy_target.ssh_host.is_empty() {
                base.host.clone()
            } else {
                env.deploy_target.ssh_host.clone()
            },
            port: if env.deploy_target.ssh_port.is_empty() {
                base.port.clone()
            } else {
                env.deploy_target.ssh_port.clone()
            },
            private_key: base.private_key.clone(),
            verbose: base.verbose,
            skip_agent: base.skip_agent,
            rsync_args: base.rsync_args.clone(),
        };
        if env.environment_type == PRODUCTION_ENVIRONMENT_TYPE && default.is_none() {
            default = Some(options.clone());
        }
        entries.push((env.name.clone(), options));
    }

    let default = default.ok_or_else(|| PortsideError::NoDefaultEnvironment {
        project: project.to_string(),
    })?;

    let mut wrapper = SshOptionWrapper::new(project, default);
    for (name, options) in entries {
        wrapper.insert(&name, options);
    }
    Ok(wrapper)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn portal_env(name: &str, env_type: &str, host: &str, port: &str) -> PortalEnvironment {
        PortalEnvironment {
            name: name.to_string(),
            environment_type: env_type.to_string(),
            deploy_target: DeployTarget {
                ssh_host: host.to_string(),
                ssh_port: port.to_string(),
            },
        }
    }

    #[test]
    fn production_environment_becomes_default() {
        let base = SshOptions::default();
        let envs = vec![
            portal_env("staging", "development", "ssh.eu1.example.com", "22"),
            portal_env("main", "production", "ssh.eu2.example.com", "2222"),
        ];

        let wrapper = wrapper_from_environments("my-app", &base, &envs).unwrap();
        assert_eq!(wrapper.default_options().host, "ssh.eu2.example.com");
        assert_eq!(wrapper.for_environment("staging").host, "ssh.eu1.example.com");
        // Unknown environments fall back to the production default
        assert_eq!(wrapper.for_environment("pr-42").host, "ssh.eu2.example.com");
    }

    #[test]
    fn entries_carry_invocation_transport_settings() {
        let base = SshOptions {
            private_key: "~/.ssh/deploy".to_string(),
            verbose: true,
            ..Default::default()
        };
        let envs = vec![portal_env("main", "production", "ssh.example.com", "22")];

        let wrapper = wrapper_from_environments("my-app", &base, &envs).unwrap();
        let main = wrapper.for_environment("main");
        assert_eq!(main.private_key, "~/.ssh/deploy");
        assert!(main.verbose);
    }

    #[test]
    fn empty_deploy_target_inherits_base_endpoint() {
        let base = SshOptions::default();
        let envs = vec![portal_env("main", "production", "", "")];

        let wrapper = wrapper_from_environments("my-app", &base, &envs).unwrap();
        assert_eq!(wrapper.for_environment("main").host, base.host);
        assert_eq!(wrapper.for_environment("main").port, base.port);
    }

    #[test]
    fn missing_production_environment_is_an_error() {
        let base = SshOptions::default();
        let envs = vec![portal_env("staging", "development", "h", "22")];

        let err = wrapper_from_environments("my-app", &base, &envs).unwrap_err();
        assert!(matches!(
            err,
            PortsideError::NoDefaultEnvironment { ref project } if project == "my-app"
        ));
    }
}

//! SSH transport parameters and their resolution.

pub mod options;
pub mod portal;

pub use options::{
    resolve_ssh_options, EnvOverrides, SshFlags, SshOptionWrapper, SshOptions, DEFAULT_SSH_HOST,
    DEFAULT_SSH_PORT,
};
pub use portal::{wrapper_from_environments, PortalClient, PortalEnvironment};

use crate::config::Config;
use crate::error::PortsideResult;

/// Build the per-environment SSH option wrapper for one invocation.
///
/// With SSH-portal integration disabled, every environment shares the single
/// resolved option set. With it enabled, each environment gets its actual
/// deploy target from the control-plane API and the production environment
/// becomes the default.
pub fn build_ssh_option_wrapper(
    config: &Config,
    flags: &SshFlags,
    env: &EnvOverrides,
    project: &str,
    portal_enabled: bool,
    api_endpoint: &str,
) -> PortsideResult<SshOptionWrapper> {
    let base = resolve_ssh_options(&config.ssh, flags, env);

    if !portal_enabled {
        return Ok(SshOptionWrapper::new(project, base));
    }

    let client = PortalClient::new(api_endpoint);
    let environments = client.project_environments(project)?;
    wrapper_from_environments(project, &base, &environments)
}

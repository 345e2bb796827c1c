//! Shared command plumbing: configuration discovery, environment and SSH
//! option resolution, confirmation prompts.

use std::path::Path;

use anyhow::{bail, Context, Result};

use portside::config::LoadedConfig;
use portside::environment::Environment;
use portside::error::PortsideError;
use portside::ssh::{build_ssh_option_wrapper, EnvOverrides, SshOptionWrapper};
use portside::ui;

use crate::cli::{EnvironmentArgs, SshArgs};

pub struct RunContext {
    pub loaded: LoadedConfig,
    pub project: String,
    pub source: Environment,
    pub target: Environment,
    pub wrapper: SshOptionWrapper,
}

pub fn build_context(
    config_flag: Option<&Path>,
    environment: &EnvironmentArgs,
    ssh: &SshArgs,
    json: bool,
) -> Result<RunContext> {
    let loaded = portside::config::discover(config_flag)?;
    if !json {
        ui::print_config_warnings(&loaded.warnings);
    }

    let project = loaded
        .config
        .resolve_project(environment.project.as_deref());
    if project.is_empty() {
        bail!("no project name given (use --project, PORTSIDE_PROJECT, or the configuration file)");
    }

    let source = Environment::new(&project, &environment.source_environment)
        .with_service(&environment.service);
    let target = Environment::new(&project, &environment.target_environment)
        .with_service(&environment.service);

    let portal_enabled = environment.ssh_portal || loaded.config.api.ssh_portal;
    let endpoint = loaded
        .config
        .resolve_api_endpoint(environment.api_endpoint.as_deref());
    if portal_enabled && endpoint.is_empty() {
        bail!("SSH-portal integration is enabled but no API endpoint is configured");
    }

    let wrapper = build_ssh_option_wrapper(
        &loaded.config,
        &ssh.to_flags(),
        &EnvOverrides::from_env(),
        &project,
        portal_enabled,
        &endpoint,
    )
    .context("building SSH options")?;

    Ok(RunContext {
        loaded,
        project,
        source,
        target,
        wrapper,
    })
}

/// Ask before touching remote state. Dry runs and `--yes` skip the prompt.
pub fn confirm(prompt: &str, yes: bool, dry_run: bool) -> Result<()> {
    if yes || dry_run {
        return Ok(());
    }

    let proceed = dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .context("reading confirmation")?;

    if !proceed {
        return Err(PortsideError::SyncAborted.into());
    }
    Ok(())
}

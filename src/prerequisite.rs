//! Prerequisite negotiation
//!
//! Before a real sync, each remote side is probed for a usable transfer
//! tool. The probe runs `portside config --json` on that environment and
//! reads the `rsync-path` fact out of the response. A failed or unparsable
//! probe is not fatal: the environment is assumed to have a bare `rsync`
//! on PATH for dry runs, and gets one bootstrapped onto it otherwise.
//! Bootstrap failure has no further fallback.
//!
//! States per environment: Unknown -> Probed -> {RsyncAvailable,
//! RsyncMissing} -> Ready.

use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::environment::Environment;
use crate::error::{PortsideError, PortsideResult};
use crate::exec::Executor;
use crate::ssh::SshOptions;
use crate::syncers::Syncer;

/// Fact name carrying the remote rsync path in the probe response.
pub const RSYNC_PATH_FACT: &str = "rsync-path";

/// Command name assumed resolvable when negotiation degrades.
pub const DEFAULT_RSYNC: &str = "rsync";

/// Version suffix for bootstrapped rsync binaries.
pub const BOOTSTRAP_RSYNC_VERSION: &str = "3.2.7";

/// Probe wire document, as printed by `portside config --json`.
#[derive(Debug, Deserialize)]
pub struct ProbeReport {
    #[allow(dead_code)]
    pub version: String,
    pub checks: Vec<ProbeFact>,
}

#[derive(Debug, Deserialize)]
pub struct ProbeFact {
    pub name: String,
    pub value: String,
    pub status: String,
}

/// Extract a trustworthy rsync path from probe output, if any.
pub fn parse_probe_output(stdout: &str) -> Option<String> {
    let report: ProbeReport = serde_json::from_str(stdout).ok()?;
    report
        .checks
        .into_iter()
        .find(|fact| fact.name == RSYNC_PATH_FACT && fact.status == "ok" && !fact.value.is_empty())
        .map(|fact| fact.value)
}

/// Probes environments and bootstraps rsync where missing.
pub struct PrerequisiteNegotiator<'a> {
    executor: &'a dyn Executor,
    dry_run: bool,
    payload_source: Option<PathBuf>,
}

impl<'a> PrerequisiteNegotiator<'a> {
    pub fn new(executor: &'a dyn Executor, dry_run: bool) -> Self {
        Self {
            executor,
            dry_run,
            payload_source: None,
        }
    }

    /// Use an explicit local binary as the bootstrap payload instead of
    /// discovering one.
    pub fn with_payload_source(mut self, path: &Path) -> Self {
        self.payload_source = Some(path.to_path_buf());
        self
    }

    /// Ensure `environment` can run rsync, returning the path to use.
    pub fn ensure(
        &self,
        environment: &Environment,
        ssh: &SshOptions,
        syncer: &dyn Syncer,
    ) -> PortsideResult<String> {
        if !syncer.requires_probe() {
            tracing::debug!(environment = %environment, "syncer is probe-exempt");
            return Ok(DEFAULT_RSYNC.to_string());
        }

        let probe = syncer.probe_command().get_command()?;

        // Dry runs never touch the execution shim: render the probe, log
        // it, and assume a bare rsync on PATH.
        if self.dry_run {
            tracing::info!(environment = %environment, probe, "dry-run: would probe");
            return Ok(DEFAULT_RSYNC.to_string());
        }

        match self.executor.execute(environment, ssh, &probe) {
            Ok(output) => {
                if let Some(path) = parse_probe_output(&output.stdout) {
                    tracing::debug!(environment = %environment, path, "rsync available");
                    return Ok(path);
                }
                tracing::debug!(environment = %environment, "probe response carried no rsync path");
            }
            Err(e) => {
                tracing::debug!(environment = %environment, error = %e, "probe failed");
            }
        }

        // RsyncMissing: bootstrap is the only remaining option.
        self.bootstrap(environment, ssh)
    }

    /// Stage the rsync payload locally, stream it to the environment via
    /// `cat > dest && chmod +x dest`, and return the installed path.
    fn bootstrap(&self, environment: &Environment, ssh: &SshOptions) -> PortsideResult<String> {
        let destination = format!("/tmp/.portside-rsync-v{BOOTSTRAP_RSYNC_VERSION}");

        let source = match &self.payload_source {
            Some(path) => path.clone(),
            None => locate_rsync_payload().ok_or_else(|| PortsideError::BootstrapFailed {
                environment: environment.name.clone(),
                message: "no local rsync binary found to bootstrap with".to_string(),
            })?,
        };

        let staged = stage_payload(&source).map_err(|e| PortsideError::BootstrapFailed {
            environment: environment.name.clone(),
            message: format!("staging {} failed: {e}", source.display()),
        })?;

        tracing::info!(
            environment = %environment,
            destination,
            sha256 = %staged.digest,
            "bootstrapping rsync"
        );

        let command = format!("cat > {destination} && chmod +x {destination}");
        self.executor
            .execute_with_stdin(environment, ssh, &command, &staged.bytes)
            .map_err(|e| PortsideError::BootstrapFailed {
                environment: environment.name.clone(),
                message: e.to_string(),
            })?;

        // The staged temp copy is removed when `staged` drops here.
        Ok(destination)
    }
}

struct StagedPayload {
    bytes: Vec<u8>,
    digest: String,
    _staging: tempfile::NamedTempFile,
}

fn stage_payload(source: &Path) -> std::io::Result<StagedPayload> {
    let mut staging = tempfile::NamedTempFile::new()?;
    std::io::copy(&mut std::fs::File::open(source)?, &mut staging)?;

    let mut bytes = Vec::new();
    std::fs::File::open(staging.path())?.read_to_end(&mut bytes)?;

    let digest = format!("{:x}", Sha256::digest(&bytes));
    Ok(StagedPayload {
        bytes,
        digest,
        _staging: staging,
    })
}

/// Payload source: `PORTSIDE_RSYNC_BINARY`, else `rsync` on the local PATH.
fn locate_rsync_payload() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("PORTSIDE_RSYNC_BINARY") {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }
    find_rsync_on_path()
}

/// The `rsync` binary on the local PATH, if any. Also reported as the
/// `rsync-path` fact by `portside config --json`.
pub fn find_rsync_on_path() -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join("rsync"))
        .find(|candidate| candidate.is_file())
}

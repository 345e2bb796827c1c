//! Sync orchestration
//!
//! One run-to-completion sequence per (source, target, syncer) triple:
//! invariant check, syncer resolution, prerequisite negotiation, then
//! dump -> transfer -> restore -> cleanup. No phase is retried. Dry runs
//! render and log every command without invoking the execution shim and
//! never bootstrap.

use std::collections::BTreeMap;

use crate::command::SyncCommand;
use crate::config::SyncerEntry;
use crate::environment::Environment;
use crate::error::{PortsideError, PortsideResult};
use crate::exec::{ssh_transport_string, Executor};
use crate::prerequisite::{PrerequisiteNegotiator, DEFAULT_RSYNC};
use crate::ssh::{SshOptionWrapper, SshOptions};
use crate::syncers::{Syncer, SyncerRegistry};
use crate::ui;

/// One sync to perform.
#[derive(Debug, Clone)]
pub struct SyncTask {
    pub syncer_id: String,
    pub source: Environment,
    pub target: Environment,
}

/// Per-run switches.
#[derive(Debug, Clone, Default)]
pub struct SyncRunOptions {
    pub dry_run: bool,
    pub skip_source_cleanup: bool,
    pub skip_target_cleanup: bool,
    pub skip_target_import: bool,
    /// Externally supplied transfer-resource name, applied before any
    /// command is generated.
    pub transfer_name: Option<String>,
}

/// Artifact left behind because its side's cleanup was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemainingArtifact {
    pub environment: String,
    pub path: String,
}

/// Outcome of one sync run.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    pub syncer_id: String,
    /// Every command rendered, in execution order (dry runs included).
    pub rendered_commands: Vec<String>,
    /// Artifact paths not removed by cleanup.
    pub remaining_artifacts: Vec<RemainingArtifact>,
}

/// Drives the phases for sync tasks against a shared executor and SSH
/// option wrapper.
pub struct Orchestrator<'a> {
    registry: &'a SyncerRegistry,
    executor: &'a dyn Executor,
    wrapper: &'a SshOptionWrapper,
    options: SyncRunOptions,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        registry: &'a SyncerRegistry,
        executor: &'a dyn Executor,
        wrapper: &'a SshOptionWrapper,
        options: SyncRunOptions,
    ) -> Self {
        Self {
            registry,
            executor,
            wrapper,
            options,
        }
    }

    pub fn run(
        &self,
        task: &SyncTask,
        syncers: &BTreeMap<String, SyncerEntry>,
    ) -> PortsideResult<SyncReport> {
        // The wrapper was built for one project per invocation.
        debug_assert_eq!(task.source.project, self.wrapper.project);

        // Remote-to-remote never reaches a phase.
        if !task.source.is_local() && !task.target.is_local() {
            return Err(PortsideError::RemoteToRemote {
                src: task.source.name.clone(),
                target: task.target.name.clone(),
            });
        }

        let mut syncer = self.registry.resolve(&task.syncer_id, syncers)?;
        if let Some(name) = &self.options.transfer_name {
            syncer.set_transfer_name(name);
        }

        let mut report = SyncReport {
            syncer_id: task.syncer_id.clone(),
            ..Default::default()
        };

        let source_ssh = self.wrapper.for_environment(&task.source.name);
        let target_ssh = self.wrapper.for_environment(&task.target.name);

        let negotiator = PrerequisiteNegotiator::new(self.executor, self.options.dry_run);
        let source_rsync = negotiator.ensure(&task.source, source_ssh, syncer.as_ref())?;
        // A local target whose import is skipped runs no commands of its
        // own; its probe is elided.
        let target_rsync = if self.options.skip_target_import && task.target.is_local() {
            DEFAULT_RSYNC.to_string()
        } else {
            negotiator.ensure(&task.target, target_ssh, syncer.as_ref())?
        };

        ui::header(&format!(
            "Syncing {} from {} to {}",
            task.syncer_id, task.source, task.target
        ));

        // Dump on the source side. A no-op command is success with zero
        // side effects.
        self.execute_phase(
            "dump",
            &task.source,
            source_ssh,
            &syncer.remote_commands(&task.source),
            &mut report,
        )?;

        // Transfer the resource from source to target.
        let transfer = self.build_transfer_command(
            task,
            syncer.as_ref(),
            source_ssh,
            target_ssh,
            &source_rsync,
            &target_rsync,
        );
        if let Some(command) = transfer {
            self.execute_rendered("transfer", &Environment::local(&task.source.project), target_ssh, &command, &mut report)?;
        }

        // Restore on the target side.
        if self.options.skip_target_import {
            tracing::debug!("target import skipped");
        } else {
            self.execute_phase(
                "restore",
                &task.target,
                target_ssh,
                &syncer.local_commands(&task.target),
                &mut report,
            )?;
        }

        // Cleanup, per side.
        if self.options.skip_source_cleanup {
            self.note_remaining(&task.source, syncer.as_ref(), &mut report);
        } else {
            self.cleanup_side(&task.source, source_ssh, syncer.as_ref(), &mut report)?;
        }
        if self.options.skip_target_cleanup {
            self.note_remaining(&task.target, syncer.as_ref(), &mut report);
        } else {
            self.cleanup_side(&task.target, target_ssh, syncer.as_ref(), &mut report)?;
        }

        ui::success(&format!("{} synced", task.syncer_id));
        Ok(report)
    }

    fn execute_phase(
        &self,
        phase: &str,
        environment: &Environment,
        ssh: &SshOptions,
        commands: &[SyncCommand],
        report: &mut SyncReport,
    ) -> PortsideResult<()> {
        for command in commands {
            if command.is_no_op() {
                tracing::debug!(phase, environment = %environment, "no-op command, nothing to run");
                continue;
            }
            let rendered = command.get_command()?;
            self.execute_rendered(phase, environment, ssh, &rendered, report)?;
        }
        Ok(())
    }

    fn execute_rendered(
        &self,
        phase: &str,
        environment: &Environment,
        ssh: &SshOptions,
        rendered: &str,
        report: &mut SyncReport,
    ) -> PortsideResult<()> {
        report.rendered_commands.push(rendered.to_string());

        if self.options.dry_run {
            ui::step(&format!("dry-run [{phase}]: {rendered}"));
            return Ok(());
        }

        tracing::info!(phase, environment = %environment, command = rendered, "executing");
        ui::step(&format!("[{phase}] {rendered}"));
        self.executor.execute(environment, ssh, rendered)?;
        Ok(())
    }

    /// Build the rsync invocation moving the resource from source to
    /// target. Runs on the local machine; the remote side is addressed
    /// through `-e ssh`. Returns None when source and target name the same
    /// local path (nothing to move).
    fn build_transfer_command(
        &self,
        task: &SyncTask,
        syncer: &dyn Syncer,
        source_ssh: &SshOptions,
        target_ssh: &SshOptions,
        source_rsync: &str,
        target_rsync: &str,
    ) -> Option<String> {
        let source_resource = syncer.transfer_resource(&task.source);
        let target_resource = syncer.transfer_resource(&task.target);

        let (remote_ssh, remote_rsync) = if !task.source.is_local() {
            (Some(source_ssh), source_rsync)
        } else if !task.target.is_local() {
            (Some(target_ssh), target_rsync)
        } else {
            (None, DEFAULT_RSYNC)
        };

        // The program is the local side's rsync.
        let program = if task.source.is_local() {
            source_rsync
        } else {
            target_rsync
        };

        let mut parts: Vec<String> = vec![program.to_string()];

        if source_resource.is_directory {
            // Normalize permissions, ownership and times so results are
            // host-independent.
            parts.push("--recursive".to_string());
            parts.push("--links".to_string());
            parts.push("--no-perms".to_string());
            parts.push("--no-owner".to_string());
            parts.push("--no-group".to_string());
            parts.push("--omit-dir-times".to_string());
        }

        if let Some(ssh) = remote_ssh {
            parts.push(format!("-e \"{}\"", ssh_transport_string(ssh)));
            if remote_rsync != DEFAULT_RSYNC {
                parts.push(format!("--rsync-path={remote_rsync}"));
            }
            if !ssh.rsync_args.is_empty() {
                parts.push(ssh.rsync_args.clone());
            }
        }

        for pattern in &source_resource.exclusions {
            parts.push(format!("--exclude={pattern}"));
        }

        let source_spec = side_spec(&task.source, source_ssh, &source_resource.name, source_resource.is_directory);
        let target_spec = side_spec(&task.target, target_ssh, &target_resource.name, false);

        if task.source.is_local() && task.target.is_local() && source_spec == target_spec {
            return None;
        }

        parts.push(source_spec);
        parts.push(target_spec);
        Some(parts.join(" "))
    }

    fn cleanup_side(
        &self,
        environment: &Environment,
        ssh: &SshOptions,
        syncer: &dyn Syncer,
        report: &mut SyncReport,
    ) -> PortsideResult<()> {
        let paths = syncer.cleanup_paths(environment);
        if paths.is_empty() {
            return Ok(());
        }
        let command = format!("rm -f {}", paths.join(" "));
        self.execute_rendered("cleanup", environment, ssh, &command, report)
    }

    fn note_remaining(
        &self,
        environment: &Environment,
        syncer: &dyn Syncer,
        report: &mut SyncReport,
    ) {
        for path in syncer.cleanup_paths(environment) {
            report.remaining_artifacts.push(RemainingArtifact {
                environment: environment.name.clone(),
                path,
            });
        }
    }
}

/// rsync path spec for one side: `user@host:path` for remote sides, the
/// bare path locally. Directory sources get a trailing slash so contents
/// are copied, not the directory itself.
fn side_spec(environment: &Environment, ssh: &SshOptions, path: &str, content_copy: bool) -> String {
    let path = if content_copy && !path.ends_with('/') {
        format!("{path}/")
    } else {
        path.to_string()
    };
    if environment.is_local() {
        path
    } else {
        format!("{}@{}:{}", environment.ssh_user(), ssh.host, path)
    }
}

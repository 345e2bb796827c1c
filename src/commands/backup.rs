//! Export one resource from a source environment into a local file.
//!
//! A backup is a sync to the local machine with target import and target
//! cleanup suppressed; the one remaining local artifact is then relocated
//! to the requested output path.

use anyhow::{Context, Result};

use portside::environment::{Environment, LOCAL_ENVIRONMENT};
use portside::error::PortsideError;
use portside::exec::ShellExecutor;
use portside::orchestrator::{Orchestrator, SyncRunOptions, SyncTask};
use portside::runlock::RunLock;
use portside::syncers::default_registry;
use portside::ui;

use crate::cli::BackupCmd;
use crate::commands::context::{build_context, confirm};

pub fn cmd_backup(config_flag: Option<&std::path::Path>, json: bool, cmd: &BackupCmd) -> Result<()> {
    let ctx = build_context(config_flag, &cmd.environment, &cmd.ssh, json)?;

    // Backups always land on the local machine, whatever -t says.
    let target = Environment::local(&ctx.project).with_service(&cmd.environment.service);

    confirm(
        &format!(
            "Export '{}' from {} to {}?",
            cmd.syncer,
            ctx.source,
            cmd.output.display()
        ),
        cmd.yes,
        cmd.dry_run,
    )?;

    let _lock = if cmd.dry_run {
        None
    } else {
        Some(RunLock::acquire(&ctx.project)?)
    };

    let executor = match cmd.command_timeout {
        Some(seconds) => ShellExecutor::with_timeout(seconds),
        None => ShellExecutor::new(),
    };
    let orchestrator = Orchestrator::new(
        default_registry(),
        &executor,
        &ctx.wrapper,
        SyncRunOptions {
            dry_run: cmd.dry_run,
            skip_target_import: true,
            skip_target_cleanup: true,
            ..Default::default()
        },
    );

    let task = SyncTask {
        syncer_id: cmd.syncer.clone(),
        source: ctx.source.clone(),
        target,
    };
    let report = orchestrator.run(&task, &ctx.loaded.config.syncers)?;

    let artifact = report
        .remaining_artifacts
        .iter()
        .find(|a| a.environment == LOCAL_ENVIRONMENT)
        .ok_or(PortsideError::BackupArtifactMissing)?;

    if cmd.dry_run {
        ui::step(&format!(
            "dry-run: would write {} to {}",
            artifact.path,
            cmd.output.display()
        ));
        return Ok(());
    }

    // Copy then remove: /tmp and the output path may be different
    // filesystems, where a rename would fail.
    std::fs::copy(&artifact.path, &cmd.output)
        .with_context(|| format!("writing {}", cmd.output.display()))?;
    std::fs::remove_file(&artifact.path)
        .with_context(|| format!("removing staged artifact {}", artifact.path))?;

    if json {
        let output = serde_json::json!({
            "event": "backup",
            "syncer": cmd.syncer,
            "output": cmd.output.display().to_string(),
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        ui::success(&format!("backup written to {}", cmd.output.display()));
    }

    Ok(())
}

//! One-shot sync of a named resource.

use anyhow::Result;

use portside::exec::ShellExecutor;
use portside::orchestrator::{Orchestrator, SyncRunOptions, SyncTask};
use portside::runlock::RunLock;
use portside::syncers::default_registry;
use portside::ui;

use crate::cli::SyncCmd;
use crate::commands::context::{build_context, confirm};

pub fn cmd_sync(config_flag: Option<&std::path::Path>, json: bool, cmd: &SyncCmd) -> Result<()> {
    let ctx = build_context(config_flag, &cmd.environment, &cmd.ssh, json)?;

    confirm(
        &format!(
            "Sync '{}' from {} to {}?",
            cmd.syncer, ctx.source, ctx.target
        ),
        cmd.yes,
        cmd.dry_run,
    )?;

    // Dry runs touch nothing and need no exclusivity.
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
            skip_source_cleanup: cmd.skip_source_cleanup,
            skip_target_cleanup: cmd.skip_target_cleanup,
            skip_target_import: cmd.skip_target_import,
            transfer_name: cmd.transfer_name.clone(),
        },
    );

    let task = SyncTask {
        syncer_id: cmd.syncer.clone(),
        source: ctx.source.clone(),
        target: ctx.target.clone(),
    };
    let report = orchestrator.run(&task, &ctx.loaded.config.syncers)?;

    if json {
        let output = serde_json::json!({
            "event": "sync",
            "syncer": report.syncer_id,
            "dry_run": cmd.dry_run,
            "commands": report.rendered_commands,
            "remaining_artifacts": report
                .remaining_artifacts
                .iter()
                .map(|a| serde_json::json!({"environment": a.environment, "path": a.path}))
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string(&output)?);
    } else if !report.remaining_artifacts.is_empty() {
        for artifact in &report.remaining_artifacts {
            ui::warn(&format!(
                "artifact kept on {}: {}",
                artifact.environment, artifact.path
            ));
        }
    }

    Ok(())
}

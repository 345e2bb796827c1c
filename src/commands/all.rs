//! Batch sync of every configured resource.

use anyhow::Result;

use portside::batch::run_all;
use portside::exec::ShellExecutor;
use portside::orchestrator::{Orchestrator, SyncRunOptions};
use portside::runlock::RunLock;
use portside::syncers::default_registry;

use crate::cli::AllCmd;
use crate::commands::context::{build_context, confirm};

pub fn cmd_all(config_flag: Option<&std::path::Path>, json: bool, cmd: &AllCmd) -> Result<()> {
    let ctx = build_context(config_flag, &cmd.environment, &cmd.ssh, json)?;

    let syncers = &ctx.loaded.config.syncers;
    if syncers.is_empty() {
        anyhow::bail!(
            "no syncers configured in {}",
            ctx.loaded.path.display()
        );
    }

    confirm(
        &format!(
            "Sync all {} configured resources from {} to {}?",
            syncers.len(),
            ctx.source,
            ctx.target
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
            ..Default::default()
        },
    );

    let summary = run_all(&orchestrator, syncers, &ctx.source, &ctx.target);

    if json {
        let output = serde_json::json!({
            "event": "all",
            "succeeded": summary.succeeded(),
            "failed": summary.failed(),
            "tasks": summary
                .outcomes
                .iter()
                .map(|o| serde_json::json!({
                    "syncer": o.syncer_id,
                    "success": o.result.is_ok(),
                    "error": o.result.as_ref().err().map(|e| e.to_string()),
                }))
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        summary.print();
    }

    summary.into_result()?;
    Ok(())
}

//! Batch execution
//!
//! Runs every configured syncer as an independent task, sequentially, over
//! a shared orchestrator. A failing task never aborts its siblings; each
//! outcome is collected and the run is summarized at the end. Successful
//! tasks' effects are not rolled back, so a partial failure may require
//! manual cleanup review.

use std::collections::BTreeMap;

use crate::config::SyncerEntry;
use crate::environment::Environment;
use crate::error::{PortsideError, PortsideResult};
use crate::orchestrator::{Orchestrator, SyncReport, SyncTask};
use crate::ui;

/// Outcome of one task in a batch.
pub struct TaskOutcome {
    pub syncer_id: String,
    pub result: PortsideResult<SyncReport>,
}

/// Collected outcomes of a batch run.
pub struct BatchSummary {
    pub outcomes: Vec<TaskOutcome>,
}

impl BatchSummary {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Print the tally and per-failure detail.
    pub fn print(&self) {
        ui::header(&format!(
            "Batch result: {} succeeded, {} failed",
            self.succeeded(),
            self.failed()
        ));
        for outcome in &self.outcomes {
            match &outcome.result {
                Ok(_) => ui::success(&outcome.syncer_id),
                Err(e) => ui::failure(&format!("{}: {}", outcome.syncer_id, e)),
            }
        }
        if self.failed() > 0 {
            ui::warn("partial success: completed tasks are not rolled back, review remote artifacts");
        }
    }

    /// Overall exit condition: any task failure fails the batch.
    pub fn into_result(self) -> PortsideResult<Vec<TaskOutcome>> {
        let failed = self.failed();
        if failed > 0 {
            return Err(PortsideError::TasksFailed {
                failed,
                total: self.outcomes.len(),
            });
        }
        Ok(self.outcomes)
    }
}

/// Run every configured syncer between `source` and `target`.
pub fn run_all(
    orchestrator: &Orchestrator<'_>,
    syncers: &BTreeMap<String, SyncerEntry>,
    source: &Environment,
    target: &Environment,
) -> BatchSummary {
    let mut outcomes = Vec::with_capacity(syncers.len());

    for syncer_id in syncers.keys() {
        let task = SyncTask {
            syncer_id: syncer_id.clone(),
            source: source.clone(),
            target: target.clone(),
        };
        let result = orchestrator.run(&task, syncers);
        if let Err(e) = &result {
            ui::failure(&format!("{syncer_id}: {e}"));
        }
        outcomes.push(TaskOutcome {
            syncer_id: syncer_id.clone(),
            result,
        });
    }

    BatchSummary { outcomes }
}

//! Generation workflow: topic in, perspectives out, report archived.
//!
//! ```text
//! Idle ──submit(topic)──> Generating ──ok──> Success
//!   ^  (blank topic:                 └─err─> Failed
//!   |   stays Idle)
//!   └── Success / Failed are left by the next submit
//! ```
//!
//! `submit` never returns an error. Every failure is reduced to a message in the snapshot.
//! Dropping a `submit` future mid-generation discards its result and returns the workflow
//! to `Idle` with a cancellation message.

use crate::clock::{Clock, SystemClock};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use stratagem_core::error::Result;
use stratagem_core::export::ExportDocument;
use stratagem_core::generator::{PerspectiveGenerator, normalize_topic};
use stratagem_core::perspective::Perspective;
use stratagem_core::report::{Report, ReportRepository};

const CANCELLED_MESSAGE: &str = "Generation was cancelled before it finished.";

/// Attempts to archive a report when the stored revision keeps moving underneath us.
const MAX_ARCHIVE_ATTEMPTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowPhase {
    Idle,
    Generating,
    Success,
    Failed,
}

/// Observable workflow state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowSnapshot {
    pub phase: WorkflowPhase,
    /// Trimmed topic of the current batch.
    pub topic: Option<String>,
    /// Current batch. Empty until a generation succeeds.
    pub perspectives: Vec<Perspective>,
    /// Message of the last validation or generation failure.
    pub error: Option<String>,
    /// Id of the report archived for the current batch.
    pub archived_report_id: Option<i64>,
    /// Set when the batch was generated but could not be archived.
    pub archive_warning: Option<String>,
}

impl Default for WorkflowSnapshot {
    fn default() -> Self {
        Self {
            phase: WorkflowPhase::Idle,
            topic: None,
            perspectives: Vec::new(),
            error: None,
            archived_report_id: None,
            archive_warning: None,
        }
    }
}

pub struct GenerationWorkflow {
    generator: Arc<dyn PerspectiveGenerator>,
    repository: Arc<dyn ReportRepository>,
    clock: Arc<dyn Clock>,
    state: Mutex<WorkflowSnapshot>,
}

impl GenerationWorkflow {
    pub fn new(
        generator: Arc<dyn PerspectiveGenerator>,
        repository: Arc<dyn ReportRepository>,
    ) -> Self {
        Self {
            generator,
            repository,
            clock: Arc::new(SystemClock),
            state: Mutex::new(WorkflowSnapshot::default()),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub async fn snapshot(&self) -> WorkflowSnapshot {
        self.lock_state().clone()
    }

    // Never held across an await.
    fn lock_state(&self) -> MutexGuard<'_, WorkflowSnapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs one generation for `topic` and returns the resulting state.
    ///
    /// - Blank topic: phase becomes `Idle` with a validation message; the generator is not
    ///   called.
    /// - Already `Generating`: the call is refused and the current state returned unchanged.
    /// - Otherwise the generator is called exactly once, and on success the batch is
    ///   archived as a new report at the front of the store.
    pub async fn submit(&self, topic: &str) -> WorkflowSnapshot {
        let topic = {
            let mut state = self.lock_state();

            if state.phase == WorkflowPhase::Generating {
                tracing::warn!("[Workflow] Generation already in progress, ignoring submit");
                return state.clone();
            }

            let topic = match normalize_topic(topic) {
                Ok(topic) => topic.to_string(),
                Err(e) => {
                    state.phase = WorkflowPhase::Idle;
                    state.error = Some(e.to_string());
                    return state.clone();
                }
            };

            *state = WorkflowSnapshot {
                phase: WorkflowPhase::Generating,
                topic: Some(topic.clone()),
                ..WorkflowSnapshot::default()
            };
            topic
        };
        let mut in_flight = InFlight {
            state: &self.state,
            finished: false,
        };

        tracing::info!(
            "[Workflow] Generating perspectives via {} for topic '{}'",
            self.generator.name(),
            topic
        );

        let outcome = self.generator.generate(&topic).await;

        match outcome {
            Ok(perspectives) => {
                let archived = self.archive(&topic, &perspectives).await;

                let mut state = self.lock_state();
                in_flight.finished = true;
                state.phase = WorkflowPhase::Success;
                match archived {
                    Ok(report) => {
                        tracing::info!(
                            "[Workflow] Archived report {} with {} perspectives",
                            report.id,
                            perspectives.len()
                        );
                        state.archived_report_id = Some(report.id);
                    }
                    Err(e) => {
                        tracing::error!("[Workflow] Failed to archive report: {}", e);
                        state.archive_warning =
                            Some(format!("Perspectives were generated but not saved: {e}"));
                    }
                }
                state.perspectives = perspectives;
                state.clone()
            }
            Err(e) => {
                tracing::warn!("[Workflow] Generation failed: {}", e);
                let mut state = self.lock_state();
                in_flight.finished = true;
                state.phase = WorkflowPhase::Failed;
                state.error = Some(e.to_string());
                state.clone()
            }
        }
    }

    /// Prepends a new report to the store with an optimistic revision check.
    ///
    /// On a revision conflict the latest sequence is re-read and the report prepended to
    /// it again.
    async fn archive(&self, topic: &str, perspectives: &[Perspective]) -> Result<Report> {
        let mut attempt = 1;
        loop {
            let snapshot = self.repository.load_snapshot().await;
            let report = Report::create(
                topic,
                perspectives.to_vec(),
                self.clock.now(),
                snapshot.newest_id(),
            )?;
            let reports = snapshot.prepended(report.clone());

            match self
                .repository
                .save_if_unchanged(snapshot.revision, &reports)
                .await
            {
                Ok(_) => return Ok(report),
                Err(e) if e.is_conflict() && attempt < MAX_ARCHIVE_ATTEMPTS => {
                    tracing::warn!(
                        "[Workflow] Report store changed during save (attempt {}): {}",
                        attempt,
                        e
                    );
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Export of the current batch, or `None` when there is nothing to export.
    pub async fn export(&self) -> Option<ExportDocument> {
        let state = self.lock_state();
        let topic = state.topic.as_deref()?;
        ExportDocument::new(topic, &state.perspectives, self.clock.now())
    }
}

/// Marks a `submit` call between entering `Generating` and publishing its outcome.
///
/// If the call is dropped before `finished` is set, the phase is reset so the next submit
/// is not refused.
struct InFlight<'a> {
    state: &'a Mutex<WorkflowSnapshot>,
    finished: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.phase == WorkflowPhase::Generating {
            tracing::warn!("[Workflow] Generation abandoned, returning to idle");
            state.phase = WorkflowPhase::Idle;
            state.error = Some(CANCELLED_MESSAGE.to_string());
        }
    }
}

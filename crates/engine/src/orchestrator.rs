// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dependency orchestrator: fires independent sections concurrently, then
//! gates the composite section on its prerequisites with a bounded wait.

use crate::error::EngineError;
use crate::runner::SectionRunner;
use crate::source::SourceProvider;
use brief_core::section::SectionStatus;
use brief_core::{Clock, Report, ReportId, SectionKind};
use brief_storage::ReportStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);
pub const DEFAULT_WAIT_BUDGET: Duration = Duration::from_secs(90);

/// Tuning for the composite section's prerequisite wait.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// How often the report is re-read while waiting on prerequisites
    pub poll_interval: Duration,
    /// Maximum total time to wait before abandoning the composite run
    pub wait_budget: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self { poll_interval: DEFAULT_POLL_INTERVAL, wait_budget: DEFAULT_WAIT_BUDGET }
    }
}

impl OrchestratorConfig {
    brief_core::setters! {
        set {
            poll_interval: Duration,
            wait_budget: Duration,
        }
    }
}

/// Disposition of the composite section within one `generate_all` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeOutcome {
    /// The composite section was not in the run set
    NotRequested,
    /// Prerequisites resolved within budget and the composite section ran
    /// (successfully or not — a generation failure shows up in `failures`)
    Ran,
    /// The wait budget expired with a prerequisite still running; the
    /// composite run was abandoned for this call and may be retried later
    TimedOut { waited_ms: u64 },
}

/// Result of one `generate_all` call: the final report snapshot plus what
/// happened to the composite section and which sections failed.
#[derive(Debug)]
pub struct GenerateReport {
    pub report: Report,
    pub composite: CompositeOutcome,
    pub failures: Vec<(SectionKind, String)>,
}

/// Sections to run: all of them, or only those not already complete.
pub fn run_set(report: &Report, only_missing: bool) -> Vec<SectionKind> {
    SectionKind::ALL
        .into_iter()
        .filter(|k| !only_missing || report.section_status(*k) != SectionStatus::Complete)
        .collect()
}

pub struct Orchestrator<C: Clock> {
    runner: Arc<SectionRunner<C>>,
    store: Arc<dyn ReportStore>,
    source: Arc<dyn SourceProvider>,
    config: OrchestratorConfig,
}

impl<C: Clock> Orchestrator<C> {
    pub fn new(
        runner: Arc<SectionRunner<C>>,
        store: Arc<dyn ReportStore>,
        source: Arc<dyn SourceProvider>,
        config: OrchestratorConfig,
    ) -> Self {
        Self { runner, store, source, config }
    }

    /// Generate every section in the run set, prerequisites first.
    ///
    /// Independent sections run concurrently; one failure never cancels its
    /// siblings. The composite section runs only after its prerequisites are
    /// terminal (a failed prerequisite counts as resolved), subject to the
    /// wait budget. A cold report queues everything in this same call.
    pub async fn generate_all(
        &self,
        report_id: &ReportId,
        only_missing: bool,
    ) -> Result<GenerateReport, EngineError> {
        let report = self.store.get(report_id)?;
        let fingerprint = self.source.source_fingerprint(&report);
        let set = run_set(&report, only_missing);
        let run_composite = set.iter().any(|k| k.is_composite());
        tracing::info!(
            report = %report_id,
            sections = set.len(),
            only_missing,
            "generating sections"
        );

        let mut failures = Vec::new();
        let mut tasks = JoinSet::new();
        for kind in set.into_iter().filter(|k| !k.is_composite()) {
            let runner = Arc::clone(&self.runner);
            let id = report_id.clone();
            let fp = fingerprint.clone();
            tasks.spawn(async move { (kind, runner.run(&id, kind, false, &fp).await) });
        }
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Ok(_))) => {}
                // Already persisted and logged by the runner; isolate it.
                Ok((kind, Err(EngineError::Generation { message, .. }))) => {
                    failures.push((kind, message));
                }
                // Store-level failure: abort the call.
                Ok((_, Err(err))) => return Err(err),
                Err(join_err) => {
                    tracing::error!(report = %report_id, error = %join_err, "section task aborted");
                }
            }
        }

        let composite = if run_composite {
            match self.generate_composite(report_id, &fingerprint).await {
                Ok(outcome) => outcome,
                Err(EngineError::Generation { section, message }) => {
                    failures.push((section, message));
                    CompositeOutcome::Ran
                }
                Err(err) => return Err(err),
            }
        } else {
            CompositeOutcome::NotRequested
        };

        let report = self.store.get(report_id)?;
        Ok(GenerateReport { report, composite, failures })
    }

    /// Run the composite section once its prerequisites are terminal.
    ///
    /// Public so a caller can retry the composite alone after a
    /// `TimedOut` disposition.
    pub async fn generate_composite(
        &self,
        report_id: &ReportId,
        source_fingerprint: &str,
    ) -> Result<CompositeOutcome, EngineError> {
        let kind = SectionKind::Scoring;
        match self.wait_for_prerequisites(report_id, kind).await {
            Ok(()) => {
                self.runner.run(report_id, kind, false, source_fingerprint).await?;
                Ok(CompositeOutcome::Ran)
            }
            Err(EngineError::PrerequisiteTimeout { waited_ms, .. }) => {
                Ok(CompositeOutcome::TimedOut { waited_ms })
            }
            Err(err) => Err(err),
        }
    }

    /// Run a single section outside the dependency rule (manual
    /// regeneration; prerequisites are the caller's responsibility).
    pub async fn generate_one(
        &self,
        report_id: &ReportId,
        kind: SectionKind,
        force: bool,
    ) -> Result<Report, EngineError> {
        let report = self.store.get(report_id)?;
        let fingerprint = self.source.source_fingerprint(&report);
        self.runner.run(report_id, kind, force, &fingerprint).await?;
        Ok(self.store.get(report_id)?)
    }

    /// Bounded poll: re-read the report at the configured interval until
    /// every prerequisite of `kind` is terminal, up to the wait budget.
    /// Waiting stops on timeout; it does not stop any in-flight generation,
    /// which may still complete and write results later.
    async fn wait_for_prerequisites(
        &self,
        report_id: &ReportId,
        kind: SectionKind,
    ) -> Result<(), EngineError> {
        let interval = self.config.poll_interval.max(Duration::from_millis(1));
        let polls = (self.config.wait_budget.as_millis() / interval.as_millis()) as u32;

        let mut report = self.store.get(report_id)?;
        let mut waited = Duration::ZERO;
        for _ in 0..polls {
            if report.prerequisites_terminal(kind) {
                return Ok(());
            }
            tokio::time::sleep(interval).await;
            waited += interval;
            report = self.store.get(report_id)?;
        }
        if report.prerequisites_terminal(kind) {
            return Ok(());
        }
        let waited_ms = waited.as_millis() as u64;
        tracing::warn!(
            report = %report_id,
            section = %kind,
            waited_ms,
            "prerequisite wait budget exhausted"
        );
        Err(EngineError::PrerequisiteTimeout { section: kind, waited_ms })
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Report service facade: the read/write endpoint exposed to API callers.
//!
//! Sequencing is owned here, server-side — callers submit a generation
//! request and read status; they never drive dependency ordering themselves.

use crate::error::EngineError;
use crate::gateway::SectionGenerator;
use crate::orchestrator::{self, GenerateReport, Orchestrator, OrchestratorConfig};
use crate::poller::{PollerConfig, StatusPoller};
use crate::runner::SectionRunner;
use crate::source::SourceProvider;
use crate::trigger::{CompletionAction, CompletionTrigger};
use brief_core::{Clock, Report, ReportId, SectionKind};
use brief_storage::ReportStore;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

pub struct ReportService<C: Clock> {
    store: Arc<dyn ReportStore>,
    orchestrator: Orchestrator<C>,
    trigger: Arc<CompletionTrigger<C>>,
    poller_config: PollerConfig,
    pollers: Mutex<HashMap<ReportId, Arc<StatusPoller<C>>>>,
    clock: C,
}

impl<C: Clock> ReportService<C> {
    pub fn new(
        store: Arc<dyn ReportStore>,
        generator: Arc<dyn SectionGenerator>,
        source: Arc<dyn SourceProvider>,
        action: Arc<dyn CompletionAction>,
        clock: C,
        orchestrator_config: OrchestratorConfig,
        poller_config: PollerConfig,
    ) -> Self {
        let runner =
            Arc::new(SectionRunner::new(Arc::clone(&store), generator, clock.clone()));
        let orchestrator =
            Orchestrator::new(runner, Arc::clone(&store), source, orchestrator_config);
        let trigger =
            Arc::new(CompletionTrigger::new(Arc::clone(&store), action, clock.clone()));
        Self {
            store,
            orchestrator,
            trigger,
            poller_config,
            pollers: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Create the report for an opportunity, or reuse the existing one.
    pub fn init_report(
        &self,
        project_id: &str,
        opportunity_id: &str,
    ) -> Result<Report, EngineError> {
        if let Some(existing) = self.store.find_by_opportunity(opportunity_id)? {
            tracing::debug!(
                report = %existing.id,
                opportunity = opportunity_id,
                "reusing existing report"
            );
            return Ok(existing);
        }
        let report = Report::new(project_id, opportunity_id, self.clock.epoch_ms());
        self.store.insert(report.clone())?;
        tracing::info!(
            report = %report.id,
            project = project_id,
            opportunity = opportunity_id,
            "report initialized"
        );
        Ok(report)
    }

    pub fn get_report(&self, report_id: &ReportId) -> Result<Report, EngineError> {
        Ok(self.store.get(report_id)?)
    }

    /// Manually (re)generate one section outside the dependency rule.
    pub async fn generate_section(
        &self,
        report_id: &ReportId,
        kind: SectionKind,
        force: bool,
    ) -> Result<Report, EngineError> {
        let poller = self.poller(report_id);
        poller.mark_busy([kind]);
        poller.ensure_started();
        let result = self.orchestrator.generate_one(report_id, kind, force).await;
        self.settle_busy(report_id, &poller);
        result
    }

    /// Generate the full section set, dependency-ordered.
    pub async fn generate_all(
        &self,
        report_id: &ReportId,
        only_missing: bool,
    ) -> Result<GenerateReport, EngineError> {
        let report = self.store.get(report_id)?;
        let set = orchestrator::run_set(&report, only_missing);
        let poller = self.poller(report_id);
        poller.mark_busy(set);
        poller.ensure_started();
        let result = self.orchestrator.generate_all(report_id, only_missing).await;
        self.settle_busy(report_id, &poller);
        result
    }

    /// After a submission returns, sections still `Pending` never started
    /// (abandoned composite run, early error) and are dropped from the
    /// poller's busy set so its loop can finish.
    fn settle_busy(&self, report_id: &ReportId, poller: &StatusPoller<C>) {
        if let Ok(report) = self.store.get(report_id) {
            poller.unmark_unstarted(&report);
        }
    }

    /// Manual recovery after a failed completion action.
    pub fn reset_completion_attempt(&self, report_id: &ReportId) -> Result<Report, EngineError> {
        self.trigger.reset_attempt(report_id)
    }

    /// The per-report poller, created on first use. Entries whose loop has
    /// run and exited are swept here so the registry does not grow with
    /// every report ever polled.
    pub fn poller(&self, report_id: &ReportId) -> Arc<StatusPoller<C>> {
        let mut pollers = self.pollers.lock();
        pollers.retain(|id, poller| id == report_id || !poller.is_finished());
        Arc::clone(pollers.entry(report_id.clone()).or_insert_with(|| {
            Arc::new(StatusPoller::new(
                report_id.clone(),
                Arc::clone(&self.store),
                Arc::clone(&self.trigger),
                self.poller_config.clone(),
            ))
        }))
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Section state machine: decide whether to reuse cached output, run with
//! idempotency guards, and record success or failure.

use crate::error::EngineError;
use crate::gateway::SectionGenerator;
use brief_core::section::SectionStatus;
use brief_core::{section_input_hash, short, Clock, ReportId, SectionKind};
use brief_storage::{ReportStore, SectionPatch, TopPatch};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Result of one `run` call.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Stored payload reused; no gateway call, no status write.
    Cached(serde_json::Value),
    /// Fresh payload from the gateway.
    Generated(serde_json::Value),
}

impl RunOutcome {
    pub fn is_cached(&self) -> bool {
        matches!(self, RunOutcome::Cached(_))
    }

    pub fn into_data(self) -> serde_json::Value {
        match self {
            RunOutcome::Cached(v) | RunOutcome::Generated(v) => v,
        }
    }
}

/// Runs one section's generation attempt against the store.
///
/// A per-(report, section) async mutex serializes duplicate `run` calls so
/// the read-decide-write sequence is safe even when two callers race on the
/// same section; the second caller re-reads and usually cache-hits.
pub struct SectionRunner<C: Clock> {
    store: Arc<dyn ReportStore>,
    generator: Arc<dyn SectionGenerator>,
    clock: C,
    locks: Mutex<HashMap<(ReportId, SectionKind), Arc<tokio::sync::Mutex<()>>>>,
}

impl<C: Clock> SectionRunner<C> {
    pub fn new(
        store: Arc<dyn ReportStore>,
        generator: Arc<dyn SectionGenerator>,
        clock: C,
    ) -> Self {
        Self { store, generator, clock, locks: Mutex::new(HashMap::new()) }
    }

    fn section_lock(
        &self,
        report_id: &ReportId,
        kind: SectionKind,
    ) -> Arc<tokio::sync::Mutex<()>> {
        self.locks.lock().entry((report_id.clone(), kind)).or_default().clone()
    }

    /// Drop the map entry once nobody else holds or awaits this lock, so the
    /// map does not grow with every section ever run.
    fn release_section_lock(
        &self,
        report_id: &ReportId,
        kind: SectionKind,
        lock: &Arc<tokio::sync::Mutex<()>>,
    ) {
        let mut locks = self.locks.lock();
        // Two owners: the map and this caller. Waiters hold their own clone,
        // taken under the same map lock, so the count cannot race to 2.
        if Arc::strong_count(lock) == 2 {
            locks.remove(&(report_id.clone(), kind));
        }
    }

    #[cfg(test)]
    fn lock_count(&self) -> usize {
        self.locks.lock().len()
    }

    /// Run one generation attempt.
    ///
    /// Cache hit (`Complete` + unchanged input hash + `!force`) returns the
    /// stored payload without touching the gateway or the store. Otherwise
    /// the attempt is marked in progress, the gateway is invoked, and the
    /// outcome is persisted before it is returned — state and notification
    /// never diverge.
    pub async fn run(
        &self,
        report_id: &ReportId,
        kind: SectionKind,
        force: bool,
        source_fingerprint: &str,
    ) -> Result<RunOutcome, EngineError> {
        let lock = self.section_lock(report_id, kind);
        let outcome = {
            let _guard = lock.lock().await;
            self.run_locked(report_id, kind, force, source_fingerprint).await
        };
        self.release_section_lock(report_id, kind, &lock);
        outcome
    }

    async fn run_locked(
        &self,
        report_id: &ReportId,
        kind: SectionKind,
        force: bool,
        source_fingerprint: &str,
    ) -> Result<RunOutcome, EngineError> {
        let report = self.store.get(report_id)?;
        // For the composite section the hash also covers prerequisite
        // outputs, so a retried prerequisite invalidates the cached payload.
        let hash = section_input_hash(&report, kind, source_fingerprint);

        if !force {
            if let Some(record) = report.section(kind) {
                if record.status == SectionStatus::Complete && record.matches_hash(&hash) {
                    if let Some(data) = record.current_data() {
                        tracing::debug!(
                            report = %report_id,
                            section = %kind,
                            hash = short(&hash, 12),
                            "cache hit"
                        );
                        return Ok(RunOutcome::Cached(data.clone()));
                    }
                }
            }
        }

        // Mark the attempt started; overwrites any previous terminal state.
        let report = self.store.patch_section(
            report_id,
            kind,
            SectionPatch::new().status(SectionStatus::InProgress).input_hash(hash.clone()),
            self.clock.epoch_ms(),
        )?;
        tracing::info!(
            report = %report_id,
            section = %kind,
            hash = short(&hash, 12),
            force,
            "section generation started"
        );

        match self.generator.generate(&report, kind).await {
            Ok(payload) => {
                self.store.patch_section(
                    report_id,
                    kind,
                    SectionPatch::new()
                        .status(SectionStatus::Complete)
                        .data(payload.clone())
                        .clear_error(),
                    self.clock.epoch_ms(),
                )?;
                if kind.is_composite() {
                    self.record_outcome_fields(report_id, &payload)?;
                }
                tracing::info!(report = %report_id, section = %kind, "section complete");
                Ok(RunOutcome::Generated(payload))
            }
            Err(err) => {
                let message = err.to_string();
                // Persist the failure first, then surface it; stale data is
                // cleared so it is never read as current.
                self.store.patch_section(
                    report_id,
                    kind,
                    SectionPatch::new()
                        .status(SectionStatus::Failed)
                        .error(message.clone())
                        .clear_data(),
                    self.clock.epoch_ms(),
                )?;
                tracing::warn!(
                    report = %report_id,
                    section = %kind,
                    error = %message,
                    "section generation failed"
                );
                Err(EngineError::Generation { section: kind, message })
            }
        }
    }

    /// Lift decision/score out of a completed composite payload into the
    /// report's top-level fields.
    fn record_outcome_fields(
        &self,
        report_id: &ReportId,
        payload: &serde_json::Value,
    ) -> Result<(), EngineError> {
        let mut patch = TopPatch::new();
        if let Some(decision) = payload.get("decision").and_then(serde_json::Value::as_str) {
            patch = patch.decision(decision);
        }
        if let Some(score) = payload.get("score").and_then(serde_json::Value::as_f64) {
            patch = patch.score(score);
        }
        if !patch.is_empty() {
            self.store.patch_top(report_id, patch, self.clock.epoch_ms())?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;

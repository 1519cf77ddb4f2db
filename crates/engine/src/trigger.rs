// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Completion side-effect trigger: a one-time downstream action fired the
//! first time the composite section completes with a decision present.

use crate::error::EngineError;
use async_trait::async_trait;
use brief_core::section::SectionStatus;
use brief_core::{Clock, Report, ReportId, SectionKind};
use brief_storage::{ReportStore, TopPatch};
use std::sync::Arc;
use thiserror::Error;

/// Failure of the downstream action itself.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ActionError(pub String);

/// The one-time downstream action (e.g., create a tracking ticket in an
/// external system). Fired at most once per report.
#[async_trait]
pub trait CompletionAction: Send + Sync {
    async fn fire(&self, report: &Report) -> Result<(), ActionError>;
}

/// Guards the action behind the report's one-shot `ticket_attempted` flag.
///
/// The flag is claimed with a conditional store write *before* the action is
/// invoked, so a crash mid-action cannot cause a duplicate. A failed action
/// leaves the flag set — retry is manual via [`CompletionTrigger::reset_attempt`],
/// never silent.
pub struct CompletionTrigger<C: Clock> {
    store: Arc<dyn ReportStore>,
    action: Arc<dyn CompletionAction>,
    clock: C,
}

impl<C: Clock> CompletionTrigger<C> {
    pub fn new(store: Arc<dyn ReportStore>, action: Arc<dyn CompletionAction>, clock: C) -> Self {
        Self { store, action, clock }
    }

    /// Fire the action if the report just became eligible. Returns true when
    /// the action ran and succeeded.
    pub async fn maybe_fire(&self, report: &Report) -> Result<bool, EngineError> {
        if report.ticket_attempted {
            return Ok(false);
        }
        if report.section_status(SectionKind::Scoring) != SectionStatus::Complete {
            return Ok(false);
        }
        let Some(decision) = report.decision.clone() else {
            return Ok(false);
        };

        // Claim first. The snapshot above may be stale; the conditional
        // write is what actually prevents a double fire.
        if !self.store.claim_completion_attempt(&report.id, self.clock.epoch_ms())? {
            return Ok(false);
        }

        tracing::info!(report = %report.id, decision = %decision, "firing completion action");
        match self.action.fire(report).await {
            Ok(()) => Ok(true),
            Err(err) => {
                tracing::warn!(report = %report.id, error = %err, "completion action failed");
                Err(EngineError::SideEffect(err.to_string()))
            }
        }
    }

    /// Manual recovery: clear the one-shot flag so the next reconciliation
    /// may fire the action again.
    pub fn reset_attempt(&self, report_id: &ReportId) -> Result<Report, EngineError> {
        tracing::info!(report = %report_id, "completion attempt flag reset");
        Ok(self.store.patch_top(
            report_id,
            TopPatch::new().ticket_attempted(false),
            self.clock.epoch_ms(),
        )?)
    }
}

#[cfg(test)]
#[path = "trigger_tests.rs"]
mod tests;

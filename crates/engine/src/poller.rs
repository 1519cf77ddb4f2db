// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status poller/reconciler: re-reads report status on a fixed interval
//! while sections are in flight, reconciles the locally tracked busy set,
//! runs the completion trigger, and stops once nothing is running.

use crate::error::EngineError;
use crate::trigger::CompletionTrigger;
use brief_core::section::SectionStatus;
use brief_core::{Clock, Report, ReportId, SectionKind};
use brief_storage::ReportStore;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(750);

#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self { interval: DEFAULT_TICK_INTERVAL }
    }
}

impl PollerConfig {
    brief_core::setters! {
        set {
            interval: Duration,
        }
    }
}

/// What one reconciliation pass observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    /// No locally tracked section is busy and nothing is running in the
    /// store — there is nothing left to poll for
    pub done: bool,
    /// The completion action fired (successfully) on this tick
    pub fired: bool,
}

struct PollerInner {
    /// Optimistically-busy set, populated at submission time and reconciled
    /// against store status each tick.
    busy: HashSet<SectionKind>,
    task: Option<JoinHandle<()>>,
}

/// Per-report poll loop with an implicit lifecycle: started when a section
/// goes in flight, stops itself once nothing is running. Restart is
/// idempotent — a live loop is never duplicated.
pub struct StatusPoller<C: Clock> {
    report_id: ReportId,
    store: Arc<dyn ReportStore>,
    trigger: Arc<CompletionTrigger<C>>,
    config: PollerConfig,
    inner: Mutex<PollerInner>,
}

impl<C: Clock> StatusPoller<C> {
    pub fn new(
        report_id: ReportId,
        store: Arc<dyn ReportStore>,
        trigger: Arc<CompletionTrigger<C>>,
        config: PollerConfig,
    ) -> Self {
        Self {
            report_id,
            store,
            trigger,
            config,
            inner: Mutex::new(PollerInner { busy: HashSet::new(), task: None }),
        }
    }

    /// Record sections as in flight before their generation is submitted.
    pub fn mark_busy(&self, kinds: impl IntoIterator<Item = SectionKind>) {
        self.inner.lock().busy.extend(kinds);
    }

    /// Drop busy entries for sections that never started. Called once a
    /// submission has returned: anything still `Pending` at that point is
    /// not coming (e.g. a composite run abandoned on prerequisite timeout)
    /// and must not pin the loop open.
    pub fn unmark_unstarted(&self, report: &Report) {
        self.inner
            .lock()
            .busy
            .retain(|k| report.section_status(*k) != SectionStatus::Pending);
    }

    pub fn busy_sections(&self) -> Vec<SectionKind> {
        self.inner.lock().busy.iter().copied().collect()
    }

    pub fn is_polling(&self) -> bool {
        self.inner.lock().task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// True once the poll loop was started and has exited.
    pub fn is_finished(&self) -> bool {
        self.inner.lock().task.as_ref().is_some_and(|t| t.is_finished())
    }

    /// One reconciliation pass: re-fetch the report, drop terminal sections
    /// from the busy set, pick up store-side in-progress sections, and give
    /// the completion trigger a chance to fire.
    pub async fn tick(&self) -> Result<TickOutcome, EngineError> {
        let report = self.store.get(&self.report_id)?;
        {
            let mut inner = self.inner.lock();
            inner.busy.retain(|k| !report.section_status(*k).is_terminal());
            inner.busy.extend(report.in_progress_sections());
        }

        let fired = match self.trigger.maybe_fire(&report).await {
            Ok(fired) => fired,
            // A side-effect failure never blocks reconciliation; the report
            // itself generated successfully.
            Err(err) => {
                tracing::warn!(report = %self.report_id, error = %err, "completion trigger error");
                false
            }
        };

        // Done when nothing is tracked busy and nothing is running in the
        // store. Sections that were never requested stay Pending forever;
        // they must not keep the loop alive.
        let busy_empty = self.inner.lock().busy.is_empty();
        let done = busy_empty && report.in_progress_sections().is_empty();
        Ok(TickOutcome { done, fired })
    }

    /// Start the poll loop if it is not already running. Safe to call on
    /// every submission.
    pub fn ensure_started(self: &Arc<Self>) {
        let mut inner = self.inner.lock();
        if inner.task.as_ref().is_some_and(|t| !t.is_finished()) {
            return;
        }
        let poller = Arc::clone(self);
        let interval = self.config.interval;
        tracing::debug!(report = %self.report_id, "status polling started");
        inner.task = Some(tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                match poller.tick().await {
                    Ok(outcome) if outcome.done => {
                        tracing::debug!(report = %poller.report_id, "nothing running, polling stopped");
                        break;
                    }
                    Ok(_) => {}
                    Err(err) => {
                        tracing::warn!(report = %poller.report_id, error = %err, "poll tick failed");
                        break;
                    }
                }
            }
        }));
    }

    /// Abort the poll loop, if any.
    pub fn stop(&self) {
        if let Some(task) = self.inner.lock().task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
#[path = "poller_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The report aggregate: one multi-section brief per opportunity.

use crate::section::{SectionKind, SectionRecord, SectionStatus};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a report instance.
    ///
    /// One report exists per (opportunity, analysis cycle); it is keyed by
    /// this ID in the store and referenced in logs and API calls.
    pub struct ReportId("rpt-");
}

/// Overall status derived from the section set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// At least one section has never run and nothing is running
    Pending,
    /// At least one section is running
    InProgress,
    /// Every section completed
    Complete,
    /// Every section is terminal and at least one failed
    Failed,
}

crate::simple_display! {
    ReportStatus {
        Pending => "pending",
        InProgress => "in_progress",
        Complete => "complete",
        Failed => "failed",
    }
}

/// A generated brief for one business opportunity.
///
/// Created once per opportunity (or reused when one already exists), mutated
/// by every section completion, never deleted by this subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    /// Owning project reference
    pub project_id: String,
    pub opportunity_id: String,
    /// All seven sections, present from creation
    pub sections: IndexMap<SectionKind, SectionRecord>,
    /// Go/no-go decision, populated only after Scoring completes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<String>,
    /// Numeric score, populated only after Scoring completes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// One-shot flag: the downstream completion action has been attempted.
    /// Set before the action fires so a crash mid-action cannot duplicate it.
    #[serde(default)]
    pub ticket_attempted: bool,
    #[serde(default)]
    pub updated_at_ms: u64,
}

impl Report {
    /// Create a fresh report with every section `Pending`.
    pub fn new(
        project_id: impl Into<String>,
        opportunity_id: impl Into<String>,
        epoch_ms: u64,
    ) -> Self {
        Self {
            id: ReportId::new(),
            project_id: project_id.into(),
            opportunity_id: opportunity_id.into(),
            sections: Self::seed_sections(),
            decision: None,
            score: None,
            ticket_attempted: false,
            updated_at_ms: epoch_ms,
        }
    }

    /// The full section map in presentation order, all `Pending`.
    pub fn seed_sections() -> IndexMap<SectionKind, SectionRecord> {
        SectionKind::ALL
            .into_iter()
            .map(|k| (k, SectionRecord::default()))
            .collect()
    }

    pub fn section(&self, kind: SectionKind) -> Option<&SectionRecord> {
        self.sections.get(&kind)
    }

    /// Status of one section; missing entries (legacy data) read as Pending.
    pub fn section_status(&self, kind: SectionKind) -> SectionStatus {
        self.sections.get(&kind).map_or(SectionStatus::Pending, |s| s.status)
    }

    /// True when every section is Complete or Failed.
    pub fn all_terminal(&self) -> bool {
        SectionKind::ALL.into_iter().all(|k| self.section_status(k).is_terminal())
    }

    /// Sections currently marked running in the store.
    pub fn in_progress_sections(&self) -> Vec<SectionKind> {
        SectionKind::ALL
            .into_iter()
            .filter(|k| self.section_status(*k) == SectionStatus::InProgress)
            .collect()
    }

    /// True when every prerequisite of `kind` is terminal.
    ///
    /// A failed prerequisite still counts as resolved — the composite section
    /// must not be permanently blocked by one failed dependency.
    pub fn prerequisites_terminal(&self, kind: SectionKind) -> bool {
        kind.prerequisites().iter().all(|p| self.section_status(*p).is_terminal())
    }

    pub fn overall_status(&self) -> ReportStatus {
        let statuses: Vec<SectionStatus> =
            SectionKind::ALL.into_iter().map(|k| self.section_status(k)).collect();
        if statuses.iter().any(|s| *s == SectionStatus::InProgress) {
            ReportStatus::InProgress
        } else if statuses.iter().all(|s| s.is_terminal()) {
            if statuses.iter().any(|s| *s == SectionStatus::Failed) {
                ReportStatus::Failed
            } else {
                ReportStatus::Complete
            }
        } else {
            ReportStatus::Pending
        }
    }
}

crate::builder! {
    pub struct ReportBuilder => Report {
        into {
            id: ReportId = ReportId::new(),
            project_id: String = "proj-1",
            opportunity_id: String = "opp-1",
        }
        set {
            sections: IndexMap<SectionKind, SectionRecord> = Report::seed_sections(),
            ticket_attempted: bool = false,
            updated_at_ms: u64 = 0,
        }
        option {
            decision: String = None,
            score: f64 = None,
        }
    }
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Section kinds, the section state machine, and per-section records.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// The fixed set of brief sections.
///
/// The set is closed by design: the orchestrator supports exactly one report
/// shape. `Scoring` is the composite section; it requires the four
/// prerequisite sections in [`SectionKind::prerequisites`] to reach a
/// terminal state before it can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Summary,
    Deadlines,
    Contacts,
    Requirements,
    Risks,
    PastPerformance,
    Scoring,
}

impl SectionKind {
    /// Every section, in presentation order.
    pub const ALL: [SectionKind; 7] = [
        SectionKind::Summary,
        SectionKind::Deadlines,
        SectionKind::Contacts,
        SectionKind::Requirements,
        SectionKind::Risks,
        SectionKind::PastPerformance,
        SectionKind::Scoring,
    ];

    /// Prerequisites of the composite Scoring section.
    pub const SCORING_PREREQS: [SectionKind; 4] = [
        SectionKind::Summary,
        SectionKind::Requirements,
        SectionKind::Risks,
        SectionKind::PastPerformance,
    ];

    /// True for the one section whose generation depends on other sections.
    pub fn is_composite(self) -> bool {
        matches!(self, SectionKind::Scoring)
    }

    /// Sections that must be terminal before this section may run.
    /// Empty for independent sections.
    pub fn prerequisites(self) -> &'static [SectionKind] {
        if self.is_composite() {
            &Self::SCORING_PREREQS
        } else {
            &[]
        }
    }

    /// All sections with no prerequisites.
    pub fn independent() -> impl Iterator<Item = SectionKind> {
        Self::ALL.into_iter().filter(|k| !k.is_composite())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SectionKind::Summary => "summary",
            SectionKind::Deadlines => "deadlines",
            SectionKind::Contacts => "contacts",
            SectionKind::Requirements => "requirements",
            SectionKind::Risks => "risks",
            SectionKind::PastPerformance => "past_performance",
            SectionKind::Scoring => "scoring",
        }
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when an API caller names a section outside the fixed set.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown section: {0}")]
pub struct UnknownSection(pub String);

impl FromStr for SectionKind {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownSection(s.to_string()))
    }
}

/// Status of one section's generation.
///
/// `Complete` and `Failed` are terminal only in the sense of "not currently
/// running"; a fresh generation attempt moves either back to `InProgress`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    /// Never run
    Pending,
    /// A generation attempt is underway
    InProgress,
    /// Last attempt succeeded; data is current
    Complete,
    /// Last attempt failed; error is current, data is cleared
    Failed,
}

impl SectionStatus {
    /// "Not currently running" — Complete or Failed, but not Pending.
    pub fn is_terminal(self) -> bool {
        matches!(self, SectionStatus::Complete | SectionStatus::Failed)
    }
}

crate::simple_display! {
    SectionStatus {
        Pending => "pending",
        InProgress => "in_progress",
        Complete => "complete",
        Failed => "failed",
    }
}

/// Stored state of one section within a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionRecord {
    pub status: SectionStatus,
    /// Input hash of the attempt that produced the current data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_hash: Option<String>,
    /// Generated payload, opaque to the orchestrator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// Error message from the last failed attempt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub updated_at_ms: u64,
}

impl Default for SectionRecord {
    fn default() -> Self {
        Self {
            status: SectionStatus::Pending,
            input_hash: None,
            data: None,
            error: None,
            updated_at_ms: 0,
        }
    }
}

impl SectionRecord {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// The payload, only when it is trustworthy (status Complete).
    pub fn current_data(&self) -> Option<&serde_json::Value> {
        if self.status == SectionStatus::Complete {
            self.data.as_ref()
        } else {
            None
        }
    }

    /// True when the stored hash equals `hash` (a prior attempt used the
    /// same inputs).
    pub fn matches_hash(&self, hash: &str) -> bool {
        self.input_hash.as_deref() == Some(hash)
    }
}

#[cfg(test)]
#[path = "section_tests.rs"]
mod tests;

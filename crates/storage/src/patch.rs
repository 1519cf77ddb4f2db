// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Field-granular patches for section and top-level report fields.
//!
//! Only the fields named on a patch are written; everything else is left
//! untouched (last-write-wins per field). Clearing a field is explicit so a
//! patch can distinguish "leave alone" from "set to none".

use brief_core::section::{SectionRecord, SectionStatus};
use brief_core::Report;

/// Partial update of one section record.
#[derive(Debug, Default, Clone)]
pub struct SectionPatch {
    status: Option<SectionStatus>,
    input_hash: Option<String>,
    data: Option<serde_json::Value>,
    error: Option<String>,
    clear_data: bool,
    clear_error: bool,
}

impl SectionPatch {
    pub fn new() -> Self {
        Self::default()
    }

    brief_core::setters! {
        option {
            status: SectionStatus,
            input_hash: String,
            data: serde_json::Value,
            error: String,
        }
    }

    /// Drop the stored payload so stale output is never read as current.
    pub fn clear_data(mut self) -> Self {
        self.clear_data = true;
        self
    }

    /// Drop a stale error message after a successful attempt.
    pub fn clear_error(mut self) -> Self {
        self.clear_error = true;
        self
    }

    pub fn apply(&self, record: &mut SectionRecord, epoch_ms: u64) {
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(hash) = &self.input_hash {
            record.input_hash = Some(hash.clone());
        }
        if let Some(data) = &self.data {
            record.data = Some(data.clone());
        }
        if self.clear_data {
            record.data = None;
        }
        if let Some(error) = &self.error {
            record.error = Some(error.clone());
        }
        if self.clear_error {
            record.error = None;
        }
        record.updated_at_ms = epoch_ms;
    }
}

/// Partial update of top-level report fields.
#[derive(Debug, Default, Clone)]
pub struct TopPatch {
    decision: Option<String>,
    score: Option<f64>,
    ticket_attempted: Option<bool>,
}

impl TopPatch {
    pub fn new() -> Self {
        Self::default()
    }

    brief_core::setters! {
        option {
            decision: String,
            score: f64,
            ticket_attempted: bool,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.decision.is_none() && self.score.is_none() && self.ticket_attempted.is_none()
    }

    pub fn apply(&self, report: &mut Report, epoch_ms: u64) {
        if let Some(decision) = &self.decision {
            report.decision = Some(decision.clone());
        }
        if let Some(score) = self.score {
            report.score = Some(score);
        }
        if let Some(attempted) = self.ticket_attempted {
            report.ticket_attempted = attempted;
        }
        report.updated_at_ms = epoch_ms;
    }
}

#[cfg(test)]
#[path = "patch_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory report store.

use crate::error::StoreError;
use crate::patch::{SectionPatch, TopPatch};
use crate::store::{self, ReportStore};
use brief_core::{Report, ReportId, SectionKind};
use parking_lot::Mutex;
use std::collections::HashMap;

/// Keyed in-memory store, suitable for tests and embedded use.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<HashMap<String, Report>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReportStore for MemoryStore {
    fn get(&self, id: &ReportId) -> Result<Report, StoreError> {
        store::get_in(&self.inner.lock(), id)
    }

    fn find_by_opportunity(&self, opportunity_id: &str) -> Result<Option<Report>, StoreError> {
        Ok(self.inner.lock().values().find(|r| r.opportunity_id == opportunity_id).cloned())
    }

    fn insert(&self, report: Report) -> Result<(), StoreError> {
        self.inner.lock().insert(report.id.to_string(), report);
        Ok(())
    }

    fn patch_section(
        &self,
        id: &ReportId,
        kind: SectionKind,
        patch: SectionPatch,
        epoch_ms: u64,
    ) -> Result<Report, StoreError> {
        store::patch_section_in(&mut self.inner.lock(), id, kind, &patch, epoch_ms)
    }

    fn patch_top(
        &self,
        id: &ReportId,
        patch: TopPatch,
        epoch_ms: u64,
    ) -> Result<Report, StoreError> {
        store::patch_top_in(&mut self.inner.lock(), id, &patch, epoch_ms)
    }

    fn claim_completion_attempt(&self, id: &ReportId, epoch_ms: u64) -> Result<bool, StoreError> {
        store::claim_completion_in(&mut self.inner.lock(), id, epoch_ms)
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;

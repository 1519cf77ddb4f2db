// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot-backed report store.
//!
//! The full report map is rewritten to a JSON snapshot file after every
//! mutation and loaded on open. Reports are small (one per opportunity) and
//! mutations are section-completion-paced, so snapshot-on-write is cheap
//! enough; there is no write-ahead log.

use crate::error::StoreError;
use crate::patch::{SectionPatch, TopPatch};
use crate::store::{self, ReportStore};
use brief_core::{Report, ReportId, SectionKind};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Current snapshot schema version
pub const CURRENT_SNAPSHOT_VERSION: u32 = 1;

/// On-disk snapshot layout.
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    /// Schema version for migrations
    #[serde(rename = "v")]
    version: u32,
    reports: HashMap<String, Report>,
}

/// Report store persisted as a single JSON snapshot file.
pub struct SnapshotStore {
    path: PathBuf,
    inner: Mutex<HashMap<String, Report>>,
}

impl SnapshotStore {
    /// Open the store, loading an existing snapshot when present.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let reports = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            let snapshot: Snapshot = serde_json::from_str(&raw)?;
            tracing::info!(
                path = %path.display(),
                version = snapshot.version,
                reports = snapshot.reports.len(),
                "loaded report snapshot"
            );
            snapshot.reports
        } else {
            HashMap::new()
        };
        Ok(Self { path, inner: Mutex::new(reports) })
    }

    /// Write the snapshot to a temp file, then rename into place so a crash
    /// mid-write never leaves a truncated snapshot.
    fn persist(&self, reports: &HashMap<String, Report>) -> Result<(), StoreError> {
        let snapshot =
            Snapshot { version: CURRENT_SNAPSHOT_VERSION, reports: reports.clone() };
        let raw = serde_json::to_string(&snapshot)?;
        let tmp = tmp_path(&self.path);
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), reports = reports.len(), "snapshot saved");
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    path.with_extension("tmp")
}

impl ReportStore for SnapshotStore {
    fn get(&self, id: &ReportId) -> Result<Report, StoreError> {
        store::get_in(&self.inner.lock(), id)
    }

    fn find_by_opportunity(&self, opportunity_id: &str) -> Result<Option<Report>, StoreError> {
        Ok(self.inner.lock().values().find(|r| r.opportunity_id == opportunity_id).cloned())
    }

    fn insert(&self, report: Report) -> Result<(), StoreError> {
        let mut reports = self.inner.lock();
        reports.insert(report.id.to_string(), report);
        self.persist(&reports)
    }

    fn patch_section(
        &self,
        id: &ReportId,
        kind: SectionKind,
        patch: SectionPatch,
        epoch_ms: u64,
    ) -> Result<Report, StoreError> {
        let mut reports = self.inner.lock();
        let report = store::patch_section_in(&mut reports, id, kind, &patch, epoch_ms)?;
        self.persist(&reports)?;
        Ok(report)
    }

    fn patch_top(
        &self,
        id: &ReportId,
        patch: TopPatch,
        epoch_ms: u64,
    ) -> Result<Report, StoreError> {
        let mut reports = self.inner.lock();
        let report = store::patch_top_in(&mut reports, id, &patch, epoch_ms)?;
        self.persist(&reports)?;
        Ok(report)
    }

    fn claim_completion_attempt(&self, id: &ReportId, epoch_ms: u64) -> Result<bool, StoreError> {
        let mut reports = self.inner.lock();
        let claimed = store::claim_completion_in(&mut reports, id, epoch_ms)?;
        if claimed {
            self.persist(&reports)?;
        }
        Ok(claimed)
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;

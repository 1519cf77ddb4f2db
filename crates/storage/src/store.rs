// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `ReportStore` trait and shared keyed-map mutation helpers.

use crate::error::StoreError;
use crate::patch::{SectionPatch, TopPatch};
use brief_core::{Report, ReportId, SectionKind};
use std::collections::HashMap;

/// Durable keyed storage for one report's per-section status/data and
/// top-level fields.
///
/// Timestamps are supplied by the caller so the store stays pure data access.
pub trait ReportStore: Send + Sync {
    fn get(&self, id: &ReportId) -> Result<Report, StoreError>;

    /// Look up the existing report for an opportunity, if any.
    fn find_by_opportunity(&self, opportunity_id: &str) -> Result<Option<Report>, StoreError>;

    fn insert(&self, report: Report) -> Result<(), StoreError>;

    /// Apply a partial update to one section. Returns the updated report.
    fn patch_section(
        &self,
        id: &ReportId,
        kind: SectionKind,
        patch: SectionPatch,
        epoch_ms: u64,
    ) -> Result<Report, StoreError>;

    /// Apply a partial update to top-level report fields. Returns the
    /// updated report.
    fn patch_top(&self, id: &ReportId, patch: TopPatch, epoch_ms: u64)
        -> Result<Report, StoreError>;

    /// Conditionally set the one-shot completion flag.
    ///
    /// Returns true iff the flag was unset and this call set it. The
    /// check-and-set happens under the store's lock, so concurrent callers
    /// cannot both claim.
    fn claim_completion_attempt(&self, id: &ReportId, epoch_ms: u64) -> Result<bool, StoreError>;
}

// Map-level mutation helpers shared by the store implementations.

pub(crate) fn get_in(map: &HashMap<String, Report>, id: &ReportId) -> Result<Report, StoreError> {
    map.get(id.as_str()).cloned().ok_or_else(|| StoreError::ReportNotFound(id.clone()))
}

pub(crate) fn patch_section_in(
    map: &mut HashMap<String, Report>,
    id: &ReportId,
    kind: SectionKind,
    patch: &SectionPatch,
    epoch_ms: u64,
) -> Result<Report, StoreError> {
    let report =
        map.get_mut(id.as_str()).ok_or_else(|| StoreError::ReportNotFound(id.clone()))?;
    let record = report
        .sections
        .get_mut(&kind)
        .ok_or_else(|| StoreError::SectionNotFound { report: id.clone(), section: kind })?;
    patch.apply(record, epoch_ms);
    report.updated_at_ms = epoch_ms;
    Ok(report.clone())
}

pub(crate) fn patch_top_in(
    map: &mut HashMap<String, Report>,
    id: &ReportId,
    patch: &TopPatch,
    epoch_ms: u64,
) -> Result<Report, StoreError> {
    let report =
        map.get_mut(id.as_str()).ok_or_else(|| StoreError::ReportNotFound(id.clone()))?;
    patch.apply(report, epoch_ms);
    Ok(report.clone())
}

pub(crate) fn claim_completion_in(
    map: &mut HashMap<String, Report>,
    id: &ReportId,
    epoch_ms: u64,
) -> Result<bool, StoreError> {
    let report =
        map.get_mut(id.as_str()).ok_or_else(|| StoreError::ReportNotFound(id.clone()))?;
    if report.ticket_attempted {
        return Ok(false);
    }
    report.ticket_attempted = true;
    report.updated_at_ms = epoch_ms;
    Ok(true)
}

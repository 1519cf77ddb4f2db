// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine error taxonomy.
//!
//! Section-level failures are local to the section's state; orchestrator
//! failures abort the current call. Every failure is persisted before it is
//! surfaced, so a client re-reading the report sees the same state that was
//! reported synchronously.

use brief_core::{ReportId, SectionKind};
use brief_storage::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// No report exists for the given id; distinct from a generation failure.
    #[error("report not initialized: {0}")]
    NotInitialized(ReportId),

    /// The section's computation failed; recorded as FAILED before surfacing.
    #[error("section {section} generation failed: {message}")]
    Generation { section: SectionKind, message: String },

    /// The composite section's wait budget expired with a prerequisite still
    /// running. Distinct from a prerequisite *failing*, which counts as
    /// resolved.
    #[error("prerequisites for {section} still running after {waited_ms}ms")]
    PrerequisiteTimeout { section: SectionKind, waited_ms: u64 },

    /// The downstream completion action failed after the report itself
    /// succeeded. Never conflated with report-generation failure.
    #[error("completion side effect failed: {0}")]
    SideEffect(String),

    #[error("store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ReportNotFound(id) => EngineError::NotInitialized(id),
            other => EngineError::Store(other),
        }
    }
}

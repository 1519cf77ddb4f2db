// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Storage error types

use brief_core::{ReportId, SectionKind};
use thiserror::Error;

/// Errors that can occur in store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("report not found: {0}")]
    ReportNotFound(ReportId),
    #[error("section {section} missing on report {report}")]
    SectionNotFound { report: ReportId, section: SectionKind },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

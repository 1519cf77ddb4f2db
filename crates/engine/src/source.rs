// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Document/source provider seam.

use brief_core::Report;

/// Supplies the content fingerprint that determines a section's output —
/// typically assembled from the source document version and the opportunity
/// identity (see [`brief_core::source_fingerprint`]). Read-only dependency.
pub trait SourceProvider: Send + Sync {
    fn source_fingerprint(&self, report: &Report) -> String;
}

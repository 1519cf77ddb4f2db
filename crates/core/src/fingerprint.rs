// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Input hashing for idempotent section generation.
//!
//! The hash covers everything that determines a section's output: the source
//! document fingerprint, the section kind, the owning report, and — for the
//! composite section — its prerequisites' outputs. Identical inputs always
//! yield an identical hash. It is a cache-validity comparison value, not a
//! security token.

use crate::report::Report;
use crate::section::SectionKind;
use sha2::{Digest, Sha256};

/// Each part is length-prefixed before hashing so ("ab", "c") and
/// ("a", "bc") cannot collide.
fn update_framed(hasher: &mut Sha256, part: &str) {
    hasher.update((part.len() as u64).to_le_bytes());
    hasher.update(part.as_bytes());
}

/// Derive the input hash for one section generation attempt.
///
/// Independent sections hash (report id, kind, source fingerprint). The
/// composite section additionally folds in each prerequisite's status and
/// completed payload, so a prerequisite retried to a new result invalidates
/// the composite's cached output.
pub fn section_input_hash(
    report: &Report,
    kind: SectionKind,
    source_fingerprint: &str,
) -> String {
    let mut hasher = Sha256::new();
    update_framed(&mut hasher, report.id.as_str());
    update_framed(&mut hasher, kind.as_str());
    update_framed(&mut hasher, source_fingerprint);
    for prereq in kind.prerequisites() {
        update_framed(&mut hasher, prereq.as_str());
        update_framed(&mut hasher, &report.section_status(*prereq).to_string());
        let payload = report
            .section(*prereq)
            .and_then(|r| r.current_data())
            .map(ToString::to_string)
            .unwrap_or_default();
        update_framed(&mut hasher, &payload);
    }
    format!("{:x}", hasher.finalize())
}

/// Assemble a source fingerprint from the document version and opportunity
/// identity supplied by the document provider.
pub fn source_fingerprint(document_version: &str, opportunity_id: &str) -> String {
    format!("{}#{}", document_version, opportunity_id)
}

#[cfg(test)]
#[path = "fingerprint_tests.rs"]
mod tests;

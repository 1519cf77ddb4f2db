// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::section::SectionStatus;
use proptest::prelude::*;
use serde_json::json;

fn report(id: &str) -> Report {
    Report::builder().id(id).build()
}

fn set_section(
    report: &mut Report,
    kind: SectionKind,
    status: SectionStatus,
    data: Option<serde_json::Value>,
) {
    let record = report.sections.get_mut(&kind).unwrap();
    record.status = status;
    record.data = data;
}

#[test]
fn identical_inputs_identical_hash() {
    let r = report("rpt-fixed");
    let a = section_input_hash(&r, SectionKind::Summary, "doc-v1#opp-1");
    let b = section_input_hash(&r, SectionKind::Summary, "doc-v1#opp-1");
    assert_eq!(a, b);
}

#[test]
fn hash_is_hex_sha256() {
    let r = report("rpt-fixed");
    let hash = section_input_hash(&r, SectionKind::Risks, "doc-v1#opp-1");
    assert_eq!(hash.len(), 64);
    assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
}

#[yare::parameterized(
    report_changes  = { "rpt-a", "rpt-b", SectionKind::Summary, SectionKind::Summary, "fp", "fp" },
    section_changes = { "rpt-a", "rpt-a", SectionKind::Summary, SectionKind::Risks, "fp", "fp" },
    source_changes  = { "rpt-a", "rpt-a", SectionKind::Summary, SectionKind::Summary, "doc-v1", "doc-v2" },
)]
fn hash_is_sensitive_to_every_part(
    id_a: &str,
    id_b: &str,
    kind_a: SectionKind,
    kind_b: SectionKind,
    fp_a: &str,
    fp_b: &str,
) {
    let a = section_input_hash(&report(id_a), kind_a, fp_a);
    let b = section_input_hash(&report(id_b), kind_b, fp_b);
    assert_ne!(a, b);
}

#[test]
fn framing_prevents_boundary_collisions() {
    // Without length prefixes these would hash the same byte stream
    let a = section_input_hash(&report("rpt-ab"), SectionKind::Summary, "c");
    let b = section_input_hash(&report("rpt-a"), SectionKind::Summary, "bc");
    assert_ne!(a, b);
}

#[test]
fn composite_hash_tracks_prerequisite_output() {
    let mut r = report("rpt-1");
    let fresh = section_input_hash(&r, SectionKind::Scoring, "fp");

    set_section(&mut r, SectionKind::Risks, SectionStatus::Complete, Some(json!({"t": "v1"})));
    let v1 = section_input_hash(&r, SectionKind::Scoring, "fp");
    assert_ne!(fresh, v1);

    set_section(&mut r, SectionKind::Risks, SectionStatus::Complete, Some(json!({"t": "v2"})));
    let v2 = section_input_hash(&r, SectionKind::Scoring, "fp");
    assert_ne!(v1, v2);
}

#[test]
fn prerequisite_recovery_changes_composite_hash() {
    let mut r = report("rpt-1");
    set_section(&mut r, SectionKind::Risks, SectionStatus::Failed, None);
    let failed = section_input_hash(&r, SectionKind::Scoring, "fp");

    set_section(&mut r, SectionKind::Risks, SectionStatus::Complete, Some(json!({"t": "v1"})));
    let recovered = section_input_hash(&r, SectionKind::Scoring, "fp");
    assert_ne!(failed, recovered);
}

#[test]
fn non_composite_hash_ignores_sibling_state() {
    let mut r = report("rpt-1");
    let before = section_input_hash(&r, SectionKind::Summary, "fp");
    set_section(&mut r, SectionKind::Risks, SectionStatus::Complete, Some(json!({"t": "v1"})));
    let after = section_input_hash(&r, SectionKind::Summary, "fp");
    assert_eq!(before, after);
}

#[test]
fn incomplete_prerequisite_data_is_not_current() {
    // Stale data on a non-Complete record must not feed the composite hash
    let mut r = report("rpt-1");
    set_section(&mut r, SectionKind::Risks, SectionStatus::Failed, Some(json!({"t": "v1"})));
    let a = section_input_hash(&r, SectionKind::Scoring, "fp");
    set_section(&mut r, SectionKind::Risks, SectionStatus::Failed, Some(json!({"t": "v2"})));
    let b = section_input_hash(&r, SectionKind::Scoring, "fp");
    assert_eq!(a, b);
}

#[test]
fn source_fingerprint_combines_version_and_opportunity() {
    assert_eq!(source_fingerprint("doc-v3", "opp-9"), "doc-v3#opp-9");
}

proptest! {
    #[test]
    fn hash_deterministic(id in "[a-z0-9-]{1,32}", fp in ".{0,64}") {
        let r = Report::builder().id(id).build();
        let a = section_input_hash(&r, SectionKind::Scoring, &fp);
        let b = section_input_hash(&r, SectionKind::Scoring, &fp);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn hash_changes_with_source(id in "[a-z0-9-]{1,32}", fp in "[a-z]{1,32}") {
        let r = Report::builder().id(id).build();
        let a = section_input_hash(&r, SectionKind::Scoring, &fp);
        let b = section_input_hash(&r, SectionKind::Scoring, &format!("{}!", fp));
        prop_assert_ne!(a, b);
    }
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::section::SectionStatus;

fn with_status(report: &mut Report, kind: SectionKind, status: SectionStatus) {
    if let Some(record) = report.sections.get_mut(&kind) {
        record.status = status;
    }
}

#[test]
fn new_report_seeds_all_sections_pending() {
    let report = Report::new("proj-1", "opp-1", 1_000);
    assert_eq!(report.sections.len(), SectionKind::ALL.len());
    for kind in SectionKind::ALL {
        assert_eq!(report.section_status(kind), SectionStatus::Pending);
    }
    assert!(report.decision.is_none());
    assert!(report.score.is_none());
    assert!(!report.ticket_attempted);
    assert_eq!(report.updated_at_ms, 1_000);
}

#[test]
fn section_order_is_stable() {
    let report = Report::builder().build();
    let kinds: Vec<SectionKind> = report.sections.keys().copied().collect();
    assert_eq!(kinds, SectionKind::ALL);
}

#[test]
fn missing_section_reads_as_pending() {
    let mut report = Report::builder().build();
    report.sections.shift_remove(&SectionKind::Risks);
    assert_eq!(report.section_status(SectionKind::Risks), SectionStatus::Pending);
    assert!(report.section(SectionKind::Risks).is_none());
}

#[test]
fn all_terminal_requires_every_section() {
    let mut report = Report::builder().build();
    for kind in SectionKind::ALL {
        with_status(&mut report, kind, SectionStatus::Complete);
    }
    assert!(report.all_terminal());

    with_status(&mut report, SectionKind::Scoring, SectionStatus::InProgress);
    assert!(!report.all_terminal());
}

#[test]
fn failed_prerequisite_counts_as_resolved() {
    let mut report = Report::builder().build();
    for kind in SectionKind::SCORING_PREREQS {
        with_status(&mut report, kind, SectionStatus::Complete);
    }
    with_status(&mut report, SectionKind::Risks, SectionStatus::Failed);
    assert!(report.prerequisites_terminal(SectionKind::Scoring));
}

#[test]
fn running_prerequisite_blocks_composite() {
    let mut report = Report::builder().build();
    for kind in SectionKind::SCORING_PREREQS {
        with_status(&mut report, kind, SectionStatus::Complete);
    }
    with_status(&mut report, SectionKind::Requirements, SectionStatus::InProgress);
    assert!(!report.prerequisites_terminal(SectionKind::Scoring));
}

#[test]
fn independent_sections_have_trivially_terminal_prerequisites() {
    let report = Report::builder().build();
    for kind in SectionKind::independent() {
        assert!(report.prerequisites_terminal(kind));
    }
}

#[test]
fn in_progress_sections_lists_running_only() {
    let mut report = Report::builder().build();
    with_status(&mut report, SectionKind::Summary, SectionStatus::InProgress);
    with_status(&mut report, SectionKind::Risks, SectionStatus::Complete);
    assert_eq!(report.in_progress_sections(), vec![SectionKind::Summary]);
}

#[yare::parameterized(
    fresh        = { &[], ReportStatus::Pending },
    one_running  = { &[(SectionKind::Summary, SectionStatus::InProgress)], ReportStatus::InProgress },
    mixed_idle   = { &[(SectionKind::Summary, SectionStatus::Complete)], ReportStatus::Pending },
)]
fn overall_status_partial(changes: &[(SectionKind, SectionStatus)], expected: ReportStatus) {
    let mut report = Report::builder().build();
    for (kind, status) in changes {
        with_status(&mut report, *kind, *status);
    }
    assert_eq!(report.overall_status(), expected);
}

#[test]
fn overall_status_terminal() {
    let mut report = Report::builder().build();
    for kind in SectionKind::ALL {
        with_status(&mut report, kind, SectionStatus::Complete);
    }
    assert_eq!(report.overall_status(), ReportStatus::Complete);

    with_status(&mut report, SectionKind::Contacts, SectionStatus::Failed);
    assert_eq!(report.overall_status(), ReportStatus::Failed);
}

#[test]
fn report_serde_roundtrip() {
    let report = Report::builder()
        .id("rpt-roundtrip")
        .decision("GO")
        .score(0.82)
        .build();
    let json = serde_json::to_string(&report).unwrap();
    let parsed: Report = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.id, report.id);
    assert_eq!(parsed.decision.as_deref(), Some("GO"));
    assert_eq!(parsed.sections.keys().count(), SectionKind::ALL.len());
}

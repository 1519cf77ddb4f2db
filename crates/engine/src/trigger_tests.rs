// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::FakeAction;
use brief_core::FakeClock;
use brief_storage::{MemoryStore, SectionPatch};

struct Harness {
    store: Arc<MemoryStore>,
    action: Arc<FakeAction>,
    trigger: CompletionTrigger<FakeClock>,
    id: ReportId,
}

fn setup() -> Harness {
    let store = Arc::new(MemoryStore::new());
    let action = Arc::new(FakeAction::new());
    let report = Report::builder().build();
    let id = report.id.clone();
    store.insert(report).unwrap();
    let trigger = CompletionTrigger::new(
        Arc::clone(&store) as Arc<dyn ReportStore>,
        Arc::clone(&action) as Arc<dyn CompletionAction>,
        FakeClock::new(),
    );
    Harness { store, action, trigger, id }
}

/// Put the report into the fire-eligible state: scoring complete, decision set.
fn make_eligible(h: &Harness) -> Report {
    h.store
        .patch_section(
            &h.id,
            SectionKind::Scoring,
            SectionPatch::new().status(SectionStatus::Complete),
            0,
        )
        .unwrap();
    h.store.patch_top(&h.id, TopPatch::new().decision("GO").score(0.82), 0).unwrap()
}

#[tokio::test]
async fn fires_once_across_repeated_reconciliations() {
    let h = setup();
    make_eligible(&h);

    let mut fired = 0;
    for _ in 0..3 {
        let report = h.store.get(&h.id).unwrap();
        if h.trigger.maybe_fire(&report).await.unwrap() {
            fired += 1;
        }
    }

    assert_eq!(fired, 1);
    assert_eq!(h.action.attempts(), 1);
    assert!(h.store.get(&h.id).unwrap().ticket_attempted);
}

#[tokio::test]
async fn does_not_fire_without_a_decision() {
    let h = setup();
    h.store
        .patch_section(
            &h.id,
            SectionKind::Scoring,
            SectionPatch::new().status(SectionStatus::Complete),
            0,
        )
        .unwrap();

    let report = h.store.get(&h.id).unwrap();
    assert!(!h.trigger.maybe_fire(&report).await.unwrap());
    assert_eq!(h.action.attempts(), 0);
}

#[tokio::test]
async fn does_not_fire_until_scoring_completes() {
    let h = setup();
    h.store.patch_top(&h.id, TopPatch::new().decision("GO"), 0).unwrap();

    for status in [SectionStatus::Pending, SectionStatus::InProgress, SectionStatus::Failed] {
        h.store
            .patch_section(&h.id, SectionKind::Scoring, SectionPatch::new().status(status), 0)
            .unwrap();
        let report = h.store.get(&h.id).unwrap();
        assert!(!h.trigger.maybe_fire(&report).await.unwrap());
    }
    assert_eq!(h.action.attempts(), 0);
}

#[tokio::test]
async fn stale_snapshot_cannot_double_fire() {
    let h = setup();
    let stale = make_eligible(&h);

    // Another worker claimed the attempt after our snapshot was taken.
    assert!(h.trigger.maybe_fire(&stale).await.unwrap());
    assert!(!h.trigger.maybe_fire(&stale).await.unwrap());

    assert_eq!(h.action.attempts(), 1);
}

#[tokio::test]
async fn failed_action_leaves_flag_set_and_surfaces_error() {
    let h = setup();
    h.action.set_failing(true);
    let report = make_eligible(&h);

    let err = h.trigger.maybe_fire(&report).await.unwrap_err();
    assert!(matches!(err, EngineError::SideEffect(_)));

    // The claim landed before the action ran; no silent retry follows.
    assert!(h.store.get(&h.id).unwrap().ticket_attempted);
    let report = h.store.get(&h.id).unwrap();
    assert!(!h.trigger.maybe_fire(&report).await.unwrap());
    assert_eq!(h.action.attempts(), 1);
    assert_eq!(h.action.successes(), 0);
}

#[tokio::test]
async fn reset_rearms_the_trigger() {
    let h = setup();
    h.action.set_failing(true);
    let report = make_eligible(&h);
    let _ = h.trigger.maybe_fire(&report).await;

    h.action.set_failing(false);
    let report = h.trigger.reset_attempt(&h.id).unwrap();
    assert!(!report.ticket_attempted);

    assert!(h.trigger.maybe_fire(&report).await.unwrap());
    assert_eq!(h.action.attempts(), 2);
    assert_eq!(h.action.successes(), 1);
}

#[tokio::test]
async fn reset_on_unknown_report_is_a_typed_error() {
    let h = setup();
    let err = h.trigger.reset_attempt(&ReportId::from_string("rpt-missing")).unwrap_err();
    assert!(matches!(err, EngineError::NotInitialized(_)));
}

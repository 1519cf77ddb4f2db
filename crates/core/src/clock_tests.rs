// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn system_clock_is_sane() {
    let clock = SystemClock;
    // Some time after 2020-01-01
    assert!(clock.epoch_ms() > 1_577_836_800_000);
}

#[test]
fn fake_clock_advances() {
    let clock = FakeClock::new();
    let start = clock.epoch_ms();
    clock.advance_ms(1_500);
    assert_eq!(clock.epoch_ms(), start + 1_500);
}

#[test]
fn fake_clock_set_epoch() {
    let clock = FakeClock::new();
    clock.set_epoch_ms(42);
    assert_eq!(clock.epoch_ms(), 42);
}

#[test]
fn fake_clock_clones_share_time() {
    let clock = FakeClock::new();
    let other = clock.clone();
    clock.advance_ms(100);
    assert_eq!(clock.epoch_ms(), other.epoch_ms());
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! brief-core: domain types for the opportunity-brief section orchestrator

pub mod macros;

pub mod clock;
pub mod fingerprint;
pub mod id;
pub mod report;
pub mod section;

pub use clock::{Clock, FakeClock, SystemClock};
pub use fingerprint::{section_input_hash, source_fingerprint};
pub use id::short;
#[cfg(any(test, feature = "test-support"))]
pub use report::ReportBuilder;
pub use report::{Report, ReportId, ReportStatus};
pub use section::{SectionKind, SectionRecord, SectionStatus, UnknownSection};

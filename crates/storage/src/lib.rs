// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! brief-storage: durable keyed storage for report and section state.
//!
//! Pure data access. Patches are field-granular and last-write-wins; no
//! cross-section transactionality — the orchestrator re-reads before each
//! decision point, so staleness between sibling sections is tolerated.

mod error;
mod memory;
mod patch;
mod snapshot;
mod store;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use patch::{SectionPatch, TopPatch};
pub use snapshot::SnapshotStore;
pub use store::ReportStore;

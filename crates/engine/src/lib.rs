// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! brief-engine: the section-generation orchestrator.
//!
//! Owns the section state machine, idempotent re-generation,
//! dependency-ordered sequencing, the bounded prerequisite wait, the status
//! poll/reconcile loop, and the exactly-once completion side effect.
//! Sequencing lives server-side behind [`service::ReportService`]; callers
//! only submit and read status.

pub mod error;
pub mod gateway;
pub mod orchestrator;
pub mod poller;
pub mod runner;
pub mod service;
pub mod source;
pub mod trigger;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use error::EngineError;
pub use gateway::{GenerateError, SectionGenerator};
pub use orchestrator::{
    CompositeOutcome, GenerateReport, Orchestrator, OrchestratorConfig,
};
pub use poller::{PollerConfig, StatusPoller, TickOutcome};
pub use runner::{RunOutcome, SectionRunner};
pub use service::ReportService;
pub use source::SourceProvider;
pub use trigger::{ActionError, CompletionAction, CompletionTrigger};

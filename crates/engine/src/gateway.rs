// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Section generator gateway.
//!
//! The functions that actually compute section content (summarization,
//! scoring heuristics, requirement extraction) live behind this trait. The
//! orchestrator treats them as black-box jobs with a result or a typed
//! failure; they have no side effects beyond their return value.

use async_trait::async_trait;
use brief_core::{Report, SectionKind};
use thiserror::Error;

/// Failure modes of a section computation.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("upstream error: {0}")]
    Upstream(String),
    #[error("generation timed out")]
    Timeout,
}

/// Invokes the opaque, section-specific computation.
///
/// The report snapshot passed in reflects the state at the moment the
/// attempt was marked in progress; composite generators read their
/// prerequisites' completed payloads from it.
#[async_trait]
pub trait SectionGenerator: Send + Sync {
    async fn generate(
        &self,
        report: &Report,
        kind: SectionKind,
    ) -> Result<serde_json::Value, GenerateError>;
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fakes for the engine's external collaborators.

use crate::gateway::{GenerateError, SectionGenerator};
use crate::source::SourceProvider;
use crate::trigger::{ActionError, CompletionAction};
use async_trait::async_trait;
use brief_core::{Report, SectionKind};
use parking_lot::Mutex;
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;

/// Scriptable section generator with per-section results, latency, and call
/// counting.
#[derive(Default)]
pub struct FakeGenerator {
    results: Mutex<HashMap<SectionKind, Result<serde_json::Value, String>>>,
    delays: Mutex<HashMap<SectionKind, Duration>>,
    calls: Mutex<HashMap<SectionKind, u32>>,
}

impl FakeGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn succeed_with(&self, kind: SectionKind, payload: serde_json::Value) {
        self.results.lock().insert(kind, Ok(payload));
    }

    pub fn fail_with(&self, kind: SectionKind, message: impl Into<String>) {
        self.results.lock().insert(kind, Err(message.into()));
    }

    pub fn delay(&self, kind: SectionKind, duration: Duration) {
        self.delays.lock().insert(kind, duration);
    }

    pub fn calls(&self, kind: SectionKind) -> u32 {
        self.calls.lock().get(&kind).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> u32 {
        self.calls.lock().values().sum()
    }

    /// Unscripted sections succeed with a plausible payload; scoring carries
    /// a decision and a score like the real scoring heuristic.
    fn default_payload(kind: SectionKind) -> serde_json::Value {
        if kind.is_composite() {
            json!({"decision": "GO", "score": 0.82, "text": "scoring output"})
        } else {
            json!({"text": format!("{} output", kind)})
        }
    }
}

#[async_trait]
impl SectionGenerator for FakeGenerator {
    async fn generate(
        &self,
        _report: &Report,
        kind: SectionKind,
    ) -> Result<serde_json::Value, GenerateError> {
        *self.calls.lock().entry(kind).or_insert(0) += 1;
        let delay = self.delays.lock().get(&kind).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match self.results.lock().get(&kind) {
            Some(Ok(payload)) => Ok(payload.clone()),
            Some(Err(message)) => Err(GenerateError::Upstream(message.clone())),
            None => Ok(Self::default_payload(kind)),
        }
    }
}

/// Completion action that counts attempts and successes and can be scripted
/// to fail.
#[derive(Default)]
pub struct FakeAction {
    attempts: Mutex<u32>,
    successes: Mutex<u32>,
    failing: Mutex<bool>,
}

impl FakeAction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock() = failing;
    }

    pub fn attempts(&self) -> u32 {
        *self.attempts.lock()
    }

    pub fn successes(&self) -> u32 {
        *self.successes.lock()
    }
}

#[async_trait]
impl CompletionAction for FakeAction {
    async fn fire(&self, _report: &Report) -> Result<(), ActionError> {
        *self.attempts.lock() += 1;
        if *self.failing.lock() {
            return Err(ActionError("ticket endpoint unavailable".to_string()));
        }
        *self.successes.lock() += 1;
        Ok(())
    }
}

/// Source provider returning a settable fingerprint, to simulate document
/// version changes.
pub struct FixedSource {
    fingerprint: Mutex<String>,
}

impl FixedSource {
    pub fn new(fingerprint: impl Into<String>) -> Self {
        Self { fingerprint: Mutex::new(fingerprint.into()) }
    }

    pub fn set(&self, fingerprint: impl Into<String>) {
        *self.fingerprint.lock() = fingerprint.into();
    }
}

impl SourceProvider for FixedSource {
    fn source_fingerprint(&self, _report: &Report) -> String {
        self.fingerprint.lock().clone()
    }
}

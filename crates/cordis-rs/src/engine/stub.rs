//! Deterministic in-process engine for tests and offline use.

use std::sync::atomic::{AtomicUsize, Ordering};

use super::{EngineFuture, ReasoningEngine};
use crate::error::EngineError;
use crate::prompt::PromptDocument;

/// An engine that returns a canned reply (or error) without any I/O.
///
/// Counts invocations so tests can assert the orchestrator never reached the
/// engine on an invalid input.
pub struct StubEngine {
    reply: Result<serde_json::Value, EngineError>,
    invocations: AtomicUsize,
}

impl StubEngine {
    /// An engine that always succeeds with `reply`.
    pub fn returning(reply: serde_json::Value) -> Self {
        Self {
            reply: Ok(reply),
            invocations: AtomicUsize::new(0),
        }
    }

    /// An engine that always fails with `error`.
    pub fn failing(error: EngineError) -> Self {
        Self {
            reply: Err(error),
            invocations: AtomicUsize::new(0),
        }
    }

    /// How many times `invoke` has been called.
    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }
}

impl ReasoningEngine for StubEngine {
    fn invoke(&self, _document: &PromptDocument) -> EngineFuture<'_> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        let reply = self.reply.clone();
        Box::pin(async move { reply })
    }
}

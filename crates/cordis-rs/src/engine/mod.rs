//! Reasoning-engine boundary: the strategy seam between the deterministic
//! core and the opaque generative model.
//!
//! [`ReasoningEngine`] is the single trait the orchestrator depends on. The
//! production implementation is [`openrouter::OpenRouterEngine`]; tests use
//! [`stub::StubEngine`], so nothing in this crate's test suite needs a live
//! model. An engine receives the compiled [`PromptDocument`] (instruction
//! text plus declared output schema) and returns the raw structured reply as
//! a `serde_json::Value`; coercion into the typed result happens in the
//! [`output`](crate::output) module, never here.
//!
//! Engines never retry internally. A timeout bound is mandatory on every
//! remote call and surfaces as [`EngineError::Timeout`]; if the caller drops
//! the returned future mid-flight, the underlying request is simply
//! abandoned (no state was mutated, nothing leaks).

pub mod openrouter;
pub mod stub;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::error::EngineError;
use crate::prompt::PromptDocument;

pub use openrouter::OpenRouterEngine;
pub use stub::StubEngine;

/// Boxed future returned by [`ReasoningEngine::invoke`].
pub type EngineFuture<'a> =
    Pin<Box<dyn Future<Output = Result<serde_json::Value, EngineError>> + Send + 'a>>;

/// A reasoning engine that turns a compiled clinical narrative into a
/// structured reply conforming to the document's output schema.
pub trait ReasoningEngine: Send + Sync {
    /// Submit the document and await the structured reply.
    ///
    /// Implementations clone what they need from `document` up front; the
    /// returned future borrows only the engine itself.
    fn invoke(&self, document: &PromptDocument) -> EngineFuture<'_>;
}

/// Configuration for a remote engine call.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Model identifier understood by the endpoint.
    pub model: String,
    /// Maximum tokens in the reply.
    pub max_tokens: u32,
    /// Sampling temperature. Low by default; diagnostic narratives should
    /// not be creative.
    pub temperature: f32,
    /// Hard deadline for the whole call.
    pub timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model: crate::DEFAULT_MODEL.to_string(),
            max_tokens: 1024,
            temperature: 0.2,
            timeout: Duration::from_secs(60),
        }
    }
}

impl EngineConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder_overrides_defaults() {
        let config = EngineConfig::default()
            .with_model("test/model")
            .with_max_tokens(512)
            .with_temperature(0.0)
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.model, "test/model");
        assert_eq!(config.max_tokens, 512);
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn default_temperature_is_conservative() {
        assert!(EngineConfig::default().temperature <= 0.3);
    }
}

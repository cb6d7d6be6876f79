//! The orchestrator: one diagnostic call from raw input to typed result.
//!
//! [`Analyzer`] sequences the four stages the core defines:
//! validate input → compile prompt → invoke engine → coerce output. The
//! first failure terminates the call; there is no automatic retry and no
//! partial result; the caller sees either a complete
//! [`DiagnosticResult`](crate::schema::DiagnosticResult) or a tagged
//! [`AnalysisError`]. The analyzer holds no mutable state, so one instance
//! can serve arbitrarily many concurrent calls.

use tracing::debug;

use crate::engine::ReasoningEngine;
use crate::error::AnalysisError;
use crate::schema::{ClinicalInput, DiagnosticResult};
use crate::{output, prompt, validate};

/// The stages of a diagnostic call, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    Compiling,
    Invoking,
    Coercing,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Validating => write!(f, "validating"),
            Stage::Compiling => write!(f, "compiling"),
            Stage::Invoking => write!(f, "invoking"),
            Stage::Coercing => write!(f, "coercing"),
        }
    }
}

/// Orchestrates diagnostic calls over any [`ReasoningEngine`].
pub struct Analyzer<E> {
    engine: E,
}

impl<E: ReasoningEngine> Analyzer<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    /// Run one diagnostic call over an already-typed input.
    pub async fn analyze(&self, input: &ClinicalInput) -> Result<DiagnosticResult, AnalysisError> {
        debug!(stage = %Stage::Validating, "diagnostic call started");
        validate::validate(input)?;

        debug!(stage = %Stage::Compiling, "input valid, compiling prompt");
        let document = prompt::compile(input);

        debug!(stage = %Stage::Invoking, prompt_bytes = document.text.len(), "invoking engine");
        let response = self.engine.invoke(&document).await?;

        debug!(stage = %Stage::Coercing, "engine replied, coercing output");
        let result = output::coerce(&response)?;

        debug!("diagnostic call succeeded");
        Ok(result)
    }

    /// Run one diagnostic call over a loosely typed JSON payload.
    pub async fn analyze_json(
        &self,
        raw: &serde_json::Value,
    ) -> Result<DiagnosticResult, AnalysisError> {
        let input = validate::parse(raw)?;
        self.analyze(&input).await
    }

    /// The engine this analyzer drives.
    pub fn engine(&self) -> &E {
        &self.engine
    }
}

//! Typed failures at every stage of a diagnostic call.
//!
//! Three distinct taxonomies cross the crate boundary:
//!
//! - [`ValidationError`]: the caller's input violates the clinical schema.
//!   Always recoverable by correcting the input; never retried here.
//! - [`EngineError`]: the reasoning engine could not be reached, timed out,
//!   declined, or replied with something unparseable. Callers treat every
//!   variant as one "analysis failed" condition.
//! - [`OutputValidationError`]: the engine nominally succeeded but its
//!   structured reply does not match the declared result schema. User-visibly
//!   identical to an engine failure, kept separate for diagnostics.
//!
//! [`AnalysisError`] tags the three together for the orchestrator. The crate
//! performs no automatic retry anywhere; retrying a non-deterministic
//! reasoning engine changes the clinical narrative, so that decision belongs
//! to the calling application.

use crate::analyze::Stage;

/// Caller-supplied data violates the clinical schema.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// A numeric field is outside its declared closed range.
    #[error("{field} must be within [{lo}, {hi}], got {value}")]
    OutOfRange {
        field: String,
        lo: f64,
        hi: f64,
        value: f64,
    },

    /// A numeric field with an open upper bound is below zero.
    #[error("{field} must be non-negative, got {value}")]
    Negative { field: String, value: f64 },

    /// A numeric field is NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// The raw payload could not be typed against the schema at all.
    #[error("clinical input is malformed: {0}")]
    Malformed(String),
}

/// The reasoning engine failed to produce a usable structured reply.
///
/// All variants are constructible without an underlying transport error so
/// test doubles can return any of them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The HTTP request never completed (connection, DNS, TLS, ...).
    #[error("engine request failed: {0}")]
    Transport(String),

    /// The call exceeded the configured deadline.
    #[error("engine call timed out after {0}s")]
    Timeout(u64),

    /// The endpoint answered with a non-success status or an error object.
    #[error("engine API error: {0}")]
    Api(String),

    /// The engine answered but declined to produce a diagnosis.
    #[error("engine declined to answer: {0}")]
    Refusal(String),

    /// The reply body was not the JSON document the contract requires.
    #[error("engine returned a malformed response: {0}")]
    Malformed(String),
}

/// The engine's structured reply fails coercion into the result type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OutputValidationError {
    /// The reply violates the declared result schema. Each violation is
    /// listed with its instance path.
    #[error("engine response does not match the result schema: {0}")]
    SchemaMismatch(String),

    /// The reply passed schema validation but could not be decoded. Should
    /// not happen when the schema and the result type agree.
    #[error("engine response could not be decoded: {0}")]
    Decode(String),
}

/// Any failure of a diagnostic call, tagged by taxonomy.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    #[error("invalid clinical input: {0}")]
    Validation(#[from] ValidationError),

    #[error("analysis failed: {0}")]
    Engine(#[from] EngineError),

    #[error("analysis failed: {0}")]
    OutputValidation(#[from] OutputValidationError),
}

impl AnalysisError {
    /// The orchestrator stage this failure occurred in.
    ///
    /// Prompt compilation is a pure total function, so no failure maps to
    /// [`Stage::Compiling`].
    pub fn stage(&self) -> Stage {
        match self {
            AnalysisError::Validation(_) => Stage::Validating,
            AnalysisError::Engine(_) => Stage::Invoking,
            AnalysisError::OutputValidation(_) => Stage::Coercing,
        }
    }
}

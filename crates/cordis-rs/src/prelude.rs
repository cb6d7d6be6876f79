//! Convenience re-exports for common `cordis-rs` types.
//!
//! Meant to be glob-imported by callers:
//!
//! ```ignore
//! use cordis_rs::prelude::*;
//! ```
//!
//! This pulls in the types needed for the vast majority of diagnostic
//! programs: the [`Analyzer`], the engine trait and its implementations, the
//! clinical record types, and the error taxonomy. Specialized pieces (the
//! prompt builder, bounds constants, per-panel metric tables) are
//! intentionally excluded; import those from their modules directly.

// ── Pipeline ────────────────────────────────────────────────────────
pub use crate::analyze::{Analyzer, Stage};

// ── Engine boundary ─────────────────────────────────────────────────
pub use crate::engine::{
    EngineConfig, EngineFuture, OpenRouterEngine, ReasoningEngine, StubEngine,
};

// ── Clinical records ────────────────────────────────────────────────
pub use crate::schema::{
    ArterySegment, BloodPanel, ClinicalInput, Contractility, CoronaryAngiography,
    DiagnosticResult, EchoFindings, Language, Valve, ValveFindings,
};

// ── Compilation and coercion ────────────────────────────────────────
pub use crate::output::coerce;
pub use crate::prompt::{PromptDocument, compile};

// ── Validation ──────────────────────────────────────────────────────
pub use crate::validate::{parse, parse_and_validate, parse_str, validate};

// ── Errors ──────────────────────────────────────────────────────────
pub use crate::error::{AnalysisError, EngineError, OutputValidationError, ValidationError};

// ── Helpers ─────────────────────────────────────────────────────────
pub use crate::{DEFAULT_MODEL, json_schema_for};

//! Cardiac diagnostic assistance core.
//!
//! `cordis-rs` turns structured cardiac-patient measurements (coronary
//! angiography lesion percentages, echocardiography findings, blood-test
//! panels) into a diagnostic opinion and surgical-intervention
//! recommendation by delegating the reasoning to an external generative
//! engine. The crate owns everything at that boundary: the typed clinical
//! schema, field-by-field validation, deterministic compilation of the
//! clinical narrative, and strict coercion of the engine's structured reply
//! back into a typed result. It deliberately owns nothing else: no UI, no
//! routing, no patient persistence.
//!
//! # Getting started
//!
//! ```ignore
//! use cordis_rs::prelude::*;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AnalysisError> {
//!     let api_key = std::env::var("OPENROUTER_KEY").unwrap();
//!     let config = EngineConfig::default().with_timeout(Duration::from_secs(60));
//!     let engine = OpenRouterEngine::new(api_key, config)?;
//!
//!     let input: ClinicalInput = serde_json::from_str(r#"{
//!         "coronaryAngiography": {
//!             "affectedArteries": { "LM": 70 },
//!             "ejectionFraction": 45
//!         },
//!         "language": "English"
//!     }"#).unwrap();
//!
//!     let result = Analyzer::new(engine).analyze(&input).await?;
//!     println!("{}", result.diagnosis);
//!     Ok(())
//! }
//! ```
//!
//! # Where to find things
//!
//! - **Clinical record shapes:** see [`schema`] for
//!   [`ClinicalInput`](schema::ClinicalInput),
//!   [`DiagnosticResult`](schema::DiagnosticResult), the closed
//!   [`ArterySegment`](schema::ArterySegment) set with its canonical order,
//!   and the declared [`Bounds`](schema::Bounds) for every numeric field.
//! - **Input checking:** see [`validate`]. [`parse`](validate::parse) does
//!   the typing, [`validate`](validate::validate) the bounds.
//! - **Prompt rendering:** see [`prompt`]. [`compile`](prompt::compile)
//!   produces a byte-reproducible [`PromptDocument`](prompt::PromptDocument).
//! - **Talking to the engine:** see [`engine`] for the
//!   [`ReasoningEngine`](engine::ReasoningEngine) strategy trait,
//!   [`OpenRouterEngine`](engine::OpenRouterEngine) for production, and
//!   [`StubEngine`](engine::StubEngine) for tests.
//! - **Reply checking:** see [`output`]. [`coerce`](output::coerce) rejects
//!   any reply that is not the exact three-field result shape.
//! - **The whole pipeline:** see [`analyze`]. [`Analyzer`](analyze::Analyzer)
//!   runs validate → compile → invoke → coerce as one atomic call.
//!
//! # Design principles
//!
//! 1. **The schema is the single source of truth.** Wire names, bounds,
//!    labels, and units live in [`schema`]; the validator and the compiler
//!    both read from it and cannot drift apart.
//!
//! 2. **Determinism before the engine, strictness after it.** Compilation is
//!    a pure function: identical inputs produce byte-identical documents,
//!    so what was sent is always reproducible. Replies are validated against
//!    the same schema that was declared to the engine; nothing is
//!    guess-filled on the way back.
//!
//! 3. **Absence is information.** "No angiography performed" and
//!    "angiography performed, nothing found" are different clinical facts;
//!    the types and the compiled document keep them distinct.
//!
//! 4. **No hidden retries.** Every failure is returned to the caller as a
//!    typed error. Re-running a non-deterministic engine changes the
//!    clinical narrative, so that choice stays with the calling application.

pub mod analyze;
pub mod engine;
pub mod error;
pub mod output;
pub mod prelude;
pub mod prompt;
pub mod schema;
pub mod validate;

use schemars::JsonSchema;

// Re-export schemars for downstream crates.
pub use schemars;

/// OpenRouter chat-completions endpoint.
pub const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default model for diagnostic calls.
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";

/// Generate a JSON Schema `serde_json::Value` from a type that implements
/// `schemars::JsonSchema`. This is the bridge between the strong Rust types
/// in [`schema`] and the schema object the chat-completions API expects.
pub fn json_schema_for<T: JsonSchema>() -> serde_json::Value {
    let schema = schemars::schema_for!(T);
    serde_json::to_value(schema)
        .unwrap_or_else(|_| serde_json::json!({"type": "object", "properties": {}}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ClinicalInput;

    #[test]
    fn input_schema_generates_as_object() {
        let schema = json_schema_for::<ClinicalInput>();
        assert_eq!(schema["type"], "object");
        let props = schema["properties"].as_object().unwrap();
        assert!(props.contains_key("coronaryAngiography"));
        assert!(props.contains_key("echoCGData"));
        assert!(props.contains_key("bloodTests"));
        assert!(props.contains_key("language"));
    }
}

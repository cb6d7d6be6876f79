//! Output coercion: the engine's structured reply is validated against the
//! declared result schema before anything is handed back to the caller.
//!
//! A reply missing a field, typing the intervention flag as text, or
//! carrying extra fields is rejected outright. Nothing is guess-filled: a
//! missing boolean must never silently become "false, no surgery needed".

use serde_json::Value;
use tracing::trace;

use crate::error::OutputValidationError;
use crate::schema::DiagnosticResult;

/// Coerce a raw engine reply into a [`DiagnosticResult`].
///
/// Validation runs against the same generated schema that was declared to
/// the engine, so every violation is reported with its instance path.
pub fn coerce(response: &Value) -> Result<DiagnosticResult, OutputValidationError> {
    let schema = crate::json_schema_for::<DiagnosticResult>();
    let validator = jsonschema::validator_for(&schema)
        .map_err(|e| OutputValidationError::SchemaMismatch(format!("schema unusable: {e}")))?;

    let violations: Vec<String> = validator
        .iter_errors(response)
        .map(|e| format!("{}: {e}", e.instance_path()))
        .collect();
    if !violations.is_empty() {
        return Err(OutputValidationError::SchemaMismatch(violations.join("; ")));
    }

    let result: DiagnosticResult = serde_json::from_value(response.clone())
        .map_err(|e| OutputValidationError::Decode(e.to_string()))?;
    trace!("engine reply coerced into diagnostic result");
    Ok(result)
}

//! # Parameter Validation
//!
//! Checks request parameters against the schema registered for a lookup
//! key. The table is only read.
//!
//! A failure is attributed to a path. When the engine reports exactly one
//! violation at a non-root location, that location (a JSON Pointer such as
//! `/age`) is the path. A root-level violation, or several violations, are
//! attributed to the lookup key itself.

use serde_json::Value;
use sjv_core::{ValidateError, ValidationFailure, Violation};

use crate::store::SchemaStore;

/// Validate `params` against the schema registered under `key`.
///
/// # Errors
///
/// - [`ValidateError::ResourceNotFound`] when `key` is not registered.
/// - [`ValidateError::ValidationFailed`] when `params` violate the schema.
pub fn validate(store: &SchemaStore, key: &str, params: &Value) -> Result<(), ValidateError> {
    let entry = store
        .get(key)
        .ok_or_else(|| ValidateError::ResourceNotFound(key.to_string()))?;

    let detail = entry.schema.violations(params);
    if detail.is_empty() {
        tracing::trace!(key = %key, "parameters valid");
        return Ok(());
    }

    let path = failure_path(key, &detail);
    tracing::debug!(key = %key, path = %path, violations = detail.len(), "parameters rejected");
    Err(ValidateError::ValidationFailed(ValidationFailure { detail, path }))
}

fn failure_path(key: &str, detail: &[Violation]) -> String {
    match detail {
        [only] if !only.instance_path.is_empty() => only.instance_path.clone(),
        _ => key.to_string(),
    }
}

//! # Reference Resolution
//!
//! Turns a compiled schema object into a [`CompiledSchema`]: every local
//! `$ref` is checked against the document, and the object is compiled by
//! the `jsonschema` engine (Draft 4, the draft Swagger 2.0 builds on).
//!
//! A compiled schema is self-contained. It carries its own `definitions`,
//! and the engine is given a retriever that refuses every external URI, so
//! validation never reaches the network.

use std::fmt;
use std::sync::Arc;

use jsonschema::{Draft, Retrieve, Uri, Validator};
use serde::{Serialize, Serializer};
use serde_json::Value;
use sjv_core::{CompileError, LookupKey, Violation};

/// Retriever that refuses every external reference.
struct OfflineRetriever;

impl Retrieve for OfflineRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        Err(format!("external schema retrieval is disabled: {}", uri.as_str()).into())
    }
}

/// A JSON Schema ready for validation, paired with the document it was
/// built from.
///
/// Cheap to clone: both halves are reference counted.
#[derive(Clone)]
pub struct CompiledSchema {
    schema: Arc<Value>,
    validator: Arc<Validator>,
}

impl CompiledSchema {
    /// The schema document, including `definitions` and the original
    /// `parameters`.
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Whether `instance` satisfies the schema.
    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validator.is_valid(instance)
    }

    /// Every violation the engine reports for `instance`, in report order.
    pub fn violations(&self, instance: &Value) -> Vec<Violation> {
        self.validator
            .iter_errors(instance)
            .map(|err| Violation {
                instance_path: err.instance_path.to_string(),
                schema_path: err.schema_path.to_string(),
                message: err.to_string(),
            })
            .collect()
    }
}

impl fmt::Debug for CompiledSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledSchema")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

impl Serialize for CompiledSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.schema.serialize(serializer)
    }
}

/// Check references and compile `schema` for the operation at `key`.
///
/// # Errors
///
/// - [`CompileError::ExternalRef`] for a `$ref` that does not start with `#`.
/// - [`CompileError::UnresolvableRef`] for a local `$ref` with no target.
/// - [`CompileError::InvalidSchema`] if the engine rejects the schema.
pub fn resolve(key: &LookupKey, schema: Value) -> Result<CompiledSchema, CompileError> {
    check_refs(key, &schema, &schema)?;

    let validator = jsonschema::options()
        .with_draft(Draft::Draft4)
        .with_retriever(OfflineRetriever)
        .build(&schema)
        .map_err(|e| CompileError::InvalidSchema {
            key: key.to_string(),
            reason: e.to_string(),
        })?;

    Ok(CompiledSchema {
        schema: Arc::new(schema),
        validator: Arc::new(validator),
    })
}

fn check_refs(key: &LookupKey, root: &Value, node: &Value) -> Result<(), CompileError> {
    match node {
        Value::Object(map) => {
            if let Some(Value::String(reference)) = map.get("$ref") {
                check_ref(key, root, reference)?;
            }
            map.values().try_for_each(|v| check_refs(key, root, v))
        }
        Value::Array(items) => items.iter().try_for_each(|v| check_refs(key, root, v)),
        _ => Ok(()),
    }
}

fn check_ref(key: &LookupKey, root: &Value, reference: &str) -> Result<(), CompileError> {
    let Some(pointer) = reference.strip_prefix('#') else {
        return Err(CompileError::ExternalRef {
            key: key.to_string(),
            reference: reference.to_string(),
        });
    };
    match root.pointer(pointer) {
        Some(_) => Ok(()),
        None => Err(CompileError::UnresolvableRef {
            key: key.to_string(),
            reference: reference.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sjv_core::HttpMethod;

    fn key() -> LookupKey {
        LookupKey::new(HttpMethod::Post, "/pets")
    }

    fn pet_schema() -> Value {
        json!({
            "type": "object",
            "definitions": {
                "Pet": {
                    "type": "object",
                    "properties": {"name": {"type": "string"}},
                    "required": ["name"]
                }
            },
            "properties": {"pet": {"$ref": "#/definitions/Pet"}}
        })
    }

    #[test]
    fn resolves_local_definition_refs() {
        let compiled = resolve(&key(), pet_schema()).unwrap();
        assert!(compiled.is_valid(&json!({"pet": {"name": "Rex"}})));
        assert!(!compiled.is_valid(&json!({"pet": {}})));
    }

    #[test]
    fn violations_carry_instance_path() {
        let compiled = resolve(&key(), pet_schema()).unwrap();
        let violations = compiled.violations(&json!({"pet": {"name": 3}}));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].instance_path, "/pet/name");
    }

    #[test]
    fn missing_ref_target_is_unresolvable() {
        let schema = json!({"properties": {"pet": {"$ref": "#/definitions/Missing"}}});
        let err = resolve(&key(), schema).unwrap_err();
        assert!(matches!(err, CompileError::UnresolvableRef { ref reference, .. } if reference == "#/definitions/Missing"));
    }

    #[test]
    fn external_ref_is_rejected() {
        let schema = json!({"properties": {"pet": {"$ref": "https://example.com/pet.json"}}});
        let err = resolve(&key(), schema).unwrap_err();
        assert!(matches!(err, CompileError::ExternalRef { .. }));
    }

    #[test]
    fn schema_failing_meta_validation_is_invalid() {
        let schema = json!({"type": "object", "properties": {"name": {"minLength": -1}}});
        let err = resolve(&key(), schema).unwrap_err();
        assert!(matches!(err, CompileError::InvalidSchema { .. }));
    }

    #[test]
    fn recursive_definitions_compile() {
        let schema = json!({
            "type": "object",
            "definitions": {
                "Node": {
                    "type": "object",
                    "properties": {"next": {"$ref": "#/definitions/Node"}}
                }
            },
            "properties": {"head": {"$ref": "#/definitions/Node"}}
        });
        let compiled = resolve(&key(), schema).unwrap();
        assert!(compiled.is_valid(&json!({"head": {"next": {"next": {}}}})));
        assert!(!compiled.is_valid(&json!({"head": {"next": 1}})));
    }

    #[test]
    fn serializes_as_schema_document() {
        let compiled = resolve(&key(), pet_schema()).unwrap();
        assert_eq!(serde_json::to_value(&compiled).unwrap(), pet_schema());
    }

    #[test]
    fn debug_output_does_not_require_engine_debug() {
        let compiled = resolve(&key(), json!({"type": "object"})).unwrap();
        assert!(format!("{compiled:?}").starts_with("CompiledSchema"));
    }
}

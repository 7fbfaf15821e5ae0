//! # Schema Compiler
//!
//! Produces one JSON Schema per (method, path) of a merged Swagger
//! document and registers it in the [`SchemaStore`].
//!
//! ## Parameter Flattening
//!
//! An operation's `parameters` list becomes a single object schema:
//!
//! - A body parameter (`schema` instead of `type`) contributes the
//!   referenced definition shallow-merged at the top level, so its
//!   `properties` and `required` surface directly.
//! - A primitive parameter (`type` present) becomes `properties.<name>`,
//!   with `["<type>", "null"]` when it is nullable. A `file` parameter has
//!   no JSON Schema type and is left unconstrained.
//! - `type` defaults to `"object"`.
//!
//! An operation without its own `parameters` key is not registered. When
//! it has one, path-level `parameters` are added to it unless the operation
//! declares a parameter with the same `name` and `in`.
//!
//! The `definitions` and `properties` of each schema then go through the
//! [nullable rewrite](crate::nullable) before [resolution](crate::resolve).

use serde_json::{json, Map, Value};
use sjv_core::{CompileError, HttpMethod, LookupKey};

use crate::loader::RawDocument;
use crate::nullable::rewrite_nullable;
use crate::resolve::{resolve, CompiledSchema};
use crate::store::{SchemaStore, StoredSchema};

/// Validation keywords copied from a primitive parameter onto its property.
const CARRIED_KEYWORDS: [&str; 14] = [
    "format",
    "enum",
    "minimum",
    "maximum",
    "exclusiveMinimum",
    "exclusiveMaximum",
    "minLength",
    "maxLength",
    "pattern",
    "items",
    "minItems",
    "maxItems",
    "uniqueItems",
    "multipleOf",
];

/// Compile every operation of `doc` and register the results in `store`.
///
/// Entries are published in one batch once every operation has compiled,
/// so a failing document leaves the store untouched. Returns the compiled
/// pairs in path order.
///
/// # Errors
///
/// The first [`CompileError`] hit. All of them are fatal authoring errors
/// in the source document.
pub fn compile(
    doc: &RawDocument,
    store: &SchemaStore,
) -> Result<Vec<(LookupKey, CompiledSchema)>, CompileError> {
    let Some(paths) = &doc.paths else {
        tracing::debug!("document declares no paths; nothing to compile");
        return Ok(Vec::new());
    };
    let definitions = doc.definitions.clone().unwrap_or_default();

    let mut compiled = Vec::new();
    for (path, item) in paths {
        let Some(item) = item.as_object() else {
            tracing::warn!(path = %path, "path item is not an object; skipping");
            continue;
        };
        let shared = item.get("parameters").and_then(Value::as_array);

        for (name, operation) in item {
            let Ok(method) = name.parse::<HttpMethod>() else {
                continue;
            };
            let key = LookupKey::new(method, path);
            let own = operation.get("parameters").and_then(Value::as_array);
            let Some(parameters) = effective_parameters(shared, own) else {
                tracing::debug!(key = %key, "operation has no parameters; skipping");
                continue;
            };

            let schema = operation_schema(&key, &parameters, &definitions)?;
            let schema = resolve(&key, schema)?;
            tracing::debug!(
                key = %key,
                parameters = parameters.len(),
                "compiled operation schema"
            );
            compiled.push((key, schema));
        }
    }

    store.put_all(compiled.iter().map(|(key, schema)| {
        (
            key.clone(),
            StoredSchema {
                base_path: doc.base_path.clone(),
                schema: schema.clone(),
            },
        )
    }));
    tracing::info!(
        count = compiled.len(),
        base_path = doc.base_path.as_deref().unwrap_or(""),
        "registered operation schemas"
    );

    Ok(compiled)
}

/// Path-level parameters overlaid with the operation's own.
///
/// `None` when the operation declares no `parameters` list.
fn effective_parameters(
    shared: Option<&Vec<Value>>,
    own: Option<&Vec<Value>>,
) -> Option<Vec<Value>> {
    let own = own?;
    let Some(shared) = shared else {
        return Some(own.clone());
    };
    let mut merged: Vec<Value> = shared
        .iter()
        .filter(|p| !own.iter().any(|o| same_parameter(p, o)))
        .cloned()
        .collect();
    merged.extend(own.iter().cloned());
    Some(merged)
}

fn same_parameter(a: &Value, b: &Value) -> bool {
    a.get("name") == b.get("name") && a.get("in") == b.get("in")
}

/// Build the unresolved schema object for one operation.
///
/// The result carries the original `parameters`, the document's
/// `definitions`, and the flattened properties, with the nullable rewrite
/// applied to `definitions` and `properties`.
///
/// # Errors
///
/// [`CompileError::MalformedParameter`], [`CompileError::MalformedRef`] or
/// [`CompileError::MissingDefinition`] for parameters that cannot be
/// flattened.
pub fn operation_schema(
    key: &LookupKey,
    parameters: &[Value],
    definitions: &Map<String, Value>,
) -> Result<Value, CompileError> {
    let mut accumulated = Map::new();

    for (index, parameter) in parameters.iter().enumerate() {
        if parameter.get("type").is_none() {
            accumulated.extend(body_schema(key, index, parameter, definitions)?);
        }
    }

    let mut primitives = Map::new();
    let mut required = Vec::new();
    for (index, parameter) in parameters.iter().enumerate() {
        if parameter.get("type").is_none() {
            continue;
        }
        let name = parameter
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| CompileError::MalformedParameter {
                key: key.to_string(),
                index,
                reason: "primitive parameter has no name".to_string(),
            })?;
        primitives.insert(name.to_string(), primitive_property(parameter));
        if parameter.get("required") == Some(&Value::Bool(true)) {
            required.push(name);
        }
    }

    if !primitives.is_empty() {
        let mut properties = match accumulated.remove("properties") {
            Some(Value::Object(properties)) => properties,
            _ => Map::new(),
        };
        properties.extend(primitives);
        accumulated.insert("properties".to_string(), Value::Object(properties));
    }
    for name in required {
        push_required(&mut accumulated, name);
    }

    accumulated.entry("type").or_insert_with(|| json!("object"));

    let mut schema = Map::new();
    schema.insert("parameters".to_string(), Value::Array(parameters.to_vec()));
    schema.insert("type".to_string(), json!("object"));
    schema.insert("definitions".to_string(), Value::Object(definitions.clone()));
    schema.extend(accumulated);

    for field in ["definitions", "properties"] {
        if let Some(value) = schema.get_mut(field) {
            *value = rewrite_nullable(std::mem::take(value));
        }
    }

    Ok(Value::Object(schema))
}

/// The object a body parameter contributes to the top level.
fn body_schema(
    key: &LookupKey,
    index: usize,
    parameter: &Value,
    definitions: &Map<String, Value>,
) -> Result<Map<String, Value>, CompileError> {
    let malformed = |reason: String| CompileError::MalformedParameter {
        key: key.to_string(),
        index,
        reason,
    };

    let Some(schema) = parameter.get("schema") else {
        return Err(malformed("declares neither `type` nor `schema`".to_string()));
    };

    match schema.get("$ref") {
        Some(Value::String(reference)) => {
            let name = definition_name(reference).ok_or_else(|| CompileError::MalformedRef {
                key: key.to_string(),
                reference: reference.clone(),
            })?;
            match definitions.get(name) {
                Some(Value::Object(definition)) => Ok(definition.clone()),
                Some(_) => Err(malformed(format!("definition '{name}' is not an object"))),
                None => Err(CompileError::MissingDefinition {
                    key: key.to_string(),
                    reference: reference.clone(),
                }),
            }
        }
        Some(other) => Err(CompileError::MalformedRef {
            key: key.to_string(),
            reference: other.to_string(),
        }),
        None => match schema {
            Value::Object(inline) => Ok(inline.clone()),
            _ => Err(malformed("`schema` is not an object".to_string())),
        },
    }
}

/// Last `/`-separated segment of a `$ref`, e.g. `Person` for
/// `#/definitions/Person`.
fn definition_name(reference: &str) -> Option<&str> {
    reference.rsplit('/').next().filter(|name| !name.is_empty())
}

/// Property schema for a primitive parameter.
///
/// A nullable `enum` gains `null` later, in the nullable rewrite.
fn primitive_property(parameter: &Value) -> Value {
    let ty = parameter.get("type").cloned().unwrap_or(Value::Null);
    let nullable = ["nullable", "x-nullable"]
        .iter()
        .any(|k| parameter.get(*k) == Some(&Value::Bool(true)));

    let mut property = Map::new();
    // `file` has no JSON Schema counterpart; uploads stay unconstrained.
    if ty != "file" {
        if nullable {
            property.insert("type".to_string(), json!([ty, "null"]));
            property.insert("nullable".to_string(), Value::Bool(true));
        } else {
            property.insert("type".to_string(), ty);
        }
    }

    for keyword in CARRIED_KEYWORDS {
        if let Some(value) = parameter.get(keyword) {
            property.insert(keyword.to_string(), value.clone());
        }
    }

    Value::Object(property)
}

fn push_required(schema: &mut Map<String, Value>, name: &str) {
    let required = schema
        .entry("required")
        .or_insert_with(|| Value::Array(Vec::new()));
    if let Value::Array(names) = required {
        if !names.iter().any(|n| n.as_str() == Some(name)) {
            names.push(Value::String(name.to_string()));
        }
    }
}

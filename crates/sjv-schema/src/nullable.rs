//! # Nullable Rewrite
//!
//! Swagger 2.0 marks null-permitting schemas with the vendor keywords
//! `nullable: true` or `x-nullable: true`. JSON Schema has no such keyword,
//! so before compilation every fragment is rewritten into plain JSON Schema:
//!
//! | Input                                         | Output |
//! |-----------------------------------------------|--------|
//! | `{"type": "string", "nullable": true}`        | `{"type": ["string", "null"], "nullable": true}` |
//! | `{"type": ["string", "integer"], "nullable": true}` | `{"type": ["string", "integer", "null"], "nullable": true}` |
//! | `{"$ref": "#/definitions/Pet", "nullable": true}` | `{"oneOf": [{"type": "null"}, {"$ref": "#/definitions/Pet"}]}` |
//!
//! A nullable `$ref` is always wrapped, whatever `type` sits beside it,
//! because Draft 4 ignores the siblings of `$ref`. Any such `type` also
//! gains `"null"`, and the markers are removed. A nullable `enum` gains
//! `null` as well.
//!
//! The walk is depth first over every object value and array element, so
//! nested definitions are normalized too. The rewrite is idempotent: a type
//! array that already contains `"null"` and a `oneOf` wrapper are terminal.

use serde_json::{json, Map, Value};

/// How a single object node is rewritten.
#[derive(Debug, PartialEq)]
enum Shape {
    /// `$ref` gets wrapped in a `oneOf` with `null`.
    NullableRef(String),
    /// `type` (a name or a list of names) gains `"null"`.
    NullableType,
    /// Nothing to rewrite at this node.
    Plain,
}

fn is_nullable(map: &Map<String, Value>) -> bool {
    ["nullable", "x-nullable"]
        .iter()
        .any(|k| map.get(*k) == Some(&Value::Bool(true)))
}

fn lacks_null(ty: &Value) -> bool {
    match ty {
        Value::String(name) => name != "null",
        Value::Array(names) => !names.iter().any(|t| t.as_str() == Some("null")),
        _ => false,
    }
}

fn classify(map: &Map<String, Value>) -> Shape {
    if !is_nullable(map) {
        return Shape::Plain;
    }
    if let Some(Value::String(reference)) = map.get("$ref") {
        return Shape::NullableRef(reference.clone());
    }
    if map.get("type").is_some_and(lacks_null) {
        Shape::NullableType
    } else {
        Shape::Plain
    }
}

/// Rewrite every nullable fragment in `schema` into JSON Schema form.
pub fn rewrite_nullable(schema: Value) -> Value {
    match schema {
        Value::Object(map) => rewrite_object(map),
        Value::Array(items) => Value::Array(items.into_iter().map(rewrite_nullable).collect()),
        scalar => scalar,
    }
}

fn rewrite_object(mut map: Map<String, Value>) -> Value {
    if is_nullable(&map) {
        admit_null_enum(&mut map);
    }
    match classify(&map) {
        Shape::NullableType => admit_null_type(&mut map),
        Shape::NullableRef(reference) => {
            admit_null_type(&mut map);
            map.remove("$ref");
            map.remove("nullable");
            map.remove("x-nullable");
            map.insert(
                "oneOf".to_string(),
                json!([{"type": "null"}, {"$ref": reference}]),
            );
        }
        Shape::Plain => {}
    }
    Value::Object(
        map.into_iter()
            .map(|(key, value)| (key, rewrite_nullable(value)))
            .collect(),
    )
}

fn admit_null_type(map: &mut Map<String, Value>) {
    let Some(ty) = map.get_mut("type") else {
        return;
    };
    if !lacks_null(ty) {
        return;
    }
    *ty = match ty.take() {
        Value::String(name) => json!([name, "null"]),
        Value::Array(mut names) => {
            names.push(json!("null"));
            Value::Array(names)
        }
        other => other,
    };
}

fn admit_null_enum(map: &mut Map<String, Value>) {
    if let Some(Value::Array(values)) = map.get_mut("enum") {
        if !values.contains(&Value::Null) {
            values.push(Value::Null);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nullable_type_becomes_type_array() {
        let out = rewrite_nullable(json!({"type": "string", "nullable": true}));
        assert_eq!(out, json!({"type": ["string", "null"], "nullable": true}));
    }

    #[test]
    fn x_nullable_is_a_synonym() {
        let out = rewrite_nullable(json!({"type": "integer", "x-nullable": true}));
        assert_eq!(out["type"], json!(["integer", "null"]));
    }

    #[test]
    fn nullable_false_is_untouched() {
        let input = json!({"type": "string", "nullable": false});
        assert_eq!(rewrite_nullable(input.clone()), input);
    }

    #[test]
    fn nullable_ref_becomes_one_of() {
        let out = rewrite_nullable(json!({"$ref": "#/definitions/Foo", "nullable": true}));
        assert_eq!(
            out,
            json!({"oneOf": [{"type": "null"}, {"$ref": "#/definitions/Foo"}]})
        );
        assert!(out.get("$ref").is_none());
        assert!(out.get("nullable").is_none());
    }

    #[test]
    fn nullable_ref_keeps_sibling_keys() {
        let out = rewrite_nullable(json!({
            "$ref": "#/definitions/Foo",
            "x-nullable": true,
            "description": "owner"
        }));
        assert_eq!(out["description"], "owner");
        assert!(out.get("x-nullable").is_none());
    }

    #[test]
    fn type_list_gains_null_once() {
        let out = rewrite_nullable(json!({"type": ["string", "integer"], "nullable": true}));
        assert_eq!(out["type"], json!(["string", "integer", "null"]));
        assert_eq!(rewrite_nullable(out.clone()), out);
    }

    #[test]
    fn nullable_ref_with_type_is_wrapped() {
        let input = json!({"type": "object", "$ref": "#/definitions/Foo", "nullable": true});
        let once = rewrite_nullable(input);
        assert_eq!(
            once,
            json!({
                "type": ["object", "null"],
                "oneOf": [{"type": "null"}, {"$ref": "#/definitions/Foo"}]
            })
        );
        assert_eq!(rewrite_nullable(once.clone()), once);
    }

    #[test]
    fn nullable_ref_with_null_admitting_type_is_wrapped() {
        let out = rewrite_nullable(json!({
            "type": ["object", "null"],
            "$ref": "#/definitions/Foo",
            "nullable": true
        }));
        assert_eq!(out["type"], json!(["object", "null"]));
        assert_eq!(out["oneOf"][1], json!({"$ref": "#/definitions/Foo"}));
        assert!(out.get("$ref").is_none());
    }

    #[test]
    fn nullable_enum_gains_null_once() {
        let out = rewrite_nullable(json!({"type": "string", "enum": ["a", "b"], "nullable": true}));
        assert_eq!(out["enum"], json!(["a", "b", null]));
        assert_eq!(out["type"], json!(["string", "null"]));
        assert_eq!(rewrite_nullable(out.clone()), out);
    }

    #[test]
    fn enum_without_marker_is_untouched() {
        let input = json!({"type": "string", "enum": ["a"]});
        assert_eq!(rewrite_nullable(input.clone()), input);
    }

    #[test]
    fn null_type_is_terminal() {
        let input = json!({"type": "null", "nullable": true});
        assert_eq!(rewrite_nullable(input.clone()), input);
    }

    #[test]
    fn rewrites_nested_definitions() {
        let out = rewrite_nullable(json!({
            "Person": {
                "type": "object",
                "properties": {
                    "nickname": {"type": "string", "nullable": true},
                    "pets": {
                        "type": "array",
                        "items": {"$ref": "#/definitions/Pet", "nullable": true}
                    }
                }
            }
        }));
        let props = &out["Person"]["properties"];
        assert_eq!(props["nickname"]["type"], json!(["string", "null"]));
        assert_eq!(props["pets"]["items"]["oneOf"][0], json!({"type": "null"}));
    }

    #[test]
    fn rewrites_inside_arrays() {
        let out = rewrite_nullable(json!({"allOf": [{"type": "string", "nullable": true}]}));
        assert_eq!(out["allOf"][0]["type"], json!(["string", "null"]));
    }

    #[test]
    fn scalars_are_unchanged() {
        for scalar in [json!(null), json!(true), json!(3), json!("nullable")] {
            assert_eq!(rewrite_nullable(scalar.clone()), scalar);
        }
    }

    #[test]
    fn classify_plain_without_marker() {
        let map = json!({"$ref": "#/definitions/Foo"});
        assert_eq!(classify(map.as_object().unwrap()), Shape::Plain);
    }
}

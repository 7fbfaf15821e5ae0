//! # Validate Subcommand
//!
//! Compiles the given Swagger documents and checks one parameter object
//! against the schema registered under `--key`.
//!
//! Output is a single line: `OK`, `FAIL: <path> — <detail>`, or
//! `NOT FOUND: <key>`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use sjv_core::ValidateError;
use sjv_schema::loader::read_document;
use sjv_schema::{parse_swagger_schema, validate, SchemaStore};

use crate::config::collect_specs;
use crate::{EXIT_ERROR, EXIT_REJECTED};

/// Arguments for the `sjv validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Swagger documents (JSON or YAML), merged in order.
    #[arg(value_name = "SPEC")]
    pub specs: Vec<PathBuf>,

    /// Lookup key of the operation, e.g. `/get/person/{id}`.
    #[arg(long, short)]
    pub key: String,

    /// Parameters as an inline JSON object.
    #[arg(long, conflicts_with = "params_file", required_unless_present = "params_file")]
    pub params: Option<String>,

    /// Parameters read from a JSON or YAML file.
    #[arg(long, value_name = "FILE")]
    pub params_file: Option<PathBuf>,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when the parameters are accepted, 1 when they are
/// rejected or the key is not registered, 2 when no documents were given.
pub fn run_validate(args: &ValidateArgs, config: Option<&Path>) -> Result<u8> {
    let specs = collect_specs(config, &args.specs)?;
    if specs.is_empty() {
        println!("Usage: sjv validate [--config FILE] SPEC... --key KEY (--params JSON | --params-file FILE)");
        return Ok(EXIT_ERROR);
    }
    let params = read_params(args)?;

    let store = SchemaStore::new();
    parse_swagger_schema(specs, &store).context("failed to compile Swagger documents")?;

    let (line, code) = outcome(&store, &args.key, &params);
    println!("{line}");
    Ok(code)
}

/// The report line and exit code for validating `params` under `key`.
pub fn outcome(store: &SchemaStore, key: &str, params: &Value) -> (String, u8) {
    match validate(store, key, params) {
        Ok(()) => ("OK".to_string(), 0),
        Err(ValidateError::ResourceNotFound(key)) => (format!("NOT FOUND: {key}"), EXIT_REJECTED),
        Err(ValidateError::ValidationFailed(failure)) => (
            format!("FAIL: {} — {}", failure.path, failure.message()),
            EXIT_REJECTED,
        ),
    }
}

fn read_params(args: &ValidateArgs) -> Result<Value> {
    match (&args.params, &args.params_file) {
        (Some(inline), _) => {
            serde_json::from_str(inline).context("--params is not valid JSON")
        }
        (None, Some(path)) => read_document(path)
            .with_context(|| format!("failed to read parameters from {}", path.display())),
        (None, None) => anyhow::bail!("one of --params or --params-file is required"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SPEC: &str = r#"{
        "paths": {"/person": {"get": {"parameters": [
            {"name": "age", "in": "query", "type": "integer", "minimum": 0}
        ]}}},
        "definitions": {}
    }"#;

    fn spec_dir() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let spec = dir.path().join("api.json");
        std::fs::write(&spec, SPEC).unwrap();
        (dir, spec)
    }

    fn args(spec: PathBuf, key: &str, params: &str) -> ValidateArgs {
        ValidateArgs {
            specs: vec![spec],
            key: key.to_string(),
            params: Some(params.to_string()),
            params_file: None,
        }
    }

    #[test]
    fn accepted_params_exit_zero() {
        let (_dir, spec) = spec_dir();
        assert_eq!(run_validate(&args(spec, "/get/person", r#"{"age": 5}"#), None).unwrap(), 0);
    }

    #[test]
    fn rejected_params_exit_one() {
        let (_dir, spec) = spec_dir();
        let code = run_validate(&args(spec, "/get/person", r#"{"age": "x"}"#), None).unwrap();
        assert_eq!(code, EXIT_REJECTED);
    }

    #[test]
    fn unknown_key_exits_one() {
        let (_dir, spec) = spec_dir();
        let code = run_validate(&args(spec, "/get/nobody", "{}"), None).unwrap();
        assert_eq!(code, EXIT_REJECTED);
    }

    #[test]
    fn params_file_is_read() {
        let (dir, spec) = spec_dir();
        let params = dir.path().join("params.yaml");
        std::fs::write(&params, "age: 7\n").unwrap();
        let args = ValidateArgs {
            specs: vec![spec],
            key: "/get/person".to_string(),
            params: None,
            params_file: Some(params),
        };
        assert_eq!(run_validate(&args, None).unwrap(), 0);
    }

    #[test]
    fn malformed_inline_params_is_error() {
        let (_dir, spec) = spec_dir();
        assert!(run_validate(&args(spec, "/get/person", "{age"), None).is_err());
    }

    #[test]
    fn no_specs_is_usage_error() {
        let args = ValidateArgs {
            specs: vec![],
            key: "/get/person".to_string(),
            params: Some("{}".to_string()),
            params_file: None,
        };
        assert_eq!(run_validate(&args, None).unwrap(), EXIT_ERROR);
    }

    #[test]
    fn outcome_lines() {
        let store = SchemaStore::new();
        sjv_schema::parse_swagger_values([serde_json::from_str(SPEC).unwrap()], &store).unwrap();

        assert_eq!(outcome(&store, "/get/person", &json!({"age": 1})), ("OK".to_string(), 0));

        let (line, code) = outcome(&store, "/get/person", &json!({"age": -1}));
        assert!(line.starts_with("FAIL: /age — "), "{line}");
        assert_eq!(code, EXIT_REJECTED);

        let (line, code) = outcome(&store, "/get/missing", &json!({}));
        assert_eq!(line, "NOT FOUND: /get/missing");
        assert_eq!(code, EXIT_REJECTED);
    }
}

//! # Compile Subcommand
//!
//! Loads and compiles Swagger documents, then lists every registered
//! lookup key with its base path, or with `--emit` prints the compiled
//! schemas as one JSON object keyed by lookup key.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use sjv_core::LookupKey;
use sjv_schema::{parse_swagger_schema, CompiledSchema, SchemaStore};

use crate::config::collect_specs;
use crate::EXIT_ERROR;

/// Arguments for the `sjv compile` subcommand.
#[derive(Args, Debug)]
pub struct CompileArgs {
    /// Swagger documents (JSON or YAML), merged in order.
    #[arg(value_name = "SPEC")]
    pub specs: Vec<PathBuf>,

    /// Print the compiled schemas instead of the key listing.
    #[arg(long)]
    pub emit: bool,
}

/// Execute the compile subcommand.
///
/// Returns exit code: 0 on success, 2 when no documents were given.
pub fn run_compile(args: &CompileArgs, config: Option<&Path>) -> Result<u8> {
    let specs = collect_specs(config, &args.specs)?;
    if specs.is_empty() {
        println!("Usage: sjv compile [--config FILE] SPEC... [--emit]");
        return Ok(EXIT_ERROR);
    }

    let store = SchemaStore::new();
    let compiled = parse_swagger_schema(specs.clone(), &store)
        .context("failed to compile Swagger documents")?;

    if args.emit {
        println!("{}", serde_json::to_string_pretty(&emit(&compiled)?)?);
        return Ok(0);
    }

    for key in store.keys() {
        let base_path = store
            .get(key.as_str())
            .and_then(|entry| entry.base_path.clone())
            .unwrap_or_else(|| "-".to_string());
        println!("  {key}  (basePath {base_path})");
    }
    println!(
        "Compiled {} operation(s) from {} document(s).",
        compiled.len(),
        specs.len()
    );
    Ok(0)
}

/// Compiled schemas as a JSON object keyed by lookup key.
pub fn emit(compiled: &[(LookupKey, CompiledSchema)]) -> Result<Value> {
    let by_key: BTreeMap<&str, &CompiledSchema> = compiled
        .iter()
        .map(|(key, schema)| (key.as_str(), schema))
        .collect();
    Ok(serde_json::to_value(by_key)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sjv_schema::parse_swagger_values;

    const SPEC: &str = r#"{
        "basePath": "/api",
        "paths": {"/person": {"get": {"parameters": [
            {"name": "age", "in": "query", "type": "integer"}
        ]}}},
        "definitions": {}
    }"#;

    fn write_spec(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn compile_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let spec = write_spec(dir.path(), "api.json", SPEC);
        let args = CompileArgs {
            specs: vec![spec],
            emit: false,
        };
        assert_eq!(run_compile(&args, None).unwrap(), 0);
    }

    #[test]
    fn compile_with_emit_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let spec = write_spec(dir.path(), "api.json", SPEC);
        let args = CompileArgs {
            specs: vec![spec],
            emit: true,
        };
        assert_eq!(run_compile(&args, None).unwrap(), 0);
    }

    #[test]
    fn compile_without_specs_is_usage_error() {
        let args = CompileArgs {
            specs: vec![],
            emit: false,
        };
        assert_eq!(run_compile(&args, None).unwrap(), EXIT_ERROR);
    }

    #[test]
    fn compile_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = CompileArgs {
            specs: vec![dir.path().join("absent.json")],
            emit: false,
        };
        assert!(run_compile(&args, None).is_err());
    }

    #[test]
    fn compile_reads_specs_from_config() {
        let dir = tempfile::tempdir().unwrap();
        write_spec(dir.path(), "api.json", SPEC);
        let config = write_spec(dir.path(), "sjv.yaml", "specs: [api.json]\n");
        let args = CompileArgs {
            specs: vec![],
            emit: false,
        };
        assert_eq!(run_compile(&args, Some(&config)).unwrap(), 0);
    }

    #[test]
    fn emit_keys_by_lookup_key() {
        let store = SchemaStore::new();
        let compiled =
            parse_swagger_values([serde_json::from_str::<Value>(SPEC).unwrap()], &store).unwrap();
        let emitted = emit(&compiled).unwrap();
        assert_eq!(
            emitted["/get/person"]["properties"]["age"],
            json!({"type": "integer"})
        );
        assert_eq!(emitted.as_object().unwrap().len(), 1);
    }
}

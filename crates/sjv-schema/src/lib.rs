//! # sjv-schema — Swagger to JSON Schema
//!
//! Compiles Swagger 2.0 documents into one JSON Schema per operation and
//! validates request parameters against them.
//!
//! ## Pipeline
//!
//! 1. [`loader`] reads one or more documents and merges their `basePath`,
//!    `paths` and `definitions`.
//! 2. [`compiler`] flattens each operation's `parameters` into an object
//!    schema, applies the [`nullable`] rewrite, and hands the result to
//!    [`resolve`], which checks `$ref`s and builds a `jsonschema` validator.
//! 3. Results land in a [`SchemaStore`] under `"/" + method + path`.
//! 4. [`validate()`] looks a key up and checks parameters against it.
//!
//! ```no_run
//! use serde_json::json;
//! use sjv_schema::{parse_swagger_schema, validate, SchemaStore};
//!
//! let store = SchemaStore::new();
//! parse_swagger_schema(["api/base.json", "api/admin.yaml"], &store)?;
//! validate(&store, "/get/person/{id}", &json!({"id": "42"}))?;
//! # Ok::<(), sjv_core::SjvError>(())
//! ```

pub mod compiler;
pub mod loader;
pub mod nullable;
pub mod resolve;
pub mod store;
pub mod validate;

use serde_json::Value;
use sjv_core::{LookupKey, SjvError};

// Re-export primary types.
pub use compiler::compile;
pub use loader::{RawDocument, SpecSources};
pub use resolve::CompiledSchema;
pub use store::{SchemaStore, StoredSchema};
pub use validate::validate;

/// Load, merge, and compile Swagger documents from files.
///
/// `sources` is a single path or a sequence of paths; later documents win
/// on merge collisions. Every compiled schema is registered in `store`,
/// and the (key, schema) pairs are returned.
///
/// # Errors
///
/// [`SjvError::Load`] if a document cannot be read or decoded,
/// [`SjvError::Compile`] if the merged document cannot be compiled.
pub fn parse_swagger_schema(
    sources: impl Into<SpecSources>,
    store: &SchemaStore,
) -> Result<Vec<(LookupKey, CompiledSchema)>, SjvError> {
    let doc = loader::load_files(sources)?;
    Ok(compile(&doc, store)?)
}

/// Like [`parse_swagger_schema`], for documents already decoded into JSON.
///
/// # Errors
///
/// As [`parse_swagger_schema`].
pub fn parse_swagger_values(
    documents: impl IntoIterator<Item = Value>,
    store: &SchemaStore,
) -> Result<Vec<(LookupKey, CompiledSchema)>, SjvError> {
    let doc = loader::load_values(documents)?;
    Ok(compile(&doc, store)?)
}

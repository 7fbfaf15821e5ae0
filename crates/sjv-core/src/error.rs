//! # Error Types — Structured Error Hierarchy
//!
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - Load errors (unreadable or undecodable documents) are fatal.
//! - Compile errors (broken `$ref`s, malformed parameters) are fatal: a
//!   malformed Swagger document is an authoring error caught at startup.
//! - Validation errors carry the violated constraints and the path they
//!   were reported at. They are returned, never raised.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the workspace.
#[derive(Error, Debug)]
pub enum SjvError {
    /// A source document could not be loaded.
    #[error("load error: {0}")]
    Load(#[from] LoadError),

    /// A loaded document could not be compiled into JSON Schemas.
    #[error("compile error: {0}")]
    Compile(#[from] CompileError),

    /// Request parameters were rejected.
    #[error("{0}")]
    Validate(#[from] ValidateError),
}

/// Error reading or decoding a source document.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// Path of the unreadable document.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON or YAML.
    #[error("cannot decode {}: {reason}", path.display())]
    Decode {
        /// Path of the undecodable document.
        path: PathBuf,
        /// Decoder message.
        reason: String,
    },

    /// The document root is not a JSON object.
    #[error("document root of {} is not an object", path.display())]
    NotAnObject {
        /// Path of the offending document.
        path: PathBuf,
    },
}

/// Error compiling an operation's parameters into a JSON Schema.
#[derive(Error, Debug)]
pub enum CompileError {
    /// A body parameter references a definition that does not exist.
    #[error("{key}: body parameter references unknown definition '{reference}'")]
    MissingDefinition {
        /// Lookup key of the operation being compiled.
        key: String,
        /// The `$ref` string as written.
        reference: String,
    },

    /// A body parameter `$ref` has no usable definition name.
    #[error("{key}: malformed $ref '{reference}'")]
    MalformedRef {
        /// Lookup key of the operation being compiled.
        key: String,
        /// The `$ref` string as written.
        reference: String,
    },

    /// A parameter declares neither `type` nor `schema`.
    #[error("{key}: parameter #{index} is malformed: {reason}")]
    MalformedParameter {
        /// Lookup key of the operation being compiled.
        key: String,
        /// Position in the effective parameter list.
        index: usize,
        /// What is wrong with it.
        reason: String,
    },

    /// A local `$ref` inside the compiled schema points at nothing.
    #[error("{key}: unresolvable $ref '{reference}'")]
    UnresolvableRef {
        /// Lookup key of the operation being compiled.
        key: String,
        /// The `$ref` string as written.
        reference: String,
    },

    /// A `$ref` points outside the document.
    #[error("{key}: external $ref '{reference}' is not supported")]
    ExternalRef {
        /// Lookup key of the operation being compiled.
        key: String,
        /// The `$ref` string as written.
        reference: String,
    },

    /// The JSON Schema engine rejected the compiled schema.
    #[error("{key}: invalid JSON Schema: {reason}")]
    InvalidSchema {
        /// Lookup key of the operation being compiled.
        key: String,
        /// Engine message.
        reason: String,
    },
}

/// Outcome of a failed `validate` call.
#[derive(Error, Debug, Clone)]
pub enum ValidateError {
    /// No schema is registered under the key.
    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    /// The parameters violate the registered schema.
    #[error("{0}")]
    ValidationFailed(ValidationFailure),
}

/// A single violated constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer to the offending value in the parameters.
    pub instance_path: String,
    /// JSON Pointer to the keyword in the schema that failed.
    pub schema_path: String,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.instance_path, self.message)
        }
    }
}

/// Violations reported for one `validate` call, with the path they are
/// attributed to.
///
/// `path` is the violation's instance path when exactly one violation with
/// a non-root path was reported; otherwise it is the lookup key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    /// Every violation reported by the engine, in report order.
    pub detail: Vec<Violation>,
    /// Where the failure is attributed.
    pub path: String,
}

impl ValidationFailure {
    /// Human-readable detail, one violation per line.
    pub fn message(&self) -> String {
        self.detail
            .iter()
            .map(|v| v.message.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed at {}: {}", self.path, self.message())
    }
}

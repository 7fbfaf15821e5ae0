//! # sjv-core — Foundational Types
//!
//! Leaf crate of the workspace. Defines the identifiers that tie a Swagger
//! operation to its compiled JSON Schema and the error hierarchy shared by
//! the loader, compiler, and validator.
//!
//! ## Key Design Principles
//!
//! 1. **`LookupKey` newtype.** A compiled schema is addressed by
//!    `"/" + method + path`. The key is built in one place so every
//!    producer and consumer agrees on the format.
//!
//! 2. **Closed `HttpMethod` enum.** Path items in a Swagger document also
//!    carry `parameters` and `x-*` entries. Only names that parse into
//!    `HttpMethod` are treated as operations.
//!
//! 3. **Errors are data.** Load and compile failures are fatal and
//!    propagate with full context; validation failures are ordinary values
//!    returned to the caller.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `sjv-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod key;

// Re-export primary types for ergonomic imports.
pub use error::{
    CompileError, LoadError, SjvError, ValidateError, ValidationFailure, Violation,
};
pub use key::{HttpMethod, LookupKey};

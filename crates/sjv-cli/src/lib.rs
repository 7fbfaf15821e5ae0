//! # sjv-cli — Command Line Interface
//!
//! Provides the `sjv` binary on top of `sjv-schema`.
//!
//! ## Subcommands
//!
//! - `sjv compile`: load, merge, and compile Swagger documents; list the
//!   registered keys or emit the compiled schemas.
//! - `sjv validate`: validate a parameter object against one operation.
//!
//! ```bash
//! sjv compile api/base.json api/admin.yaml --emit
//! sjv validate api/base.json --key /get/person --params '{"age": 5}'
//! sjv --config sjv.yaml validate --key /post/pets --params-file pet.json
//! ```
//!
//! ## Exit Codes
//!
//! `0` on success, `1` when parameters are rejected or the key is not
//! registered, `2` on operational errors (unreadable documents, compile
//! errors, bad configuration, no documents given).

pub mod compile;
pub mod config;
pub mod validate;

/// Exit code for a rejected request or a lookup miss.
pub const EXIT_REJECTED: u8 = 1;

/// Exit code for operational errors.
pub const EXIT_ERROR: u8 = 2;

//! # Lookup Keys
//!
//! A compiled schema is registered under the composite key
//! `"/" + lowercase method + path template`, e.g. `/get/person/{id}`.
//! The path template is kept exactly as declared, placeholders included.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// HTTP methods that can appear as operations in a Swagger 2.0 path item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
}

impl HttpMethod {
    /// All methods, in the order Swagger 2.0 lists them for a path item.
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Put,
        HttpMethod::Post,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::Patch,
    ];

    /// Lowercase name as used in Swagger documents and lookup keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Put => "put",
            Self::Post => "post",
            Self::Delete => "delete",
            Self::Options => "options",
            Self::Head => "head",
            Self::Patch => "patch",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    /// Parses a method name case-insensitively. Non-method path item keys
    /// such as `parameters` or `x-amazon-apigateway-any-method` are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("not an HTTP method: {s}"))
    }
}

/// Composite key identifying one (method, path) resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LookupKey(String);

impl LookupKey {
    /// Build the key for `method` on the declared path template.
    pub fn new(method: HttpMethod, path: &str) -> Self {
        Self(format!("/{}{}", method.as_str(), path))
    }

    /// Access the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split the key back into its method and path template.
    ///
    /// Returns `None` for strings that were not produced by [`LookupKey::new`].
    pub fn parts(&self) -> Option<(HttpMethod, &str)> {
        let rest = self.0.strip_prefix('/')?;
        let split = rest.find('/').unwrap_or(rest.len());
        let (method, path) = rest.split_at(split);
        Some((method.parse().ok()?, path))
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for LookupKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for LookupKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LookupKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for LookupKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

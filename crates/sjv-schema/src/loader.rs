//! # Schema Loader
//!
//! Reads Swagger 2.0 documents, projects each onto the keys the compiler
//! needs (`basePath`, `paths`, `definitions`), and folds several documents
//! into one.
//!
//! ## Merge Rules
//!
//! Documents fold left to right; a later document wins on collision.
//!
//! - Until the accumulator holds `paths`, a document is shallow-merged
//!   into it: each retained key the document declares replaces the
//!   accumulated value whole.
//! - Once `paths` exist, only `paths` and `definitions` are merged, entry
//!   by entry. A later path item replaces an earlier one for the same path
//!   template, methods included. The accumulated `basePath` is kept.
//!
//! Every presence combination is handled. A document without `paths` is
//! not an error; it simply contributes nothing to compile.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use sjv_core::LoadError;

/// The projection of a Swagger document the compiler works on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDocument {
    /// `basePath`, when declared as a string.
    pub base_path: Option<String>,
    /// `paths`: path template → path item (method → operation).
    pub paths: Option<Map<String, Value>>,
    /// `definitions`: name → schema fragment.
    pub definitions: Option<Map<String, Value>>,
}

impl RawDocument {
    /// Project a decoded document onto the retained keys.
    ///
    /// Returns `None` when the root is not an object. Retained keys with
    /// the wrong JSON type are treated as absent.
    pub fn project(value: Value) -> Option<Self> {
        let Value::Object(mut root) = value else {
            return None;
        };
        Some(Self {
            base_path: match root.remove("basePath") {
                Some(Value::String(base_path)) => Some(base_path),
                _ => None,
            },
            paths: take_object(&mut root, "paths"),
            definitions: take_object(&mut root, "definitions"),
        })
    }

    /// Fold `later` into `self`. Entries from `later` win on collision.
    pub fn merge(self, later: RawDocument) -> RawDocument {
        if self.paths.is_none() {
            return RawDocument {
                base_path: later.base_path.or(self.base_path),
                paths: later.paths,
                definitions: later.definitions.or(self.definitions),
            };
        }
        RawDocument {
            base_path: self.base_path,
            paths: merge_maps(self.paths, later.paths),
            definitions: merge_maps(self.definitions, later.definitions),
        }
    }
}

fn take_object(root: &mut Map<String, Value>, key: &str) -> Option<Map<String, Value>> {
    match root.remove(key) {
        Some(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn merge_maps(
    earlier: Option<Map<String, Value>>,
    later: Option<Map<String, Value>>,
) -> Option<Map<String, Value>> {
    match (earlier, later) {
        (Some(mut acc), Some(next)) => {
            acc.extend(next);
            Some(acc)
        }
        (earlier, later) => earlier.or(later),
    }
}

/// One or more source documents, in merge order.
///
/// Accepts a single path or any sequence of paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecSources(Vec<PathBuf>);

impl SpecSources {
    /// The source paths in merge order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.0
    }
}

impl From<&str> for SpecSources {
    fn from(path: &str) -> Self {
        Self(vec![PathBuf::from(path)])
    }
}

impl From<String> for SpecSources {
    fn from(path: String) -> Self {
        Self(vec![PathBuf::from(path)])
    }
}

impl From<&Path> for SpecSources {
    fn from(path: &Path) -> Self {
        Self(vec![path.to_path_buf()])
    }
}

impl From<PathBuf> for SpecSources {
    fn from(path: PathBuf) -> Self {
        Self(vec![path])
    }
}

impl<P: AsRef<Path>> From<Vec<P>> for SpecSources {
    fn from(paths: Vec<P>) -> Self {
        Self(paths.iter().map(|p| p.as_ref().to_path_buf()).collect())
    }
}

impl<P: AsRef<Path>> From<&[P]> for SpecSources {
    fn from(paths: &[P]) -> Self {
        Self(paths.iter().map(|p| p.as_ref().to_path_buf()).collect())
    }
}

impl<P: AsRef<Path>, const N: usize> From<[P; N]> for SpecSources {
    fn from(paths: [P; N]) -> Self {
        Self(paths.iter().map(|p| p.as_ref().to_path_buf()).collect())
    }
}

/// Read and decode one document.
///
/// `.yaml` and `.yml` files are decoded as YAML; anything else as JSON.
///
/// # Errors
///
/// [`LoadError::Io`] if the file cannot be read, [`LoadError::Decode`] if
/// it is not valid JSON/YAML.
pub fn read_document(path: &Path) -> Result<Value, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match ext {
        "yaml" | "yml" => {
            let yaml: serde_yaml::Value =
                serde_yaml::from_str(&content).map_err(|e| LoadError::Decode {
                    path: path.to_path_buf(),
                    reason: format!("invalid YAML: {e}"),
                })?;
            yaml_to_json_value(&yaml).map_err(|reason| LoadError::Decode {
                path: path.to_path_buf(),
                reason,
            })
        }
        _ => serde_json::from_str(&content).map_err(|e| LoadError::Decode {
            path: path.to_path_buf(),
            reason: format!("invalid JSON: {e}"),
        }),
    }
}

/// Load and merge documents from files.
///
/// # Errors
///
/// The first [`LoadError`] encountered. Nothing is merged on failure.
pub fn load_files(sources: impl Into<SpecSources>) -> Result<RawDocument, LoadError> {
    let sources = sources.into();
    let mut documents = Vec::with_capacity(sources.paths().len());
    for path in sources.paths() {
        let value = read_document(path)?;
        let document = RawDocument::project(value).ok_or_else(|| LoadError::NotAnObject {
            path: path.clone(),
        })?;
        tracing::debug!(
            path = %path.display(),
            paths = document.paths.as_ref().map_or(0, Map::len),
            definitions = document.definitions.as_ref().map_or(0, Map::len),
            "loaded swagger document"
        );
        documents.push(document);
    }
    Ok(fold(documents))
}

/// Merge already-decoded documents.
///
/// # Errors
///
/// [`LoadError::NotAnObject`] if any value is not a JSON object. The
/// reported path is `<value #N>` with `N` the zero-based position.
pub fn load_values(values: impl IntoIterator<Item = Value>) -> Result<RawDocument, LoadError> {
    let documents = values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            RawDocument::project(value).ok_or_else(|| LoadError::NotAnObject {
                path: PathBuf::from(format!("<value #{index}>")),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(fold(documents))
}

fn fold(documents: Vec<RawDocument>) -> RawDocument {
    documents
        .into_iter()
        .fold(RawDocument::default(), RawDocument::merge)
}

/// Convert a `serde_yaml::Value` to a `serde_json::Value`.
///
/// Swagger documents written in YAML use only the JSON-compatible subset,
/// so tags are dropped and scalar map keys are stringified.
fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(i.into()))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(u.into()))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => seq
            .iter()
            .map(yaml_to_json_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        serde_yaml::Value::Mapping(map) => {
            let mut object = Map::new();
            for (k, v) in map {
                // Swagger response codes (`200:`) arrive as YAML integers.
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported YAML map key: {other:?}")),
                };
                object.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(object))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(&tagged.value),
    }
}

//! # Configuration File
//!
//! `--config <FILE>` names a YAML (or JSON) file listing the Swagger
//! documents to load:
//!
//! ```yaml
//! base_dir: ../api
//! specs:
//!   - base.json
//!   - admin.yaml
//! ```
//!
//! Relative spec paths resolve against `base_dir`, which itself resolves
//! against the config file's directory and defaults to it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Parsed `--config` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SjvConfig {
    /// Swagger documents, merged in order.
    #[serde(default)]
    pub specs: Vec<PathBuf>,
    /// Directory relative spec paths are resolved against.
    #[serde(default)]
    pub base_dir: Option<PathBuf>,
}

impl SjvConfig {
    /// Read and parse a config file, anchoring `base_dir` to its directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let mut config: SjvConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))?;

        let config_dir = path.parent().unwrap_or(Path::new(""));
        config.base_dir = Some(match config.base_dir.take() {
            Some(dir) => resolve_path(&dir, config_dir),
            None => config_dir.to_path_buf(),
        });

        tracing::debug!(
            config = %path.display(),
            specs = config.specs.len(),
            "loaded configuration"
        );
        Ok(config)
    }

    /// Configured spec paths with `base_dir` applied.
    pub fn spec_paths(&self) -> Vec<PathBuf> {
        let base = self.base_dir.as_deref().unwrap_or(Path::new(""));
        self.specs.iter().map(|p| resolve_path(p, base)).collect()
    }
}

/// Spec paths from the config file (if any) followed by the ones given on
/// the command line. Later documents win on merge collisions.
pub fn collect_specs(config: Option<&Path>, cli_specs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut specs = match config {
        Some(path) => SjvConfig::load(path)?.spec_paths(),
        None => Vec::new(),
    };
    specs.extend(cli_specs.iter().cloned());
    Ok(specs)
}

fn resolve_path(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

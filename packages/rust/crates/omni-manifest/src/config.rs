//! Generator configuration.
//!
//! Resolution order (later wins):
//! - Built-in defaults: [`GeneratorConfig::default`]
//! - Project settings:  `<root>/omni-manifest.yaml` (or an explicit file)
//! - Command-line flags
//!
//! ```yaml
//! extension: php
//! excluded_dirs: [".", "..", test, tests, logs, node_modules]
//! output: vendor/modules.manifest
//! chunk_width: 70
//! parallel: true
//! follow_links: false
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ManifestError, Result};

/// Default artifact location, relative to the scanned root.
pub const DEFAULT_OUTPUT_PATH: &str = "vendor/modules.manifest";
/// Default source file extension (without the dot).
pub const DEFAULT_SOURCE_EXTENSION: &str = "php";
/// Directory names that are never descended into.
pub const DEFAULT_EXCLUDED_DIRS: [&str; 5] = [".", "..", "test", "tests", "logs"];
/// Default maximum payload line width in the artifact.
pub const DEFAULT_CHUNK_WIDTH: usize = 70;
/// Settings file looked up in the scanned root when none is given.
pub const DEFAULT_SETTINGS_FILE: &str = "omni-manifest.yaml";

/// Everything one generation run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Directory to scan
    pub root: PathBuf,
    /// Source file extension without the leading dot (case-sensitive)
    pub extension: String,
    /// Exact directory names that are pruned during traversal
    pub excluded_dirs: Vec<String>,
    /// Artifact path; relative paths resolve against `root`
    pub output_path: PathBuf,
    /// Maximum artifact payload line width in bytes (0 = single line)
    pub chunk_width: usize,
    /// Parse files on the rayon thread pool
    pub parallel: bool,
    /// Follow symbolic links during traversal
    pub follow_links: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            extension: DEFAULT_SOURCE_EXTENSION.to_string(),
            excluded_dirs: DEFAULT_EXCLUDED_DIRS
                .iter()
                .map(ToString::to_string)
                .collect(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            chunk_width: DEFAULT_CHUNK_WIDTH,
            parallel: true,
            follow_links: false,
        }
    }
}

impl GeneratorConfig {
    /// Default configuration scanning `root`.
    #[must_use]
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// True when a directory with this name must not be descended into.
    #[must_use]
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.excluded_dirs.iter().any(|excluded| excluded == name)
    }

    /// True when the file has the configured source extension.
    #[must_use]
    pub fn is_source_file(&self, path: &Path) -> bool {
        path.extension()
            .is_some_and(|ext| ext == self.extension.as_str())
    }

    /// Artifact path with relative paths resolved against the root.
    #[must_use]
    pub fn resolved_output_path(&self) -> PathBuf {
        if self.output_path.is_absolute() {
            self.output_path.clone()
        } else {
            self.root.join(&self.output_path)
        }
    }
}

/// Optional overrides read from a YAML settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestSettings {
    /// Source file extension (a leading dot is ignored)
    pub extension: Option<String>,
    /// Replacement exclusion set
    pub excluded_dirs: Option<Vec<String>>,
    /// Artifact path
    pub output: Option<PathBuf>,
    /// Payload line width
    pub chunk_width: Option<usize>,
    /// Parallel file parsing
    pub parallel: Option<bool>,
    /// Follow symbolic links
    pub follow_links: Option<bool>,
}

impl ManifestSettings {
    /// Merge two layers; values present in `overlay` win.
    #[must_use]
    pub fn merge(self, overlay: Self) -> Self {
        Self {
            extension: overlay.extension.or(self.extension),
            excluded_dirs: overlay.excluded_dirs.or(self.excluded_dirs),
            output: overlay.output.or(self.output),
            chunk_width: overlay.chunk_width.or(self.chunk_width),
            parallel: overlay.parallel.or(self.parallel),
            follow_links: overlay.follow_links.or(self.follow_links),
        }
    }

    /// Apply the present values on top of `config`.
    #[must_use]
    pub fn apply(self, config: GeneratorConfig) -> GeneratorConfig {
        GeneratorConfig {
            root: config.root,
            extension: self
                .extension
                .map_or(config.extension, |ext| ext.trim_start_matches('.').to_string()),
            excluded_dirs: self.excluded_dirs.unwrap_or(config.excluded_dirs),
            output_path: self.output.unwrap_or(config.output_path),
            chunk_width: self.chunk_width.unwrap_or(config.chunk_width),
            parallel: self.parallel.unwrap_or(config.parallel),
            follow_links: self.follow_links.unwrap_or(config.follow_links),
        }
    }
}

/// Load settings from a YAML file.
///
/// A missing file yields empty settings; an unreadable or malformed file
/// is an error.
///
/// # Errors
///
/// Returns [`ManifestError::SettingsRead`] or [`ManifestError::Settings`].
pub fn load_settings(path: &Path) -> Result<ManifestSettings> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "settings file not found; using defaults");
        return Ok(ManifestSettings::default());
    }
    let raw = std::fs::read_to_string(path).map_err(|source| ManifestError::SettingsRead {
        path: path.to_path_buf(),
        source,
    })?;
    if raw.trim().is_empty() {
        return Ok(ManifestSettings::default());
    }
    serde_yaml::from_str(&raw).map_err(|source| ManifestError::Settings {
        path: path.to_path_buf(),
        source,
    })
}

/// Project root: `PRJ_ROOT` when set, else the current directory.
#[must_use]
pub fn project_root() -> PathBuf {
    std::env::var("PRJ_ROOT")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

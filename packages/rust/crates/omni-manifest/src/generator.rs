//! Manifest Generator - the "generate manifest" operation.
//!
//! Runs the whole pipeline against a configured root:
//! scan -> extract -> build index -> write artifact.
//!
//! Discovery completes before anything is written, so a failed scan never
//! replaces the previous artifact.

use std::path::{Path, PathBuf};

use crate::artifact::write_artifact;
use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::manifest::ManifestIndex;
use crate::scanner::ModuleScanner;

/// Summary of one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    /// Artifact location
    pub output_path: PathBuf,
    /// Distinct modules recorded in the index
    pub modules: usize,
    /// Category buckets in the index
    pub categories: usize,
    /// Artifact size in bytes
    pub bytes: u64,
}

/// Generates the module manifest for a source tree.
#[derive(Debug, Clone, Default)]
pub struct ManifestGenerator {
    scanner: ModuleScanner,
}

impl ManifestGenerator {
    /// Create a generator for `config`.
    #[must_use]
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            scanner: ModuleScanner::new(config),
        }
    }

    /// Generator configuration.
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        self.scanner.config()
    }

    /// Discover modules under the configured root and index them.
    ///
    /// # Errors
    ///
    /// Any traversal or read failure aborts generation.
    pub fn generate(&self) -> Result<ManifestIndex> {
        let modules = self.scanner.scan_all(&self.config().root)?;
        Ok(ManifestIndex::from_modules(modules))
    }

    /// Generate and write the artifact to the configured output path.
    ///
    /// # Errors
    ///
    /// Returns scan errors before anything is written, or the write error.
    pub fn dump_to_file(&self) -> Result<GenerationReport> {
        self.dump_to(&self.config().resolved_output_path())
    }

    /// Generate and write the artifact to `path`.
    ///
    /// # Errors
    ///
    /// Returns scan errors before anything is written, or the write error.
    pub fn dump_to(&self, path: &Path) -> Result<GenerationReport> {
        let index = self.generate()?;
        let bytes = write_artifact(path, &index, self.config().chunk_width)?;

        let report = GenerationReport {
            output_path: path.to_path_buf(),
            modules: index.module_count(),
            categories: index.len(),
            bytes,
        };
        tracing::info!(
            path = %report.output_path.display(),
            modules = report.modules,
            categories = report.categories,
            "generated module manifest"
        );
        Ok(report)
    }
}

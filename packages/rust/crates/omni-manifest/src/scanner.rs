//! Module Scanner - walks a source tree and extracts module declarations.
//!
//! Traversal is sorted by file name, so the discovered order is stable for
//! a given tree. Directories named in the exclusion set are pruned (the
//! root itself is always scanned). Files are parsed in parallel with rayon
//! when enabled, and collected back in traversal order.
//!
//! # Example
//!
//! ```ignore
//! use omni_manifest::{GeneratorConfig, ModuleScanner};
//!
//! let scanner = ModuleScanner::new(GeneratorConfig::default());
//! for module in scanner.scan_all(Path::new("."))? {
//!     println!("{} -> {:?}", module.qualified_name(), module.categories);
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use walkdir::{DirEntry, WalkDir};

use crate::config::GeneratorConfig;
use crate::definition::ModuleDefinition;
use crate::error::{ManifestError, Result};
use crate::extractor::extract_module;

/// Discovers `@module` declarations under a directory.
#[derive(Debug, Clone, Default)]
pub struct ModuleScanner {
    config: GeneratorConfig,
}

impl ModuleScanner {
    /// Create a scanner using the extension, exclusion set and traversal
    /// flags from `config`.
    #[must_use]
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Scanner configuration.
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// List candidate source files under `root` in traversal order.
    ///
    /// # Errors
    ///
    /// Any unreadable directory (including a missing root) aborts the walk.
    pub fn candidate_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let walker = WalkDir::new(root)
            .follow_links(self.config.follow_links)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| self.should_descend(entry));

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|source| ManifestError::Traverse {
                path: source
                    .path()
                    .map_or_else(|| root.to_path_buf(), Path::to_path_buf),
                source,
            })?;

            if entry.file_type().is_file() && self.config.is_source_file(entry.path()) {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    /// Extract the module declared in one file, if any.
    ///
    /// Non-UTF-8 bytes are decoded lossily; they never fail a run.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Read`] when the file cannot be read.
    pub fn scan_file(&self, path: &Path) -> Result<Option<ModuleDefinition>> {
        let bytes = fs::read(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let content = String::from_utf8_lossy(&bytes);

        let module = extract_module(&content);
        if let Some(module) = &module {
            tracing::debug!(
                path = %path.display(),
                module = %module.qualified_name(),
                categories = module.categories.len(),
                "discovered module"
            );
        }
        Ok(module)
    }

    /// Discover every module under `root`, in traversal order.
    ///
    /// # Errors
    ///
    /// The first traversal or read failure aborts the scan; partial results
    /// are discarded.
    pub fn scan_all(&self, root: &Path) -> Result<Vec<ModuleDefinition>> {
        let files = self.candidate_files(root)?;

        let scanned: Vec<Option<ModuleDefinition>> = if self.config.parallel {
            files
                .par_iter()
                .map(|path| self.scan_file(path))
                .collect::<Result<_>>()?
        } else {
            files
                .iter()
                .map(|path| self.scan_file(path))
                .collect::<Result<_>>()?
        };

        let modules: Vec<ModuleDefinition> = scanned.into_iter().flatten().collect();

        tracing::info!(
            root = %root.display(),
            files = files.len(),
            modules = modules.len(),
            "scanned source tree"
        );

        Ok(modules)
    }

    fn should_descend(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return true;
        }
        let name = entry.file_name().to_string_lossy();
        if self.config.is_excluded_dir(&name) {
            tracing::debug!(path = %entry.path().display(), "skipping excluded directory");
            return false;
        }
        true
    }
}

//! Manifest index: category name -> modules declaring that category.
//!
//! Buckets keep first-append order and hold shared [`Arc`] references, so a
//! module with N categories is one definition referenced from N buckets.

use std::collections::HashMap;
use std::sync::Arc;

use crate::definition::ModuleDefinition;

/// Category-keyed index of discovered modules.
///
/// Equality compares bucket names, bucket order and module values.
#[derive(Debug, Clone, Default)]
pub struct ManifestIndex {
    /// Buckets in first-use order
    buckets: Vec<CategoryBucket>,
    /// Map category name -> bucket position
    bucket_map: HashMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq)]
struct CategoryBucket {
    name: String,
    modules: Vec<Arc<ModuleDefinition>>,
}

impl ManifestIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from modules in discovery order.
    ///
    /// Every module is appended to the bucket of each category it declares.
    /// Modules without categories are not recorded.
    #[must_use]
    pub fn from_modules<I>(modules: I) -> Self
    where
        I: IntoIterator<Item = ModuleDefinition>,
    {
        let mut index = Self::new();
        for module in modules {
            index.add_module(Arc::new(module));
        }
        index
    }

    /// Append a shared module to each of its categories' buckets.
    pub fn add_module(&mut self, module: Arc<ModuleDefinition>) {
        let names: Vec<String> = module.categories.iter().map(|c| c.name.clone()).collect();
        for name in names {
            self.push(&name, Arc::clone(&module));
        }
    }

    /// Append a module to one category bucket, creating it on first use.
    pub fn push(&mut self, category: &str, module: Arc<ModuleDefinition>) {
        let idx = if let Some(&idx) = self.bucket_map.get(category) {
            idx
        } else {
            let idx = self.buckets.len();
            self.bucket_map.insert(category.to_string(), idx);
            self.buckets.push(CategoryBucket {
                name: category.to_string(),
                modules: Vec::new(),
            });
            idx
        };
        self.buckets[idx].modules.push(module);
    }

    /// Modules filed under a category.
    #[must_use]
    pub fn get(&self, category: &str) -> Option<&[Arc<ModuleDefinition>]> {
        self.bucket_map
            .get(category)
            .map(|&idx| self.buckets[idx].modules.as_slice())
    }

    /// True when the category has a bucket.
    #[must_use]
    pub fn contains_category(&self, category: &str) -> bool {
        self.bucket_map.contains_key(category)
    }

    /// Category names in first-use order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.buckets.iter().map(|b| b.name.as_str())
    }

    /// `(category, modules)` pairs in first-use order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Arc<ModuleDefinition>])> {
        self.buckets
            .iter()
            .map(|b| (b.name.as_str(), b.modules.as_slice()))
    }

    /// Distinct module definitions in first-seen order.
    ///
    /// Distinctness is by shared reference, not by value.
    #[must_use]
    pub fn modules(&self) -> Vec<Arc<ModuleDefinition>> {
        let mut seen = std::collections::HashSet::new();
        let mut modules = Vec::new();
        for bucket in &self.buckets {
            for module in &bucket.modules {
                if seen.insert(Arc::as_ptr(module)) {
                    modules.push(Arc::clone(module));
                }
            }
        }
        modules
    }

    /// Number of distinct module definitions.
    #[must_use]
    pub fn module_count(&self) -> usize {
        self.modules().len()
    }

    /// Number of category buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// True when no category has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl PartialEq for ManifestIndex {
    fn eq(&self, other: &Self) -> bool {
        self.buckets == other.buckets
    }
}

impl Eq for ManifestIndex {}

/// Build the manifest index from discovered modules.
#[must_use]
pub fn build_manifest(modules: Vec<ModuleDefinition>) -> ManifestIndex {
    ManifestIndex::from_modules(modules)
}
